//! # Row Codec
//!
//! Encodes and decodes one row as a framed group. Each non-null field is
//! written as a tagged entry whose field number is the column ordinal plus
//! one (field numbers are 1-based on the wire) and whose wire kind comes
//! from the column's catalog entry. Null fields write nothing at all, so an
//! all-null row is an empty group:
//!
//! ```text
//! Row := StartGroup(3)
//!          field(ordinal + 1, wire kind per column type)*   // non-null only
//!        EndGroup(3)
//! ```
//!
//! Because every field's wire kind is fully determined by the schema, a
//! decoded field whose kind disagrees with its column is unambiguous
//! stream corruption: decode fails with
//! [`TypeMismatch`](crate::Error::TypeMismatch) and never resynchronizes.
//! Out-of-range scalars (an `int2` field that decodes beyond `i16`, a bool
//! that is neither 0 nor 1) and invalid UTF-8 in text are corruption too.

use crate::encoding::varint::{decode_zigzag, encode_zigzag};
use crate::encoding::{WireKind, WireReader, WireWriter};
use crate::error::{Error, Result};
use crate::header::ROW_GROUP;
use crate::schema::Schema;
use crate::types::{LogicalType, Value};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::io::{Read, Write};

/// One decoded row: schema-length values, `Null` where nothing was written.
/// Sixteen inline slots cover typical query widths without allocating.
pub type RowBuffer = SmallVec<[Value<'static>; 16]>;

/// Writes `row` as one framed group. The row must be schema-length and
/// every non-null value must match its column's logical type.
pub fn write_row<W: Write>(
    writer: &mut WireWriter<W>,
    schema: &Schema,
    row: &[Value<'_>],
) -> Result<()> {
    if row.len() != schema.column_count() {
        return Err(Error::InvalidOperation(format!(
            "row has {} values for {} columns",
            row.len(),
            schema.column_count()
        )));
    }
    writer.start_group(ROW_GROUP)?;
    for (idx, value) in row.iter().enumerate() {
        let Some(actual) = value.logical_type() else {
            continue; // null: omitted entirely
        };
        let expected = schema.column(idx).map(|c| c.data_type);
        if expected != Some(actual) {
            return Err(Error::TypeMismatch {
                column: idx,
                expected: expected.unwrap_or(actual),
                found: actual.wire_kind(),
            });
        }
        writer.write_header(idx as u64 + 1, actual.wire_kind())?;
        write_value(writer, value)?;
    }
    writer.end_group(ROW_GROUP)
}

fn write_value<W: Write>(writer: &mut WireWriter<W>, value: &Value<'_>) -> Result<()> {
    match value {
        Value::Null => unreachable!("nulls are filtered before write_value"),
        Value::Bool(v) => writer.write_varint_value(*v as u64),
        Value::Byte(v) => writer.write_varint_value(*v as u64),
        Value::Int2(v) => writer.write_varint_value(encode_zigzag(*v as i64)),
        Value::Int4(v) => writer.write_varint_value(encode_zigzag(*v as i64)),
        Value::Int8(v) => writer.write_varint_value(encode_zigzag(*v)),
        Value::Date(v) => writer.write_varint_value(encode_zigzag(*v as i64)),
        Value::Time(v) => writer.write_varint_value(encode_zigzag(*v)),
        Value::Timestamp(v) => writer.write_varint_value(encode_zigzag(*v)),
        Value::Float4(v) => writer.write_fixed32(v.to_bits()),
        Value::Float8(v) => writer.write_fixed64(v.to_bits()),
        Value::Uuid(v) => writer.write_bytes(v),
        Value::Interval {
            micros,
            days,
            months,
        } => {
            let mut buf = [0u8; 16];
            buf[..8].copy_from_slice(&micros.to_be_bytes());
            buf[8..12].copy_from_slice(&days.to_be_bytes());
            buf[12..].copy_from_slice(&months.to_be_bytes());
            writer.write_bytes(&buf)
        }
        Value::Decimal { digits, scale } => {
            let mut buf = [0u8; 18];
            buf[..16].copy_from_slice(&digits.to_be_bytes());
            buf[16..].copy_from_slice(&scale.to_be_bytes());
            writer.write_bytes(&buf)
        }
        Value::Text(s) => writer.write_bytes(s.as_bytes()),
        Value::Blob(b) => writer.write_bytes(b),
    }
}

/// Reads one row's fields until the group's end tag. The row's
/// `StartGroup` header must already have been consumed by the caller.
pub fn read_row<R: Read>(reader: &mut WireReader<R>, schema: &Schema) -> Result<RowBuffer> {
    let mut row: RowBuffer = SmallVec::new();
    row.resize(schema.column_count(), Value::Null);
    loop {
        let header = reader
            .read_header()?
            .ok_or_else(|| Error::Corrupt("stream ended inside a row block".into()))?;
        if header.kind == WireKind::EndGroup {
            if header.field != ROW_GROUP {
                return Err(Error::Corrupt(format!(
                    "row block closed by end tag {}",
                    header.field
                )));
            }
            break;
        }
        let idx = (header.field - 1) as usize;
        let column = schema.column(idx).ok_or_else(|| {
            Error::Corrupt(format!(
                "row field {} beyond schema of {} columns",
                header.field,
                schema.column_count()
            ))
        })?;
        if header.kind != column.data_type.wire_kind() {
            return Err(Error::TypeMismatch {
                column: idx,
                expected: column.data_type,
                found: header.kind,
            });
        }
        row[idx] = read_value(reader, column.data_type)?;
    }
    Ok(row)
}

fn read_value<R: Read>(reader: &mut WireReader<R>, ty: LogicalType) -> Result<Value<'static>> {
    let value = match ty {
        LogicalType::Bool => match reader.read_varint_value()? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            other => return Err(Error::Corrupt(format!("bool field holds {}", other))),
        },
        LogicalType::Byte => {
            let raw = reader.read_varint_value()?;
            let v = u8::try_from(raw)
                .map_err(|_| Error::Corrupt(format!("byte field holds {}", raw)))?;
            Value::Byte(v)
        }
        LogicalType::Int2 => {
            let raw = decode_zigzag(reader.read_varint_value()?);
            let v = i16::try_from(raw)
                .map_err(|_| Error::Corrupt(format!("int2 field holds {}", raw)))?;
            Value::Int2(v)
        }
        LogicalType::Int4 => {
            let raw = decode_zigzag(reader.read_varint_value()?);
            let v = i32::try_from(raw)
                .map_err(|_| Error::Corrupt(format!("int4 field holds {}", raw)))?;
            Value::Int4(v)
        }
        LogicalType::Int8 => Value::Int8(decode_zigzag(reader.read_varint_value()?)),
        LogicalType::Date => {
            let raw = decode_zigzag(reader.read_varint_value()?);
            let v = i32::try_from(raw)
                .map_err(|_| Error::Corrupt(format!("date field holds {}", raw)))?;
            Value::Date(v)
        }
        LogicalType::Time => Value::Time(decode_zigzag(reader.read_varint_value()?)),
        LogicalType::Timestamp => Value::Timestamp(decode_zigzag(reader.read_varint_value()?)),
        LogicalType::Float4 => Value::Float4(f32::from_bits(reader.read_fixed32()?)),
        LogicalType::Float8 => Value::Float8(f64::from_bits(reader.read_fixed64()?)),
        LogicalType::Uuid => {
            let bytes = reader.read_bytes()?;
            let arr: [u8; 16] = bytes.as_slice().try_into().map_err(|_| {
                Error::Corrupt(format!("uuid field holds {} bytes", bytes.len()))
            })?;
            Value::Uuid(arr)
        }
        LogicalType::Interval => {
            let bytes = reader.read_bytes()?;
            if bytes.len() != 16 {
                return Err(Error::Corrupt(format!(
                    "interval field holds {} bytes",
                    bytes.len()
                )));
            }
            Value::Interval {
                micros: i64::from_be_bytes(bytes[..8].try_into().unwrap()),
                days: i32::from_be_bytes(bytes[8..12].try_into().unwrap()),
                months: i32::from_be_bytes(bytes[12..].try_into().unwrap()),
            }
        }
        LogicalType::Decimal => {
            let bytes = reader.read_bytes()?;
            if bytes.len() != 18 {
                return Err(Error::Corrupt(format!(
                    "decimal field holds {} bytes",
                    bytes.len()
                )));
            }
            Value::Decimal {
                digits: i128::from_be_bytes(bytes[..16].try_into().unwrap()),
                scale: i16::from_be_bytes(bytes[16..].try_into().unwrap()),
            }
        }
        LogicalType::Text => {
            let bytes = reader.read_bytes()?;
            let text = String::from_utf8(bytes)
                .map_err(|e| Error::Corrupt(format!("invalid UTF-8 in text field: {}", e)))?;
            Value::Text(Cow::Owned(text))
        }
        LogicalType::Blob => Value::Blob(Cow::Owned(reader.read_bytes()?)),
    };
    Ok(value)
}

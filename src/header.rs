//! # Table Header Codec
//!
//! Encodes and decodes the schema block that precedes the rows of each
//! table. One group per column, holding the column name and its catalog
//! type code:
//!
//! ```text
//! Column := StartGroup(2)
//!             name     (field 1, length-delimited UTF-8)
//!             typeCode (field 2, varint)
//!           EndGroup(2)
//! ```
//!
//! The column section ends at the first header that is not a column
//! `StartGroup`: the first row's group, or the table's end. That header
//! belongs to the caller, so `read_header` peeks and leaves it in place.
//!
//! Any structural defect (a missing or duplicated name or type code, an
//! unknown type code, a stray field, truncation mid-column) is a
//! [`MalformedHeader`](crate::Error::MalformedHeader) failure. Headers are
//! never partially recovered.

use crate::encoding::{WireKind, WireReader, WireWriter};
use crate::error::{Error, Result};
use crate::schema::{ColumnDef, Schema};
use crate::types::LogicalType;
use std::io::{Read, Write};

/// Field number of each table group in the stream.
pub(crate) const TABLE_GROUP: u64 = 1;
/// Field number of each column group inside a table.
pub(crate) const COLUMN_GROUP: u64 = 2;
/// Field number of each row group inside a table.
pub(crate) const ROW_GROUP: u64 = 3;

const COLUMN_NAME_FIELD: u64 = 1;
const COLUMN_TYPE_FIELD: u64 = 2;

/// Writes the schema as a run of column groups.
pub fn write_header<W: Write>(writer: &mut WireWriter<W>, schema: &Schema) -> Result<()> {
    for column in schema.iter() {
        writer.start_group(COLUMN_GROUP)?;
        writer.write_header(COLUMN_NAME_FIELD, WireKind::LengthDelimited)?;
        writer.write_bytes(column.name.as_bytes())?;
        writer.write_varint_field(COLUMN_TYPE_FIELD, column.data_type.code() as u64)?;
        writer.end_group(COLUMN_GROUP)?;
    }
    Ok(())
}

/// Reads consecutive column groups into a schema, stopping before the
/// first non-column header. A table may legitimately have zero columns.
pub fn read_header<R: Read>(reader: &mut WireReader<R>) -> Result<Schema> {
    let mut columns = Vec::new();
    loop {
        match reader.peek_header()? {
            Some(header)
                if header.field == COLUMN_GROUP && header.kind == WireKind::StartGroup =>
            {
                reader.read_header()?;
                columns.push(read_column(reader)?);
            }
            _ => break,
        }
    }
    Ok(Schema::new(columns))
}

fn read_column<R: Read>(reader: &mut WireReader<R>) -> Result<ColumnDef> {
    let mut name: Option<String> = None;
    let mut data_type: Option<LogicalType> = None;
    loop {
        let header = reader.read_header()?.ok_or_else(|| {
            Error::MalformedHeader("stream ended inside a column block".into())
        })?;
        match (header.field, header.kind) {
            (COLUMN_NAME_FIELD, WireKind::LengthDelimited) => {
                if name.is_some() {
                    return Err(Error::MalformedHeader("duplicate column name field".into()));
                }
                let bytes = reader.read_bytes()?;
                let text = String::from_utf8(bytes).map_err(|e| {
                    Error::MalformedHeader(format!("column name is not UTF-8: {}", e))
                })?;
                name = Some(text);
            }
            (COLUMN_TYPE_FIELD, WireKind::Varint) => {
                if data_type.is_some() {
                    return Err(Error::MalformedHeader("duplicate column type field".into()));
                }
                let code = reader.read_varint_value()?;
                let code = u8::try_from(code).map_err(|_| {
                    Error::MalformedHeader(format!("unknown type code: {}", code))
                })?;
                data_type = Some(LogicalType::try_from(code)?);
            }
            (field, WireKind::EndGroup) => {
                if field != COLUMN_GROUP {
                    return Err(Error::MalformedHeader(format!(
                        "column block closed by end tag {}",
                        field
                    )));
                }
                break;
            }
            (field, kind) => {
                return Err(Error::MalformedHeader(format!(
                    "unexpected field {} ({:?}) in column block",
                    field, kind
                )));
            }
        }
    }
    match (name, data_type) {
        (Some(name), Some(data_type)) => Ok(ColumnDef::new(name, data_type)),
        (None, _) => Err(Error::MalformedHeader("column block missing name".into())),
        (_, None) => Err(Error::MalformedHeader(
            "column block missing type code".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(schema: &Schema) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_header(&mut WireWriter::new(&mut bytes), schema).unwrap();
        bytes
    }

    fn decode(bytes: Vec<u8>) -> Result<Schema> {
        read_header(&mut WireReader::new(Cursor::new(bytes)))
    }

    #[test]
    fn round_trip_preserves_names_and_types() {
        let schema = Schema::new(vec![
            ColumnDef::new("id", LogicalType::Int8),
            ColumnDef::new("name", LogicalType::Text),
            ColumnDef::new("created", LogicalType::Timestamp),
        ]);
        let decoded = decode(encode(&schema)).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn empty_schema_round_trips() {
        let schema = Schema::new(vec![]);
        let decoded = decode(encode(&schema)).unwrap();
        assert_eq!(decoded.column_count(), 0);
    }

    #[test]
    fn stops_before_first_non_column_header() {
        let mut bytes = Vec::new();
        {
            let mut writer = WireWriter::new(&mut bytes);
            write_header(
                &mut writer,
                &Schema::new(vec![ColumnDef::new("a", LogicalType::Bool)]),
            )
            .unwrap();
            writer.start_group(ROW_GROUP).unwrap();
        }
        let mut reader = WireReader::new(Cursor::new(bytes));
        let schema = read_header(&mut reader).unwrap();
        assert_eq!(schema.column_count(), 1);
        let next = reader.read_header().unwrap().unwrap();
        assert_eq!(next.field, ROW_GROUP);
        assert_eq!(next.kind, WireKind::StartGroup);
    }

    #[test]
    fn missing_type_code_is_malformed() {
        let mut bytes = Vec::new();
        {
            let mut writer = WireWriter::new(&mut bytes);
            writer.start_group(COLUMN_GROUP).unwrap();
            writer.write_header(COLUMN_NAME_FIELD, WireKind::LengthDelimited).unwrap();
            writer.write_bytes(b"lonely").unwrap();
            writer.end_group(COLUMN_GROUP).unwrap();
        }
        let err = decode(bytes).unwrap_err();
        assert!(err.to_string().contains("missing type code"));
    }

    #[test]
    fn missing_name_is_malformed() {
        let mut bytes = Vec::new();
        {
            let mut writer = WireWriter::new(&mut bytes);
            writer.start_group(COLUMN_GROUP).unwrap();
            writer
                .write_varint_field(COLUMN_TYPE_FIELD, LogicalType::Int4.code() as u64)
                .unwrap();
            writer.end_group(COLUMN_GROUP).unwrap();
        }
        let err = decode(bytes).unwrap_err();
        assert!(err.to_string().contains("missing name"));
    }

    #[test]
    fn unknown_type_code_is_malformed() {
        let mut bytes = Vec::new();
        {
            let mut writer = WireWriter::new(&mut bytes);
            writer.start_group(COLUMN_GROUP).unwrap();
            writer.write_header(COLUMN_NAME_FIELD, WireKind::LengthDelimited).unwrap();
            writer.write_bytes(b"c").unwrap();
            writer.write_varint_field(COLUMN_TYPE_FIELD, 99).unwrap();
            writer.end_group(COLUMN_GROUP).unwrap();
        }
        let err = decode(bytes).unwrap_err();
        assert!(err.to_string().contains("unknown type code"));
    }

    #[test]
    fn truncated_column_block_is_malformed() {
        let mut bytes = Vec::new();
        {
            let mut writer = WireWriter::new(&mut bytes);
            writer.start_group(COLUMN_GROUP).unwrap();
            writer.write_header(COLUMN_NAME_FIELD, WireKind::LengthDelimited).unwrap();
            writer.write_bytes(b"c").unwrap();
            // No type code, no end group: the stream just stops.
        }
        let err = decode(bytes).unwrap_err();
        assert!(err.to_string().contains("ended inside a column block"));
    }
}

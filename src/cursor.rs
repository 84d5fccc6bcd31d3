//! # Forward-Only Cursor
//!
//! The decode side: opens on a byte source, reads the first table's schema,
//! then yields rows one at a time with typed positional accessors, in the
//! style of a database data reader.
//!
//! ## State Machine
//!
//! ```text
//! Closed -> SchemaReady(result i) -> RowReady(result i, row j)
//!                 ^                        |
//!                 |                        v
//!                 +---- AfterLastRow(result i) ---- advance_result_set
//!                              |
//!                              v
//!                       Closed (exhausted)
//! ```
//!
//! States are an explicit enum rather than boolean flags so the accessor
//! precedence rule below is a single match, not a pile of conditionals.
//!
//! ## Accessor Precedence
//!
//! Every typed accessor applies the same checks, strictly in this order:
//!
//! 1. cursor closed            -> `InvalidOperation` ("cursor is closed")
//! 2. no current row           -> `InvalidOperation` ("no current row")
//! 3. position out of range    -> `IndexOutOfRange`
//! 4. field is null            -> `InvalidOperation` ("field N is null")
//! 5. stored type != requested -> `InvalidOperation` (invalid cast)
//! 6. otherwise the value
//!
//! Structural errors always win over value errors: a closed cursor reports
//! closed even for an absurd position, and a null check never masks an
//! out-of-range index. All five failures leave the cursor usable; only
//! stream corruption (during `advance_row`/`advance_result_set`) and
//! `close` end its life.

use crate::encoding::{WireKind, WireReader};
use crate::error::{Error, Result};
use crate::header::{self, ROW_GROUP, TABLE_GROUP};
use crate::row::{self, RowBuffer};
use crate::schema::Schema;
use crate::types::{LogicalType, Value};
use smallvec::SmallVec;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Closed,
    SchemaReady,
    RowReady,
    AfterLastRow,
}

/// Forward-only, lazily decoding reader over an encoded stream.
#[derive(Debug)]
pub struct Cursor<R: Read> {
    reader: WireReader<R>,
    state: CursorState,
    schema: Schema,
    current_row: RowBuffer,
    result_index: usize,
}

impl<R: Read> Cursor<R> {
    /// Opens a cursor on `source` and decodes the first table's schema.
    /// Fails with [`Error::EmptyStream`] if the stream holds no table.
    pub fn open(source: R) -> Result<Cursor<R>> {
        let mut reader = WireReader::new(source);
        let schema = match read_table_start(&mut reader)? {
            Some(schema) => schema,
            None => return Err(Error::EmptyStream),
        };
        Ok(Cursor {
            reader,
            state: CursorState::SchemaReady,
            schema,
            current_row: SmallVec::new(),
            result_index: 0,
        })
    }

    /// Decodes the next row of the current result set. Returns false once
    /// the result set's rows are exhausted.
    pub fn advance_row(&mut self) -> Result<bool> {
        match self.state {
            CursorState::Closed => Err(Error::InvalidOperation("cursor is closed".into())),
            CursorState::AfterLastRow => Ok(false),
            CursorState::SchemaReady | CursorState::RowReady => {
                let header = self.reader.read_header()?.ok_or_else(|| {
                    Error::Corrupt("stream ended inside a table block".into())
                })?;
                match (header.field, header.kind) {
                    (ROW_GROUP, WireKind::StartGroup) => {
                        self.current_row = row::read_row(&mut self.reader, &self.schema)?;
                        self.state = CursorState::RowReady;
                        Ok(true)
                    }
                    (TABLE_GROUP, WireKind::EndGroup) => {
                        self.current_row.clear();
                        self.state = CursorState::AfterLastRow;
                        Ok(false)
                    }
                    (field, kind) => Err(Error::Corrupt(format!(
                        "unexpected field {} ({:?}) in table block",
                        field, kind
                    ))),
                }
            }
        }
    }

    /// Moves to the next result set's schema. Valid only once the current
    /// result set's rows are exhausted; returns false (and closes the
    /// cursor) at end of stream.
    pub fn advance_result_set(&mut self) -> Result<bool> {
        match self.state {
            CursorState::Closed => Err(Error::InvalidOperation("cursor is closed".into())),
            CursorState::SchemaReady | CursorState::RowReady => Err(Error::InvalidOperation(
                "current result set still has unread rows".into(),
            )),
            CursorState::AfterLastRow => match read_table_start(&mut self.reader)? {
                Some(schema) => {
                    self.schema = schema;
                    self.result_index += 1;
                    self.state = CursorState::SchemaReady;
                    Ok(true)
                }
                None => {
                    self.close();
                    Ok(false)
                }
            },
        }
    }

    /// Closes the cursor from any state. Idempotent; retains no row state.
    pub fn close(&mut self) {
        self.state = CursorState::Closed;
        self.current_row = SmallVec::new();
    }

    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }

    /// Ordinal of the current result set within the stream, starting at 0.
    pub fn result_set_index(&self) -> usize {
        self.result_index
    }

    /// Column count of the current result set's schema.
    pub fn column_count(&self) -> Result<usize> {
        self.require_open()?;
        Ok(self.schema.column_count())
    }

    pub fn column_name(&self, position: usize) -> Result<&str> {
        self.require_open()?;
        self.column_at(position).map(|c| c.name.as_str())
    }

    pub fn column_type(&self, position: usize) -> Result<LogicalType> {
        self.require_open()?;
        self.column_at(position).map(|c| c.data_type)
    }

    /// Position of the first column with the given name.
    pub fn ordinal(&self, name: &str) -> Result<usize> {
        self.require_open()?;
        self.schema
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::InvalidOperation(format!("no column named '{}'", name)))
    }

    /// Whether the field at `position` in the current row is null.
    /// Applies the structural checks (closed, no row, range) only.
    pub fn is_null(&self, position: usize) -> Result<bool> {
        self.field(position).map(Value::is_null)
    }

    /// The raw value at `position`, `Value::Null` included. Structural
    /// checks only; the typed accessors add the null and cast checks.
    pub fn value(&self, position: usize) -> Result<&Value<'static>> {
        self.field(position)
    }

    pub fn get_bool(&self, position: usize) -> Result<bool> {
        match self.non_null_field(position)? {
            Value::Bool(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Bool)),
        }
    }

    pub fn get_byte(&self, position: usize) -> Result<u8> {
        match self.non_null_field(position)? {
            Value::Byte(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Byte)),
        }
    }

    pub fn get_int2(&self, position: usize) -> Result<i16> {
        match self.non_null_field(position)? {
            Value::Int2(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Int2)),
        }
    }

    pub fn get_int4(&self, position: usize) -> Result<i32> {
        match self.non_null_field(position)? {
            Value::Int4(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Int4)),
        }
    }

    pub fn get_int8(&self, position: usize) -> Result<i64> {
        match self.non_null_field(position)? {
            Value::Int8(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Int8)),
        }
    }

    pub fn get_float4(&self, position: usize) -> Result<f32> {
        match self.non_null_field(position)? {
            Value::Float4(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Float4)),
        }
    }

    pub fn get_float8(&self, position: usize) -> Result<f64> {
        match self.non_null_field(position)? {
            Value::Float8(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Float8)),
        }
    }

    /// Days since the Unix epoch.
    pub fn get_date(&self, position: usize) -> Result<i32> {
        match self.non_null_field(position)? {
            Value::Date(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Date)),
        }
    }

    /// Microseconds since midnight.
    pub fn get_time(&self, position: usize) -> Result<i64> {
        match self.non_null_field(position)? {
            Value::Time(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Time)),
        }
    }

    /// Microseconds since the Unix epoch.
    pub fn get_timestamp(&self, position: usize) -> Result<i64> {
        match self.non_null_field(position)? {
            Value::Timestamp(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Timestamp)),
        }
    }

    pub fn get_uuid(&self, position: usize) -> Result<[u8; 16]> {
        match self.non_null_field(position)? {
            Value::Uuid(v) => Ok(*v),
            other => Err(self.cast_error(position, other, LogicalType::Uuid)),
        }
    }

    /// `(micros, days, months)`.
    pub fn get_interval(&self, position: usize) -> Result<(i64, i32, i32)> {
        match self.non_null_field(position)? {
            Value::Interval {
                micros,
                days,
                months,
            } => Ok((*micros, *days, *months)),
            other => Err(self.cast_error(position, other, LogicalType::Interval)),
        }
    }

    /// `(digits, scale)`: the unscaled integer and its decimal scale.
    pub fn get_decimal(&self, position: usize) -> Result<(i128, i16)> {
        match self.non_null_field(position)? {
            Value::Decimal { digits, scale } => Ok((*digits, *scale)),
            other => Err(self.cast_error(position, other, LogicalType::Decimal)),
        }
    }

    pub fn get_text(&self, position: usize) -> Result<&str> {
        match self.non_null_field(position)? {
            Value::Text(v) => Ok(v),
            other => Err(self.cast_error(position, other, LogicalType::Text)),
        }
    }

    pub fn get_blob(&self, position: usize) -> Result<&[u8]> {
        match self.non_null_field(position)? {
            Value::Blob(v) => Ok(v),
            other => Err(self.cast_error(position, other, LogicalType::Blob)),
        }
    }

    fn require_open(&self) -> Result<()> {
        if self.state == CursorState::Closed {
            return Err(Error::InvalidOperation("cursor is closed".into()));
        }
        Ok(())
    }

    fn column_at(&self, position: usize) -> Result<&crate::schema::ColumnDef> {
        self.schema
            .column(position)
            .ok_or(Error::IndexOutOfRange {
                index: position,
                count: self.schema.column_count(),
            })
    }

    /// Structural checks 1-3: closed, no current row, range.
    fn field(&self, position: usize) -> Result<&Value<'static>> {
        match self.state {
            CursorState::Closed => Err(Error::InvalidOperation("cursor is closed".into())),
            CursorState::SchemaReady | CursorState::AfterLastRow => {
                Err(Error::InvalidOperation("no current row".into()))
            }
            CursorState::RowReady => {
                if position >= self.schema.column_count() {
                    return Err(Error::IndexOutOfRange {
                        index: position,
                        count: self.schema.column_count(),
                    });
                }
                Ok(&self.current_row[position])
            }
        }
    }

    /// Checks 1-4: structural checks plus the null check.
    fn non_null_field(&self, position: usize) -> Result<&Value<'static>> {
        let value = self.field(position)?;
        if value.is_null() {
            return Err(Error::InvalidOperation(format!(
                "field {} is null",
                position
            )));
        }
        Ok(value)
    }

    /// Check 5: requested type differs from the stored one.
    fn cast_error(&self, position: usize, value: &Value<'_>, requested: LogicalType) -> Error {
        let stored = value
            .logical_type()
            .map(|t| t.name())
            .unwrap_or("null");
        Error::InvalidOperation(format!(
            "cannot read field {} of type {} as {}",
            position,
            stored,
            requested.name()
        ))
    }
}

/// Reads the next table's opening group and schema, or `None` at clean
/// end of stream.
fn read_table_start<R: Read>(reader: &mut WireReader<R>) -> Result<Option<Schema>> {
    let header = match reader.read_header()? {
        Some(header) => header,
        None => return Ok(None),
    };
    if header.field != TABLE_GROUP || header.kind != WireKind::StartGroup {
        return Err(Error::Corrupt(format!(
            "expected table block, found field {} ({:?})",
            header.field, header.kind
        )));
    }
    Ok(Some(header::read_header(reader)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDef, WriterOptions};
    use crate::source::{MemoryTable, MemoryTableSource};
    use crate::writer::serialize;
    use std::io;

    fn encode(tables: Vec<MemoryTable>) -> Vec<u8> {
        let mut source = MemoryTableSource::new(tables);
        let mut bytes = Vec::new();
        serialize(&mut source, &mut bytes, &WriterOptions::new()).unwrap();
        bytes
    }

    fn single_int8(values: &[Option<i64>]) -> Vec<u8> {
        let mut table = MemoryTable::new(vec![ColumnDef::new("v", LogicalType::Int8)]);
        for v in values {
            table
                .push_row([v.map(Value::Int8).unwrap_or(Value::Null)])
                .unwrap();
        }
        encode(vec![table])
    }

    fn open(bytes: Vec<u8>) -> Cursor<io::Cursor<Vec<u8>>> {
        Cursor::open(io::Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn open_on_empty_stream_fails() {
        let err = Cursor::open(io::Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::EmptyStream));
    }

    #[test]
    fn open_exposes_first_schema_without_a_row() {
        let mut cursor = open(single_int8(&[Some(1)]));
        assert_eq!(cursor.column_count().unwrap(), 1);
        assert_eq!(cursor.column_name(0).unwrap(), "v");
        assert_eq!(cursor.column_type(0).unwrap(), LogicalType::Int8);
        // No row is current yet.
        let err = cursor.get_int8(0).unwrap_err();
        assert!(err.to_string().contains("no current row"));
    }

    #[test]
    fn advance_row_walks_rows_then_reports_end() {
        let mut cursor = open(single_int8(&[Some(10), Some(20)]));
        assert!(cursor.advance_row().unwrap());
        assert_eq!(cursor.get_int8(0).unwrap(), 10);
        assert!(cursor.advance_row().unwrap());
        assert_eq!(cursor.get_int8(0).unwrap(), 20);
        assert!(!cursor.advance_row().unwrap());
        // Repeated calls stay at the end without error.
        assert!(!cursor.advance_row().unwrap());
    }

    #[test]
    fn closed_state_wins_over_everything() {
        let mut cursor = open(single_int8(&[Some(1)]));
        cursor.advance_row().unwrap();
        cursor.close();
        // Even an out-of-range position on a closed cursor reports closed.
        let err = cursor.get_int8(999).unwrap_err();
        assert!(err.to_string().contains("cursor is closed"));
        let err = cursor.advance_row().unwrap_err();
        assert!(err.to_string().contains("cursor is closed"));
        let err = cursor.is_null(0).unwrap_err();
        assert!(err.to_string().contains("cursor is closed"));
    }

    #[test]
    fn close_is_idempotent() {
        let mut cursor = open(single_int8(&[Some(1)]));
        cursor.close();
        cursor.close();
        assert!(cursor.is_closed());
    }

    #[test]
    fn out_of_range_wins_over_null_and_cast() {
        let mut cursor = open(single_int8(&[None]));
        cursor.advance_row().unwrap();
        let err = cursor.get_text(5).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, count: 1 }));
    }

    #[test]
    fn null_field_fails_with_null_message_but_cursor_survives() {
        let mut cursor = open(single_int8(&[None, Some(7)]));
        cursor.advance_row().unwrap();
        assert!(cursor.is_null(0).unwrap());
        let err = cursor.get_int8(0).unwrap_err();
        assert!(err.to_string().contains("field 0 is null"));
        assert!(err.is_recoverable());
        // The cursor is still usable.
        assert!(cursor.advance_row().unwrap());
        assert_eq!(cursor.get_int8(0).unwrap(), 7);
    }

    #[test]
    fn invalid_cast_names_both_types_and_cursor_survives() {
        let mut table = MemoryTable::new(vec![
            ColumnDef::new("s", LogicalType::Text),
            ColumnDef::new("n", LogicalType::Int8),
        ]);
        table.push_row([Value::text("foo").into_owned(), Value::Int8(42)]).unwrap();
        let mut cursor = open(encode(vec![table]));
        cursor.advance_row().unwrap();

        let err = cursor.get_int8(0).unwrap_err();
        assert!(err.to_string().contains("text"));
        assert!(err.to_string().contains("int8"));
        assert!(err.is_recoverable());
        // Other positions in the same row remain readable.
        assert_eq!(cursor.get_int8(1).unwrap(), 42);
        assert_eq!(cursor.get_text(0).unwrap(), "foo");
    }

    #[test]
    fn advance_result_set_requires_drained_rows() {
        let mut cursor = open(encode(vec![
            {
                let mut t = MemoryTable::new(vec![ColumnDef::new("a", LogicalType::Int8)]);
                t.push_row([Value::Int8(1)]).unwrap();
                t
            },
            MemoryTable::new(vec![ColumnDef::new("b", LogicalType::Text)]),
        ]));
        let err = cursor.advance_result_set().unwrap_err();
        assert!(err.to_string().contains("unread rows"));

        while cursor.advance_row().unwrap() {}
        assert!(cursor.advance_result_set().unwrap());
        assert_eq!(cursor.column_name(0).unwrap(), "b");
        assert_eq!(cursor.result_set_index(), 1);

        // Second result set has no rows.
        assert!(!cursor.advance_row().unwrap());
        assert!(!cursor.advance_result_set().unwrap());
        assert!(cursor.is_closed());
    }

    #[test]
    fn ordinal_resolves_first_matching_name() {
        let mut table = MemoryTable::new(vec![
            ColumnDef::new("x", LogicalType::Int4),
            ColumnDef::new("y", LogicalType::Int4),
            ColumnDef::new("x", LogicalType::Text),
        ]);
        table
            .push_row([Value::Int4(1), Value::Int4(2), Value::text("dup").into_owned()])
            .unwrap();
        let cursor = open(encode(vec![table]));
        assert_eq!(cursor.ordinal("x").unwrap(), 0);
        assert_eq!(cursor.ordinal("y").unwrap(), 1);
        assert!(cursor.ordinal("z").is_err());
    }

    #[test]
    fn truncated_table_is_corruption() {
        let mut bytes = single_int8(&[Some(1)]);
        bytes.pop(); // drop the table's end-group header
        let mut cursor = open(bytes);
        cursor.advance_row().unwrap();
        let err = cursor.advance_row().unwrap_err();
        assert!(err.to_string().contains("ended inside a table block"));
    }
}

//! # tabwire - Streaming Tabular Result-Set Codec
//!
//! tabwire encodes and decodes tabular query results (one or more
//! sequential result sets, each a fixed column schema followed by a stream
//! of rows) to and from a compact, tag-based binary wire format. Rows are
//! produced and consumed one at a time, in order, in a single pass: a
//! result set of any size streams through in constant memory, never
//! materialized whole.
//!
//! ## Quick Start
//!
//! ```
//! use tabwire::{
//!     serialize, ColumnDef, Cursor, LogicalType, MemoryTable, MemoryTableSource, Value,
//!     WriterOptions,
//! };
//!
//! let mut table = MemoryTable::new(vec![
//!     ColumnDef::new("id", LogicalType::Int8),
//!     ColumnDef::new("name", LogicalType::Text),
//! ]);
//! table.push_row([Value::Int8(1), Value::text("Alice").into_owned()])?;
//! table.push_row([Value::Int8(2), Value::Null])?;
//!
//! let mut bytes = Vec::new();
//! serialize(&mut MemoryTableSource::from(table), &mut bytes, &WriterOptions::new())?;
//!
//! let mut cursor = Cursor::open(std::io::Cursor::new(bytes))?;
//! while cursor.advance_row()? {
//!     let id = cursor.get_int8(0)?;
//!     if !cursor.is_null(1)? {
//!         println!("{}: {}", id, cursor.get_text(1)?);
//!     }
//! }
//! # Ok::<(), tabwire::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  serialize (Writer)  │  Cursor (Reader)     │
//! ├─────────────────────────────────────────────┤
//! │  Header Codec        │  Row Codec           │
//! ├─────────────────────────────────────────────┤
//! │  Schema  │  Type Catalog  │  Value          │
//! ├─────────────────────────────────────────────┤
//! │  Field Headers / Group Framing (wire)       │
//! ├─────────────────────────────────────────────┤
//! │  Varint / Zigzag (varint)                   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Stream Layout
//!
//! ```text
//! Stream := Table*
//! Table  := StartGroup(1) Column* Row* EndGroup(1)
//! Column := StartGroup(2) name(1, bytes) typeCode(2, varint) EndGroup(2)
//! Row    := StartGroup(3) field(ordinal + 1, kind per column)* EndGroup(3)
//! ```
//!
//! Null fields are omitted from their row entirely; the decoder restores
//! them from the schema. Each field's wire kind is fully determined by its
//! column's declared type, so a correctly initialized reader is never
//! ambiguous about a value's physical encoding.
//!
//! ## Guarantees
//!
//! - **Forward-only, single pass**: no backward seeks on either side; the
//!   source is consumed, the byte stream position is never revisited.
//! - **O(1) row memory**: at most one row buffered at any instant.
//! - **Fail-fast**: unmappable columns fail before any row is written;
//!   corruption fails decoding permanently; cursor-state errors leave the
//!   cursor usable.
//! - **Not thread-safe by design**: a `Cursor` or in-progress `serialize`
//!   owns its byte stream exclusively; callers provide their own
//!   synchronization if they need it.
//!
//! ## Module Overview
//!
//! - [`encoding`]: varint and field-header/group wire primitives
//! - [`types`]: logical type catalog and runtime values
//! - [`schema`]: column descriptors, schema construction, writer options
//! - [`header`] / [`row`]: framed codecs for schemas and rows
//! - [`source`]: the `TabularSource` trait and in-memory adapters
//! - [`writer`]: the streaming serializer
//! - [`cursor`]: the forward-only typed reader
//! - [`error`]: the error taxonomy

pub mod cursor;
pub mod encoding;
pub mod error;
pub mod header;
pub mod row;
pub mod schema;
pub mod source;
pub mod types;
pub mod writer;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use row::RowBuffer;
pub use schema::{ColumnDef, Schema, SourceColumn, WriterOptions};
pub use source::{MemoryTable, MemoryTableSource, TabularSource};
pub use types::{LogicalType, Value};
pub use writer::serialize;

//! # Error Taxonomy
//!
//! One enum for the whole crate, split along what the caller can do about
//! the failure:
//!
//! - **Construction**: [`Error::UnmappableColumn`]. Schema building
//!   failed before any row was touched.
//! - **Stream corruption** (fatal): [`Error::Io`],
//!   [`Error::MalformedHeader`], [`Error::TypeMismatch`],
//!   [`Error::Corrupt`], [`Error::EmptyStream`]. The stream position is
//!   unspecified afterwards and the cursor or writer must be abandoned.
//! - **Cursor state** (recoverable): [`Error::InvalidOperation`],
//!   [`Error::IndexOutOfRange`]. A misuse of the cursor at its current
//!   position; the cursor itself stays usable.
//!
//! [`Error::is_recoverable`] distinguishes the last group so callers can
//! retry accessor calls without tearing the cursor down.

use crate::encoding::WireKind;
use crate::types::LogicalType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The stream ended before the first table block.
    #[error("stream contains no table block")]
    EmptyStream,

    /// A source-reported type name with no catalog entry and no override.
    #[error("column '{column}' has unmappable type '{type_name}'")]
    UnmappableColumn { column: String, type_name: String },

    /// Structural defect in a table header's column section.
    #[error("malformed table header: {0}")]
    MalformedHeader(String),

    /// A row field's wire kind disagrees with its column's type.
    #[error("type mismatch at column {column}: expected {expected:?}, found {found:?} on the wire")]
    TypeMismatch {
        column: usize,
        expected: LogicalType,
        found: WireKind,
    },

    /// Wire-level corruption: bad varint marker, range overflow, invalid
    /// UTF-8, mismatched group framing.
    #[error("corrupt stream: {0}")]
    Corrupt(String),

    /// The cursor was asked for something its current state cannot give.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A field position outside the current schema.
    #[error("position {index} out of range for {count} columns")]
    IndexOutOfRange { index: usize, count: usize },
}

impl Error {
    /// True for cursor-state failures that leave the cursor usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidOperation(_) | Error::IndexOutOfRange { .. }
        )
    }
}

//! # Logical Type Catalog
//!
//! The closed set of column value kinds the format supports, and their
//! mapping onto physical wire encodings. The catalog is a static
//! enumeration: the type code written into each table header is the enum
//! discriminant, and every decode path matches exhaustively, so an
//! unsupported type can never reach row encoding.
//!
//! ## Catalog
//!
//! | Type | Code | Wire kind | Transform |
//! |------|------|-----------|-----------|
//! | Bool | 0 | Varint | 0 or 1 |
//! | Byte | 1 | Varint | plain u8 |
//! | Int2 | 2 | Varint | zigzag |
//! | Int4 | 3 | Varint | zigzag |
//! | Int8 | 4 | Varint | zigzag |
//! | Float4 | 5 | Fixed32 | f32 bits, little-endian |
//! | Float8 | 6 | Fixed64 | f64 bits, little-endian |
//! | Date | 7 | Varint | zigzag days since Unix epoch |
//! | Time | 8 | Varint | zigzag microseconds since midnight |
//! | Timestamp | 9 | Varint | zigzag microseconds since Unix epoch |
//! | Uuid | 10 | LengthDelimited | 16 raw bytes |
//! | Interval | 11 | LengthDelimited | micros i64, days i32, months i32, big-endian |
//! | Decimal | 12 | LengthDelimited | digits i128, scale i16, big-endian |
//! | Text | 20 | LengthDelimited | UTF-8 bytes |
//! | Blob | 21 | LengthDelimited | raw bytes |
//!
//! Discriminants 20+ mark the unbounded variable-length types; everything
//! below has a small bounded payload.
//!
//! ## Name Lookup
//!
//! Tabular sources report column types by name (the way drivers report
//! provider types). [`LogicalType::from_name`] resolves those names
//! case-insensitively, including common aliases (`smallint`, `bigint`,
//! `double`, `string`, `bytes`, `guid`, ...).

use crate::encoding::WireKind;
use crate::error::Error;

/// A value kind recognized by the wire format.
///
/// `#[repr(u8)]` so the discriminant doubles as the type code written in
/// table headers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Bool = 0,
    Byte = 1,
    Int2 = 2,
    Int4 = 3,
    Int8 = 4,
    Float4 = 5,
    Float8 = 6,
    Date = 7,
    Time = 8,
    Timestamp = 9,
    Uuid = 10,
    Interval = 11,
    Decimal = 12,

    Text = 20,
    Blob = 21,
}

impl LogicalType {
    /// The physical encoding carried in row field headers for this type.
    pub fn wire_kind(&self) -> WireKind {
        match self {
            LogicalType::Bool
            | LogicalType::Byte
            | LogicalType::Int2
            | LogicalType::Int4
            | LogicalType::Int8
            | LogicalType::Date
            | LogicalType::Time
            | LogicalType::Timestamp => WireKind::Varint,
            LogicalType::Float4 => WireKind::Fixed32,
            LogicalType::Float8 => WireKind::Fixed64,
            LogicalType::Uuid
            | LogicalType::Interval
            | LogicalType::Decimal
            | LogicalType::Text
            | LogicalType::Blob => WireKind::LengthDelimited,
        }
    }

    /// Type code written in table headers.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Canonical lowercase name, also accepted by [`from_name`](Self::from_name).
    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::Bool => "bool",
            LogicalType::Byte => "byte",
            LogicalType::Int2 => "int2",
            LogicalType::Int4 => "int4",
            LogicalType::Int8 => "int8",
            LogicalType::Float4 => "float4",
            LogicalType::Float8 => "float8",
            LogicalType::Date => "date",
            LogicalType::Time => "time",
            LogicalType::Timestamp => "timestamp",
            LogicalType::Uuid => "uuid",
            LogicalType::Interval => "interval",
            LogicalType::Decimal => "decimal",
            LogicalType::Text => "text",
            LogicalType::Blob => "blob",
        }
    }

    /// Resolves a source-reported type name against the catalog.
    /// Returns `None` for names the catalog does not know.
    pub fn from_name(name: &str) -> Option<LogicalType> {
        let lowered = name.to_ascii_lowercase();
        let ty = match lowered.as_str() {
            "bool" | "boolean" => LogicalType::Bool,
            "byte" | "uint1" | "tinyint" => LogicalType::Byte,
            "int2" | "smallint" | "short" => LogicalType::Int2,
            "int4" | "int" | "integer" => LogicalType::Int4,
            "int8" | "bigint" | "long" => LogicalType::Int8,
            "float4" | "real" | "float" => LogicalType::Float4,
            "float8" | "double" | "double precision" => LogicalType::Float8,
            "date" => LogicalType::Date,
            "time" => LogicalType::Time,
            "timestamp" | "datetime" => LogicalType::Timestamp,
            "uuid" | "guid" => LogicalType::Uuid,
            "interval" | "duration" | "timespan" => LogicalType::Interval,
            "decimal" | "numeric" => LogicalType::Decimal,
            "text" | "string" | "varchar" | "char" => LogicalType::Text,
            "blob" | "bytes" | "bytea" | "binary" => LogicalType::Blob,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns true for types with an unbounded payload.
    pub fn is_variable(&self) -> bool {
        matches!(self, LogicalType::Text | LogicalType::Blob)
    }

    /// Returns true for integer and floating-point types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::Byte
                | LogicalType::Int2
                | LogicalType::Int4
                | LogicalType::Int8
                | LogicalType::Float4
                | LogicalType::Float8
                | LogicalType::Decimal
        )
    }

    /// Returns true for date/time types.
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            LogicalType::Date | LogicalType::Time | LogicalType::Timestamp | LogicalType::Interval
        )
    }
}

impl TryFrom<u8> for LogicalType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(LogicalType::Bool),
            1 => Ok(LogicalType::Byte),
            2 => Ok(LogicalType::Int2),
            3 => Ok(LogicalType::Int4),
            4 => Ok(LogicalType::Int8),
            5 => Ok(LogicalType::Float4),
            6 => Ok(LogicalType::Float8),
            7 => Ok(LogicalType::Date),
            8 => Ok(LogicalType::Time),
            9 => Ok(LogicalType::Timestamp),
            10 => Ok(LogicalType::Uuid),
            11 => Ok(LogicalType::Interval),
            12 => Ok(LogicalType::Decimal),
            20 => Ok(LogicalType::Text),
            21 => Ok(LogicalType::Blob),
            _ => Err(Error::MalformedHeader(format!(
                "unknown type code: {}",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LogicalType; 15] = [
        LogicalType::Bool,
        LogicalType::Byte,
        LogicalType::Int2,
        LogicalType::Int4,
        LogicalType::Int8,
        LogicalType::Float4,
        LogicalType::Float8,
        LogicalType::Date,
        LogicalType::Time,
        LogicalType::Timestamp,
        LogicalType::Uuid,
        LogicalType::Interval,
        LogicalType::Decimal,
        LogicalType::Text,
        LogicalType::Blob,
    ];

    #[test]
    fn code_round_trips_for_every_type() {
        for ty in ALL {
            assert_eq!(LogicalType::try_from(ty.code()).unwrap(), ty);
        }
    }

    #[test]
    fn name_round_trips_for_every_type() {
        for ty in ALL {
            assert_eq!(LogicalType::from_name(ty.name()), Some(ty));
        }
    }

    #[test]
    fn name_lookup_accepts_aliases() {
        assert_eq!(LogicalType::from_name("BIGINT"), Some(LogicalType::Int8));
        assert_eq!(LogicalType::from_name("guid"), Some(LogicalType::Uuid));
        assert_eq!(LogicalType::from_name("varchar"), Some(LogicalType::Text));
        assert_eq!(LogicalType::from_name("timespan"), Some(LogicalType::Interval));
        assert_eq!(LogicalType::from_name("money"), None);
    }

    #[test]
    fn unknown_code_is_a_header_error() {
        let err = LogicalType::try_from(99).unwrap_err();
        assert!(err.to_string().contains("unknown type code"));
    }

    #[test]
    fn wire_kind_is_total() {
        for ty in ALL {
            // Structural kinds never appear as value encodings.
            let kind = ty.wire_kind();
            assert!(kind != WireKind::StartGroup && kind != WireKind::EndGroup);
        }
    }

    #[test]
    fn variable_length_types() {
        assert!(LogicalType::Text.is_variable());
        assert!(LogicalType::Blob.is_variable());
        assert!(!LogicalType::Uuid.is_variable());
        assert!(!LogicalType::Int8.is_variable());
    }
}

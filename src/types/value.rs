//! # Runtime Value Representation
//!
//! `Value<'a>` is the in-memory form of one field. Text and blob variants
//! use `Cow` so sources can lend borrowed data to the writer without
//! copying, while decoded rows hold owned data (`Value<'static>`).
//!
//! `Null` is a variant rather than an `Option` wrapper: a row is a
//! fixed-length slice of values where `Null` marks the absent positions,
//! which is exactly the sparse shape the row codec produces and consumes.
//!
//! ## Variants
//!
//! | Variant | Rust type | Logical type |
//! |---------|-----------|--------------|
//! | Null | - | none |
//! | Bool | bool | Bool |
//! | Byte | u8 | Byte |
//! | Int2 / Int4 / Int8 | i16 / i32 / i64 | Int2 / Int4 / Int8 |
//! | Float4 / Float8 | f32 / f64 | Float4 / Float8 |
//! | Date | i32 days | Date |
//! | Time / Timestamp | i64 micros | Time / Timestamp |
//! | Uuid | [u8; 16] | Uuid |
//! | Interval | {micros, days, months} | Interval |
//! | Decimal | {digits: i128, scale: i16} | Decimal |
//! | Text | Cow<str> | Text |
//! | Blob | Cow<[u8]> | Blob |

use super::LogicalType;
use std::borrow::Cow;

/// One field value, possibly null, possibly borrowed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Byte(u8),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Date(i32),
    Time(i64),
    Timestamp(i64),
    Uuid([u8; 16]),
    Interval { micros: i64, days: i32, months: i32 },
    Decimal { digits: i128, scale: i16 },
    Text(Cow<'a, str>),
    Blob(Cow<'a, [u8]>),
}

impl<'a> Value<'a> {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The catalog entry this value encodes as, or `None` for null.
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(LogicalType::Bool),
            Value::Byte(_) => Some(LogicalType::Byte),
            Value::Int2(_) => Some(LogicalType::Int2),
            Value::Int4(_) => Some(LogicalType::Int4),
            Value::Int8(_) => Some(LogicalType::Int8),
            Value::Float4(_) => Some(LogicalType::Float4),
            Value::Float8(_) => Some(LogicalType::Float8),
            Value::Date(_) => Some(LogicalType::Date),
            Value::Time(_) => Some(LogicalType::Time),
            Value::Timestamp(_) => Some(LogicalType::Timestamp),
            Value::Uuid(_) => Some(LogicalType::Uuid),
            Value::Interval { .. } => Some(LogicalType::Interval),
            Value::Decimal { .. } => Some(LogicalType::Decimal),
            Value::Text(_) => Some(LogicalType::Text),
            Value::Blob(_) => Some(LogicalType::Blob),
        }
    }

    /// Detaches any borrowed data, producing a `'static` value.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Text(s) => Value::Text(Cow::Owned(s.into_owned())),
            Value::Blob(b) => Value::Blob(Cow::Owned(b.into_owned())),
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Byte(v) => Value::Byte(v),
            Value::Int2(v) => Value::Int2(v),
            Value::Int4(v) => Value::Int4(v),
            Value::Int8(v) => Value::Int8(v),
            Value::Float4(v) => Value::Float4(v),
            Value::Float8(v) => Value::Float8(v),
            Value::Date(v) => Value::Date(v),
            Value::Time(v) => Value::Time(v),
            Value::Timestamp(v) => Value::Timestamp(v),
            Value::Uuid(v) => Value::Uuid(v),
            Value::Interval {
                micros,
                days,
                months,
            } => Value::Interval {
                micros,
                days,
                months,
            },
            Value::Decimal { digits, scale } => Value::Decimal { digits, scale },
        }
    }

    /// Convenience constructor for borrowed text.
    pub fn text(s: &'a str) -> Value<'a> {
        Value::Text(Cow::Borrowed(s))
    }

    /// Convenience constructor for borrowed bytes.
    pub fn blob(b: &'a [u8]) -> Value<'a> {
        Value::Blob(Cow::Borrowed(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_has_no_logical_type() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.logical_type(), None);
    }

    #[test]
    fn every_variant_maps_to_its_catalog_entry() {
        assert_eq!(Value::Bool(true).logical_type(), Some(LogicalType::Bool));
        assert_eq!(Value::Int8(-1).logical_type(), Some(LogicalType::Int8));
        assert_eq!(
            Value::text("abc").logical_type(),
            Some(LogicalType::Text)
        );
        assert_eq!(
            Value::Decimal {
                digits: 12345,
                scale: 2
            }
            .logical_type(),
            Some(LogicalType::Decimal)
        );
        assert_eq!(
            Value::Interval {
                micros: 1,
                days: 2,
                months: 3
            }
            .logical_type(),
            Some(LogicalType::Interval)
        );
    }

    #[test]
    fn into_owned_preserves_content() {
        let text = String::from("borrowed");
        let value = Value::text(&text);
        let owned: Value<'static> = value.into_owned();
        assert_eq!(owned, Value::Text(Cow::Owned(String::from("borrowed"))));

        let bytes = vec![1u8, 2, 3];
        let owned: Value<'static> = Value::blob(&bytes).into_owned();
        assert_eq!(owned, Value::Blob(Cow::Owned(vec![1, 2, 3])));
    }
}

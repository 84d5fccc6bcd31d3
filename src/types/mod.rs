//! # Type System
//!
//! The logical-type catalog ([`data_type`]) and the runtime value
//! representation ([`value`]). The catalog decides how each column kind is
//! physically encoded; `Value` is what the writer consumes and the cursor
//! hands back.

pub mod data_type;
pub mod value;

pub use data_type::LogicalType;
pub use value::Value;

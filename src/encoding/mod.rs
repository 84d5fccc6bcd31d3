//! # Wire Encoding Primitives
//!
//! Byte-level building blocks for the stream format: the prefix-byte varint
//! codec ([`varint`]) and the field-header/group framing layer ([`wire`]).
//! Everything above this module works in terms of logical types and framed
//! blocks; everything below is raw bytes.

pub mod varint;
pub mod wire;

pub use varint::{decode_varint, decode_zigzag, encode_varint, encode_zigzag, varint_len};
pub use wire::{FieldHeader, WireKind, WireReader, WireWriter};

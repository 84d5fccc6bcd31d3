//! # Field Headers and Group Framing
//!
//! The tag/length/value layer of the stream. Every item on the wire is a
//! field: a varint header packing `(field_number << 3) | wire_kind`,
//! followed by a payload whose shape the wire kind determines. Blocks
//! (tables, column descriptors, rows) are groups: a `StartGroup` header,
//! the group's fields, then an `EndGroup` header carrying the same field
//! number.
//!
//! ## Wire Kinds
//!
//! | Kind | Payload |
//! |------|---------|
//! | Varint | one varint |
//! | Fixed32 | 4 bytes, little-endian |
//! | Fixed64 | 8 bytes, little-endian |
//! | LengthDelimited | varint byte length, then that many bytes |
//! | StartGroup / EndGroup | none (structural) |
//!
//! Field numbers are 1-based; a header with field number zero is rejected
//! as corruption.
//!
//! ## Reader Lookahead
//!
//! Decoding a table requires one header of lookahead: the header that ends
//! the column section is the first row's `StartGroup` (or the table's
//! `EndGroup`), which must remain consumable by the next layer up.
//! [`WireReader`] keeps at most one pushed-back header for this.
//! `read_header` returns `Ok(None)` only on clean end-of-stream at a header
//! boundary; truncation anywhere else is an I/O error.

use crate::encoding::varint::{read_varint, read_varint_tail, write_varint};
use crate::error::{Error, Result};
use std::io::{self, Read, Write};

/// Physical encoding strategy carried in a field header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Varint = 0,
    Fixed32 = 1,
    Fixed64 = 2,
    LengthDelimited = 3,
    StartGroup = 4,
    EndGroup = 5,
}

impl TryFrom<u8> for WireKind {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(WireKind::Varint),
            1 => Ok(WireKind::Fixed32),
            2 => Ok(WireKind::Fixed64),
            3 => Ok(WireKind::LengthDelimited),
            4 => Ok(WireKind::StartGroup),
            5 => Ok(WireKind::EndGroup),
            _ => Err(Error::Corrupt(format!("invalid wire kind: {}", value))),
        }
    }
}

/// One decoded field header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub field: u64,
    pub kind: WireKind,
}

impl FieldHeader {
    pub fn new(field: u64, kind: WireKind) -> Self {
        Self { field, kind }
    }

    fn pack(&self) -> u64 {
        (self.field << 3) | self.kind as u64
    }

    fn unpack(raw: u64) -> Result<Self> {
        let kind = WireKind::try_from((raw & 0x7) as u8)?;
        let field = raw >> 3;
        if field == 0 {
            return Err(Error::Corrupt("field number zero in header".into()));
        }
        Ok(Self { field, kind })
    }
}

/// Streaming writer for headers, groups, and field payloads.
pub struct WireWriter<W: Write> {
    sink: W,
}

impl<W: Write> WireWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_header(&mut self, field: u64, kind: WireKind) -> Result<()> {
        write_varint(&mut self.sink, FieldHeader::new(field, kind).pack())
    }

    pub fn start_group(&mut self, field: u64) -> Result<()> {
        self.write_header(field, WireKind::StartGroup)
    }

    pub fn end_group(&mut self, field: u64) -> Result<()> {
        self.write_header(field, WireKind::EndGroup)
    }

    /// Header plus varint payload in one call.
    pub fn write_varint_field(&mut self, field: u64, value: u64) -> Result<()> {
        self.write_header(field, WireKind::Varint)?;
        write_varint(&mut self.sink, value)
    }

    pub fn write_varint_value(&mut self, value: u64) -> Result<()> {
        write_varint(&mut self.sink, value)
    }

    pub fn write_fixed32(&mut self, value: u32) -> Result<()> {
        self.sink.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_fixed64(&mut self, value: u64) -> Result<()> {
        self.sink.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    /// Length-delimited payload: varint length then the raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        write_varint(&mut self.sink, bytes.len() as u64)?;
        self.sink.write_all(bytes)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Streaming reader with one header of pushback.
#[derive(Debug)]
pub struct WireReader<R: Read> {
    source: R,
    pending: Option<FieldHeader>,
}

impl<R: Read> WireReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: None,
        }
    }

    /// Next field header, or `None` on clean end-of-stream.
    pub fn read_header(&mut self) -> Result<Option<FieldHeader>> {
        if let Some(header) = self.pending.take() {
            return Ok(Some(header));
        }
        let marker = match self.read_marker()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let raw = read_varint_tail(&mut self.source, marker)?;
        Ok(Some(FieldHeader::unpack(raw)?))
    }

    /// Like [`read_header`](Self::read_header) but leaves the header
    /// consumable by the next `read_header` call.
    pub fn peek_header(&mut self) -> Result<Option<FieldHeader>> {
        if self.pending.is_none() {
            self.pending = self.read_header()?;
        }
        Ok(self.pending)
    }

    /// Returns an unconsumed header to the front of the stream.
    /// At most one header may be pushed back at a time.
    pub fn push_back(&mut self, header: FieldHeader) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(header);
    }

    pub fn read_varint_value(&mut self) -> Result<u64> {
        read_varint(&mut self.source)
    }

    pub fn read_fixed32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.source.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_fixed64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.source.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Length-delimited payload.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = read_varint(&mut self.source)? as usize;
        let mut buf = vec![0u8; len];
        self.source.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// One byte, or `None` on end-of-stream.
    fn read_marker(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

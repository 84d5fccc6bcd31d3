//! # Variable-Length Integer Encoding
//!
//! Prefix-byte varint codec used for every integer on the wire: field
//! headers, type codes, length prefixes, and varint-kind column values.
//! Signed values go through the zigzag transform first so that small
//! magnitudes of either sign stay short.
//!
//! ## Encoding Format
//!
//! The leading byte determines the total length:
//!
//! | Marker | Bytes | Value |
//! |--------|-------|-------|
//! | 0-240 | 1 | the marker itself |
//! | 241-248 | 2 | `240 + ((marker - 241) << 8) + b1` |
//! | 249 | 3 | `2288 + (b1 << 8) + b2` |
//! | 250 | 4 | 3-byte big-endian |
//! | 251 | 5 | 4-byte big-endian |
//! | 255 | 9 | 8-byte big-endian |
//!
//! Markers 252-254 are reserved and rejected on decode.
//!
//! Values 0-240 fit in one byte, which covers nearly all field headers,
//! column counts, and short string lengths in practice.
//!
//! ## Slice vs. stream forms
//!
//! `encode_varint`/`decode_varint` operate on byte slices with no I/O and no
//! allocation. `write_varint`/`read_varint` are the streaming forms layered
//! on `std::io`; `read_varint` reads the marker byte first and then exactly
//! the remaining bytes, so it never over-reads past the encoded value.

use crate::error::{Error, Result};
use std::io::{Read, Write};

/// Number of bytes `encode_varint` will produce for `value`.
pub fn varint_len(value: u64) -> usize {
    if value <= 240 {
        1
    } else if value <= 2287 {
        2
    } else if value <= 67823 {
        3
    } else if value <= 0xFF_FFFF {
        4
    } else if value <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

/// Encodes `value` into `buf`, returning the number of bytes written.
/// `buf` must hold at least `varint_len(value)` bytes.
pub fn encode_varint(value: u64, buf: &mut [u8]) -> usize {
    if value <= 240 {
        buf[0] = value as u8;
        1
    } else if value <= 2287 {
        let v = value - 240;
        buf[0] = ((v >> 8) + 241) as u8;
        buf[1] = (v & 0xFF) as u8;
        2
    } else if value <= 67823 {
        let v = value - 2288;
        buf[0] = 249;
        buf[1] = (v >> 8) as u8;
        buf[2] = (v & 0xFF) as u8;
        3
    } else if value <= 0xFF_FFFF {
        buf[0] = 250;
        buf[1] = (value >> 16) as u8;
        buf[2] = (value >> 8) as u8;
        buf[3] = value as u8;
        4
    } else if value <= 0xFFFF_FFFF {
        buf[0] = 251;
        buf[1..5].copy_from_slice(&(value as u32).to_be_bytes());
        5
    } else {
        buf[0] = 255;
        buf[1..9].copy_from_slice(&value.to_be_bytes());
        9
    }
}

/// Decodes a varint from the front of `buf`, returning (value, bytes read).
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize)> {
    let first = *buf
        .first()
        .ok_or_else(|| Error::Corrupt("empty buffer for varint decode".into()))?;
    let needed = extension_len(first)? + 1;
    if buf.len() < needed {
        return Err(Error::Corrupt(format!("truncated {}-byte varint", needed)));
    }
    Ok((assemble(first, &buf[1..needed]), needed))
}

/// Writes `value` to `sink` in varint form.
pub fn write_varint<W: Write>(sink: &mut W, value: u64) -> Result<()> {
    let mut buf = [0u8; 9];
    let len = encode_varint(value, &mut buf);
    sink.write_all(&buf[..len])?;
    Ok(())
}

/// Reads one varint from `source`. Truncation surfaces as an `Io` error;
/// callers that must distinguish clean EOF read the marker byte themselves
/// and finish with [`read_varint_tail`].
pub fn read_varint<R: Read>(source: &mut R) -> Result<u64> {
    let mut marker = [0u8; 1];
    source.read_exact(&mut marker)?;
    read_varint_tail(source, marker[0])
}

/// Completes a varint whose marker byte has already been consumed.
pub fn read_varint_tail<R: Read>(source: &mut R, marker: u8) -> Result<u64> {
    let rest = extension_len(marker)?;
    let mut buf = [0u8; 8];
    source.read_exact(&mut buf[..rest])?;
    Ok(assemble(marker, &buf[..rest]))
}

/// Maps a signed value onto the unsigned varint space: 0, -1, 1, -2, ...
/// become 0, 1, 2, 3, ... so small magnitudes of either sign encode short.
pub fn encode_zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`encode_zigzag`].
pub fn decode_zigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Bytes following the marker, or an error for reserved markers.
fn extension_len(marker: u8) -> Result<usize> {
    match marker {
        0..=240 => Ok(0),
        241..=248 => Ok(1),
        249 => Ok(2),
        250 => Ok(3),
        251 => Ok(4),
        255 => Ok(8),
        _ => Err(Error::Corrupt(format!("invalid varint marker: {}", marker))),
    }
}

/// Combines a marker byte with its big-endian extension bytes.
fn assemble(marker: u8, rest: &[u8]) -> u64 {
    match marker {
        0..=240 => marker as u64,
        241..=248 => 240 + ((marker as u64 - 241) << 8) + rest[0] as u64,
        249 => 2288 + ((rest[0] as u64) << 8) + rest[1] as u64,
        _ => {
            let mut value = 0u64;
            for &b in rest {
                value = (value << 8) | b as u64;
            }
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn varint_len_covers_all_boundaries() {
        for (value, len) in [
            (0, 1),
            (240, 1),
            (241, 2),
            (2287, 2),
            (2288, 3),
            (67823, 3),
            (67824, 4),
            (0xFF_FFFF, 4),
            (0x100_0000, 5),
            (0xFFFF_FFFF, 5),
            (0x1_0000_0000, 9),
            (u64::MAX, 9),
        ] {
            assert_eq!(varint_len(value), len, "value {}", value);
        }
    }

    #[test]
    fn slice_round_trip_at_boundaries() {
        let mut buf = [0u8; 9];
        for value in [
            0,
            1,
            240,
            241,
            2287,
            2288,
            67823,
            67824,
            0xFF_FFFF,
            0x100_0000,
            0xFFFF_FFFF,
            0x1_0000_0000,
            u64::MAX,
        ] {
            let written = encode_varint(value, &mut buf);
            assert_eq!(written, varint_len(value));
            let (decoded, read) = decode_varint(&buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(read, written);
        }
    }

    #[test]
    fn stream_round_trip() {
        let values = [0u64, 77, 300, 70_000, 5_000_000, u64::MAX];
        let mut bytes = Vec::new();
        for value in values {
            write_varint(&mut bytes, value).unwrap();
        }
        let mut cursor = Cursor::new(bytes);
        for expected in values {
            assert_eq!(read_varint(&mut cursor).unwrap(), expected);
        }
    }

    #[test]
    fn decode_rejects_empty_buffer() {
        let err = decode_varint(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn decode_rejects_truncated_encoding() {
        let mut buf = [0u8; 9];
        let written = encode_varint(100_000, &mut buf);
        let err = decode_varint(&buf[..written - 1]).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn decode_rejects_reserved_markers() {
        for marker in [252u8, 253, 254] {
            let err = decode_varint(&[marker, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
            assert!(err.to_string().contains("invalid varint marker"));
        }
    }

    #[test]
    fn zigzag_interleaves_signs() {
        assert_eq!(encode_zigzag(0), 0);
        assert_eq!(encode_zigzag(-1), 1);
        assert_eq!(encode_zigzag(1), 2);
        assert_eq!(encode_zigzag(-2), 3);
        assert_eq!(encode_zigzag(2), 4);
    }

    #[test]
    fn zigzag_round_trip_extremes() {
        for value in [0, 1, -1, i64::MAX, i64::MIN, 42, -42] {
            assert_eq!(decode_zigzag(encode_zigzag(value)), value);
        }
    }

    #[test]
    fn small_signed_values_stay_short() {
        for value in [-120i64, -1, 0, 1, 120] {
            assert_eq!(varint_len(encode_zigzag(value)), 1, "value {}", value);
        }
    }
}

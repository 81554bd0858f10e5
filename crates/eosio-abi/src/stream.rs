//! Byte cursors for the wire format
//!
//! ## Variable-length integers
//!
//! - `varuint32`: 7-bit groups, low group first, high bit set on every byte
//!   but the last; at most 5 bytes, and the 5th byte may only carry 4 bits
//! - `varint32`: zig-zag mapped onto `varuint32`

use bytes::{BufMut, BytesMut};
use thiserror::Error;

/// Maximum encoded size of a `varuint32`
pub const MAX_VARUINT32_LEN: usize = 5;

/// Failure reading from a [`Reader`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// Read past the end of the input
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Offset of the read
        offset: usize,
        /// Bytes requested
        needed: usize,
        /// Bytes available
        remaining: usize,
    },
    /// `varuint32` longer than 5 bytes or wider than 32 bits
    #[error("varuint32 overflows 32 bits")]
    VarintOverflow {
        /// Offset of the first byte
        offset: usize,
    },
    /// Bytes were read but do not form a valid value
    #[error("{reason}")]
    Invalid {
        /// Offset of the value
        offset: usize,
        /// What went wrong
        reason: String,
    },
}

impl StreamError {
    /// Offset at which the failing read started
    pub fn offset(&self) -> usize {
        match self {
            StreamError::UnexpectedEof { offset, .. }
            | StreamError::VarintOverflow { offset }
            | StreamError::Invalid { offset, .. } => *offset,
        }
    }
}

/// Growable output buffer
#[derive(Debug, Default)]
pub struct Writer {
    buf: BytesMut,
}

impl Writer {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing was written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append a single byte
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Append raw bytes
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append a `varuint32`
    pub fn put_varuint32(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.put_u8(byte);
                return;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    /// Append a zig-zag `varint32`
    pub fn put_varint32(&mut self, value: i32) {
        self.put_varuint32(((value << 1) ^ (value >> 31)) as u32);
    }

    /// Finish and take the bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Forward-only cursor over a byte slice
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Start at the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    /// Current offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unread byte count
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check if all input was consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `len` bytes
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], StreamError> {
        if len > self.remaining() {
            return Err(StreamError::UnexpectedEof {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Take the next `N` bytes as an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Take one byte
    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a `varuint32`
    pub fn read_varuint32(&mut self) -> Result<u32, StreamError> {
        let start = self.pos;
        let mut result: u32 = 0;
        for i in 0..MAX_VARUINT32_LEN {
            let byte = self.read_u8()?;
            if i == MAX_VARUINT32_LEN - 1 && byte & 0xf0 != 0 {
                return Err(StreamError::VarintOverflow { offset: start });
            }
            result |= u32::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(StreamError::VarintOverflow { offset: start })
    }

    /// Read a zig-zag `varint32`
    pub fn read_varint32(&mut self) -> Result<i32, StreamError> {
        let raw = self.read_varuint32()?;
        Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varuint32_bytes(value: u32) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_varuint32(value);
        w.into_bytes()
    }

    // ==================== varuint32 ====================

    #[test]
    fn test_varuint32_lengths() {
        assert_eq!(varuint32_bytes(0), vec![0x00]);
        assert_eq!(varuint32_bytes(127), vec![0x7f]);
        assert_eq!(varuint32_bytes(128), vec![0x80, 0x01]);
        assert_eq!(varuint32_bytes(16383).len(), 2);
        assert_eq!(varuint32_bytes(16384).len(), 3);
        assert_eq!(varuint32_bytes(u32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_varuint32_read() {
        let mut r = Reader::new(&[0xe5, 0x8e, 0x26]);
        assert_eq!(r.read_varuint32().unwrap(), 624_485);
        assert!(r.is_empty());
    }

    #[test]
    fn test_varuint32_truncated() {
        let mut r = Reader::new(&[0x80, 0x80]);
        assert!(matches!(
            r.read_varuint32(),
            Err(StreamError::UnexpectedEof { offset: 2, .. })
        ));
    }

    #[test]
    fn test_varuint32_overlong() {
        let mut r = Reader::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(
            r.read_varuint32(),
            Err(StreamError::VarintOverflow { offset: 0 })
        );
        let mut r = Reader::new(&[0xff, 0xff, 0xff, 0xff, 0x1f]);
        assert_eq!(
            r.read_varuint32(),
            Err(StreamError::VarintOverflow { offset: 0 })
        );
    }

    // ==================== varint32 ====================

    #[test]
    fn test_varint32_zigzag() {
        for (value, expected) in [(0i32, vec![0x00]), (-1, vec![0x01]), (1, vec![0x02]), (-64, vec![0x7f])] {
            let mut w = Writer::new();
            w.put_varint32(value);
            let bytes = w.into_bytes();
            assert_eq!(bytes, expected, "value {value}");
            assert_eq!(Reader::new(&bytes).read_varint32().unwrap(), value);
        }
    }

    #[test]
    fn test_varint32_extremes() {
        for value in [i32::MIN, i32::MAX] {
            let mut w = Writer::new();
            w.put_varint32(value);
            let bytes = w.into_bytes();
            assert_eq!(bytes.len(), 5);
            assert_eq!(Reader::new(&bytes).read_varint32().unwrap(), value);
        }
    }

    // ==================== Reader ====================

    #[test]
    fn test_read_past_end() {
        let mut r = Reader::new(&[1, 2, 3]);
        assert_eq!(r.read_array::<2>().unwrap(), [1, 2]);
        assert_eq!(
            r.read_slice(4),
            Err(StreamError::UnexpectedEof {
                offset: 2,
                needed: 4,
                remaining: 1
            })
        );
        assert_eq!(r.position(), 2);
    }
}

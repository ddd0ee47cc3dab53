//! Primitive reading and writing for the AMQP binary encoding.
//!
//! All multi-byte quantities are big-endian (network order).

use crate::error::Error;

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, Error> {
        let byte = self.peek_byte().ok_or(Error::UnexpectedEof { context })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], Error> {
        if n > self.remaining_len() {
            return Err(Error::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, Error> {
        Ok(u16::from_be_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, Error> {
        Ok(u32::from_be_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_u64(&mut self, context: &'static str) -> Result<u64, Error> {
        Ok(u64::from_be_bytes(self.read_array(context)?))
    }

    /// Reads a length or count field of the given width (1 or 4 bytes).
    #[inline]
    pub fn read_width(&mut self, width: usize, context: &'static str) -> Result<usize, Error> {
        if width == 1 {
            Ok(self.read_byte(context)? as usize)
        } else {
            Ok(self.read_u32(context)? as usize)
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding into a caller-supplied buffer.
///
/// Never writes past the end of the buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    /// Creates a writer over `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.pos
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Returns the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.write_bytes(&[byte])
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(Error::BufferTooSmall {
                needed: end,
                capacity: self.buf.len(),
            });
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.write_bytes(&value.to_be_bytes())
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.write_bytes(&value.to_be_bytes())
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Writes a length or count field of the given width (1 or 4 bytes).
    ///
    /// The caller guarantees the value fits the width.
    #[inline]
    pub fn write_width(&mut self, width: usize, value: usize) -> Result<(), Error> {
        if width == 1 {
            self.write_byte(value as u8)
        } else {
            self.write_u32(value as u32)
        }
    }
}

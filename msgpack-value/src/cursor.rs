//! Bounds-checked read cursor for the decoder.

use crate::error::{Error, ErrorKind};

/// Read position over an input slice.
///
/// Every read checks the remaining length first, so the position never moves
/// past the end of the input, and a short read leaves it where it was.
#[derive(Debug, Clone)]
pub struct Cursor<'de> {
    input: &'de [u8],
    pos: usize,
}

impl<'de> Cursor<'de> {
    /// Create a cursor at the start of `input`.
    pub const fn new(input: &'de [u8]) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Current byte offset.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Whether the whole input has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::at(
            ErrorKind::TruncatedInput {
                needed,
                remaining: self.remaining(),
            },
            self.pos,
        )
    }

    /// Fail unless at least `needed` bytes remain, without consuming anything.
    pub fn require(&self, needed: usize) -> Result<(), Error> {
        if needed > self.remaining() {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    /// Peek at the next byte without consuming it.
    pub fn peek_byte(&self) -> Result<u8, Error> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read `n` bytes as a slice borrowed from the input.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'de [u8], Error> {
        self.require(n)?;
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        self.require(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.input[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.read_array().map(u64::from_be_bytes)
    }
}

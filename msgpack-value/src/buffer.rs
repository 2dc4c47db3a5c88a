//! Growable output buffer for the encoder.

use crate::error::{Error, ErrorKind};
use crate::format::Width;
use crate::trace;

/// Byte buffer whose capacity only grows, doubling whenever a write would
/// overflow it.
///
/// The backing `Vec` is kept fully initialized up to the current capacity and
/// `len` tracks the written prefix, so integers can be patched at any offset
/// inside that prefix. [`GrowableBuffer::into_vec`] returns exactly the
/// written bytes.
#[derive(Debug, Clone)]
pub struct GrowableBuffer {
    bytes: Vec<u8>,
    len: usize,
    limit: Option<usize>,
}

impl GrowableBuffer {
    /// Create a buffer with `capacity` bytes ready to write.
    pub fn with_capacity(capacity: usize) -> Self {
        GrowableBuffer {
            bytes: vec![0; capacity],
            len: 0,
            limit: None,
        }
    }

    /// Refuse to grow past `limit` bytes of written output.
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of bytes written so far.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes available before the next growth.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The written prefix.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Forget the written bytes but keep the capacity.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Consume the buffer, returning exactly the written bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.bytes.truncate(self.len);
        self.bytes
    }

    /// Make room for `additional` more bytes, doubling capacity until they fit.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<(), Error> {
        let needed = self.len.checked_add(additional).ok_or_else(|| {
            Error::new(ErrorKind::BufferLimitExceeded {
                requested: usize::MAX,
                limit: self.limit.unwrap_or(usize::MAX),
            })
        })?;
        if let Some(limit) = self.limit
            && needed > limit
        {
            return Err(Error::new(ErrorKind::BufferLimitExceeded {
                requested: needed,
                limit,
            }));
        }

        let current = self.bytes.len();
        if needed <= current {
            return Ok(());
        }

        let mut new_capacity = current.max(1);
        while new_capacity < needed {
            new_capacity = new_capacity.saturating_mul(2);
        }
        trace!(from = current, to = new_capacity, "growing encode buffer");
        self.bytes.resize(new_capacity, 0);
        Ok(())
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) -> Result<(), Error> {
        self.ensure_capacity(1)?;
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append raw bytes.
    pub fn extend_from_slice(&mut self, data: &[u8]) -> Result<(), Error> {
        self.ensure_capacity(data.len())?;
        self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
        Ok(())
    }

    /// Append a tag byte followed by a big-endian integer of the given width.
    pub fn put_tagged(&mut self, tag: u8, value: u64, width: Width) -> Result<(), Error> {
        self.ensure_capacity(1 + width.bytes())?;
        self.bytes[self.len] = tag;
        self.len += 1;
        self.len += write_be(&mut self.bytes[self.len..], value, width);
        Ok(())
    }

    /// Append a big-endian integer of the given width, keeping its low bytes.
    pub fn put_uint(&mut self, value: u64, width: Width) -> Result<(), Error> {
        self.ensure_capacity(width.bytes())?;
        self.len += write_be(&mut self.bytes[self.len..], value, width);
        Ok(())
    }

    /// Overwrite a big-endian integer inside the already written prefix.
    ///
    /// Returns `false` without writing if the field would extend past
    /// [`GrowableBuffer::len`].
    pub fn write_uint_at(&mut self, offset: usize, value: u64, width: Width) -> bool {
        match offset.checked_add(width.bytes()) {
            Some(end) if end <= self.len => {
                write_be(&mut self.bytes[offset..end], value, width);
                true
            }
            _ => false,
        }
    }
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        GrowableBuffer::with_capacity(crate::options::DEFAULT_INITIAL_CAPACITY)
    }
}

/// Write the low `width` bytes of `value` big-endian at the start of `out`.
fn write_be(out: &mut [u8], value: u64, width: Width) -> usize {
    let n = width.bytes();
    let be = value.to_be_bytes();
    out[..n].copy_from_slice(&be[8 - n..]);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_doubles_until_the_write_fits() {
        let mut buf = GrowableBuffer::with_capacity(4);
        buf.extend_from_slice(&[1, 2, 3]).unwrap();
        assert_eq!(buf.capacity(), 4);

        buf.extend_from_slice(&[4, 5]).unwrap();
        assert_eq!(buf.capacity(), 8);

        buf.extend_from_slice(&[0; 20]).unwrap();
        assert_eq!(buf.capacity(), 32);
        assert_eq!(buf.len(), 25);
        assert_eq!(&buf.as_slice()[..5], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_capacity_still_grows() {
        let mut buf = GrowableBuffer::with_capacity(0);
        buf.push(0xc0).unwrap();
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.into_vec(), [0xc0]);
    }

    #[test]
    fn into_vec_returns_only_the_written_prefix() {
        let mut buf = GrowableBuffer::with_capacity(64);
        buf.put_tagged(0xcd, 2000, Width::W16).unwrap();
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.into_vec(), [0xcd, 0x07, 0xd0]);
    }

    #[test]
    fn put_uint_widths_are_big_endian() {
        let mut buf = GrowableBuffer::with_capacity(1);
        buf.put_uint(0xab, Width::W8).unwrap();
        buf.put_uint(0x0102, Width::W16).unwrap();
        buf.put_uint(0x0304_0506, Width::W32).unwrap();
        buf.put_uint(0x0708_090a_0b0c_0d0e, Width::W64).unwrap();
        assert_eq!(
            buf.as_slice(),
            [0xab, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]
        );
    }

    #[test]
    fn write_uint_at_patches_inside_the_prefix_only() {
        let mut buf = GrowableBuffer::with_capacity(16);
        buf.extend_from_slice(&[0xdc, 0, 0, 0xc0]).unwrap();
        assert!(buf.write_uint_at(1, 300, Width::W16));
        assert_eq!(buf.as_slice(), [0xdc, 0x01, 0x2c, 0xc0]);

        // capacity is there, but the bytes were never written
        assert!(!buf.write_uint_at(3, 1, Width::W16));
        assert!(!buf.write_uint_at(usize::MAX, 1, Width::W8));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = GrowableBuffer::with_capacity(2);
        buf.extend_from_slice(&[0; 100]).unwrap();
        let grown = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), grown);
    }

    #[test]
    fn limit_is_enforced_before_growing() {
        let mut buf = GrowableBuffer::with_capacity(4).with_limit(Some(6));
        buf.extend_from_slice(&[0; 6]).unwrap();
        let err = buf.push(0).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::BufferLimitExceeded {
                requested: 7,
                limit: 6
            }
        );
        assert_eq!(buf.len(), 6);
    }
}

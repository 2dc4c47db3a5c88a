//! MessagePack encoder.

use crate::buffer::GrowableBuffer;
use crate::error::{Error, ErrorKind, LengthKind};
use crate::format::*;
use crate::options::{EncodeOptions, LargeIntEncoding};
use crate::{debug, trace};
use crate::value::{MapKey, Value};

/// Encode a value to MessagePack bytes with default options.
///
/// # Example
/// ```
/// use msgpack_value::{Value, encode};
///
/// assert_eq!(encode(&Value::from(2000)).unwrap(), [0xcd, 0x07, 0xd0]);
/// assert_eq!(encode(&Value::from(-1)).unwrap(), [0xff]);
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, Error> {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encode a value to MessagePack bytes.
///
/// Allocates one buffer of `options.initial_capacity` bytes, grows it by
/// doubling as needed and returns exactly the written prefix.
pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, Error> {
    trace!(kind = %value.kind(), "encode: starting");
    let mut buf =
        GrowableBuffer::with_capacity(options.initial_capacity).with_limit(options.max_len);
    ValueWriter::new(&mut buf, options.large_ints).write_value(value)?;
    trace!(len = buf.len(), capacity = buf.capacity(), "encode: done");
    Ok(buf.into_vec())
}

/// A reusable encoder.
///
/// The output buffer survives between calls and keeps the capacity it grew
/// to, so encoding many values of similar size allocates once.
///
/// # Example
/// ```
/// use msgpack_value::{Encoder, Value};
///
/// let mut encoder = Encoder::new();
/// for i in 0..3 {
///     let bytes = encoder.encode(&Value::array([i, i + 1])).unwrap();
///     assert_eq!(bytes.len(), 3);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    buf: GrowableBuffer,
    options: EncodeOptions,
}

impl Encoder {
    /// Create an encoder with default options.
    pub fn new() -> Self {
        Self::with_options(EncodeOptions::default())
    }

    /// Create an encoder with the given options.
    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            buf: GrowableBuffer::with_capacity(options.initial_capacity)
                .with_limit(options.max_len),
            options,
        }
    }

    /// The options this encoder was built with.
    pub const fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Current size of the reusable buffer.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Encode `value`, returning a view of the encoded bytes.
    ///
    /// The view borrows the encoder and is valid until the next call.
    pub fn encode(&mut self, value: &Value) -> Result<&[u8], Error> {
        self.buf.clear();
        let before = self.buf.capacity();
        ValueWriter::new(&mut self.buf, self.options.large_ints).write_value(value)?;
        if self.buf.capacity() > before {
            debug!(from = before, to = self.buf.capacity(), "encoder: reusable buffer grew");
        }
        trace!(len = self.buf.len(), "encoder: done");
        Ok(self.buf.as_slice())
    }

    /// Encode `value` into a new `Vec`.
    pub fn encode_to_vec(&mut self, value: &Value) -> Result<Vec<u8>, Error> {
        self.encode(value).map(<[u8]>::to_vec)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a value tree and appends its encoding.
struct ValueWriter<'a> {
    out: &'a mut GrowableBuffer,
    large_ints: LargeIntEncoding,
}

impl<'a> ValueWriter<'a> {
    fn new(out: &'a mut GrowableBuffer, large_ints: LargeIntEncoding) -> Self {
        Self { out, large_ints }
    }

    fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => self.out.push(MSGPACK_NIL),
            Value::Bool(v) => self.out.push(if *v { MSGPACK_TRUE } else { MSGPACK_FALSE }),
            Value::Int(n) => self.write_int(*n),
            Value::Float(f) => self.write_f64(*f),
            Value::BigInt(n) => self.write_bigint(*n),
            Value::String(s) => self.write_str(s),
            Value::Bytes(bytes) => self.write_bin(bytes),
            Value::Array(items) => {
                self.write_array_len(items.len())?;
                for item in items {
                    self.write_value(item)?;
                }
                Ok(())
            }
            Value::Map(map) => {
                self.write_map_len(map.len())?;
                for (key, value) in map {
                    self.write_key(key)?;
                    self.write_value(value)?;
                }
                Ok(())
            }
        }
    }

    fn write_key(&mut self, key: &MapKey) -> Result<(), Error> {
        match key {
            MapKey::String(s) => self.write_str(s),
            MapKey::Int(n) => self.write_int(*n),
            MapKey::BigInt(n) => self.write_bigint(*n),
            MapKey::Float(f) => self.write_f64(*f),
        }
    }

    fn write_int(&mut self, n: i64) -> Result<(), Error> {
        // Casting to u64 keeps the two's complement bits, and put_tagged
        // writes only the low bytes of the chosen width.
        match n {
            // positive fixint
            0..=127 => self.out.push(n as u8),
            // negative fixint
            NEGFIXINT_MIN..=-1 => self.out.push(n as u8),
            128..=255 => self.out.put_tagged(MSGPACK_UINT8, n as u64, Width::W8),
            256..=65_535 => self.out.put_tagged(MSGPACK_UINT16, n as u64, Width::W16),
            65_536..=4_294_967_295 => self.out.put_tagged(MSGPACK_UINT32, n as u64, Width::W32),
            -128..=-33 => self.out.put_tagged(MSGPACK_INT8, n as u64, Width::W8),
            -32_768..=-129 => self.out.put_tagged(MSGPACK_INT16, n as u64, Width::W16),
            -2_147_483_648..=-32_769 => self.out.put_tagged(MSGPACK_INT32, n as u64, Width::W32),
            _ => self.write_large_int(n),
        }
    }

    fn write_large_int(&mut self, n: i64) -> Result<(), Error> {
        match self.large_ints {
            LargeIntEncoding::Float64 => {
                if n.unsigned_abs() > MAX_SAFE_INTEGER as u64 {
                    return Err(Error::new(ErrorKind::NumericRangeExceeded {
                        value: n.to_string(),
                        range: "a float 64 without losing precision",
                    }));
                }
                self.write_f64(n as f64)
            }
            LargeIntEncoding::Exact if n >= 0 => {
                self.out.put_tagged(MSGPACK_UINT64, n as u64, Width::W64)
            }
            LargeIntEncoding::Exact => self.out.put_tagged(MSGPACK_INT64, n as u64, Width::W64),
        }
    }

    fn write_bigint(&mut self, n: i128) -> Result<(), Error> {
        if n < 0 {
            let n = i64::try_from(n).map_err(|_| bigint_out_of_range(n))?;
            self.out.put_tagged(MSGPACK_INT64, n as u64, Width::W64)
        } else {
            let n = u64::try_from(n).map_err(|_| bigint_out_of_range(n))?;
            self.out.put_tagged(MSGPACK_UINT64, n, Width::W64)
        }
    }

    fn write_f64(&mut self, f: f64) -> Result<(), Error> {
        self.out.put_tagged(MSGPACK_FLOAT64, f.to_bits(), Width::W64)
    }

    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.write_str_len(s.len())?;
        self.out.extend_from_slice(s.as_bytes())
    }

    fn write_bin(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_bin_len(bytes.len())?;
        self.out.extend_from_slice(bytes)
    }

    fn write_str_len(&mut self, len: usize) -> Result<(), Error> {
        if len < FIXSTR_LIMIT {
            return self.out.push(MSGPACK_FIXSTR_MIN | len as u8);
        }
        let width = Width::for_len(len).ok_or_else(|| too_long(LengthKind::String, len))?;
        self.out.put_tagged(str_tag(width), len as u64, width)
    }

    fn write_bin_len(&mut self, len: usize) -> Result<(), Error> {
        let width = Width::for_len(len).ok_or_else(|| too_long(LengthKind::Bytes, len))?;
        self.out.put_tagged(bin_tag(width), len as u64, width)
    }

    fn write_array_len(&mut self, len: usize) -> Result<(), Error> {
        self.write_collection_len(
            len,
            MSGPACK_FIXARRAY_MIN,
            MSGPACK_ARRAY16,
            MSGPACK_ARRAY32,
            LengthKind::Array,
        )
    }

    fn write_map_len(&mut self, len: usize) -> Result<(), Error> {
        self.write_collection_len(
            len,
            MSGPACK_FIXMAP_MIN,
            MSGPACK_MAP16,
            MSGPACK_MAP32,
            LengthKind::Map,
        )
    }

    /// Arrays and maps share a layout: a fix form below 16, then 16- and
    /// 32-bit counts. There is no 8-bit count.
    fn write_collection_len(
        &mut self,
        len: usize,
        fix_min: u8,
        tag16: u8,
        tag32: u8,
        what: LengthKind,
    ) -> Result<(), Error> {
        if len < FIXCOLLECTION_LIMIT {
            return self.out.push(fix_min | len as u8);
        }
        match Width::for_len(len) {
            Some(Width::W8 | Width::W16) => self.out.put_tagged(tag16, len as u64, Width::W16),
            Some(_) => self.out.put_tagged(tag32, len as u64, Width::W32),
            None => Err(too_long(what, len)),
        }
    }
}

fn bigint_out_of_range(n: i128) -> Error {
    Error::new(ErrorKind::NumericRangeExceeded {
        value: n.to_string(),
        range: "the 64-bit integer tags",
    })
}

fn too_long(what: LengthKind, len: usize) -> Error {
    Error::new(ErrorKind::LengthExceeded { what, len })
}

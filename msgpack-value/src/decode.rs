//! MessagePack decoder.

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind};
use crate::format::{Marker, Width};
use crate::options::DecodeOptions;
use crate::trace;
use crate::value::{Map, MapKey, Value};

/// Decode exactly one value from `input` with default options.
///
/// # Example
/// ```
/// use msgpack_value::{Value, decode};
///
/// let value = decode(&[0x92, 0x01, 0xa1, b'x']).unwrap();
/// assert_eq!(value, Value::array([Value::from(1), Value::from("x")]));
/// ```
pub fn decode(input: &[u8]) -> Result<Value, Error> {
    decode_with_options(input, &DecodeOptions::default())
}

/// Decode exactly one value from `input`.
///
/// Fails with `TrailingData` if bytes remain after the value.
pub fn decode_with_options(input: &[u8], options: &DecodeOptions) -> Result<Value, Error> {
    trace!(len = input.len(), "decode: starting");
    let mut decoder = Decoder {
        cursor: Cursor::new(input),
        max_depth: options.max_depth,
        depth: 0,
    };
    let value = decoder.read_value()?;
    if !decoder.cursor.is_at_end() {
        return Err(Error::at(
            ErrorKind::TrailingData {
                remaining: decoder.cursor.remaining(),
            },
            decoder.cursor.position(),
        ));
    }
    trace!(kind = %value.kind(), "decode: done");
    Ok(value)
}

struct Decoder<'de> {
    cursor: Cursor<'de>,
    max_depth: Option<usize>,
    depth: usize,
}

impl<'de> Decoder<'de> {
    fn read_value(&mut self) -> Result<Value, Error> {
        let start = self.cursor.position();
        let tag = self.cursor.read_byte()?;
        match Marker::from_u8(tag) {
            Marker::PosFixInt(n) => Ok(Value::Int(i64::from(n))),
            Marker::NegFixInt(n) => Ok(Value::Int(i64::from(n))),
            Marker::Nil => Ok(Value::Null),
            Marker::False => Ok(Value::Bool(false)),
            Marker::True => Ok(Value::Bool(true)),
            Marker::F32 => {
                let bits = self.cursor.read_u32()?;
                Ok(Value::Float(f64::from(f32::from_bits(bits))))
            }
            Marker::F64 => Ok(Value::Float(f64::from_bits(self.cursor.read_u64()?))),
            Marker::UInt(Width::W64) => Ok(Value::BigInt(i128::from(self.cursor.read_u64()?))),
            Marker::UInt(width) => Ok(Value::Int(self.read_uint(width)? as i64)),
            Marker::Int(width) => self.read_signed(width),
            Marker::FixStr(len) => self.read_str(usize::from(len)),
            Marker::Str(width) => {
                let len = self.read_len(width)?;
                self.read_str(len)
            }
            Marker::Bin(width) => {
                let len = self.read_len(width)?;
                Ok(Value::Bytes(self.cursor.read_bytes(len)?.to_vec()))
            }
            Marker::FixArray(count) => self.read_array(usize::from(count), start),
            Marker::Array(width) => {
                let count = self.read_len(width)?;
                self.read_array(count, start)
            }
            Marker::FixMap(count) => self.read_map(usize::from(count), start),
            Marker::Map(width) => {
                let count = self.read_len(width)?;
                self.read_map(count, start)
            }
            Marker::Ext(_) | Marker::Reserved => {
                Err(Error::at(ErrorKind::MalformedTag { tag }, start))
            }
        }
    }

    fn read_uint(&mut self, width: Width) -> Result<u64, Error> {
        Ok(match width {
            Width::W8 => u64::from(self.cursor.read_byte()?),
            Width::W16 => u64::from(self.cursor.read_u16()?),
            Width::W32 => u64::from(self.cursor.read_u32()?),
            Width::W64 => self.cursor.read_u64()?,
        })
    }

    fn read_signed(&mut self, width: Width) -> Result<Value, Error> {
        Ok(match width {
            Width::W8 => Value::Int(i64::from(self.cursor.read_byte()? as i8)),
            Width::W16 => Value::Int(i64::from(self.cursor.read_u16()? as i16)),
            Width::W32 => Value::Int(i64::from(self.cursor.read_u32()? as i32)),
            Width::W64 => Value::BigInt(i128::from(self.cursor.read_u64()? as i64)),
        })
    }

    fn read_len(&mut self, width: Width) -> Result<usize, Error> {
        Ok(self.read_uint(width)? as usize)
    }

    fn read_str(&mut self, len: usize) -> Result<Value, Error> {
        let at = self.cursor.position();
        let bytes = self.cursor.read_bytes(len)?;
        let s = core::str::from_utf8(bytes).map_err(|_| Error::at(ErrorKind::InvalidUtf8, at))?;
        Ok(Value::String(s.to_owned()))
    }

    fn enter(&mut self, start: usize) -> Result<(), Error> {
        self.depth += 1;
        if let Some(limit) = self.max_depth
            && self.depth > limit
        {
            return Err(Error::at(ErrorKind::DepthLimitExceeded { limit }, start));
        }
        Ok(())
    }

    fn read_array(&mut self, count: usize, start: usize) -> Result<Value, Error> {
        // every element takes at least one byte
        self.cursor.require(count)?;
        self.enter(start)?;
        trace!(count, depth = self.depth, "decoding array");

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_value()?);
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, count: usize, start: usize) -> Result<Value, Error> {
        // every entry takes at least two bytes
        self.cursor.require(count.saturating_mul(2))?;
        self.enter(start)?;
        trace!(count, depth = self.depth, "decoding map");

        let mut map = Map::with_capacity(count);
        for _ in 0..count {
            let key_pos = self.cursor.position();
            let key = MapKey::try_from(self.read_value()?)
                .map_err(|err| Error::at(err.kind, key_pos))?;
            let value = self.read_value()?;
            map.insert(key, value);
        }
        self.depth -= 1;
        Ok(Value::Map(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn only_64_bit_tags_produce_bigint() {
        assert_eq!(decode(&[0xce, 0xff, 0xff, 0xff, 0xff]).unwrap(), Value::Int(4_294_967_295));
        assert_eq!(decode(&[0xd2, 0x80, 0, 0, 0]).unwrap(), Value::Int(-2_147_483_648));
        assert_eq!(decode(&[0xcf, 0, 0, 0, 0, 0, 0, 0, 1]).unwrap(), Value::BigInt(1));
        assert_eq!(
            decode(&[0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xf6]).unwrap(),
            Value::BigInt(-10)
        );
    }

    #[test]
    fn invalid_key_reports_the_key_offset() {
        let err = decode(&[0x82, 0xa1, b'a', 0x01, 0x90, 0x02]).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidMapKey {
                found: ValueKind::Array
            }
        );
        assert_eq!(err.pos, Some(4));
    }

    #[test]
    fn repeated_key_keeps_first_position_and_last_value() {
        let value = decode(&[0x83, 0xa1, b'a', 1, 0xa1, b'b', 2, 0xa1, b'a', 3]).unwrap();
        let map = value.as_map().unwrap();
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(
            entries,
            [
                (MapKey::from("a"), Value::Int(3)),
                (MapKey::from("b"), Value::Int(2)),
            ]
        );
    }

    #[test]
    fn number_keys_are_accepted() {
        let value = decode(&[0x82, 0x01, 0xc0, 0xca, 0x3f, 0x80, 0, 0, 0xc3]).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map[&MapKey::Int(1)], Value::Null);
        assert_eq!(map[&MapKey::Float(1.0)], Value::Bool(true));
    }

    #[test]
    fn invalid_utf8_points_at_the_payload() {
        let err = decode(&[0x91, 0xa2, 0xc3, 0x28]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUtf8);
        assert_eq!(err.pos, Some(2));
    }

    #[test]
    fn declared_count_larger_than_input_fails_before_allocating() {
        let err = decode(&[0xdd, 0xff, 0xff, 0xff, 0xff, 0xc0]).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::TruncatedInput {
                needed: u32::MAX as usize,
                remaining: 1
            }
        );
        assert_eq!(err.pos, Some(5));
    }

    #[test]
    fn depth_limit_counts_containers() {
        let nested = [0x91, 0x91, 0x91, 0xc0];
        let options = DecodeOptions::new().max_depth(3);
        assert!(decode_with_options(&nested, &options).is_ok());

        let options = DecodeOptions::new().max_depth(2);
        let err = decode_with_options(&nested, &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthLimitExceeded { limit: 2 });
        assert_eq!(err.pos, Some(2));

        let options = DecodeOptions::new().max_depth(0);
        assert_eq!(decode_with_options(&[0x05], &options).unwrap(), Value::Int(5));
    }

    #[test]
    fn sibling_containers_do_not_accumulate_depth() {
        let options = DecodeOptions::new().max_depth(2);
        let input = [0x93, 0x91, 0x01, 0x91, 0x02, 0x91, 0x03];
        assert!(decode_with_options(&input, &options).is_ok());
    }
}

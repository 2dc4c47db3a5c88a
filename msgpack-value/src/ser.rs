//! Bridge from `serde::Serialize` types to [`Value`].

use core::fmt::Display;

use serde::ser::{self, Serialize, SerializeMap as _, SerializeSeq as _};

use crate::encode::{encode, encode_with_options};
use crate::error::{Error, ErrorKind};
use crate::format::MAX_SAFE_INTEGER;
use crate::options::EncodeOptions;
use crate::value::{Map, MapKey, Value};

/// Convert any `Serialize` type into a [`Value`].
///
/// Structs and maps become [`Value::Map`], sequences and tuples become
/// [`Value::Array`], and enum variants are externally tagged. Map keys must
/// serialize to a string or an integer.
///
/// # Example
/// ```
/// use msgpack_value::{Value, to_value};
///
/// #[derive(serde::Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(value, Value::map([("x", 1), ("y", -2)]));
/// ```
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value, Error> {
    value.serialize(ValueSerializer)
}

/// Serialize any `Serialize` type straight to MessagePack bytes.
///
/// Integers beyond the 32-bit tags follow the default
/// [`LargeIntEncoding::Float64`](crate::LargeIntEncoding::Float64) policy; use
/// [`to_vec_with_options`] to keep them as integers on the wire.
pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    encode(&to_value(value)?)
}

/// Serialize any `Serialize` type to MessagePack bytes with the given options.
pub fn to_vec_with_options<T: ?Sized + Serialize>(
    value: &T,
    options: &EncodeOptions,
) -> Result<Vec<u8>, Error> {
    encode_with_options(&to_value(value)?, options)
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::new(ErrorKind::Custom(msg.to_string()))
    }
}

fn unsupported(reason: impl Into<String>) -> Error {
    Error::new(ErrorKind::UnsupportedValue {
        reason: reason.into(),
    })
}

fn out_of_range(n: i128) -> Error {
    Error::new(ErrorKind::NumericRangeExceeded {
        value: n.to_string(),
        range: "the 64-bit integer tags",
    })
}

/// Integers a float64 holds exactly become `Int`, the rest of the 64-bit
/// envelope becomes `BigInt`.
fn integer(n: i128) -> Result<Value, Error> {
    let safe = MAX_SAFE_INTEGER as i128;
    if (-safe..=safe).contains(&n) {
        Ok(Value::Int(n as i64))
    } else if (i128::from(i64::MIN)..=i128::from(u64::MAX)).contains(&n) {
        Ok(Value::BigInt(n))
    } else {
        Err(out_of_range(n))
    }
}

fn variant(name: &'static str, payload: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(MapKey::from(name), payload);
    Value::Map(map)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, Error> {
        integer(i128::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, Error> {
        integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        integer(i128::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, Error> {
        let n = i128::try_from(v).map_err(|_| {
            Error::new(ErrorKind::NumericRangeExceeded {
                value: v.to_string(),
                range: "the 64-bit integer tags",
            })
        })?;
        integer(n)
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, Error> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        name: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        Ok(variant(name, value.serialize(ValueSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, Error> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, Error> {
        Ok(SerializeTupleVariant {
            name,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, Error> {
        Ok(SerializeMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap, Error> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, Error> {
        Ok(SerializeStructVariant {
            name,
            map: Map::with_capacity(len),
        })
    }
}

struct SerializeVec {
    items: Vec<Value>,
}

struct SerializeTupleVariant {
    name: &'static str,
    items: Vec<Value>,
}

struct SerializeMap {
    map: Map,
    next_key: Option<MapKey>,
}

struct SerializeStructVariant {
    name: &'static str,
    map: Map,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(variant(self.name, Value::Array(self.items)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Error> {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::new(ErrorKind::Custom("map value without a key".into())))?;
        let value = value.serialize(ValueSerializer)?;
        self.map.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.map
            .insert(MapKey::from(key), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.map
            .insert(MapKey::from(key), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(variant(self.name, Value::Map(self.map)))
    }
}

/// Accepts only the key shapes a map can carry: strings and integers.
struct MapKeySerializer;

fn key_integer(n: i128) -> Result<MapKey, Error> {
    match integer(n)? {
        Value::Int(n) => Ok(MapKey::Int(n)),
        _ => Ok(MapKey::BigInt(n)),
    }
}

fn bad_key(found: &str) -> Error {
    unsupported(format!(
        "map keys must be strings or integers, found {found}"
    ))
}

impl ser::Serializer for MapKeySerializer {
    type Ok = MapKey;
    type Error = Error;

    type SerializeSeq = ser::Impossible<MapKey, Error>;
    type SerializeTuple = ser::Impossible<MapKey, Error>;
    type SerializeTupleStruct = ser::Impossible<MapKey, Error>;
    type SerializeTupleVariant = ser::Impossible<MapKey, Error>;
    type SerializeMap = ser::Impossible<MapKey, Error>;
    type SerializeStruct = ser::Impossible<MapKey, Error>;
    type SerializeStructVariant = ser::Impossible<MapKey, Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, _v: bool) -> Result<MapKey, Error> {
        Err(bad_key("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<MapKey, Error> {
        Ok(MapKey::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<MapKey, Error> {
        Ok(MapKey::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<MapKey, Error> {
        Ok(MapKey::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<MapKey, Error> {
        key_integer(i128::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<MapKey, Error> {
        key_integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<MapKey, Error> {
        Ok(MapKey::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<MapKey, Error> {
        Ok(MapKey::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<MapKey, Error> {
        Ok(MapKey::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<MapKey, Error> {
        key_integer(i128::from(v))
    }

    fn serialize_f32(self, _v: f32) -> Result<MapKey, Error> {
        Err(bad_key("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<MapKey, Error> {
        Err(bad_key("float"))
    }

    fn serialize_char(self, v: char) -> Result<MapKey, Error> {
        Ok(MapKey::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<MapKey, Error> {
        Ok(MapKey::from(v))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<MapKey, Error> {
        Err(bad_key("bytes"))
    }

    fn serialize_none(self) -> Result<MapKey, Error> {
        Err(bad_key("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<MapKey, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<MapKey, Error> {
        Err(bad_key("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<MapKey, Error> {
        Err(bad_key(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<MapKey, Error> {
        Ok(MapKey::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<MapKey, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<MapKey, Error> {
        Err(bad_key(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Error> {
        Err(bad_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Error> {
        Err(bad_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Error> {
        Err(bad_key(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Error> {
        Err(bad_key(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        Err(bad_key("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Error> {
        Err(bad_key(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Error> {
        Err(bad_key(name))
    }
}

impl Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::BigInt(n) => serialize_wide(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl Serialize for MapKey {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MapKey::String(s) => serializer.serialize_str(s),
            MapKey::Int(n) => serializer.serialize_i64(*n),
            MapKey::BigInt(n) => serialize_wide(*n, serializer),
            MapKey::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

/// Prefer the 64-bit serde methods, which every format supports.
fn serialize_wide<S: ser::Serializer>(n: i128, serializer: S) -> Result<S::Ok, S::Error> {
    if let Ok(n) = i64::try_from(n) {
        serializer.serialize_i64(n)
    } else if let Ok(n) = u64::try_from(n) {
        serializer.serialize_u64(n)
    } else {
        serializer.serialize_i128(n)
    }
}

//! The dynamically-typed value tree.

use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind};
use crate::format::MAX_SAFE_INTEGER;

/// Map entries in insertion order.
pub type Map = IndexMap<MapKey, Value>;

/// A MessagePack value.
///
/// The variant set is closed: anything that is not one of these has no
/// MessagePack encoding in this codec.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// nil
    #[default]
    Null,
    /// true or false
    Bool(bool),
    /// Integer that fits the 32-bit tags; wider values follow
    /// [`LargeIntEncoding`](crate::LargeIntEncoding) when encoded
    Int(i64),
    /// IEEE-754 double, NaN and infinities included
    Float(f64),
    /// Integer carried by the 64-bit tags, in `-2^63..=2^64-1`
    BigInt(i128),
    /// UTF-8 text
    String(String),
    /// Opaque bytes
    Bytes(Vec<u8>),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Keyed entries, in insertion order
    Map(Map),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::BigInt`]
    BigInt,
    /// [`Value::String`]
    String,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::Array`]
    Array,
    /// [`Value::Map`]
    Map,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::BigInt => "bigint",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        })
    }
}

impl Value {
    /// Build an array from anything convertible to values.
    pub fn array<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a map from key/value pairs, keeping their order.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn map<I, K, V>(entries: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<MapKey>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a byte value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Value {
        Value::Bytes(bytes.into())
    }

    /// The variant of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Whether this is nil.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is an integer or a float.
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::BigInt(_))
    }

    /// The boolean, if this is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer as `i64`, for `Int` and for `BigInt` within range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::BigInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// The integer as `i128`, for `Int` and `BigInt`.
    pub const fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(n) => Some(*n as i128),
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Any number as `f64`, rounding integers beyond 2^53.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            Value::BigInt(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// The text, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The bytes, if this is a byte value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// The entries, if this is a map.
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Integers a float64 holds exactly stay `Int`; the rest become `BigInt`.
fn integer(n: i128) -> Value {
    if (-(MAX_SAFE_INTEGER as i128)..=MAX_SAFE_INTEGER as i128).contains(&n) {
        Value::Int(n as i64)
    } else {
        Value::BigInt(n)
    }
}

macro_rules! impl_from_small_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_small_int!(i8, i16, i32, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    integer(n as i128)
                }
            }
        )*
    };
}

impl_from_wide_int!(i64, u64, isize, usize);

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::String(s) => Value::String(s),
            MapKey::Int(n) => Value::Int(n),
            MapKey::BigInt(n) => Value::BigInt(n),
            MapKey::Float(f) => Value::Float(f),
        }
    }
}

/// A map key: a string or a number.
///
/// Float keys compare and hash by bit pattern, so `NaN` is a usable key and
/// `0.0` and `-0.0` are distinct.
#[derive(Debug, Clone)]
pub enum MapKey {
    /// Text key
    String(String),
    /// Integer key
    Int(i64),
    /// Integer key carried by a 64-bit tag
    BigInt(i128),
    /// Float key
    Float(f64),
}

impl MapKey {
    /// The text, if this is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapKey::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapKey::String(a), MapKey::String(b)) => a == b,
            (MapKey::Int(a), MapKey::Int(b)) => a == b,
            (MapKey::BigInt(a), MapKey::BigInt(b)) => a == b,
            (MapKey::Float(a), MapKey::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for MapKey {}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            MapKey::String(s) => s.hash(state),
            MapKey::Int(n) => n.hash(state),
            MapKey::BigInt(n) => n.hash(state),
            MapKey::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::String(s) => write!(f, "{s:?}"),
            MapKey::Int(n) => write!(f, "{n}"),
            MapKey::BigInt(n) => write!(f, "{n}"),
            MapKey::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::String(s.to_owned())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::String(s)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int(n)
    }
}

impl From<i32> for MapKey {
    fn from(n: i32) -> Self {
        MapKey::Int(i64::from(n))
    }
}

impl From<u32> for MapKey {
    fn from(n: u32) -> Self {
        MapKey::Int(i64::from(n))
    }
}

impl TryFrom<Value> for MapKey {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(MapKey::String(s)),
            Value::Int(n) => Ok(MapKey::Int(n)),
            Value::BigInt(n) => Ok(MapKey::BigInt(n)),
            Value::Float(f) => Ok(MapKey::Float(f)),
            other => Err(Error::new(ErrorKind::InvalidMapKey {
                found: other.kind(),
            })),
        }
    }
}

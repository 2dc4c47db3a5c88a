//! MessagePack tag bytes and their classification.
//!
//! Ref: <https://github.com/msgpack/msgpack/blob/master/spec.md#formats>

/// nil
pub const MSGPACK_NIL: u8 = 0xc0;
/// (never used)
pub const MSGPACK_NEVER_USED: u8 = 0xc1;
/// false
pub const MSGPACK_FALSE: u8 = 0xc2;
/// true
pub const MSGPACK_TRUE: u8 = 0xc3;
/// bin 8
pub const MSGPACK_BIN8: u8 = 0xc4;
/// bin 16
pub const MSGPACK_BIN16: u8 = 0xc5;
/// bin 32
pub const MSGPACK_BIN32: u8 = 0xc6;
/// ext 8
pub const MSGPACK_EXT8: u8 = 0xc7;
/// ext 16
pub const MSGPACK_EXT16: u8 = 0xc8;
/// ext 32
pub const MSGPACK_EXT32: u8 = 0xc9;
/// float 32
pub const MSGPACK_FLOAT32: u8 = 0xca;
/// float 64
pub const MSGPACK_FLOAT64: u8 = 0xcb;
/// uint 8
pub const MSGPACK_UINT8: u8 = 0xcc;
/// uint 16
pub const MSGPACK_UINT16: u8 = 0xcd;
/// uint 32
pub const MSGPACK_UINT32: u8 = 0xce;
/// uint 64
pub const MSGPACK_UINT64: u8 = 0xcf;
/// int 8
pub const MSGPACK_INT8: u8 = 0xd0;
/// int 16
pub const MSGPACK_INT16: u8 = 0xd1;
/// int 32
pub const MSGPACK_INT32: u8 = 0xd2;
/// int 64
pub const MSGPACK_INT64: u8 = 0xd3;
/// fixext 1
pub const MSGPACK_FIXEXT1: u8 = 0xd4;
/// fixext 16
pub const MSGPACK_FIXEXT16: u8 = 0xd8;
/// str 8
pub const MSGPACK_STR8: u8 = 0xd9;
/// str 16
pub const MSGPACK_STR16: u8 = 0xda;
/// str 32
pub const MSGPACK_STR32: u8 = 0xdb;
/// array 16
pub const MSGPACK_ARRAY16: u8 = 0xdc;
/// array 32
pub const MSGPACK_ARRAY32: u8 = 0xdd;
/// map 16
pub const MSGPACK_MAP16: u8 = 0xde;
/// map 32
pub const MSGPACK_MAP32: u8 = 0xdf;

/// Largest positive fixint.
pub const MSGPACK_POSFIXINT_MAX: u8 = 0x7f;
/// First fixmap tag; the low 4 bits carry the entry count.
pub const MSGPACK_FIXMAP_MIN: u8 = 0x80;
/// Last fixmap tag.
pub const MSGPACK_FIXMAP_MAX: u8 = 0x8f;
/// First fixarray tag; the low 4 bits carry the element count.
pub const MSGPACK_FIXARRAY_MIN: u8 = 0x90;
/// Last fixarray tag.
pub const MSGPACK_FIXARRAY_MAX: u8 = 0x9f;
/// First fixstr tag; the low 5 bits carry the byte length.
pub const MSGPACK_FIXSTR_MIN: u8 = 0xa0;
/// Last fixstr tag.
pub const MSGPACK_FIXSTR_MAX: u8 = 0xbf;
/// First negative fixint tag (-32).
pub const MSGPACK_NEGFIXINT_MIN: u8 = 0xe0;

/// Exclusive upper bound of the fixmap/fixarray counts.
pub const FIXCOLLECTION_LIMIT: usize = 16;
/// Exclusive upper bound of the fixstr length.
pub const FIXSTR_LIMIT: usize = 32;
/// Smallest negative fixint value.
pub const NEGFIXINT_MIN: i64 = -32;
/// Largest integer a float64 holds exactly, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Width of a big-endian length or integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 1 byte
    W8,
    /// 2 bytes
    W16,
    /// 4 bytes
    W32,
    /// 8 bytes
    W64,
}

impl Width {
    /// Number of bytes this width occupies.
    pub const fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
            Width::W64 => 8,
        }
    }

    /// Smallest width holding a length prefix for `len`, or `None` at 2^32 and above.
    pub const fn for_len(len: usize) -> Option<Width> {
        if len <= u8::MAX as usize {
            Some(Width::W8)
        } else if len <= u16::MAX as usize {
            Some(Width::W16)
        } else if len <= u32::MAX as usize {
            Some(Width::W32)
        } else {
            None
        }
    }
}

/// What a tag byte introduces.
///
/// Fixed-width forms carry their small value or count inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Positive fixint `0x00..=0x7f`
    PosFixInt(u8),
    /// Negative fixint `0xe0..=0xff`
    NegFixInt(i8),
    /// fixmap with its entry count
    FixMap(u8),
    /// fixarray with its element count
    FixArray(u8),
    /// fixstr with its byte length
    FixStr(u8),
    /// nil
    Nil,
    /// false
    False,
    /// true
    True,
    /// bin 8/16/32, with the width of the length prefix
    Bin(Width),
    /// float 32
    F32,
    /// float 64
    F64,
    /// uint 8/16/32/64
    UInt(Width),
    /// int 8/16/32/64
    Int(Width),
    /// str 8/16/32
    Str(Width),
    /// array 16/32
    Array(Width),
    /// map 16/32
    Map(Width),
    /// ext 8/16/32 and fixext 1..16
    Ext(u8),
    /// `0xc1`, never used by the format
    Reserved,
}

impl Marker {
    /// Classify a tag byte. Every byte maps to exactly one marker.
    pub const fn from_u8(tag: u8) -> Marker {
        match tag {
            0x00..=MSGPACK_POSFIXINT_MAX => Marker::PosFixInt(tag),
            MSGPACK_FIXMAP_MIN..=MSGPACK_FIXMAP_MAX => Marker::FixMap(tag & 0x0f),
            MSGPACK_FIXARRAY_MIN..=MSGPACK_FIXARRAY_MAX => Marker::FixArray(tag & 0x0f),
            MSGPACK_FIXSTR_MIN..=MSGPACK_FIXSTR_MAX => Marker::FixStr(tag & 0x1f),
            MSGPACK_NIL => Marker::Nil,
            MSGPACK_NEVER_USED => Marker::Reserved,
            MSGPACK_FALSE => Marker::False,
            MSGPACK_TRUE => Marker::True,
            MSGPACK_BIN8 => Marker::Bin(Width::W8),
            MSGPACK_BIN16 => Marker::Bin(Width::W16),
            MSGPACK_BIN32 => Marker::Bin(Width::W32),
            MSGPACK_EXT8..=MSGPACK_EXT32 => Marker::Ext(tag),
            MSGPACK_FLOAT32 => Marker::F32,
            MSGPACK_FLOAT64 => Marker::F64,
            MSGPACK_UINT8 => Marker::UInt(Width::W8),
            MSGPACK_UINT16 => Marker::UInt(Width::W16),
            MSGPACK_UINT32 => Marker::UInt(Width::W32),
            MSGPACK_UINT64 => Marker::UInt(Width::W64),
            MSGPACK_INT8 => Marker::Int(Width::W8),
            MSGPACK_INT16 => Marker::Int(Width::W16),
            MSGPACK_INT32 => Marker::Int(Width::W32),
            MSGPACK_INT64 => Marker::Int(Width::W64),
            MSGPACK_FIXEXT1..=MSGPACK_FIXEXT16 => Marker::Ext(tag),
            MSGPACK_STR8 => Marker::Str(Width::W8),
            MSGPACK_STR16 => Marker::Str(Width::W16),
            MSGPACK_STR32 => Marker::Str(Width::W32),
            MSGPACK_ARRAY16 => Marker::Array(Width::W16),
            MSGPACK_ARRAY32 => Marker::Array(Width::W32),
            MSGPACK_MAP16 => Marker::Map(Width::W16),
            MSGPACK_MAP32 => Marker::Map(Width::W32),
            MSGPACK_NEGFIXINT_MIN..=0xff => Marker::NegFixInt(tag as i8),
        }
    }
}

/// Tag byte for a string header of the given prefix width.
pub const fn str_tag(width: Width) -> u8 {
    match width {
        Width::W8 => MSGPACK_STR8,
        Width::W16 => MSGPACK_STR16,
        Width::W32 | Width::W64 => MSGPACK_STR32,
    }
}

/// Tag byte for a binary header of the given prefix width.
pub const fn bin_tag(width: Width) -> u8 {
    match width {
        Width::W8 => MSGPACK_BIN8,
        Width::W16 => MSGPACK_BIN16,
        Width::W32 | Width::W64 => MSGPACK_BIN32,
    }
}

/// Human-readable name of the format family a tag byte belongs to.
pub const fn tag_name(tag: u8) -> &'static str {
    match tag {
        0x00..=MSGPACK_POSFIXINT_MAX => "positive fixint",
        MSGPACK_FIXMAP_MIN..=MSGPACK_FIXMAP_MAX => "fixmap",
        MSGPACK_FIXARRAY_MIN..=MSGPACK_FIXARRAY_MAX => "fixarray",
        MSGPACK_FIXSTR_MIN..=MSGPACK_FIXSTR_MAX => "fixstr",
        MSGPACK_NIL => "nil",
        MSGPACK_NEVER_USED => "never used",
        MSGPACK_FALSE => "false",
        MSGPACK_TRUE => "true",
        MSGPACK_BIN8 => "bin 8",
        MSGPACK_BIN16 => "bin 16",
        MSGPACK_BIN32 => "bin 32",
        MSGPACK_EXT8 => "ext 8",
        MSGPACK_EXT16 => "ext 16",
        MSGPACK_EXT32 => "ext 32",
        MSGPACK_FLOAT32 => "float 32",
        MSGPACK_FLOAT64 => "float 64",
        MSGPACK_UINT8 => "uint 8",
        MSGPACK_UINT16 => "uint 16",
        MSGPACK_UINT32 => "uint 32",
        MSGPACK_UINT64 => "uint 64",
        MSGPACK_INT8 => "int 8",
        MSGPACK_INT16 => "int 16",
        MSGPACK_INT32 => "int 32",
        MSGPACK_INT64 => "int 64",
        0xd4 => "fixext 1",
        0xd5 => "fixext 2",
        0xd6 => "fixext 4",
        0xd7 => "fixext 8",
        MSGPACK_FIXEXT16 => "fixext 16",
        MSGPACK_STR8 => "str 8",
        MSGPACK_STR16 => "str 16",
        MSGPACK_STR32 => "str 32",
        MSGPACK_ARRAY16 => "array 16",
        MSGPACK_ARRAY32 => "array 32",
        MSGPACK_MAP16 => "map 16",
        MSGPACK_MAP32 => "map 32",
        MSGPACK_NEGFIXINT_MIN..=0xff => "negative fixint",
    }
}

//! Error types for MessagePack encoding and decoding.

use core::fmt::{self, Display};

use crate::format;
use crate::value::ValueKind;

/// Error returned by every encode and decode entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The specific kind of error
    pub kind: ErrorKind,
    /// Byte offset in the input where decoding failed, if any
    pub pos: Option<usize>,
}

impl Error {
    /// Create an error without position information.
    pub const fn new(kind: ErrorKind) -> Self {
        Error { kind, pos: None }
    }

    /// Create an error pointing at a byte offset of the input.
    pub const fn at(kind: ErrorKind, pos: usize) -> Self {
        Error {
            kind,
            pos: Some(pos),
        }
    }

    /// The kind of this error.
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset of the failure, for decode errors.
    pub const fn position(&self) -> Option<usize> {
        self.pos
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(pos) = self.pos {
            write!(f, " at offset {pos}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// What a length limit was exceeded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    /// UTF-8 byte length of a string
    String,
    /// Length of a byte blob
    Bytes,
    /// Element count of an array
    Array,
    /// Entry count of a map
    Map,
}

impl Display for LengthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LengthKind::String => "string",
            LengthKind::Bytes => "byte array",
            LengthKind::Array => "array",
            LengthKind::Map => "map",
        })
    }
}

/// Specific error kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The value has no MessagePack representation
    UnsupportedValue {
        /// What made the value unrepresentable
        reason: String,
    },
    /// An integer is outside the range its target tag can hold
    NumericRangeExceeded {
        /// The offending value, in decimal
        value: String,
        /// The representation it failed to fit
        range: &'static str,
    },
    /// A string, byte array, array or map has 2^32 or more entries
    LengthExceeded {
        /// What was too long
        what: LengthKind,
        /// The actual length
        len: usize,
    },
    /// The reserved byte `0xc1` or an extension tag
    MalformedTag {
        /// The tag byte that was read
        tag: u8,
    },
    /// A declared length or fixed-width payload runs past the end of the input
    TruncatedInput {
        /// Bytes required by the current element
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },
    /// A decoded map key is neither a string nor a number
    InvalidMapKey {
        /// The kind of value found in key position
        found: ValueKind,
    },
    /// Bytes remain after one complete top-level value
    TrailingData {
        /// Number of unconsumed bytes
        remaining: usize,
    },
    /// A string payload is not valid UTF-8
    InvalidUtf8,
    /// Arrays and maps nest deeper than `DecodeOptions::max_depth`
    DepthLimitExceeded {
        /// The configured limit
        limit: usize,
    },
    /// The encoded output would exceed `EncodeOptions::max_len`
    BufferLimitExceeded {
        /// Bytes the encoder needed
        requested: usize,
        /// The configured limit
        limit: usize,
    },
    /// Error raised by a `Serialize` implementation
    Custom(String),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedValue { reason } => {
                write!(f, "cannot encode value into messagepack: {reason}")
            }
            ErrorKind::NumericRangeExceeded { value, range } => {
                write!(f, "integer {value} does not fit {range}")
            }
            ErrorKind::LengthExceeded { what, len } => {
                write!(f, "{what} of length {len} exceeds the 32-bit length limit")
            }
            ErrorKind::MalformedTag { tag } => {
                write!(
                    f,
                    "unsupported MessagePack tag 0x{tag:02x} ({})",
                    format::tag_name(*tag)
                )
            }
            ErrorKind::TruncatedInput { needed, remaining } => {
                write!(
                    f,
                    "unexpected end of input: needed {needed} bytes, {remaining} left"
                )
            }
            ErrorKind::InvalidMapKey { found } => {
                write!(
                    f,
                    "invalid map key of type {found}: keys must be a number or a string"
                )
            }
            ErrorKind::TrailingData { remaining } => {
                write!(
                    f,
                    "decode did not consume whole input: {remaining} trailing bytes"
                )
            }
            ErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 in string"),
            ErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting depth exceeds the limit of {limit}")
            }
            ErrorKind::BufferLimitExceeded { requested, limit } => {
                write!(
                    f,
                    "encoded output needs {requested} bytes, over the limit of {limit}"
                )
            }
            ErrorKind::Custom(msg) => f.write_str(msg),
        }
    }
}

impl ErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedValue { .. } => "msgpack::unsupported_value",
            ErrorKind::NumericRangeExceeded { .. } => "msgpack::numeric_range_exceeded",
            ErrorKind::LengthExceeded { .. } => "msgpack::length_exceeded",
            ErrorKind::MalformedTag { .. } => "msgpack::malformed_tag",
            ErrorKind::TruncatedInput { .. } => "msgpack::truncated_input",
            ErrorKind::InvalidMapKey { .. } => "msgpack::invalid_map_key",
            ErrorKind::TrailingData { .. } => "msgpack::trailing_data",
            ErrorKind::InvalidUtf8 => "msgpack::invalid_utf8",
            ErrorKind::DepthLimitExceeded { .. } => "msgpack::depth_limit_exceeded",
            ErrorKind::BufferLimitExceeded { .. } => "msgpack::buffer_limit_exceeded",
            ErrorKind::Custom(_) => "msgpack::custom",
        }
    }

    /// A hint on how to avoid the error, where one exists.
    pub const fn help(&self) -> Option<&'static str> {
        match self {
            ErrorKind::NumericRangeExceeded { .. } => Some(
                "integers beyond 2^53 need `Value::BigInt` or `LargeIntEncoding::Exact`; \
                 MessagePack has no tag wider than 64 bits",
            ),
            ErrorKind::MalformedTag { .. } => {
                Some("extension types are not supported by this codec")
            }
            ErrorKind::TrailingData { .. } => {
                Some("each decode call accepts exactly one top-level value")
            }
            ErrorKind::DepthLimitExceeded { .. } => Some("raise `DecodeOptions::max_depth`"),
            ErrorKind::BufferLimitExceeded { .. } => Some("raise `EncodeOptions::max_len`"),
            _ => None,
        }
    }
}

#[cfg(feature = "pretty-errors")]
impl miette::Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind
            .help()
            .map(|help| Box::new(help) as Box<dyn Display + 'a>)
    }
}

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

mod error;
pub use error::{Error, ErrorKind, LengthKind};

pub mod format;

mod buffer;
pub use buffer::GrowableBuffer;

mod cursor;
pub use cursor::Cursor;

mod value;
pub use value::{Map, MapKey, Value, ValueKind};

mod options;
pub use options::{DecodeOptions, EncodeOptions, LargeIntEncoding};

mod encode;
pub use encode::{Encoder, encode, encode_with_options};

mod decode;
pub use decode::{decode, decode_with_options};

#[cfg(feature = "serde")]
mod ser;
#[cfg(feature = "serde")]
pub use ser::{to_value, to_vec, to_vec_with_options};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

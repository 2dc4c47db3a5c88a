//! Encoder and decoder configuration.

/// Starting size of the encode buffer.
pub(crate) const DEFAULT_INITIAL_CAPACITY: usize = 4096;

/// How [`Value::Int`](crate::Value::Int) values outside the 32-bit window are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LargeIntEncoding {
    /// `float 64`, matching the JavaScript `@messagepack/messagepack` encoder
    /// byte for byte. Only magnitudes up to `2^53 - 1` are accepted, since the
    /// float lane cannot hold larger integers exactly.
    #[default]
    Float64,
    /// `uint 64` for positive values and `int 64` for negative ones. These
    /// decode back as [`Value::BigInt`](crate::Value::BigInt).
    Exact,
}

/// Options for encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Tag choice for integers beyond the 32-bit tags (default: `Float64`)
    pub large_ints: LargeIntEncoding,

    /// Initial output buffer size in bytes (default: 4096)
    pub initial_capacity: usize,

    /// Maximum size of the encoded output (default: unlimited)
    pub max_len: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            large_ints: LargeIntEncoding::Float64,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_len: None,
        }
    }
}

impl EncodeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how integers beyond the 32-bit tags are written.
    pub const fn large_ints(mut self, large_ints: LargeIntEncoding) -> Self {
        self.large_ints = large_ints;
        self
    }

    /// Set the initial output buffer size.
    pub const fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Fail with `BufferLimitExceeded` rather than produce more than `max_len` bytes.
    pub const fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }
}

/// Options for decoding.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Maximum array/map nesting depth (default: unlimited, bounded by the stack)
    pub max_depth: Option<usize>,
}

impl DecodeOptions {
    /// Create new default options.
    pub const fn new() -> Self {
        Self { max_depth: None }
    }

    /// Fail with `DepthLimitExceeded` when arrays and maps nest deeper than `max_depth`.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

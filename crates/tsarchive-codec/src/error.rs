use tsarchive_schema::{SchemaError, ValueType};

/// Errors that can occur while encoding or decoding archive data.
///
/// Every error is terminal for the update or header being processed; no
/// partially decoded value is ever returned alongside one.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The header rejected a lookup or declaration.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The update carries a different number of values than the record has channels.
    #[error("record {record_id} has {expected} channels but update carries {actual} values")]
    ChannelCountMismatch {
        record_id: u32,
        expected: usize,
        actual: usize,
    },

    /// A value's variant does not match its channel's declared type.
    #[error("value {index} is {actual} but channel is declared {expected}")]
    ValueTypeMismatch {
        index: usize,
        expected: ValueType,
        actual: ValueType,
    },

    /// An enumerated channel's value does not index one of its labels.
    #[error("value {value} at index {index} is past the channel's {labels} labels")]
    LabelOutOfRange {
        index: usize,
        value: u32,
        labels: usize,
    },

    /// `elapsed_millisecs` must be in `0..=999`.
    #[error("elapsed milliseconds out of range ({0}, max 999)")]
    MillisecondsOutOfRange(u32),

    /// The input ended before a complete item was read.
    #[error("input truncated")]
    TruncatedInput,

    /// Bytes remain after a complete item was read.
    #[error("{0} trailing bytes after complete item")]
    TrailingData(usize),

    /// The update presence byte sets bits this format does not define.
    #[error("reserved presence bits set (0x{0:02x})")]
    ReservedPresenceBits(u8),

    /// A value discriminant is not a known value type.
    #[error("invalid value tag {tag} at index {index}")]
    InvalidValueTag { index: usize, tag: u8 },

    /// A channel declaration names an unknown value type.
    #[error("unknown value type tag {0}")]
    UnknownValueType(u8),

    /// A variable-length integer does not fit in 32 bits.
    #[error("varint exceeds 32 bits")]
    VarintOverflow,

    /// A string field is not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A decoded length or count exceeds the configured limit.
    #[error("{what} too large ({size}, max {max})")]
    LimitExceeded {
        what: &'static str,
        size: usize,
        max: usize,
    },

    /// The header does not start with the archive magic bytes.
    #[error("invalid header magic (expected \"TA\")")]
    InvalidMagic,

    /// The header format version is not supported.
    #[error("unsupported header version {0}")]
    UnsupportedVersion(u8),

    /// A sample timestamp precedes the archive's timestamp origin.
    #[error("timestamp precedes the archive origin")]
    TimestampBeforeOrigin,

    /// The elapsed time since the origin does not fit the update fields.
    #[error("elapsed time exceeds the representable range")]
    ElapsedOverflow,
}

pub type Result<T> = std::result::Result<T, CodecError>;

use tsarchive_codec::CodecError;
use tsarchive_schema::{SchemaError, ValueType};

/// Errors raised while declaring monitors or producing updates.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    /// A monitor declaration violated a schema invariant.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// An update could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A monitor with this record name already exists.
    #[error("monitor already declared for record \"{0}\"")]
    DuplicateMonitor(String),

    /// No monitor is declared for this record name.
    #[error("no monitor declared for record \"{0}\"")]
    UnknownMonitor(String),

    /// The record has no channel with this name.
    #[error("record \"{record}\" has no channel \"{channel}\"")]
    UnknownChannel { record: String, channel: String },

    /// The label is not one of the channel's declared labels.
    #[error("channel \"{channel}\" has no label \"{label}\"")]
    InvalidLabel { channel: String, label: String },

    /// A numeric sample cannot be converted to the channel's type without loss.
    #[error("sample for channel \"{channel}\" does not fit {expected}")]
    SampleOutOfRange { channel: String, expected: ValueType },

    /// A channel has no current value to send.
    #[error("channel \"{channel}\" of record \"{record}\" has never been sampled")]
    ChannelNeverSampled { record: String, channel: String },

    /// Updates require a started producer.
    #[error("producer has not been started")]
    NotStarted,

    /// `start` may only be called once.
    #[error("producer already started")]
    AlreadyStarted,

    /// The timestamp origin does not fit in 32-bit Unix seconds.
    #[error("timestamp origin out of range")]
    OriginOutOfRange,

    /// Every record id has been handed out.
    #[error("record ids exhausted")]
    RecordIdsExhausted,
}

pub type Result<T> = std::result::Result<T, ProducerError>;

/// Structural errors detected while declaring or looking up records.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A record with this id is already declared in the header.
    #[error("duplicate record id {0}")]
    DuplicateRecordId(u32),

    /// The record declares no channels, so it could never carry data.
    #[error("record {0} declares no channels")]
    EmptyChannelList(u32),

    /// A channel declaration is unusable (currently: empty channel name).
    #[error("record {record_id} has an invalid channel at index {index}: empty name")]
    InvalidChannelSpec { record_id: u32, index: usize },

    /// No record with this id is declared in the header.
    #[error("unknown record id {0}")]
    UnknownRecordId(u32),

    /// The header has been frozen and can no longer accept records.
    #[error("header is frozen; records can no longer be added")]
    SchemaFrozen,

    /// A JSON header declaration could not be parsed.
    #[error("invalid header declaration: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

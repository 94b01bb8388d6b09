/// Limits applied when decoding untrusted headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum byte length of any name or label.
    pub max_string_len: usize,
    /// Maximum number of records in one header.
    pub max_records: usize,
    /// Maximum number of channels in one record.
    pub max_channels_per_record: usize,
    /// Maximum number of labels on one channel.
    pub max_labels_per_channel: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_string_len: 4096,
            max_records: 4096,
            max_channels_per_record: 4096,
            max_labels_per_channel: 1024,
        }
    }
}

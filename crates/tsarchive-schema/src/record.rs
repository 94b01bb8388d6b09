use crate::channel::{Channel, ValueType};
use crate::error::{Result, SchemaError};

/// A named, ordered group of channels sharing one record id.
///
/// Channel order is part of the wire contract: updates carry values by
/// position. There is no way to reorder channels once a record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: u32,
    name: String,
    channels: Vec<Channel>,
    types: Vec<ValueType>,
}

impl Record {
    /// Validate and build a record.
    ///
    /// Fails with `EmptyChannelList` when `channels` is empty and with
    /// `InvalidChannelSpec` for the first channel that has an empty name.
    pub fn new(id: u32, name: impl Into<String>, channels: Vec<Channel>) -> Result<Self> {
        if channels.is_empty() {
            return Err(SchemaError::EmptyChannelList(id));
        }
        if let Some(index) = channels.iter().position(|c| c.name().is_empty()) {
            return Err(SchemaError::InvalidChannelSpec {
                record_id: id,
                index,
            });
        }

        let types = channels.iter().map(Channel::value_type).collect();
        Ok(Self {
            id,
            name: name.into(),
            channels,
            types,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Declared value type of every channel, in channel order.
    pub fn channel_types(&self) -> &[ValueType] {
        &self.types
    }

    /// Number of values every update for this record carries.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Position of the named channel.
    pub fn index_of(&self, channel_name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.name() == channel_name)
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_channels() -> Vec<Channel> {
        vec![
            Channel::enumerated("boolean", ["true", "false"]),
            Channel::new("vector.x", ValueType::Double),
            Channel::new("vector.y", ValueType::Double),
            Channel::new("offset", ValueType::Signed),
        ]
    }

    #[test]
    fn channel_types_follow_declaration_order() {
        let record = Record::new(1, "test", vector_channels()).unwrap();
        assert_eq!(
            record.channel_types(),
            &[
                ValueType::Unsigned,
                ValueType::Double,
                ValueType::Double,
                ValueType::Signed
            ]
        );
        assert_eq!(record.channel_count(), 4);
        assert_eq!(record.index_of("vector.y"), Some(2));
        assert_eq!(record.index_of("vector.z"), None);
        assert_eq!(record.channel(0).unwrap().labels()[0], "true");
    }

    #[test]
    fn empty_channel_list_rejected() {
        assert!(matches!(
            Record::new(7, "empty", Vec::new()),
            Err(SchemaError::EmptyChannelList(7))
        ));
    }

    #[test]
    fn empty_channel_name_rejected() {
        let channels = vec![
            Channel::new("ok", ValueType::Double),
            Channel::new("", ValueType::Signed),
        ];
        assert!(matches!(
            Record::new(3, "bad", channels),
            Err(SchemaError::InvalidChannelSpec {
                record_id: 3,
                index: 1
            })
        ));
    }
}

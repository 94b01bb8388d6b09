//! Channel declarations.
//!
//! A channel is one named, typed measurement slot within a record. Its
//! `value_type` fixes which [`ValueType`] every update must carry at the
//! channel's position.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The numeric representation of a channel's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 64-bit IEEE-754 floating point.
    Double,
    /// 32-bit unsigned integer. Also used for enumerated channels.
    Unsigned,
    /// 32-bit signed integer.
    Signed,
}

impl ValueType {
    /// Wire tag for this type. Stable across format versions.
    pub const fn tag(self) -> u8 {
        match self {
            ValueType::Double => 0,
            ValueType::Unsigned => 1,
            ValueType::Signed => 2,
        }
    }

    /// Resolve a wire tag back to its type.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ValueType::Double),
            1 => Some(ValueType::Unsigned),
            2 => Some(ValueType::Signed),
            _ => None,
        }
    }

    /// Lowercase name, as used in JSON declarations.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Double => "double",
            ValueType::Unsigned => "unsigned",
            ValueType::Signed => "signed",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named, typed slot within a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "channel_name")]
    name: String,
    value_type: ValueType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
}

impl Channel {
    /// Declare a channel with no labels.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            labels: Vec::new(),
        }
    }

    /// Declare an enumerated channel: unsigned values index into `labels`.
    pub fn enumerated<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, ValueType::Unsigned).with_labels(labels)
    }

    /// Attach labels to this channel.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of `label` within this channel's labels.
    pub fn label_index(&self, label: &str) -> Option<u32> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Label for an unsigned value of an enumerated channel.
    pub fn label(&self, value: u32) -> Option<&str> {
        self.labels.get(value as usize).map(String::as_str)
    }
}

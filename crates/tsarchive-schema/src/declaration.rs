//! JSON header declarations.
//!
//! ```json
//! {
//!   "name": "lab.sensors",
//!   "timestamp_origin": 1700000000,
//!   "records": [
//!     { "record_id": 1, "record_name": "environment",
//!       "channels": [ { "channel_name": "temperature", "value_type": "double" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::Result;
use crate::header::Header;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderDeclaration {
    pub name: String,
    pub timestamp_origin: u32,
    #[serde(default)]
    pub records: Vec<RecordDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDeclaration {
    pub record_id: u32,
    pub record_name: String,
    pub channels: Vec<Channel>,
}

impl HeaderDeclaration {
    /// Replay every record through [`Header::add_record`] and freeze the
    /// result.
    pub fn build(self) -> Result<Header> {
        let mut header = Header::new(self.name, self.timestamp_origin);
        for record in self.records {
            header.add_record(record.record_id, record.record_name, record.channels)?;
        }
        header.freeze();
        Ok(header)
    }
}

impl From<&Header> for HeaderDeclaration {
    fn from(header: &Header) -> Self {
        Self {
            name: header.name().to_string(),
            timestamp_origin: header.timestamp_origin(),
            records: header
                .records()
                .map(|r| RecordDeclaration {
                    record_id: r.id(),
                    record_name: r.name().to_string(),
                    channels: r.channels().to_vec(),
                })
                .collect(),
        }
    }
}

impl Header {
    /// Parse a JSON declaration into a frozen header.
    pub fn from_json(json: &str) -> Result<Self> {
        let declaration: HeaderDeclaration = serde_json::from_str(json)?;
        declaration.build()
    }

    /// Render this header as a JSON declaration.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&HeaderDeclaration::from(self))?)
    }
}

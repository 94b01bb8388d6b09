use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::channel::{Channel, ValueType};
use crate::error::{Result, SchemaError};
use crate::record::Record;

/// The archive descriptor: a name, a timestamp origin and every record the
/// archive can carry.
///
/// Records live in an append-only arena in declaration order, indexed by
/// record id. A header starts out building; [`Header::freeze`] moves it to
/// the frozen state, after which [`Header::add_record`] fails with
/// [`SchemaError::SchemaFrozen`]. The codec freezes a header the first time
/// it is used, so a header shared between encoders never changes shape.
#[derive(Debug)]
pub struct Header {
    name: String,
    timestamp_origin: u32,
    records: Vec<Record>,
    index: HashMap<u32, usize>,
    frozen: AtomicBool,
}

impl Header {
    /// Start an empty header. `timestamp_origin` is in UTC seconds since the
    /// Unix epoch.
    pub fn new(name: impl Into<String>, timestamp_origin: u32) -> Self {
        Self {
            name: name.into(),
            timestamp_origin,
            records: Vec::new(),
            index: HashMap::new(),
            frozen: AtomicBool::new(false),
        }
    }

    /// Declare a record and append it after all previously declared records.
    pub fn add_record(
        &mut self,
        record_id: u32,
        record_name: impl Into<String>,
        channels: Vec<Channel>,
    ) -> Result<&Record> {
        if self.is_frozen() {
            return Err(SchemaError::SchemaFrozen);
        }
        if self.index.contains_key(&record_id) {
            return Err(SchemaError::DuplicateRecordId(record_id));
        }

        let record = Record::new(record_id, record_name, channels)?;
        tracing::debug!(
            header = %self.name,
            record_id,
            record = %record.name(),
            channels = record.channel_count(),
            "declared record"
        );

        let slot = self.records.len();
        self.records.push(record);
        self.index.insert(record_id, slot);
        Ok(&self.records[slot])
    }

    /// Look up a record by id.
    pub fn resolve(&self, record_id: u32) -> Result<&Record> {
        self.index
            .get(&record_id)
            .map(|&slot| &self.records[slot])
            .ok_or(SchemaError::UnknownRecordId(record_id))
    }

    /// Declared value types of a record's channels, in channel order.
    pub fn channel_types(&self, record_id: u32) -> Result<&[ValueType]> {
        self.resolve(record_id).map(Record::channel_types)
    }

    /// Look up a record by name.
    pub fn record_named(&self, record_name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name() == record_name)
    }

    /// Transition to the frozen state. Idempotent.
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            tracing::debug!(header = %self.name, records = self.records.len(), "header frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp_origin(&self) -> u32 {
        self.timestamp_origin
    }

    /// Records in declaration order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.timestamp_origin == other.timestamp_origin
            && self.records == other.records
    }
}

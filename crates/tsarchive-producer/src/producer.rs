use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tsarchive_codec::{encode_update, Elapsed, Update, Value};
use tsarchive_schema::{Channel, Header, Record, SchemaError};

use crate::error::{ProducerError, Result};
use crate::sample::Sample;

/// A declared record plus the last value sent on each of its channels.
#[derive(Debug)]
struct Monitor {
    record: Record,
    last: Vec<Option<Value>>,
}

/// Builds an archive header from declared monitors, then turns named
/// channel samples into encoded updates.
///
/// Monitors are declared before [`start`](Self::start); updates are only
/// accepted after it. Record ids are assigned in declaration order starting
/// at 1.
#[derive(Debug)]
pub struct ArchiveProducer {
    name: String,
    monitors: Vec<Monitor>,
    by_name: HashMap<String, usize>,
    next_id: u32,
    header: Option<Header>,
}

impl ArchiveProducer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            monitors: Vec::new(),
            by_name: HashMap::new(),
            next_id: 1,
            header: None,
        }
    }

    /// Declare a monitor for a new record. Returns the assigned record id.
    pub fn add_monitor(
        &mut self,
        record_name: impl Into<String>,
        channels: Vec<Channel>,
    ) -> Result<u32> {
        if self.header.is_some() {
            return Err(SchemaError::SchemaFrozen.into());
        }
        let record_name = record_name.into();
        if self.by_name.contains_key(&record_name) {
            return Err(ProducerError::DuplicateMonitor(record_name));
        }

        let id = self.next_id;
        let record = Record::new(id, record_name.clone(), channels)?;
        self.next_id = id.checked_add(1).ok_or(ProducerError::RecordIdsExhausted)?;

        tracing::info!(
            producer = %self.name,
            record = %record_name,
            record_id = id,
            "adding monitor"
        );
        self.by_name.insert(record_name, self.monitors.len());
        self.monitors.push(Monitor {
            last: vec![None; record.channel_count()],
            record,
        });
        Ok(id)
    }

    /// Freeze the declared monitors into a header with the given origin,
    /// truncated to whole seconds.
    ///
    /// The returned header must be persisted ahead of any update bytes.
    pub fn start(&mut self, origin: SystemTime) -> Result<&Header> {
        if self.header.is_some() {
            return Err(ProducerError::AlreadyStarted);
        }
        let origin = origin
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| u32::try_from(d.as_secs()).ok())
            .ok_or(ProducerError::OriginOutOfRange)?;

        let mut header = Header::new(self.name.clone(), origin);
        for monitor in &self.monitors {
            let record = &monitor.record;
            header.add_record(record.id(), record.name(), record.channels().to_vec())?;
        }
        header.freeze();

        tracing::info!(
            producer = %self.name,
            timestamp_origin = origin,
            records = header.len(),
            "starting archive producer"
        );
        Ok(&*self.header.insert(header))
    }

    /// Encode an update for the named record.
    ///
    /// Channels missing from `samples` repeat their previous value. Every
    /// channel must have been sampled at least once. A failed update leaves
    /// the remembered values unchanged.
    pub fn update<I, S>(
        &mut self,
        timestamp: SystemTime,
        record_name: &str,
        samples: I,
    ) -> Result<Bytes>
    where
        I: IntoIterator<Item = (S, Sample)>,
        S: AsRef<str>,
    {
        let header = self.header.as_ref().ok_or(ProducerError::NotStarted)?;
        let slot = *self
            .by_name
            .get(record_name)
            .ok_or_else(|| ProducerError::UnknownMonitor(record_name.to_string()))?;
        let monitor = &mut self.monitors[slot];
        let record = &monitor.record;

        let mut current = monitor.last.clone();
        for (channel_name, sample) in samples {
            let channel_name = channel_name.as_ref();
            let index = record
                .index_of(channel_name)
                .ok_or_else(|| ProducerError::UnknownChannel {
                    record: record.name().to_string(),
                    channel: channel_name.to_string(),
                })?;
            let channel = &record.channels()[index];
            current[index] = Some(sample.resolve(channel)?);
        }

        let mut values = Vec::with_capacity(current.len());
        for (channel, value) in record.channels().iter().zip(current.iter().copied()) {
            let value = value.ok_or_else(|| ProducerError::ChannelNeverSampled {
                record: record.name().to_string(),
                channel: channel.name().to_string(),
            })?;
            values.push(value);
        }

        let elapsed = Elapsed::between(header.timestamp_origin(), timestamp)?;
        let update = Update::new(record.id(), elapsed, values);
        let bytes = encode_update(header, &update)?;

        monitor.last = current;
        Ok(bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_started(&self) -> bool {
        self.header.is_some()
    }

    /// The frozen header, once started.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The record declared for a monitor.
    pub fn monitor(&self, record_name: &str) -> Option<&Record> {
        self.by_name
            .get(record_name)
            .map(|&slot| &self.monitors[slot].record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tsarchive_codec::{decode_update, CodecError};
    use tsarchive_schema::ValueType;

    use super::*;

    const ORIGIN: u64 = 1_700_000_000;

    fn at(seconds: u64, millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(seconds) + Duration::from_millis(millis)
    }

    fn vector_channels() -> Vec<Channel> {
        vec![
            Channel::enumerated("boolean", ["true", "false"]),
            Channel::new("vector.x", ValueType::Double),
            Channel::new("vector.y", ValueType::Double),
            Channel::new("vector.z", ValueType::Double),
        ]
    }

    fn started_producer() -> ArchiveProducer {
        let mut producer = ArchiveProducer::new("tests.producer");
        producer.add_monitor("test", vector_channels()).unwrap();
        producer
            .add_monitor("motor", vec![Channel::new("steps", ValueType::Signed)])
            .unwrap();
        producer.start(at(ORIGIN, 250)).unwrap();
        producer
    }

    #[test]
    fn record_ids_count_from_one() {
        let mut producer = ArchiveProducer::new("ids");
        assert_eq!(producer.add_monitor("a", vector_channels()).unwrap(), 1);
        assert_eq!(producer.add_monitor("b", vector_channels()).unwrap(), 2);
        assert_eq!(producer.monitor("b").unwrap().id(), 2);
    }

    #[test]
    fn duplicate_and_invalid_monitors_rejected() {
        let mut producer = ArchiveProducer::new("dups");
        producer.add_monitor("a", vector_channels()).unwrap();
        assert!(matches!(
            producer.add_monitor("a", vector_channels()),
            Err(ProducerError::DuplicateMonitor(_))
        ));
        assert!(matches!(
            producer.add_monitor("empty", Vec::new()),
            Err(ProducerError::Schema(SchemaError::EmptyChannelList(2)))
        ));
        // A rejected declaration does not consume an id.
        assert_eq!(producer.add_monitor("b", vector_channels()).unwrap(), 2);
    }

    #[test]
    fn start_builds_frozen_header() {
        let producer = started_producer();
        let header = producer.header().unwrap();
        assert!(header.is_frozen());
        assert_eq!(header.name(), "tests.producer");
        assert_eq!(u64::from(header.timestamp_origin()), ORIGIN);
        assert_eq!(header.len(), 2);
        assert_eq!(header.resolve(2).unwrap().name(), "motor");
    }

    #[test]
    fn lifecycle_is_enforced() {
        let mut producer = ArchiveProducer::new("lifecycle");
        producer.add_monitor("a", vector_channels()).unwrap();
        assert!(matches!(
            producer.update(at(ORIGIN, 0), "a", Vec::<(&str, Sample)>::new()),
            Err(ProducerError::NotStarted)
        ));

        producer.start(at(ORIGIN, 0)).unwrap();
        assert!(producer.is_started());
        assert!(matches!(
            producer.start(at(ORIGIN, 0)),
            Err(ProducerError::AlreadyStarted)
        ));
        assert!(matches!(
            producer.add_monitor("late", vector_channels()),
            Err(ProducerError::Schema(SchemaError::SchemaFrozen))
        ));
    }

    #[test]
    fn update_encodes_named_samples_positionally() {
        let mut producer = started_producer();
        let bytes = producer
            .update(
                at(ORIGIN + 123, 0),
                "test",
                [
                    ("vector.z", Sample::from(9.87)),
                    ("boolean", Sample::from("false")),
                    ("vector.x", Sample::from(-1.23)),
                    ("vector.y", Sample::from(0.0)),
                ],
            )
            .unwrap();

        let header = producer.header().unwrap();
        let decoded = decode_update(header, &bytes).unwrap();
        assert_eq!(decoded.update.record_id, 1);
        assert_eq!(decoded.update.elapsed_days, None);
        assert_eq!(decoded.update.elapsed_seconds, 123);
        assert_eq!(decoded.update.elapsed_millisecs, None);
        assert_eq!(
            decoded.update.values,
            vec![
                Value::Unsigned(1),
                Value::Double(-1.23),
                Value::Double(0.0),
                Value::Double(9.87)
            ]
        );
        assert_eq!(decoded.time.seconds, ORIGIN + 123);
    }

    #[test]
    fn integer_samples_fill_double_channels() {
        let mut producer = started_producer();
        let bytes = producer
            .update(
                at(ORIGIN + 5, 0),
                "test",
                [
                    ("boolean", Sample::from(1u32)),
                    ("vector.x", Sample::from(-3i32)),
                    ("vector.y", Sample::from(0i32)),
                    ("vector.z", Sample::from(12u32)),
                ],
            )
            .unwrap();

        let decoded = decode_update(producer.header().unwrap(), &bytes).unwrap();
        assert_eq!(
            decoded.update.values,
            vec![
                Value::Unsigned(1),
                Value::Double(-3.0),
                Value::Double(0.0),
                Value::Double(12.0)
            ]
        );
    }

    #[test]
    fn unrepresentable_samples_rejected() {
        let mut producer = started_producer();
        let result = producer.update(
            at(ORIGIN + 5, 0),
            "test",
            [("boolean", Sample::from(-123i32))],
        );
        assert!(matches!(
            result,
            Err(ProducerError::SampleOutOfRange { ref channel, expected: ValueType::Unsigned })
                if channel == "boolean"
        ));

        producer
            .update(at(ORIGIN + 6, 0), "motor", [("steps", Sample::from(-7.0))])
            .unwrap();
        let result = producer.update(
            at(ORIGIN + 7, 0),
            "motor",
            [("steps", Sample::from(u32::MAX))],
        );
        assert!(matches!(
            result,
            Err(ProducerError::SampleOutOfRange { expected: ValueType::Signed, .. })
        ));
    }

    #[test]
    fn unsampled_channels_repeat_previous_values() {
        let mut producer = started_producer();
        producer
            .update(
                at(ORIGIN + 1, 0),
                "test",
                [
                    ("boolean", Sample::from("true")),
                    ("vector.x", Sample::from(1.0)),
                    ("vector.y", Sample::from(2.0)),
                    ("vector.z", Sample::from(3.0)),
                ],
            )
            .unwrap();

        let bytes = producer
            .update(
                at(ORIGIN + 86_400 + 5, 750),
                "test",
                [("vector.y", Sample::from(20.0))],
            )
            .unwrap();
        let decoded = decode_update(producer.header().unwrap(), &bytes).unwrap();
        assert_eq!(decoded.update.elapsed_days, Some(1));
        assert_eq!(decoded.update.elapsed_seconds, 5);
        assert_eq!(decoded.update.elapsed_millisecs, Some(750));
        assert_eq!(
            decoded.update.values,
            vec![
                Value::Unsigned(0),
                Value::Double(1.0),
                Value::Double(20.0),
                Value::Double(3.0)
            ]
        );
    }

    #[test]
    fn never_sampled_channel_rejected() {
        let mut producer = started_producer();
        let result = producer.update(
            at(ORIGIN + 1, 0),
            "test",
            [("vector.x", Sample::from(1.0))],
        );
        assert!(matches!(
            result,
            Err(ProducerError::ChannelNeverSampled { ref channel, .. }) if channel == "boolean"
        ));
    }

    #[test]
    fn unknown_names_rejected() {
        let mut producer = started_producer();
        assert!(matches!(
            producer.update(at(ORIGIN, 0), "nope", [("steps", Sample::from(1i32))]),
            Err(ProducerError::UnknownMonitor(_))
        ));
        assert!(matches!(
            producer.update(at(ORIGIN, 0), "motor", [("rpm", Sample::from(1i32))]),
            Err(ProducerError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn failed_update_keeps_previous_values() {
        let mut producer = started_producer();
        producer
            .update(at(ORIGIN + 1, 0), "motor", [("steps", Sample::from(10i32))])
            .unwrap();

        // Not representable on a signed channel.
        let result = producer.update(
            at(ORIGIN + 2, 0),
            "motor",
            [("steps", Sample::from(1.5))],
        );
        assert!(matches!(
            result,
            Err(ProducerError::SampleOutOfRange { .. })
        ));

        let bytes = producer
            .update(at(ORIGIN + 3, 0), "motor", Vec::<(&str, Sample)>::new())
            .unwrap();
        let decoded = decode_update(producer.header().unwrap(), &bytes).unwrap();
        assert_eq!(decoded.update.values, vec![Value::Signed(10)]);
    }

    #[test]
    fn timestamp_before_origin_rejected() {
        let mut producer = started_producer();
        let result = producer.update(
            at(ORIGIN - 10, 0),
            "motor",
            [("steps", Sample::from(1i32))],
        );
        assert!(matches!(
            result,
            Err(ProducerError::Codec(CodecError::TimestampBeforeOrigin))
        ));
    }
}

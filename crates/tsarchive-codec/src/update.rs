use bytes::{BufMut, Bytes, BytesMut};
use tsarchive_schema::{Header, Record, ValueType};

use crate::error::{CodecError, Result};
use crate::time::{ArchiveTime, Elapsed, MAX_MILLISECS};
use crate::value::Value;
use crate::varint::{
    get_f64, get_u8, get_varint, put_varint, varint_len, zigzag_decode, zigzag_encode,
};

/// Presence bit for `elapsed_days`.
pub const DAYS_PRESENT: u8 = 0x01;

/// Presence bit for `elapsed_millisecs`.
pub const MILLISECS_PRESENT: u8 = 0x02;

const PRESENCE_MASK: u8 = DAYS_PRESENT | MILLISECS_PRESENT;

/// One timestamped sample set for every channel of one record.
///
/// `values[i]` belongs to the record's channel `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub record_id: u32,
    pub elapsed_days: Option<u32>,
    pub elapsed_seconds: u32,
    pub elapsed_millisecs: Option<u32>,
    pub values: Vec<Value>,
}

impl Update {
    pub fn new(record_id: u32, elapsed: Elapsed, values: Vec<Value>) -> Self {
        Self {
            record_id,
            elapsed_days: elapsed.days,
            elapsed_seconds: elapsed.seconds,
            elapsed_millisecs: elapsed.millisecs,
            values,
        }
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed {
            days: self.elapsed_days,
            seconds: self.elapsed_seconds,
            millisecs: self.elapsed_millisecs,
        }
    }

    /// Absolute time of this update relative to a header origin.
    pub fn absolute_time(&self, origin: u32) -> ArchiveTime {
        self.elapsed().absolute_time(origin)
    }
}

/// A decoded update together with its reconstructed absolute time.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedUpdate {
    pub update: Update,
    pub time: ArchiveTime,
}

/// Encode an update into a new buffer.
pub fn encode_update(header: &Header, update: &Update) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_update_into(header, update, &mut dst)?;
    Ok(dst.freeze())
}

/// Encode an update, appending it to `dst`.
///
/// Wire format:
/// ```text
/// record_id         varint
/// presence          u8 (bit0 days, bit1 millisecs)
/// elapsed_days      varint, if bit0
/// elapsed_seconds   varint
/// elapsed_millisecs varint, if bit1
/// values            per channel: tag u8 + payload
///                   (double: f64 LE, unsigned: varint, signed: zigzag varint)
/// ```
///
/// The update is fully validated before anything is written, so `dst` is
/// left untouched on error.
pub fn encode_update_into(header: &Header, update: &Update, dst: &mut BytesMut) -> Result<()> {
    header.freeze();
    let record = header.resolve(update.record_id)?;
    check_values(record, &update.values)?;
    if let Some(millis) = update.elapsed_millisecs {
        check_millisecs(millis)?;
    }

    let mut presence = 0u8;
    if update.elapsed_days.is_some() {
        presence |= DAYS_PRESENT;
    }
    if update.elapsed_millisecs.is_some() {
        presence |= MILLISECS_PRESENT;
    }

    let start = dst.len();
    dst.reserve(encoded_len(update));
    put_varint(dst, update.record_id);
    dst.put_u8(presence);
    if let Some(days) = update.elapsed_days {
        put_varint(dst, days);
    }
    put_varint(dst, update.elapsed_seconds);
    if let Some(millis) = update.elapsed_millisecs {
        put_varint(dst, millis);
    }
    for value in &update.values {
        put_value(dst, value);
    }

    tracing::trace!(
        record_id = update.record_id,
        values = update.values.len(),
        bytes = dst.len() - start,
        "encoded update"
    );
    Ok(())
}

/// Decode exactly one update from `src`.
///
/// `src` must hold one complete update and nothing else.
pub fn decode_update(header: &Header, src: &[u8]) -> Result<DecodedUpdate> {
    header.freeze();
    let result = decode_update_inner(header, src);
    if let Err(err) = &result {
        tracing::warn!(error = %err, bytes = src.len(), "rejected update");
    }
    result
}

fn decode_update_inner(header: &Header, mut src: &[u8]) -> Result<DecodedUpdate> {
    let record_id = get_varint(&mut src)?;
    let record = header.resolve(record_id)?;

    let presence = get_u8(&mut src)?;
    if presence & !PRESENCE_MASK != 0 {
        return Err(CodecError::ReservedPresenceBits(presence));
    }
    let elapsed_days = match presence & DAYS_PRESENT {
        0 => None,
        _ => Some(get_varint(&mut src)?),
    };
    let elapsed_seconds = get_varint(&mut src)?;
    let elapsed_millisecs = match presence & MILLISECS_PRESENT {
        0 => None,
        _ => Some(check_millisecs(get_varint(&mut src)?)?),
    };

    let mut values = Vec::with_capacity(record.channel_count());
    for (index, &expected) in record.channel_types().iter().enumerate() {
        let tag = get_u8(&mut src)?;
        let actual =
            ValueType::from_tag(tag).ok_or(CodecError::InvalidValueTag { index, tag })?;
        if actual != expected {
            return Err(CodecError::ValueTypeMismatch {
                index,
                expected,
                actual,
            });
        }
        let value = get_value(&mut src, actual)?;
        check_label(record, index, value)?;
        values.push(value);
    }

    if !src.is_empty() {
        return Err(CodecError::TrailingData(src.len()));
    }

    let update = Update {
        record_id,
        elapsed_days,
        elapsed_seconds,
        elapsed_millisecs,
        values,
    };
    let time = update.absolute_time(header.timestamp_origin());
    tracing::trace!(record_id, seconds = time.seconds, "decoded update");
    Ok(DecodedUpdate { update, time })
}

fn check_values(record: &Record, values: &[Value]) -> Result<()> {
    let types = record.channel_types();
    if values.len() != types.len() {
        return Err(CodecError::ChannelCountMismatch {
            record_id: record.id(),
            expected: types.len(),
            actual: values.len(),
        });
    }
    for (index, (value, &expected)) in values.iter().zip(types).enumerate() {
        let actual = value.value_type();
        if actual != expected {
            return Err(CodecError::ValueTypeMismatch {
                index,
                expected,
                actual,
            });
        }
        check_label(record, index, *value)?;
    }
    Ok(())
}

/// Unsigned values on a channel with labels must name one of them.
fn check_label(record: &Record, index: usize, value: Value) -> Result<()> {
    let Value::Unsigned(value) = value else {
        return Ok(());
    };
    let labels = record.channels()[index].labels();
    if !labels.is_empty() && value as usize >= labels.len() {
        return Err(CodecError::LabelOutOfRange {
            index,
            value,
            labels: labels.len(),
        });
    }
    Ok(())
}

fn check_millisecs(millis: u32) -> Result<u32> {
    if millis > MAX_MILLISECS {
        return Err(CodecError::MillisecondsOutOfRange(millis));
    }
    Ok(millis)
}

fn put_value(dst: &mut BytesMut, value: &Value) {
    dst.put_u8(value.value_type().tag());
    match *value {
        Value::Double(v) => dst.put_f64_le(v),
        Value::Unsigned(v) => put_varint(dst, v),
        Value::Signed(v) => put_varint(dst, zigzag_encode(v)),
    }
}

fn get_value(src: &mut &[u8], value_type: ValueType) -> Result<Value> {
    Ok(match value_type {
        ValueType::Double => Value::Double(get_f64(src)?),
        ValueType::Unsigned => Value::Unsigned(get_varint(src)?),
        ValueType::Signed => Value::Signed(zigzag_decode(get_varint(src)?)),
    })
}

fn encoded_len(update: &Update) -> usize {
    let values: usize = update
        .values
        .iter()
        .map(|value| {
            1 + match *value {
                Value::Double(_) => 8,
                Value::Unsigned(v) => varint_len(v),
                Value::Signed(v) => varint_len(zigzag_encode(v)),
            }
        })
        .sum();
    varint_len(update.record_id)
        + 1
        + update.elapsed_days.map_or(0, varint_len)
        + varint_len(update.elapsed_seconds)
        + update.elapsed_millisecs.map_or(0, varint_len)
        + values
}

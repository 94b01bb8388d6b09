use tsarchive_codec::Value;
use tsarchive_schema::{Channel, ValueType};

use crate::error::{ProducerError, Result};

/// A value supplied for one named channel.
///
/// Numeric samples are converted to the channel's declared type: integers
/// widen to doubles, and conversions into an integer channel must be exact.
/// A `Label` is only valid for an enumerated channel and is sent as the
/// label's index.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Double(f64),
    Unsigned(u32),
    Signed(i32),
    Label(String),
}

impl Sample {
    pub(crate) fn resolve(&self, channel: &Channel) -> Result<Value> {
        let value = match self {
            Sample::Double(v) => Value::Double(*v),
            Sample::Unsigned(v) => Value::Unsigned(*v),
            Sample::Signed(v) => Value::Signed(*v),
            Sample::Label(label) => {
                return channel
                    .label_index(label)
                    .map(Value::Unsigned)
                    .ok_or_else(|| ProducerError::InvalidLabel {
                        channel: channel.name().to_string(),
                        label: label.clone(),
                    });
            }
        };
        coerce(value, channel.value_type()).ok_or_else(|| ProducerError::SampleOutOfRange {
            channel: channel.name().to_string(),
            expected: channel.value_type(),
        })
    }
}

fn coerce(value: Value, value_type: ValueType) -> Option<Value> {
    match (value_type, value) {
        (ValueType::Double, Value::Double(v)) => Some(Value::Double(v)),
        (ValueType::Double, Value::Unsigned(v)) => Some(Value::Double(f64::from(v))),
        (ValueType::Double, Value::Signed(v)) => Some(Value::Double(f64::from(v))),
        (ValueType::Unsigned, Value::Unsigned(v)) => Some(Value::Unsigned(v)),
        (ValueType::Unsigned, Value::Signed(v)) => u32::try_from(v).ok().map(Value::Unsigned),
        (ValueType::Unsigned, Value::Double(v)) => {
            exact_integer(v, 0.0, f64::from(u32::MAX)).map(|v| Value::Unsigned(v as u32))
        }
        (ValueType::Signed, Value::Signed(v)) => Some(Value::Signed(v)),
        (ValueType::Signed, Value::Unsigned(v)) => i32::try_from(v).ok().map(Value::Signed),
        (ValueType::Signed, Value::Double(v)) => {
            exact_integer(v, f64::from(i32::MIN), f64::from(i32::MAX))
                .map(|v| Value::Signed(v as i32))
        }
    }
}

// NaN and infinities have a non-zero fractional part.
fn exact_integer(v: f64, min: f64, max: f64) -> Option<f64> {
    (v.fract() == 0.0 && (min..=max).contains(&v)).then_some(v)
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Double(value)
    }
}

impl From<u32> for Sample {
    fn from(value: u32) -> Self {
        Sample::Unsigned(value)
    }
}

impl From<i32> for Sample {
    fn from(value: i32) -> Self {
        Sample::Signed(value)
    }
}

impl From<&str> for Sample {
    fn from(value: &str) -> Self {
        Sample::Label(value.to_string())
    }
}

impl From<String> for Sample {
    fn from(value: String) -> Self {
        Sample::Label(value)
    }
}

impl From<Value> for Sample {
    fn from(value: Value) -> Self {
        match value {
            Value::Double(v) => Sample::Double(v),
            Value::Unsigned(v) => Sample::Unsigned(v),
            Value::Signed(v) => Sample::Signed(v),
        }
    }
}

use tsarchive_schema::ValueType;

/// One sampled value. Exactly one variant is ever populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Double(f64),
    Unsigned(u32),
    Signed(i32),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Double(_) => ValueType::Double,
            Value::Unsigned(_) => ValueType::Unsigned,
            Value::Signed(_) => ValueType::Signed,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Unsigned(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Signed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_reports_its_type() {
        assert_eq!(Value::from(1.5).value_type(), ValueType::Double);
        assert_eq!(Value::from(7u32).value_type(), ValueType::Unsigned);
        assert_eq!(Value::from(-7i32).value_type(), ValueType::Signed);
    }
}

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use super::sql_values::{
    SqlDate, SqlDecimal, SqlIntervalDayTime, SqlIntervalYearMonth, SqlTime, SqlTimeWithTimeZone,
    SqlTimestamp, SqlTimestampWithTimeZone,
};

pub const POSITIVE_INFINITY: &str = "Infinity";
pub const NEGATIVE_INFINITY: &str = "-Infinity";
pub const NOT_A_NUMBER: &str = "NaN";

/// Decoded form of a single non-text column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    HugeInt(i128),
    Real(f32),
    Double(f64),
    Number(Decimal),
    Date(SqlDate),
    Time(SqlTime),
    TimeWithTimeZone(SqlTimeWithTimeZone),
    Timestamp(SqlTimestamp),
    TimestampWithTimeZone(SqlTimestampWithTimeZone),
    IntervalYearMonth(SqlIntervalYearMonth),
    IntervalDayTime(SqlIntervalDayTime),
    Decimal(SqlDecimal),
    Varbinary(Vec<u8>),
    Varchar(String),
    Array(Vec<Value>),
    /// Entries in insertion order.
    Map(Vec<(Value, Value)>),
    /// Extension values written through serde.
    Opaque(JsonValue),
}

/// Sentinel text for non-finite floats, `None` when finite.
pub fn non_finite_literal(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NOT_A_NUMBER)
    } else if value == f64::INFINITY {
        Some(POSITIVE_INFINITY)
    } else if value == f64::NEG_INFINITY {
        Some(NEGATIVE_INFINITY)
    } else {
        None
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text used when this value is a map key.
    pub fn to_key_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::TinyInt(v) => itoa::Buffer::new().format(*v).to_string(),
            Value::SmallInt(v) => itoa::Buffer::new().format(*v).to_string(),
            Value::Integer(v) => itoa::Buffer::new().format(*v).to_string(),
            Value::BigInt(v) => itoa::Buffer::new().format(*v).to_string(),
            Value::HugeInt(v) => itoa::Buffer::new().format(*v).to_string(),
            Value::Real(v) => match non_finite_literal(*v as f64) {
                Some(literal) => literal.to_string(),
                None => ryu::Buffer::new().format_finite(*v).to_string(),
            },
            Value::Double(v) => match non_finite_literal(*v) {
                Some(literal) => literal.to_string(),
                None => ryu::Buffer::new().format_finite(*v).to_string(),
            },
            Value::Number(d) => d.to_string(),
            Value::Date(v) => v.to_string(),
            Value::Time(v) => v.to_string(),
            Value::TimeWithTimeZone(v) => v.to_string(),
            Value::Timestamp(v) => v.to_string(),
            Value::TimestampWithTimeZone(v) => v.to_string(),
            Value::IntervalYearMonth(v) => v.to_string(),
            Value::IntervalDayTime(v) => v.to_string(),
            Value::Decimal(v) => v.to_string(),
            Value::Varbinary(bytes) => BASE64_STANDARD.encode(bytes),
            Value::Varchar(s) => s.clone(),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_key_string).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_key_string(), v.to_key_string()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Opaque(json) => json.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::BigInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

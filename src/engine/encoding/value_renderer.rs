use std::io::Write;

use crate::engine::encoding::JsonWriter;
use crate::engine::errors::EncodeError;
use crate::engine::types::{Value, non_finite_literal};

/// Writes one decoded value. Non-finite floats become string sentinels
/// (`"Infinity"`, `"-Infinity"`, `"NaN"`) since JSON numbers cannot carry them.
pub fn render<W: Write>(generator: &mut JsonWriter<W>, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Null => generator.write_null(),
        Value::Boolean(b) => generator.write_boolean(*b),
        Value::Real(v) => match non_finite_literal(*v as f64) {
            Some(literal) => generator.write_string(literal),
            None => generator.write_float(*v),
        },
        Value::Double(v) => match non_finite_literal(*v) {
            Some(literal) => generator.write_string(literal),
            None => generator.write_float(*v),
        },
        Value::TinyInt(v) => generator.write_integer(*v),
        Value::SmallInt(v) => generator.write_integer(*v),
        Value::Integer(v) => generator.write_integer(*v),
        Value::BigInt(v) => generator.write_integer(*v),
        Value::HugeInt(v) => generator.write_integer(*v),
        Value::Number(d) => generator.write_decimal(d),
        Value::Date(v) => generator.write_string(&v.to_string()),
        Value::Decimal(v) => generator.write_string(&v.to_string()),
        Value::IntervalDayTime(v) => generator.write_string(&v.to_string()),
        Value::IntervalYearMonth(v) => generator.write_string(&v.to_string()),
        Value::Time(v) => generator.write_string(&v.to_string()),
        Value::TimeWithTimeZone(v) => generator.write_string(&v.to_string()),
        Value::Timestamp(v) => generator.write_string(&v.to_string()),
        Value::TimestampWithTimeZone(v) => generator.write_string(&v.to_string()),
        Value::Varbinary(bytes) => generator.write_binary(bytes),
        Value::Varchar(s) => generator.write_string(s),
        Value::Array(items) => {
            generator.write_start_array()?;
            for item in items {
                render(generator, item)?;
            }
            generator.write_end_array()
        }
        Value::Map(entries) => {
            generator.write_start_object()?;
            for (key, entry) in entries {
                // JSON object keys are text, so every key type goes through its string form
                generator.write_field_name(&key.to_key_string())?;
                render(generator, entry)?;
            }
            generator.write_end_object()
        }
        Value::Opaque(json) => generator.write_serialized(json),
    }
}

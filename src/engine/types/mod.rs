use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::engine::errors::{EncodeError, TypeParseError};
use crate::engine::page::Block;

pub mod signature;
pub mod sql_values;
pub mod value;


pub use sql_values::{
    SqlDate, SqlDecimal, SqlIntervalDayTime, SqlIntervalYearMonth, SqlTime, SqlTimeWithTimeZone,
    SqlTimestamp, SqlTimestampWithTimeZone,
};
pub use value::{NEGATIVE_INFINITY, NOT_A_NUMBER, POSITIVE_INFINITY, Value, non_finite_literal};

/// Semantic type of an output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Varchar { length: Option<u32> },
    Char { length: u32 },
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal { precision: u8, scale: u8 },
    Date,
    Time { precision: u8 },
    TimeWithTimeZone { precision: u8 },
    Timestamp { precision: u8 },
    TimestampWithTimeZone { precision: u8 },
    IntervalYearMonth,
    IntervalDayTime,
    Varbinary,
    Array(Box<ValueType>),
    Map(Box<ValueType>, Box<ValueType>),
    Opaque { name: String },
}

impl ValueType {
    pub fn varchar() -> Self {
        ValueType::Varchar { length: None }
    }

    pub fn array(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    pub fn map(key: ValueType, value: ValueType) -> Self {
        ValueType::Map(Box::new(key), Box::new(value))
    }

    /// Text types take the raw byte path instead of being decoded to a `Value`.
    pub fn is_text(&self) -> bool {
        matches!(self, ValueType::Varchar { .. } | ValueType::Char { .. })
    }

    /// Raw UTF-8 bytes of a text value; `char(n)` values are space padded.
    pub fn slice<'a>(
        &self,
        block: &'a Block,
        position: usize,
    ) -> Result<Cow<'a, [u8]>, EncodeError> {
        match self {
            ValueType::Varchar { .. } => Ok(Cow::Borrowed(block.slice(position)?)),
            ValueType::Char { length } => Ok(pad_spaces(block.slice(position)?, *length)),
            other => Err(EncodeError::BlockTypeMismatch {
                expected: other.to_string(),
                found: block.layout_name(),
            }),
        }
    }

    /// Decodes one position into its generic value form.
    pub fn object_value(&self, block: &Block, position: usize) -> Result<Value, EncodeError> {
        if block.is_null(position) {
            return Ok(Value::Null);
        }
        let value = match self {
            ValueType::Varchar { .. } | ValueType::Char { .. } => {
                let bytes = self.slice(block, position)?;
                Value::Varchar(String::from_utf8_lossy(&bytes).into_owned())
            }
            ValueType::Boolean => Value::Boolean(block.get_boolean(position)?),
            ValueType::TinyInt => Value::TinyInt(block.get_byte(position)?),
            ValueType::SmallInt => Value::SmallInt(block.get_short(position)?),
            ValueType::Integer => Value::Integer(block.get_int(position)?),
            ValueType::BigInt => Value::BigInt(block.get_long(position)?),
            ValueType::Real => Value::Real(block.get_real(position)?),
            ValueType::Double => Value::Double(block.get_double(position)?),
            ValueType::Decimal { precision, scale } => Value::Decimal(SqlDecimal {
                unscaled: block.get_wide(position)?,
                precision: *precision,
                scale: *scale,
            }),
            ValueType::Date => Value::Date(SqlDate(block.get_int(position)?)),
            ValueType::Time { precision } => Value::Time(SqlTime {
                picos: block.get_long(position)?,
                precision: *precision,
            }),
            ValueType::TimeWithTimeZone { precision } => {
                let (picos, offset_minutes) = block.get_time_with_offset(position)?;
                Value::TimeWithTimeZone(SqlTimeWithTimeZone {
                    picos,
                    offset_minutes,
                    precision: *precision,
                })
            }
            ValueType::Timestamp { precision } => Value::Timestamp(SqlTimestamp {
                epoch_micros: block.get_long(position)?,
                precision: *precision,
            }),
            ValueType::TimestampWithTimeZone { precision } => {
                let (epoch_millis, zone) = block.get_zoned_timestamp(position)?;
                Value::TimestampWithTimeZone(SqlTimestampWithTimeZone {
                    epoch_millis,
                    zone,
                    precision: *precision,
                })
            }
            ValueType::IntervalYearMonth => {
                Value::IntervalYearMonth(SqlIntervalYearMonth(block.get_int(position)?))
            }
            ValueType::IntervalDayTime => {
                Value::IntervalDayTime(SqlIntervalDayTime(block.get_long(position)?))
            }
            ValueType::Varbinary => Value::Varbinary(block.slice(position)?.to_vec()),
            ValueType::Array(element_type) => {
                let (elements, range) = block.get_array(position)?;
                let items = range
                    .map(|p| element_type.object_value(elements, p))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Array(items)
            }
            ValueType::Map(key_type, value_type) => {
                let (keys, values, range) = block.get_map(position)?;
                let entries = range
                    .map(|p| -> Result<(Value, Value), EncodeError> {
                        Ok((
                            key_type.object_value(keys, p)?,
                            value_type.object_value(values, p)?,
                        ))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Map(entries)
            }
            ValueType::Opaque { .. } => block.get_object(position)?.clone(),
        };
        Ok(value)
    }
}

/// Right-pads `bytes` with spaces to `length` code points.
pub fn pad_spaces(bytes: &[u8], length: u32) -> Cow<'_, [u8]> {
    let code_points = bytes.iter().filter(|b| (**b & 0xC0) != 0x80).count();
    let length = length as usize;
    if code_points >= length {
        return Cow::Borrowed(bytes);
    }
    let mut padded = Vec::with_capacity(bytes.len() + length - code_points);
    padded.extend_from_slice(bytes);
    padded.resize(bytes.len() + length - code_points, b' ');
    Cow::Owned(padded)
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Varchar { length: None } => f.write_str("varchar"),
            ValueType::Varchar { length: Some(n) } => write!(f, "varchar({})", n),
            ValueType::Char { length } => write!(f, "char({})", length),
            ValueType::Boolean => f.write_str("boolean"),
            ValueType::TinyInt => f.write_str("tinyint"),
            ValueType::SmallInt => f.write_str("smallint"),
            ValueType::Integer => f.write_str("integer"),
            ValueType::BigInt => f.write_str("bigint"),
            ValueType::Real => f.write_str("real"),
            ValueType::Double => f.write_str("double"),
            ValueType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)
            }
            ValueType::Date => f.write_str("date"),
            ValueType::Time { precision } => write!(f, "time({})", precision),
            ValueType::TimeWithTimeZone { precision } => {
                write!(f, "time({}) with time zone", precision)
            }
            ValueType::Timestamp { precision } => write!(f, "timestamp({})", precision),
            ValueType::TimestampWithTimeZone { precision } => {
                write!(f, "timestamp({}) with time zone", precision)
            }
            ValueType::IntervalYearMonth => f.write_str("interval year to month"),
            ValueType::IntervalDayTime => f.write_str("interval day to second"),
            ValueType::Varbinary => f.write_str("varbinary"),
            ValueType::Array(element) => write!(f, "array({})", element),
            ValueType::Map(key, value) => write!(f, "map({}, {})", key, value),
            ValueType::Opaque { name } => f.write_str(name),
        }
    }
}

impl FromStr for ValueType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        signature::parse_type_signature(s)
    }
}

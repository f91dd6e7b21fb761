use std::io::Read;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::engine::errors::RowSetError;
use crate::engine::page::{Block, OutputColumn, Page};
use crate::engine::types::sql_values::{PICOSECONDS_PER_SECOND, UNIX_EPOCH_DAYS_FROM_CE};
use crate::engine::types::{
    NEGATIVE_INFINITY, NOT_A_NUMBER, POSITIVE_INFINITY, Value, ValueType,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const MAX_OFFSET_MINUTES: i16 = 14 * 60;

#[derive(Debug, Deserialize)]
struct RowSetDocument {
    columns: Vec<ColumnDocument>,
    #[serde(default)]
    rows: Vec<Vec<JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct ColumnDocument {
    name: String,
    #[serde(rename = "type")]
    type_signature: String,
}

/// Output columns plus the pages holding their values.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub columns: Vec<OutputColumn>,
    pub pages: Vec<Page>,
}

/// Builds pages from a JSON document of the form
/// `{"columns": [{"name": "id", "type": "bigint"}], "rows": [[1], [2]]}`.
pub struct RowSetLoader {
    rows_per_page: usize,
}

impl RowSetLoader {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn load<R: Read>(&self, reader: R) -> Result<RowSet, RowSetError> {
        let document: RowSetDocument = serde_json::from_reader(reader)?;
        self.build(document)
    }

    pub fn load_str(&self, input: &str) -> Result<RowSet, RowSetError> {
        let document: RowSetDocument = serde_json::from_str(input)?;
        self.build(document)
    }

    fn build(&self, document: RowSetDocument) -> Result<RowSet, RowSetError> {
        let columns = document
            .columns
            .into_iter()
            .enumerate()
            .map(|(channel, column)| {
                let value_type = ValueType::from_str(&column.type_signature)?;
                Ok(OutputColumn::new(column.name, channel, value_type))
            })
            .collect::<Result<Vec<_>, RowSetError>>()?;

        for (row, values) in document.rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(RowSetError::RowWidth {
                    row,
                    expected: columns.len(),
                    got: values.len(),
                });
            }
        }

        let mut pages = Vec::new();
        for chunk in document.rows.chunks(self.rows_per_page) {
            let blocks = columns
                .iter()
                .map(|column| {
                    let values: Vec<&JsonValue> = chunk
                        .iter()
                        .map(|row| &row[column.source_page_channel])
                        .collect();
                    build_block(&column.value_type, &values)
                })
                .collect::<Result<Vec<_>, _>>()?;
            pages.push(Page::new(blocks)?);
        }

        debug!(
            target: "page::loader",
            columns = columns.len(),
            rows = document.rows.len(),
            pages = pages.len(),
            "Loaded row set"
        );

        Ok(RowSet { columns, pages })
    }
}

fn conversion_error(value: &JsonValue, value_type: &ValueType) -> RowSetError {
    RowSetError::Conversion {
        value: value.to_string(),
        value_type: value_type.to_string(),
    }
}

fn convert<T, F>(
    values: &[&JsonValue],
    value_type: &ValueType,
    f: F,
) -> Result<Vec<Option<T>>, RowSetError>
where
    F: Fn(&JsonValue) -> Option<T>,
{
    values
        .iter()
        .map(|value| {
            if value.is_null() {
                Ok(None)
            } else {
                f(value)
                    .map(Some)
                    .ok_or_else(|| conversion_error(value, value_type))
            }
        })
        .collect()
}

fn build_block(value_type: &ValueType, values: &[&JsonValue]) -> Result<Block, RowSetError> {
    let block = match value_type {
        ValueType::Varchar { .. } | ValueType::Char { .. } => Block::strings(convert(
            values,
            value_type,
            |v| v.as_str().map(str::to_owned),
        )?),
        ValueType::Boolean => Block::booleans(convert(values, value_type, JsonValue::as_bool)?),
        ValueType::TinyInt => Block::tinyints(convert(values, value_type, |v| {
            v.as_i64().and_then(|n| i8::try_from(n).ok())
        })?),
        ValueType::SmallInt => Block::smallints(convert(values, value_type, |v| {
            v.as_i64().and_then(|n| i16::try_from(n).ok())
        })?),
        ValueType::Integer | ValueType::IntervalYearMonth => {
            Block::ints(convert(values, value_type, |v| {
                v.as_i64().and_then(|n| i32::try_from(n).ok())
            })?)
        }
        ValueType::BigInt | ValueType::IntervalDayTime => {
            Block::longs(convert(values, value_type, JsonValue::as_i64)?)
        }
        ValueType::Real => Block::reals(convert(values, value_type, |v| {
            parse_float(v).map(|f| f as f32)
        })?),
        ValueType::Double => Block::doubles(convert(values, value_type, parse_float)?),
        ValueType::Decimal { precision, scale } => {
            Block::int128s(convert(values, value_type, |v| {
                parse_unscaled_decimal(v, *precision, *scale)
            })?)
        }
        ValueType::Date => Block::ints(convert(values, value_type, |v| {
            v.as_str().and_then(parse_date)
        })?),
        ValueType::Time { .. } => Block::longs(convert(values, value_type, |v| {
            v.as_str().and_then(parse_time_picos)
        })?),
        ValueType::TimeWithTimeZone { .. } => {
            Block::times_with_offset(convert(values, value_type, |v| {
                v.as_str().and_then(parse_time_with_offset)
            })?)
        }
        ValueType::Timestamp { .. } => Block::longs(convert(values, value_type, |v| {
            v.as_str().and_then(parse_timestamp_micros)
        })?),
        ValueType::TimestampWithTimeZone { .. } => {
            Block::zoned_timestamps(convert(values, value_type, |v| {
                v.as_str().and_then(parse_zoned_timestamp)
            })?)
        }
        ValueType::Varbinary => Block::strings(convert(values, value_type, |v| {
            v.as_str().and_then(|s| BASE64_STANDARD.decode(s).ok())
        })?),
        ValueType::Array(element_type) => {
            let mut lengths = Vec::with_capacity(values.len());
            let mut elements: Vec<&JsonValue> = Vec::new();
            for value in values {
                match value {
                    JsonValue::Null => lengths.push(None),
                    JsonValue::Array(items) => {
                        lengths.push(Some(items.len()));
                        elements.extend(items.iter());
                    }
                    other => return Err(conversion_error(other, value_type)),
                }
            }
            Block::arrays(build_block(element_type, &elements)?, lengths)?
        }
        ValueType::Map(key_type, value_type_inner) => {
            let mut lengths = Vec::with_capacity(values.len());
            let mut keys: Vec<JsonValue> = Vec::new();
            let mut entries: Vec<&JsonValue> = Vec::new();
            for value in values {
                match value {
                    JsonValue::Null => lengths.push(None),
                    JsonValue::Object(object) => {
                        lengths.push(Some(object.len()));
                        for (key, entry) in object {
                            keys.push(map_key_json(key_type, key));
                            entries.push(entry);
                        }
                    }
                    other => return Err(conversion_error(other, value_type)),
                }
            }
            let key_refs: Vec<&JsonValue> = keys.iter().collect();
            Block::maps(
                build_block(key_type, &key_refs)?,
                build_block(value_type_inner, &entries)?,
                lengths,
            )?
        }
        ValueType::Opaque { .. } => Block::objects(values.iter().map(|v| {
            if v.is_null() {
                Value::Null
            } else {
                Value::Opaque((*v).clone())
            }
        })),
    };
    Ok(block)
}

/// Object keys are always text in JSON; non-text key types read them back as JSON literals.
fn map_key_json(key_type: &ValueType, key: &str) -> JsonValue {
    if key_type.is_text() {
        return JsonValue::String(key.to_string());
    }
    serde_json::from_str(key).unwrap_or_else(|_| JsonValue::String(key.to_string()))
}

fn parse_float(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => match s.as_str() {
            NOT_A_NUMBER => Some(f64::NAN),
            POSITIVE_INFINITY => Some(f64::INFINITY),
            NEGATIVE_INFINITY => Some(f64::NEG_INFINITY),
            other => other.parse().ok(),
        },
        _ => None,
    }
}

/// Unscaled value of `value` at `scale`, rounding half away from zero.
/// Built from the digit strings directly so scales up to 38 survive.
fn parse_unscaled_decimal(value: &JsonValue, precision: u8, scale: u8) -> Option<i128> {
    let text = match value {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        _ => return None,
    };
    let plain = if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text).ok()?.to_string()
    } else {
        text
    };

    let (negative, digits) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain.strip_prefix('+').unwrap_or(&plain)),
    };
    let (integral, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if integral.is_empty() && fraction.is_empty() {
        return None;
    }
    if !integral.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let scale = scale as usize;
    let kept = &fraction[..fraction.len().min(scale)];
    let mut unscaled: i128 = 0;
    for digit in integral.bytes().chain(kept.bytes()) {
        unscaled = unscaled
            .checked_mul(10)?
            .checked_add(i128::from(digit - b'0'))?;
    }
    unscaled = unscaled.checked_mul(10i128.checked_pow((scale - kept.len()) as u32)?)?;
    if fraction.as_bytes().get(scale).is_some_and(|d| *d >= b'5') {
        unscaled = unscaled.checked_add(1)?;
    }

    if unscaled >= 10i128.checked_pow(precision as u32)? {
        return None;
    }
    Some(if negative { -unscaled } else { unscaled })
}

fn parse_date(text: &str) -> Option<i32> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
}

fn parse_time_picos(text: &str) -> Option<i64> {
    let time = NaiveTime::parse_from_str(text, TIME_FORMAT).ok()?;
    Some(
        time.num_seconds_from_midnight() as i64 * PICOSECONDS_PER_SECOND
            + time.nanosecond() as i64 * 1_000,
    )
}

/// Offsets are `+HH:MM` / `-HH:MM` within +-14:00.
fn parse_time_with_offset(text: &str) -> Option<(i64, i16)> {
    let split = text.rfind(['+', '-'])?;
    let (time, offset) = text.split_at(split);
    let negative = offset.starts_with('-');
    let (hours, minutes) = offset[1..].split_once(':')?;
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours = hours.parse::<i16>().ok()?;
    let minutes = minutes.parse::<i16>().ok()?;
    if minutes >= 60 {
        return None;
    }
    let total = hours.checked_mul(60)?.checked_add(minutes)?;
    if total > MAX_OFFSET_MINUTES {
        return None;
    }
    Some((parse_time_picos(time)?, if negative { -total } else { total }))
}

fn parse_timestamp_micros(text: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()?;
    Some(naive.and_utc().timestamp_micros())
}

fn parse_zoned_timestamp(text: &str) -> Option<(i64, Tz)> {
    let (local, zone) = text.rsplit_once(' ')?;
    let zone = Tz::from_str(zone).ok()?;
    let naive = NaiveDateTime::parse_from_str(local, TIMESTAMP_FORMAT).ok()?;
    let instant = zone.from_local_datetime(&naive).earliest()?;
    Some((instant.timestamp_millis(), zone))
}

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;

pub const PICOSECONDS_PER_SECOND: i64 = 1_000_000_000_000;
pub const MICROSECONDS_PER_SECOND: i64 = 1_000_000;
pub const MILLISECONDS_PER_SECOND: i64 = 1_000;
pub const MILLISECONDS_PER_DAY: i64 = 86_400_000;
const SECONDS_PER_DAY: i64 = 86_400;
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Writes `fraction` (a value with `digits` decimal places) truncated or
/// zero-extended to `precision` places, preceded by a dot.
fn write_fraction(
    f: &mut fmt::Formatter<'_>,
    fraction: i64,
    digits: usize,
    precision: u8,
) -> fmt::Result {
    let precision = precision as usize;
    if precision == 0 {
        return Ok(());
    }
    let text = format!("{:0width$}", fraction, width = digits);
    if precision <= digits {
        write!(f, ".{}", &text[..precision])
    } else {
        write!(f, ".{}{}", text, "0".repeat(precision - digits))
    }
}

fn write_time_of_day(f: &mut fmt::Formatter<'_>, picos: i64, precision: u8) -> fmt::Result {
    let picos = picos.rem_euclid(SECONDS_PER_DAY * PICOSECONDS_PER_SECOND);
    let seconds = picos / PICOSECONDS_PER_SECOND;
    write!(
        f,
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )?;
    write_fraction(f, picos % PICOSECONDS_PER_SECOND, 12, precision)
}

/// Calendar date stored as days since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlDate(pub i32);

impl SqlDate {
    pub fn to_naive(self) -> Option<NaiveDate> {
        self.0
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
    }
}

impl fmt::Display for SqlDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive() {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Time of day in picoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlTime {
    pub picos: i64,
    pub precision: u8,
}

impl fmt::Display for SqlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_time_of_day(f, self.picos, self.precision)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlTimeWithTimeZone {
    pub picos: i64,
    pub offset_minutes: i16,
    pub precision: u8,
}

impl fmt::Display for SqlTimeWithTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_time_of_day(f, self.picos, self.precision)?;
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let offset = self.offset_minutes.unsigned_abs();
        write!(f, "{}{:02}:{:02}", sign, offset / 60, offset % 60)
    }
}

/// Timestamp without zone, microseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlTimestamp {
    pub epoch_micros: i64,
    pub precision: u8,
}

impl fmt::Display for SqlTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_micros(self.epoch_micros) {
            Some(ts) => {
                write!(f, "{}", ts.naive_utc().format("%Y-%m-%d %H:%M:%S"))?;
                write_fraction(
                    f,
                    self.epoch_micros.rem_euclid(MICROSECONDS_PER_SECOND),
                    6,
                    self.precision,
                )
            }
            None => write!(f, "{}", self.epoch_micros),
        }
    }
}

/// Instant in milliseconds since the epoch, rendered in its own zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlTimestampWithTimeZone {
    pub epoch_millis: i64,
    pub zone: Tz,
    pub precision: u8,
}

impl fmt::Display for SqlTimestampWithTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.zone.timestamp_millis_opt(self.epoch_millis).single() {
            Some(local) => {
                write!(f, "{}", local.format("%Y-%m-%d %H:%M:%S"))?;
                write_fraction(
                    f,
                    self.epoch_millis.rem_euclid(MILLISECONDS_PER_SECOND),
                    3,
                    self.precision,
                )?;
                write!(f, " {}", self.zone.name())
            }
            None => write!(f, "{} {}", self.epoch_millis, self.zone.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlIntervalYearMonth(pub i32);

impl fmt::Display for SqlIntervalYearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let months = self.0.unsigned_abs();
        write!(f, "{}{}-{}", sign, months / 12, months % 12)
    }
}

/// Day to second interval in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlIntervalDayTime(pub i64);

impl fmt::Display for SqlIntervalDayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let millis = self.0.unsigned_abs();
        let day_millis = MILLISECONDS_PER_DAY as u64;
        let days = millis / day_millis;
        let rest = millis % day_millis;
        let seconds = rest / 1000;
        write!(
            f,
            "{}{} {:02}:{:02}:{:02}.{:03}",
            sign,
            days,
            seconds / 3600,
            (seconds / 60) % 60,
            seconds % 60,
            rest % 1000
        )
    }
}

/// Fixed-point decimal rendered in plain notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlDecimal {
    pub unscaled: i128,
    pub precision: u8,
    pub scale: u8,
}

impl fmt::Display for SqlDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}", self.unscaled);
        }
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let digits = format!("{:0width$}", self.unscaled.unsigned_abs(), width = scale + 1);
        let (integral, fractional) = digits.split_at(digits.len() - scale);
        write!(f, "{}{}.{}", sign, integral, fractional)
    }
}

//! Timestamp humanization for `time` columns.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::InfluxcliError;

/// Name of the column that pretty mode rewrites.
pub const TIME_COLUMN: &str = "time";

/// The unit in which raw `time` values are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum TimePrecision {
    Seconds,
    #[default]
    Milliseconds,
    Microseconds,
}

impl TimePrecision {
    /// Short tag used on the wire and in the shell (`s`, `ms`, `u`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePrecision::Seconds => "s",
            TimePrecision::Milliseconds => "ms",
            TimePrecision::Microseconds => "u",
        }
    }

    fn units_per_second(&self) -> i64 {
        match self {
            TimePrecision::Seconds => 1,
            TimePrecision::Milliseconds => 1_000,
            TimePrecision::Microseconds => 1_000_000,
        }
    }
}

impl fmt::Display for TimePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePrecision {
    type Err = InfluxcliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "seconds" => Ok(TimePrecision::Seconds),
            "ms" | "milliseconds" => Ok(TimePrecision::Milliseconds),
            "u" | "us" | "microseconds" => Ok(TimePrecision::Microseconds),
            other => Err(InfluxcliError::Config(format!(
                "Unsupported time precision: '{}'. Supported precisions: s, ms, u",
                other
            ))),
        }
    }
}

impl TryFrom<String> for TimePrecision {
    type Error = InfluxcliError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Renders an epoch value at the given precision as a UTC calendar string.
///
/// Seconds render as `YYYY-MM-DD HH:MM:SS`, milliseconds append `.mmm` and
/// microseconds append `.ffffff`. The sub-second part is split off with
/// integer arithmetic, so the fractional digits are exact. Values chrono
/// cannot represent fall back to the raw integer text.
pub fn format_timestamp(raw: i64, precision: TimePrecision) -> String {
    let per_second = precision.units_per_second();
    let secs = raw.div_euclid(per_second);
    let fraction = raw.rem_euclid(per_second);

    let Some(datetime) = DateTime::<Utc>::from_timestamp(secs, 0) else {
        return raw.to_string();
    };
    let base = datetime.format("%Y-%m-%d %H:%M:%S");

    match precision {
        TimePrecision::Seconds => base.to_string(),
        TimePrecision::Milliseconds => format!("{}.{:03}", base, fraction),
        TimePrecision::Microseconds => format!("{}.{:06}", base, fraction),
    }
}

/// Formats a `time` cell. Integer values become timestamp strings, anything
/// else is returned unchanged.
pub fn format_time_value(value: &Value, precision: TimePrecision) -> Value {
    match value.as_i64() {
        Some(raw) => Value::String(format_timestamp(raw, precision)),
        None => value.clone(),
    }
}

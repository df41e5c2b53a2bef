//! Display helpers shared by the report and plot readouts.

use chrono::NaiveDateTime;

use crate::comparison::SliderReadout;
use crate::error::{Result, SectorError};

/// Diary date-time format used by journal `date` fields.
pub const FMT_DAY_TIME: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a journal date in [`FMT_DAY_TIME`].
pub fn parse_day_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, FMT_DAY_TIME).map_err(|e| SectorError::InvalidDate {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Format a journal date in [`FMT_DAY_TIME`].
pub fn format_day_time(date: &NaiveDateTime) -> String {
    date.format(FMT_DAY_TIME).to_string()
}

/// Format seconds as `h:mm:ss`, `m:ss` or `s`, dropping empty leading units.
///
/// Fractional seconds are rounded to the nearest whole second.
pub fn hms(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    let s = total % 60;
    let m = (total / 60) % 60;
    let h = total / 3600;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{}:{:02}", m, s)
    } else {
        format!("{}", s)
    }
}

/// Format a value with its units, e.g. `12.34 km`.
///
/// Times in seconds are shown via [`hms`].
pub fn value_units(value: f64, units: &str) -> String {
    match units {
        "s" => hms(value),
        "km" => format!("{:.2} {}", value, units),
        _ => format!("{:.0} {}", value, units),
    }
}

/// Gap label shown beside the comparison plot, e.g. `12.3s / 45.6m`.
pub fn readout_label(readout: &SliderReadout) -> String {
    format!("{:.1}s / {:.1}m", readout.time_gap, readout.distance_gap)
}

/// Serde adapter for journal dates in [`FMT_DAY_TIME`].
pub mod day_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_day_time(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day_time(&raw).map_err(serde::de::Error::custom)
    }
}

//! Activity series and piecewise-linear interpolation.
//!
//! Activity data arrives from the diary API in columnar form (`edt`: one array
//! each for elevation, distance and time). Plots and comparisons work on rows,
//! so [`Edt::zip`] turns the columns into [`Sample`]s.
//!
//! Aligning two activities means asking "where was this rider at distance d"
//! or "at time t". [`bracket`] finds the adjacent pair of samples around the
//! query by binary search and [`interpolate`] blends every numeric field of
//! that pair in proportion to the query's position between them.
//!
//! ## Example
//! ```rust
//! use sector_compare::series::{interpolate, Sample, SeriesKey};
//!
//! let samples = vec![
//!     Sample::new(0.0, 0.0, 100.0),
//!     Sample::new(60.0, 0.5, 110.0),
//!     Sample::new(120.0, 1.0, 105.0),
//! ];
//! let at = interpolate(&samples, 0.25, SeriesKey::Distance).unwrap();
//! assert_eq!(at.time, 30.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OptionExt, Result, SectorError};

/// Field used to locate a position within a series.
///
/// Both are monotonic along an activity, which is what makes binary search valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKey {
    Time,
    Distance,
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKey::Time => write!(f, "time"),
            SeriesKey::Distance => write!(f, "distance"),
        }
    }
}

/// A record that can be located by key and blended with a neighbour.
pub trait SeriesRecord: Clone {
    /// Value of the monotonic key field.
    fn key(&self, key: SeriesKey) -> f64;

    /// Weighted blend of every numeric field: `(self * w_self + other * w_other) / norm`.
    fn blend(&self, w_self: f64, other: &Self, w_other: f64, norm: f64) -> Self;
}

/// One row of an activity series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Elapsed time in seconds
    pub time: f64,
    /// Cumulative distance in km
    pub distance: f64,
    /// Elevation in metres
    pub elevation: f64,
}

impl Sample {
    pub fn new(time: f64, distance: f64, elevation: f64) -> Self {
        Self {
            time,
            distance,
            elevation,
        }
    }
}

impl SeriesRecord for Sample {
    fn key(&self, key: SeriesKey) -> f64 {
        match key {
            SeriesKey::Time => self.time,
            SeriesKey::Distance => self.distance,
        }
    }

    fn blend(&self, w_self: f64, other: &Self, w_other: f64, norm: f64) -> Self {
        let mix = |a: f64, b: f64| (a * w_self + b * w_other) / norm;
        Sample {
            time: mix(self.time, other.time),
            distance: mix(self.distance, other.distance),
            elevation: mix(self.elevation, other.elevation),
        }
    }
}

/// Columnar elevation / distance / time series, as served by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edt {
    #[serde(default)]
    pub elevation: Vec<f64>,
    #[serde(default)]
    pub distance: Vec<f64>,
    #[serde(default)]
    pub time: Vec<f64>,
}

impl Edt {
    /// Number of samples (length of the time column).
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Final elapsed time, if any samples exist.
    pub fn last_time(&self) -> Option<f64> {
        self.time.last().copied()
    }

    /// Final cumulative distance, if any samples exist.
    pub fn last_distance(&self) -> Option<f64> {
        self.distance.last().copied()
    }

    /// Transpose columns into rows.
    ///
    /// All three columns must have the same length.
    pub fn zip(&self) -> Result<Vec<Sample>> {
        let expected = self.time.len();
        for (column, found) in [
            ("elevation", self.elevation.len()),
            ("distance", self.distance.len()),
        ] {
            if found != expected {
                return Err(SectorError::RaggedSeries {
                    column: column.to_string(),
                    expected,
                    found,
                });
            }
        }

        Ok(self
            .time
            .iter()
            .zip(&self.distance)
            .zip(&self.elevation)
            .map(|((&t, &d), &e)| Sample::new(t, d, e))
            .collect())
    }
}

/// Adjacent pair of records surrounding a query value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index of the lower record
    pub lo: usize,
    /// Index of the upper record
    pub hi: usize,
    /// Key span between the two records
    pub norm: f64,
    /// Weight applied to the lower record (distance from query to upper key)
    pub lo_weight: f64,
    /// Weight applied to the upper record (distance from lower key to query)
    pub hi_weight: f64,
}

/// Locate the records surrounding `value` on `key`.
///
/// Records must be sorted ascending on `key`. A query outside the data range
/// converges on the first or last pair, so interpolation extrapolates.
pub fn bracket<R: SeriesRecord>(data: &[R], value: f64, key: SeriesKey) -> Result<Bracket> {
    let last = data.len().checked_sub(1).ok_or_empty_series(&key.to_string())?;

    let mut a = 0;
    let mut c = last;
    while c - a > 1 {
        let b = (0.5 + 0.5 * (a + c) as f64).floor() as usize;
        if data[b].key(key) > value {
            c = b;
        } else {
            a = b;
        }
    }

    let (ka, kc) = (data[a].key(key), data[c].key(key));
    Ok(Bracket {
        lo: a,
        hi: c,
        norm: kc - ka,
        lo_weight: kc - value,
        hi_weight: value - ka,
    })
}

/// Linearly interpolate all fields of `data` at `value` on `key`.
///
/// A zero-width bracket (single record, or repeated keys) yields the lower
/// record unchanged.
pub fn interpolate<R: SeriesRecord>(data: &[R], value: f64, key: SeriesKey) -> Result<R> {
    let b = bracket(data, value, key)?;
    log::trace!(
        "[Series] {}={} bracketed by {}..{} (weights {}/{})",
        key,
        value,
        b.lo,
        b.hi,
        b.lo_weight,
        b.hi_weight
    );

    if b.norm == 0.0 {
        return Ok(data[b.lo].clone());
    }
    Ok(data[b.lo].blend(b.lo_weight, &data[b.hi], b.hi_weight, b.norm))
}

//! Side-by-side comparison of two activities across a sector.
//!
//! The faster of the two activities drives a slider over its own distance.
//! At each slider position the slower activity is interpolated twice: at the
//! same elapsed time (how far behind it is) and at the same distance (how much
//! later it got there).
//!
//! ## Example
//! ```rust,ignore
//! let data = SectorData::from_json(&body)?;
//! let selection = Selection::initial(&data, Some("1234"))?;
//! let comparison = selection.comparison(&data)?;
//! let readout = comparison.at(0.5)?;
//! println!("{}", format::readout_label(&readout));
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{OptionExt, Result, SectorError};
use crate::journal::{SectorData, SectorJournal};
use crate::series::{interpolate, Sample, SeriesKey};

/// Index of the journal with the shortest elapsed time (first on ties).
pub fn fastest_index(journals: &[SectorJournal]) -> Option<usize> {
    journals
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, j)| {
            let time = j.elapsed();
            match best {
                Some((_, t)) if t <= time => best,
                _ => Some((i, time)),
            }
        })
        .map(|(i, _)| i)
}

/// Index of the journal the user navigated from, or 0 if it is not present.
///
/// `from` is the activity journal id carried on the sector link. Returns
/// `None` only when there are no journals at all.
pub fn source_index(journals: &[SectorJournal], from: Option<&str>) -> Option<usize> {
    if journals.is_empty() {
        return None;
    }
    let found = from
        .and_then(|f| f.trim().parse::<i64>().ok())
        .and_then(|db| journals.iter().position(|j| j.db == db));
    match found {
        Some(i) => Some(i),
        None => {
            warn!("[Comparison] Could not find from ({:?})", from);
            Some(0)
        }
    }
}

/// The two journals being compared, by payload index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub i: usize,
    pub j: usize,
}

impl Selection {
    /// Fastest journal against the one the user came from.
    pub fn initial(data: &SectorData, from: Option<&str>) -> Result<Self> {
        let journals = &data.sector_journals;
        let no_journals = || SectorError::NoJournals { sector: None };
        let i = fastest_index(journals).ok_or_else(no_journals)?;
        let j = source_index(journals, from).ok_or_else(no_journals)?;
        debug!("[Comparison] initial selection i={} j={}", i, j);
        Ok(Self { i, j })
    }

    pub fn comparison(&self, data: &SectorData) -> Result<Comparison> {
        Comparison::new(data.journal(self.i)?, data.journal(self.j)?)
    }
}

/// Position of the slower activity relative to the faster one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderReadout {
    /// Slider fraction in [0, 1]
    pub slider: f64,
    /// Fast activity at the slider position
    pub fast: Sample,
    /// Slow activity at the same elapsed time
    pub slow_at_time: Sample,
    /// Slow activity at the same distance
    pub slow_at_distance: Sample,
    /// Seconds the slow activity needs to reach the same distance
    pub time_gap: f64,
    /// Metres the slow activity trails by at the same time
    pub distance_gap: f64,
}

/// Two activities ordered into fast and slow, with shared plot extents.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub fast: Vec<Sample>,
    pub slow: Vec<Sample>,
    /// True when the first journal passed to [`Comparison::new`] is the fast one
    pub first_is_fast: bool,
    /// Lower plot bounds (distance and time anchored at zero)
    pub min: Sample,
    /// Upper plot bounds across both activities
    pub max: Sample,
}

impl Comparison {
    pub fn new(first: &SectorJournal, second: &SectorJournal) -> Result<Self> {
        let a = rows(first)?;
        let b = rows(second)?;
        let a_time = a.last().ok_or_empty_series("time")?.time;
        let b_time = b.last().ok_or_empty_series("time")?.time;

        let first_is_fast = a_time <= b_time;
        let (fast, slow) = if first_is_fast { (a, b) } else { (b, a) };

        let both = || fast.iter().chain(slow.iter());
        let min_elevation = both().map(|s| s.elevation).fold(f64::INFINITY, f64::min);
        let max = Sample {
            time: both().map(|s| s.time).fold(f64::NEG_INFINITY, f64::max),
            distance: both().map(|s| s.distance).fold(f64::NEG_INFINITY, f64::max),
            elevation: both().map(|s| s.elevation).fold(f64::NEG_INFINITY, f64::max),
        };
        let min = Sample::new(0.0, 0.0, min_elevation);

        Ok(Self {
            fast,
            slow,
            first_is_fast,
            min,
            max,
        })
    }

    /// Readout with the slider at `slider` (clamped to [0, 1]) of the fast distance.
    pub fn at(&self, slider: f64) -> Result<SliderReadout> {
        let slider = slider.clamp(0.0, 1.0);
        let total = self.fast.last().ok_or_empty_series("distance")?.distance;

        let fast = interpolate(&self.fast, slider * total, SeriesKey::Distance)?;
        let slow_at_time = interpolate(&self.slow, fast.time, SeriesKey::Time)?;
        let slow_at_distance = interpolate(&self.slow, fast.distance, SeriesKey::Distance)?;

        Ok(SliderReadout {
            slider,
            fast,
            slow_at_time,
            slow_at_distance,
            time_gap: slow_at_distance.time - fast.time,
            distance_gap: 1000.0 * (fast.distance - slow_at_time.distance),
        })
    }

    /// Readouts at each of the `steps + 1` slider stops `k / steps`.
    pub fn readouts(&self, steps: usize) -> Result<Vec<SliderReadout>> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|k| self.at(k as f64 / steps as f64))
            .collect()
    }
}

fn rows(journal: &SectorJournal) -> Result<Vec<Sample>> {
    if journal.zipped.len() == journal.edt.len() && !journal.zipped.is_empty() {
        Ok(journal.zipped.clone())
    } else {
        journal.edt.zip()
    }
}

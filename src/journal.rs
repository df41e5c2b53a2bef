//! Sector journals: the activities matched to a sector, and their ordering.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SectorError};
use crate::series::{Edt, Sample};

/// One activity matched to a sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorJournal {
    /// Database id of the activity journal
    pub db: i64,
    pub name: String,
    pub activity_group: String,
    #[serde(with = "crate::format::day_time")]
    pub date: NaiveDateTime,
    /// Sector distance in km
    pub distance: f64,
    /// Sector time in seconds
    pub time: f64,
    /// Elevation gain in metres
    #[serde(default)]
    pub elevation: f64,
    /// Observed series across the sector
    pub edt: Edt,
    /// Position in the original payload, stable across sorting
    #[serde(skip)]
    pub index: usize,
    /// Row form of `edt`, filled by [`SectorData::prepare`]
    #[serde(skip)]
    pub zipped: Vec<Sample>,
}

impl SectorJournal {
    /// Time at the end of the observed series (falls back to the journal total).
    pub fn elapsed(&self) -> f64 {
        self.edt.last_time().unwrap_or(self.time)
    }
}

/// Payload of `GET /api/sector/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorData {
    #[serde(default)]
    pub sector_journals: Vec<SectorJournal>,
}

impl SectorData {
    /// Decode a sector payload and prepare its journals.
    pub fn from_json(body: &str) -> Result<Self> {
        let data: SectorData = serde_json::from_str(body)?;
        data.prepare()
    }

    /// Number each journal with its payload position and zip its series.
    pub fn prepare(mut self) -> Result<Self> {
        for (i, journal) in self.sector_journals.iter_mut().enumerate() {
            log::debug!("[Journal] preparing {} / {}", journal.name, journal.db);
            journal.index = i;
            journal.zipped = journal.edt.zip()?;
        }
        Ok(self)
    }

    /// Journal at its original payload position.
    pub fn journal(&self, index: usize) -> Result<&SectorJournal> {
        self.sector_journals
            .get(index)
            .ok_or(SectorError::JournalIndex {
                index,
                len: self.sector_journals.len(),
            })
    }
}

/// Column a journal list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    ActivityGroup,
    Date,
    Distance,
    Time,
    Elevation,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Name,
        SortKey::ActivityGroup,
        SortKey::Date,
        SortKey::Distance,
        SortKey::Time,
        SortKey::Elevation,
    ];

    /// Dates list newest first; everything else ascending.
    pub fn default_reverse(self) -> bool {
        matches!(self, SortKey::Date)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::ActivityGroup => "activity_group",
            SortKey::Date => "date",
            SortKey::Distance => "distance",
            SortKey::Time => "time",
            SortKey::Elevation => "elevation",
        }
    }

    fn compare(self, a: &SectorJournal, b: &SectorJournal) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::ActivityGroup => a.activity_group.cmp(&b.activity_group),
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Distance => a.distance.total_cmp(&b.distance),
            SortKey::Time => a.time.total_cmp(&b.time),
            SortKey::Elevation => a.elevation.total_cmp(&b.elevation),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SectorError;

    fn from_str(s: &str) -> Result<Self> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SectorError::ConfigError {
                message: format!("unknown sort key '{}'", s),
            })
    }
}

/// Stable sort of journals by `key`, descending when `reverse`.
///
/// `index` is left untouched, so selections made by index survive a re-sort.
pub fn sort_journals(journals: &mut [SectorJournal], key: SortKey, reverse: bool) {
    journals.sort_by(|a, b| {
        let ord = key.compare(a, b);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// Sorted copy of `journals`, leaving the input order intact.
pub fn sorted(journals: &[SectorJournal], key: SortKey, reverse: bool) -> Vec<SectorJournal> {
    let mut copy = journals.to_vec();
    sort_journals(&mut copy, key, reverse);
    copy
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::format::parse_day_time;

    pub(crate) fn journal(
        db: i64,
        name: &str,
        date: &str,
        times: &[f64],
        distances: &[f64],
    ) -> SectorJournal {
        let elevation: Vec<f64> = (0..times.len()).map(|i| 100.0 + i as f64).collect();
        SectorJournal {
            db,
            name: name.to_string(),
            activity_group: if db % 2 == 0 { "road" } else { "mtb" }.to_string(),
            date: parse_day_time(date).unwrap(),
            distance: distances.last().copied().unwrap_or(0.0),
            time: times.last().copied().unwrap_or(0.0),
            elevation: elevation.last().copied().unwrap_or(0.0) - 100.0,
            edt: Edt {
                elevation,
                distance: distances.to_vec(),
                time: times.to_vec(),
            },
            index: 0,
            zipped: vec![],
        }
    }

    pub(crate) fn sample_data() -> SectorData {
        SectorData {
            sector_journals: vec![
                journal(
                    11,
                    "Morning loop",
                    "2020-05-01 07:00:00",
                    &[0.0, 100.0, 210.0],
                    &[0.0, 0.5, 1.02],
                ),
                journal(
                    12,
                    "Club run",
                    "2020-06-10 18:30:00",
                    &[0.0, 90.0, 185.0],
                    &[0.0, 0.5, 1.0],
                ),
                journal(
                    13,
                    "Commute",
                    "2019-11-02 08:15:00",
                    &[0.0, 120.0, 250.0, 260.0],
                    &[0.0, 0.5, 0.98, 1.01],
                ),
            ],
        }
        .prepare()
        .unwrap()
    }

    #[test]
    fn test_prepare_sets_index_and_rows() {
        let data = sample_data();
        for (i, j) in data.sector_journals.iter().enumerate() {
            assert_eq!(j.index, i);
            assert_eq!(j.zipped.len(), j.edt.len());
        }
        assert!(matches!(data.journal(7), Err(SectorError::JournalIndex { index: 7, len: 3 })));
    }

    #[test]
    fn test_from_json() {
        let body = r#"{"sector_journals": [{
            "db": 4, "name": "Hill", "activity_group": "road",
            "date": "2021-03-04 10:11:12", "distance": 1.2, "time": 300.0, "elevation": 45.0,
            "edt": {"elevation": [1, 2], "distance": [0, 1.2], "time": [0, 300]}
        }]}"#;
        let data = SectorData::from_json(body).unwrap();
        assert_eq!(data.sector_journals.len(), 1);
        assert_eq!(data.sector_journals[0].zipped[1].time, 300.0);
    }

    #[test]
    fn test_sort_numeric_non_decreasing() {
        let data = sample_data();
        for key in [SortKey::Distance, SortKey::Time, SortKey::Elevation] {
            let asc = sorted(&data.sector_journals, key, false);
            let desc = sorted(&data.sector_journals, key, true);
            let value = |j: &SectorJournal| match key {
                SortKey::Distance => j.distance,
                SortKey::Time => j.time,
                _ => j.elevation,
            };
            assert!(asc.windows(2).all(|w| value(&w[0]) <= value(&w[1])));
            assert!(desc.windows(2).all(|w| value(&w[0]) >= value(&w[1])));
        }
    }

    #[test]
    fn test_sort_strings_and_dates() {
        let data = sample_data();
        let by_name = sorted(&data.sector_journals, SortKey::Name, false);
        let names: Vec<_> = by_name.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["Club run", "Commute", "Morning loop"]);

        let by_date = sorted(&data.sector_journals, SortKey::Date, SortKey::Date.default_reverse());
        assert_eq!(by_date[0].db, 12);
        assert_eq!(by_date[2].db, 13);
        // payload positions are preserved through sorting
        assert_eq!(by_date[0].index, 1);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("activity_group".parse::<SortKey>().unwrap(), SortKey::ActivityGroup);
        assert!("speed".parse::<SortKey>().is_err());
    }
}

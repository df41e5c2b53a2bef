//! # Sector Compare
//!
//! Sector analysis for an activity diary: align activities that ride the same
//! route segment, rank them, and push diary edits back to the server.
//!
//! This library provides:
//! - Piecewise-linear interpolation over time / distance series
//! - Sortable sector journals with fastest / source selection
//! - Slider readouts of the time and distance gap between two activities
//! - A typed client for the diary server and a debounced statistics writer
//!
//! ## Features
//!
//! - **`http`** (default) - HTTP client and background statistics writer
//! - **`cli`** - `sector-report` command-line binary
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use sector_compare::{Comparison, SectorData, Selection};
//!
//! let body = r#"{"sector_journals": [
//!   {"db": 1, "name": "A", "activity_group": "road", "date": "2020-01-01 10:00:00",
//!    "distance": 1.0, "time": 100.0, "elevation": 5.0,
//!    "edt": {"elevation": [10, 15], "distance": [0, 1.0], "time": [0, 100]}},
//!   {"db": 2, "name": "B", "activity_group": "road", "date": "2020-01-02 10:00:00",
//!    "distance": 1.0, "time": 120.0, "elevation": 5.0,
//!    "edt": {"elevation": [10, 15], "distance": [0, 1.0], "time": [0, 120]}}
//! ]}"#;
//!
//! let data = SectorData::from_json(body).unwrap();
//! let selection = Selection::initial(&data, Some("2")).unwrap();
//! let readout = selection.comparison(&data).unwrap().at(0.5).unwrap();
//! assert!((readout.time_gap - 10.0).abs() < 1e-9);
//! ```

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, SectorError};

// Series rows and interpolation
pub mod series;
pub use series::{bracket, interpolate, Bracket, Edt, Sample, SeriesKey, SeriesRecord};

// Sector journals and sorting
pub mod journal;
pub use journal::{sort_journals, sorted, SectorData, SectorJournal, SortKey};

// Fast / slow comparison and slider readouts
pub mod comparison;
pub use comparison::{fastest_index, source_index, Comparison, Selection, SliderReadout};

// Display helpers
pub mod format;
pub use format::{hms, readout_label, FMT_DAY_TIME};

// Map polyline helpers
pub mod route;
pub use route::{Bounds, GpsPoint, SectorRoute};

// Jupyter template links
pub mod notebook;
pub use notebook::notebook_link;

// Client / writer configuration
pub mod config;
pub use config::{ClientConfig, WriterConfig};

// HTTP client for the diary server
#[cfg(feature = "http")]
pub mod api;
#[cfg(feature = "http")]
pub use api::SectorClient;

// Debounced statistics writer
#[cfg(feature = "http")]
pub mod writer;
#[cfg(feature = "http")]
pub use writer::{Statistics, StatisticsSink, StatisticsWriter, WriterHandle};

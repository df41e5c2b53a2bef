//! Unified error handling for the sector-compare library.
//!
//! Every fallible operation in the crate returns [`SectorError`], whether the
//! failure came from the series maths, payload decoding or the HTTP layer.

use std::fmt;

/// Unified error type for sector-compare operations.
#[derive(Debug, Clone)]
pub enum SectorError {
    /// Series has no samples to bracket or interpolate
    EmptySeries { key: String },
    /// Columnar series has columns of different lengths
    RaggedSeries {
        column: String,
        expected: usize,
        found: usize,
    },
    /// Sector payload contained no journals
    NoJournals { sector: Option<String> },
    /// Journal index out of range for the current payload
    JournalIndex { index: usize, len: usize },
    /// Journal date did not match the diary date format
    InvalidDate { value: String, message: String },
    /// HTTP/API error
    HttpError {
        message: String,
        status_code: Option<u16>,
    },
    /// Response body could not be decoded
    DecodeError { message: String },
    /// Configuration error
    ConfigError { message: String },
}

impl fmt::Display for SectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorError::EmptySeries { key } => {
                write!(f, "Cannot interpolate on '{}' over an empty series", key)
            }
            SectorError::RaggedSeries {
                column,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Column '{}' has {} values, expected {}",
                    column, found, expected
                )
            }
            SectorError::NoJournals { sector } => {
                if let Some(id) = sector {
                    write!(f, "Sector '{}' has no matching activities", id)
                } else {
                    write!(f, "Sector has no matching activities")
                }
            }
            SectorError::JournalIndex { index, len } => {
                write!(f, "Journal {} selected but only {} available", index, len)
            }
            SectorError::InvalidDate { value, message } => {
                write!(f, "Invalid journal date '{}': {}", value, message)
            }
            SectorError::HttpError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "HTTP error ({}): {}", code, message)
                } else {
                    write!(f, "HTTP error: {}", message)
                }
            }
            SectorError::DecodeError { message } => {
                write!(f, "Decode error: {}", message)
            }
            SectorError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for SectorError {}

impl From<serde_json::Error> for SectorError {
    fn from(e: serde_json::Error) -> Self {
        SectorError::DecodeError {
            message: e.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for SectorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return SectorError::DecodeError {
                message: e.to_string(),
            };
        }
        SectorError::HttpError {
            message: e.to_string(),
            status_code: e.status().map(|s| s.as_u16()),
        }
    }
}

/// Result type alias for sector-compare operations.
pub type Result<T> = std::result::Result<T, SectorError>;

/// Extension trait for converting Option to SectorError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an empty series error.
    fn ok_or_empty_series(self, key: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_empty_series(self, key: &str) -> Result<T> {
        self.ok_or_else(|| SectorError::EmptySeries {
            key: key.to_string(),
        })
    }
}

//! # Error Types Module
//!
//! Centralized error handling for the growth tracker.
//! Provides custom error types for each layer with proper context and error chaining.
//!
//! ## Error Types
//! - `ConfigError`: Configuration file I/O and parsing errors
//! - `ReferenceError`: Malformed growth reference data
//! - `StoreError`: Profile/measurement persistence failures
//! - `ValidationError`: User input rejected before it reaches the core
//! - `TrackerError`: Anything the tracker service can surface
//! - `ChartError`: Chart rendering failures
//!
//! The percentile and series functions never return errors. A missing
//! reference row is `None`, a zero-width bracket resolves to the lower value.

use std::fmt;

/// Errors that can occur during configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read config file
    ReadFailed(std::io::Error),
    /// Failed to write config file
    WriteFailed(std::io::Error),
    /// Failed to parse config file
    ParseFailed(toml::de::Error),
    /// Failed to serialize config
    SerializeFailed(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed(e) => {
                write!(f, "Failed to read config file: {}", e)
            }
            ConfigError::WriteFailed(e) => {
                write!(f, "Failed to write config file: {}", e)
            }
            ConfigError::ParseFailed(e) => {
                write!(f, "Failed to parse config file: {}", e)
            }
            ConfigError::SerializeFailed(e) => {
                write!(f, "Failed to serialize config: {}", e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadFailed(e) => Some(e),
            ConfigError::WriteFailed(e) => Some(e),
            ConfigError::ParseFailed(e) => Some(e),
            ConfigError::SerializeFailed(e) => Some(e),
        }
    }
}

/// Errors raised while loading a growth reference table
#[derive(Debug)]
pub enum ReferenceError {
    /// The asset is not valid JSON of the expected shape
    Parse(serde_json::Error),
    /// Top-level key other than `boys` / `girls`
    UnknownGender(String),
    /// Month key that is not a non-negative integer
    InvalidMonthKey(String),
    /// Percentile key that is not an integer rank in 0..=100
    InvalidPercentileKey(String),
    /// Reference weight that is not a finite positive number
    InvalidWeight { month: u32, rank: u8 },
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Parse(e) => write!(f, "Failed to parse reference table: {}", e),
            ReferenceError::UnknownGender(key) => {
                write!(f, "Unknown gender section in reference table: {}", key)
            }
            ReferenceError::InvalidMonthKey(key) => {
                write!(f, "Invalid month key in reference table: {}", key)
            }
            ReferenceError::InvalidPercentileKey(key) => {
                write!(f, "Invalid percentile key in reference table: {}", key)
            }
            ReferenceError::InvalidWeight { month, rank } => {
                write!(f, "Invalid reference weight at month {} percentile {}", month, rank)
            }
        }
    }
}

impl std::error::Error for ReferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReferenceError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors that can occur while reading or writing persisted data
#[derive(Debug)]
pub enum StoreError {
    /// Failed to read or write the backing file
    Io(std::io::Error),
    /// Stored blob could not be (de)serialized
    Serde(serde_json::Error),
    /// No measurement with this id
    NotFound { id: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage I/O failed: {}", e),
            StoreError::Serde(e) => write!(f, "Stored data is malformed: {}", e),
            StoreError::NotFound { id } => write!(f, "Measurement not found: {}", id),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serde(e) => Some(e),
            StoreError::NotFound { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e)
    }
}

/// Input rejected by the tracker before it reaches storage
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A measurement needs a profile to derive age from
    NoProfile,
    /// Profile name is blank
    EmptyName,
    /// Birth date lies after today
    BirthDateInFuture,
    /// Measurement dated before the birth date
    DateBeforeBirth,
    /// Measurement dated after today
    DateInFuture,
    /// Measurement dated past the two-year tracking window
    BeyondTrackedRange,
    /// Another measurement already exists on the target date
    DateTaken(chrono::NaiveDate),
    /// Weight, height or head circumference that is not > 0
    NonPositive { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoProfile => write!(f, "Create a profile before adding measurements"),
            ValidationError::EmptyName => write!(f, "Name is required"),
            ValidationError::BirthDateInFuture => write!(f, "Birth date cannot be in the future"),
            ValidationError::DateBeforeBirth => write!(f, "Date cannot be before the birth date"),
            ValidationError::DateInFuture => write!(f, "Date cannot be in the future"),
            ValidationError::BeyondTrackedRange => {
                write!(f, "Date is more than two years after the birth date")
            }
            ValidationError::DateTaken(date) => {
                write!(f, "Another measurement is already recorded on {}", date)
            }
            ValidationError::NonPositive { field } => write!(f, "{} must be positive", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the tracker service
#[derive(Debug)]
pub enum TrackerError {
    Store(StoreError),
    Validation(ValidationError),
    Reference(ReferenceError),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Store(e) => write!(f, "{}", e),
            TrackerError::Validation(e) => write!(f, "Invalid input: {}", e),
            TrackerError::Reference(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackerError::Store(e) => Some(e),
            TrackerError::Validation(e) => Some(e),
            TrackerError::Reference(e) => Some(e),
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(e: StoreError) -> Self {
        TrackerError::Store(e)
    }
}

impl From<ValidationError> for TrackerError {
    fn from(e: ValidationError) -> Self {
        TrackerError::Validation(e)
    }
}

impl From<ReferenceError> for TrackerError {
    fn from(e: ReferenceError) -> Self {
        TrackerError::Reference(e)
    }
}

/// Errors that can occur while drawing a chart
#[derive(Debug)]
pub enum ChartError {
    /// The plotting backend failed
    Render(String),
    /// Failed to write the rendered file
    WriteFailed(std::io::Error),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Render(msg) => write!(f, "Failed to render chart: {}", msg),
            ChartError::WriteFailed(e) => write!(f, "Failed to write chart: {}", e),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Render(_) => None,
            ChartError::WriteFailed(e) => Some(e),
        }
    }
}

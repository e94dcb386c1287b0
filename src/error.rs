//! Error types for the soil water balance model.

use std::path::PathBuf;

/// Error type for all fallible operations in the `swbm` crate.
#[derive(Debug, thiserror::Error)]
pub enum SwbmError {
    /// A model parameter cannot be used (zero capacity, non-finite value).
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The forcing series (or the requested run length) is empty.
    #[error("forcing series is empty")]
    EmptyForcing,

    /// More days were requested than the forcing supplies.
    #[error("requested {requested} days but forcing only has {available}")]
    ForcingTooShort { requested: usize, available: usize },

    /// Two series that must be index-aligned have different lengths.
    #[error("length mismatch for '{what}': expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A required column is absent from the raw input table.
    #[error("missing column '{name}'")]
    MissingColumn { name: String },

    /// A raw value could not be parsed.
    #[error("parse error at line {line}, column '{column}': {value:?}")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },

    /// A timestamp or date bound could not be parsed.
    #[error("invalid time: {value:?}")]
    InvalidTime { value: String },

    /// A forcing value is NaN or infinite.
    #[error("non-finite value in column '{column}' at row {row}")]
    NonFiniteInput { column: &'static str, row: usize },

    /// The simulation produced a non-finite quantity.
    #[error("non-finite {quantity} on day {day}")]
    NonFiniteState { day: usize, quantity: &'static str },

    /// A named parameter set is not present in a parameter file.
    #[error("parameter set '{name}' not found")]
    UnknownParameterSet { name: String },

    /// Underlying file I/O failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// A chart could not be rendered or saved.
    #[error("plot error on {}: {reason}", path.display())]
    Plot { path: PathBuf, reason: String },

    /// TOML parameter file could not be decoded.
    #[error("toml error: {reason}")]
    Toml { reason: String },
}

impl From<toml::de::Error> for SwbmError {
    fn from(e: toml::de::Error) -> Self {
        SwbmError::Toml {
            reason: e.to_string(),
        }
    }
}

impl SwbmError {
    pub(crate) fn io(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        SwbmError::Io {
            path: path.into(),
            reason: e.to_string(),
        }
    }
}

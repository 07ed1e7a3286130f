//! Error types for temperature-heatmap operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, mapping or rendering the heatmap.
///
/// Every variant is terminal for a render attempt: nothing is drawn once one
/// of these has been returned.
#[derive(Error, Debug)]
pub enum Error {
    /// Network/transport failure, or a payload that is not valid JSON.
    #[error("failed to fetch dataset from {url}: {message}")]
    Fetch {
        /// Source the dataset was requested from.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// Payload is JSON but does not have the expected shape.
    #[error("malformed dataset: {0}")]
    Schema(String),

    /// The dataset contains no monthly records.
    #[error("dataset contains no monthly records")]
    EmptyDataset,

    /// I/O error (input file, SVG output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// Invalid dimensions for the chart.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: f64,
        /// Height value.
        height: f64,
    },

    /// Scale domain error (e.g. empty band domain, value outside the domain).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),
}

impl Error {
    /// Build a [`Error::Fetch`] for `url`.
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch { url: url.into(), message: message.to_string() }
    }

    /// Build a [`Error::ConfigInvalid`] for `key`.
    pub fn config_invalid(key: &str, message: impl ToString) -> Self {
        Self::ConfigInvalid { key: key.to_string(), message: message.to_string() }
    }
}

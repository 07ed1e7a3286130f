//! Dataset loading.
//!
//! The dataset is a single JSON document:
//!
//! ```json
//! { "baseTemperature": 8.66,
//!   "monthlyVariance": [ { "year": 1753, "month": 1, "variance": -1.366 }, ... ] }
//! ```
//!
//! Loading is pure I/O plus shape validation; no values are transformed.

use crate::error::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One month's deviation from the baseline temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1-12.
    pub month: u8,
    /// Offset from the baseline in degrees Celsius.
    pub variance: f64,
}

impl TemperatureRecord {
    /// Create a record.
    #[must_use]
    pub const fn new(year: i32, month: u8, variance: f64) -> Self {
        Self { year, month, variance }
    }
}

/// Baseline temperature plus the ordered monthly records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "baseTemperature")]
    baseline: f64,
    #[serde(rename = "monthlyVariance")]
    records: Vec<TemperatureRecord>,
}

impl Dataset {
    /// Create a dataset from already-validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a record's month is outside 1-12.
    pub fn new(baseline: f64, records: Vec<TemperatureRecord>) -> Result<Self> {
        let dataset = Self { baseline, records };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the text is not JSON and [`Error::Schema`]
    /// if required fields are missing or mistyped.
    pub fn parse(json: &str) -> Result<Self> {
        Self::parse_from("<memory>", json)
    }

    /// Read and parse a dataset from a local file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as [`Dataset::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading dataset from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let dataset = Self::parse_from(&path.display().to_string(), &content)?;
        log_loaded(&dataset);
        Ok(dataset)
    }

    fn parse_from(source: &str, json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::fetch(source, format!("payload is not valid JSON: {e}")))?;

        let dataset: Self =
            serde_json::from_value(value).map_err(|e| Error::Schema(e.to_string()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<()> {
        if let Some((index, record)) =
            self.records.iter().enumerate().find(|(_, r)| !(1..=12).contains(&r.month))
        {
            return Err(Error::Schema(format!(
                "record {index} ({}): month {} is outside 1-12",
                record.year, record.month
            )));
        }
        Ok(())
    }

    /// Reference temperature the variances are relative to.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Monthly records in source order.
    #[must_use]
    pub fn records(&self) -> &[TemperatureRecord] {
        &self.records
    }

    /// Absolute temperature of a record: `baseline + variance`, unrounded.
    #[must_use]
    pub fn absolute_temperature(&self, record: &TemperatureRecord) -> f64 {
        self.baseline + record.variance
    }

    /// Number of monthly records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no monthly records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetch and parse the dataset from `url`.
///
/// There is no retry. Without a `timeout` the request waits indefinitely.
///
/// # Errors
///
/// Returns [`Error::Fetch`] on transport failures, non-success statuses or a
/// non-JSON body, and [`Error::Schema`] on a malformed document.
pub async fn load(url: &str, timeout: Option<Duration>) -> Result<Dataset> {
    info!("Fetching dataset from {url}");

    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(|e| Error::fetch(url, e))?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| Error::fetch(url, e))?;
    let body = response.text().await.map_err(|e| Error::fetch(url, e))?;

    let dataset = Dataset::parse_from(url, &body)?;
    log_loaded(&dataset);
    Ok(dataset)
}

fn log_loaded(dataset: &Dataset) {
    info!(
        "Loaded {} monthly records (base temperature {}℃)",
        dataset.len(),
        dataset.baseline()
    );
}

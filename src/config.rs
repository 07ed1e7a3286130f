//! Chart configuration.
//!
//! All layout constants live in an immutable [`ChartConfig`] that is handed to
//! the chart builder. Defaults reproduce the classic 1000x500 layout; a YAML
//! file may override any subset of fields.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default dataset location.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";

/// Upper bound on requested legend axis ticks.
pub const MAX_TICK_COUNT: usize = 50;

/// Upper bound on legend swatches.
pub const MAX_SWATCH_COUNT: usize = 100;

fn require_finite(key: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::config_invalid(key, format!("must be finite, got {value}")))
    }
}

fn require_positive(key: &str, value: f64) -> Result<()> {
    require_finite(key, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::config_invalid(key, format!("must be positive, got {value}")))
    }
}

fn require_count(key: &str, value: usize, max: usize) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::config_invalid(key, format!("must be between 1 and {max}, got {value}")))
    }
}

/// Space reserved around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    /// Top margin in pixels.
    pub top: f64,
    /// Right margin in pixels.
    pub right: f64,
    /// Bottom margin in pixels.
    pub bottom: f64,
    /// Left margin in pixels.
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self { top: 50.0, right: 20.0, bottom: 100.0, left: 80.0 }
    }
}

/// Color legend layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Number of color swatches.
    pub swatch_count: usize,
    /// Pixel width of the legend's linear scale.
    pub width: f64,
    /// Width of each swatch.
    pub swatch_width: f64,
    /// Height of each swatch.
    pub swatch_height: f64,
    /// Requested number of legend axis ticks.
    pub tick_count: usize,
    /// Offset of the legend group inside its box.
    pub inset: f64,
}

impl LegendConfig {
    /// Check swatch and tick settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        require_count("legend.swatch_count", self.swatch_count, MAX_SWATCH_COUNT)?;
        require_count("legend.tick_count", self.tick_count, MAX_TICK_COUNT)?;
        require_positive("legend.width", self.width)?;
        require_positive("legend.swatch_width", self.swatch_width)?;
        require_positive("legend.swatch_height", self.swatch_height)?;
        require_finite("legend.inset", self.inset)
    }
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            swatch_count: 4,
            width: 300.0,
            swatch_width: 60.0,
            swatch_height: 20.0,
            tick_count: 4,
            inset: 10.0,
        }
    }
}

/// Tooltip fade timings and placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Fade-in duration in milliseconds.
    pub fade_in_ms: u64,
    /// Opacity reached at the end of the fade-in.
    pub visible_opacity: f64,
    /// Fade-out duration in milliseconds.
    pub fade_out_ms: u64,
    /// Horizontal offset from the pointer.
    pub offset_x: f64,
    /// Vertical offset from the pointer.
    pub offset_y: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self { fade_in_ms: 200, visible_opacity: 0.9, fade_out_ms: 500, offset_x: 5.0, offset_y: -28.0 }
    }
}

impl TooltipConfig {
    /// Check opacity and placement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.visible_opacity) {
            return Err(Error::config_invalid(
                "tooltip.visible_opacity",
                format!("must be within [0, 1], got {}", self.visible_opacity),
            ));
        }
        require_finite("tooltip.offset_x", self.offset_x)?;
        require_finite("tooltip.offset_y", self.offset_y)
    }

    /// Fade-in duration.
    #[must_use]
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    /// Fade-out duration.
    #[must_use]
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Dataset URL.
    pub source_url: String,
    /// Plot area width.
    pub width: f64,
    /// Plot area height.
    pub height: f64,
    /// Margins around the plot area.
    pub margin: Margin,
    /// Legend layout.
    pub legend: LegendConfig,
    /// Tooltip behavior.
    pub tooltip: TooltipConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            width: 1000.0,
            height: 500.0,
            margin: Margin::default(),
            legend: LegendConfig::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails, or
    /// [`Error::InvalidDimensions`] if the plot area is not positive.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every layout value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the plot area is not a
    /// positive, finite size, and [`Error::ConfigInvalid`] for a negative or
    /// non-finite margin or a bad legend or tooltip value.
    pub fn validate(&self) -> Result<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        let margin = &self.margin;
        for (key, value) in [
            ("margin.top", margin.top),
            ("margin.right", margin.right),
            ("margin.bottom", margin.bottom),
            ("margin.left", margin.left),
        ] {
            require_finite(key, value)?;
            if value < 0.0 {
                return Err(Error::config_invalid(key, format!("must not be negative, got {value}")));
            }
        }

        self.legend.validate()?;
        self.tooltip.validate()
    }

    /// Full document width including margins.
    #[must_use]
    pub fn outer_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    /// Full document height including margins.
    #[must_use]
    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }
}

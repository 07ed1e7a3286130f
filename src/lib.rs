//! # Temperature Heatmap
//!
//! Monthly global land-surface temperature heatmap, rendered to standalone SVG.
//!
//! The pipeline fetches one JSON document (a baseline temperature plus a list
//! of monthly variances), derives the year, month and temperature domains,
//! maps every record to a colored cell and draws the chart with its axes,
//! a color legend and an optional hover tooltip.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use temperature_heatmap::prelude::*;
//!
//! let dataset = temperature_heatmap::dataset::load(DEFAULT_SOURCE_URL, None).await?;
//! let chart = HeatmapChart::new(dataset, &ChartConfig::default())?;
//! chart.render().write_to_file("heatmap.svg")?;
//! ```
//!
//! ## References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Brewer, C. A. (2003). ColorBrewer "RdYlBu" diverging scheme.

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the sequential color ramp.
pub mod color;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Chart configuration.
pub mod config;

// ============================================================================
// Data Modules
// ============================================================================

/// Dataset model, parsing and HTTP loading.
pub mod dataset;

/// Domain extraction.
pub mod domain;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Axis ticks and drawing.
pub mod axis;

/// Heatmap and legend.
pub mod plots;

/// Hover tooltip state machine.
pub mod tooltip;

/// Output encoders (SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for heatmap operations.
pub mod error;

pub use error::{Error, Result};

use std::time::Duration;

/// Fetch the dataset at `url` and build the chart.
///
/// # Errors
///
/// Returns a configuration error before any request is made, then any
/// loading or mapping error; see [`dataset::load`] and
/// [`plots::HeatmapChart::new`].
pub async fn chart_from_url(
    url: &str,
    config: &config::ChartConfig,
    timeout: Option<Duration>,
) -> Result<plots::HeatmapChart> {
    config.validate()?;
    let dataset = dataset::load(url, timeout).await?;
    plots::HeatmapChart::new(dataset, config)
}

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use temperature_heatmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::axis::{Axis, AxisTick, Orientation};
    pub use crate::color::{ColorRamp, Rgba};
    pub use crate::config::{ChartConfig, LegendConfig, Margin, TooltipConfig, DEFAULT_SOURCE_URL};
    pub use crate::dataset::{Dataset, TemperatureRecord};
    pub use crate::domain::Domain;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Rect};
    pub use crate::output::{DrawSink, SvgElement, SvgEncoder, SvgGroup, TextAnchor};
    pub use crate::plots::{HeatmapChart, HeatmapScales, Legend, RenderCell};
    pub use crate::scale::{BandScale, LinearScale, Scale, SequentialScale};
    pub use crate::tooltip::{TooltipController, TooltipPhase, TooltipState};
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::serve_once;

    const SAMPLE: &str = r#"{"baseTemperature": 8.0, "monthlyVariance": [
        {"year": 1900, "month": 1, "variance": -5.0},
        {"year": 1900, "month": 2, "variance": 2.0}]}"#;

    #[tokio::test]
    async fn test_chart_from_url() {
        let url = serve_once("200 OK", SAMPLE);
        let chart = chart_from_url(&url, &config::ChartConfig::default(), Some(Duration::from_secs(5)))
            .await
            .unwrap();

        assert_eq!(chart.cells().len(), 2);
        assert_eq!(chart.domain().value_range, (3.0, 10.0));
    }

    #[tokio::test]
    async fn test_chart_from_url_empty_dataset() {
        let url = serve_once("200 OK", r#"{"baseTemperature": 8.0, "monthlyVariance": []}"#);
        let err = chart_from_url(&url, &config::ChartConfig::default(), None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }

    #[tokio::test]
    async fn test_chart_from_url_rejects_config_before_fetch() {
        let mut config = config::ChartConfig::default();
        config.tooltip.visible_opacity = 2.0;

        // Nothing listens on the discard port; a fetch would fail differently.
        let err = chart_from_url("http://127.0.0.1:9/data.json", &config, None).await.unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_chart_from_url_server_error() {
        let url = serve_once("503 Service Unavailable", "");
        let err = chart_from_url(&url, &config::ChartConfig::default(), None).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }), "{err}");
    }
}

//! Plot types.
//!
//! The heatmap chart and its color legend.

mod heatmap;
mod legend;

pub use heatmap::{build_cells, HeatmapChart, HeatmapScales, RenderCell};
pub use legend::{Legend, LegendSwatch};

//! Monthly temperature heatmap.
//!
//! Years run along the x axis and months down the y axis; each record becomes
//! one cell colored by its absolute temperature. Building the cells is a pure
//! function of the dataset and the scales ([`build_cells`]); drawing them is a
//! separate step that feeds a [`DrawSink`].
//!
//! # References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.

use crate::axis::Axis;
use crate::color::Rgba;
use crate::config::ChartConfig;
use crate::dataset::Dataset;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::output::{DrawSink, SvgElement, SvgEncoder, SvgGroup, TextAnchor};
use crate::plots::legend::Legend;
use crate::scale::{BandScale, Scale, SequentialScale};
use crate::tooltip::{self, TooltipController};
use log::{debug, warn};
use std::collections::HashSet;
use std::time::Duration;

/// Distance between the bottom of the plot and the top of the legend box.
const LEGEND_GAP: f64 = 30.0;

/// One drawable heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCell {
    /// Cell bounds in plot-area coordinates.
    pub rect: Rect,
    /// Fill color.
    pub fill: Rgba,
    /// Record year.
    pub year: i32,
    /// Record month, 1-12.
    pub month: u8,
    /// `baseline + variance`, unrounded.
    pub temperature: f64,
}

impl RenderCell {
    /// Zero-based month (January = 0).
    #[must_use]
    pub fn month_index(&self) -> u8 {
        self.month.saturating_sub(1)
    }

    /// Hover text for the cell.
    #[must_use]
    pub fn tooltip_text(&self) -> String {
        tooltip::format_content(self.year, self.month, self.temperature)
    }

    /// Draw instruction for the cell, tagged with its data attributes.
    #[must_use]
    pub fn to_element(&self) -> SvgElement {
        SvgElement::rect(self.rect, self.fill)
            .attr("class", "cell")
            .attr("data-month", self.month_index())
            .attr("data-year", self.year)
            .attr("data-temp", self.temperature)
            .title(self.tooltip_text())
    }
}

/// The three scales of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapScales {
    /// Year → horizontal band.
    pub years: BandScale<i32>,
    /// Month → vertical band.
    pub months: BandScale<u8>,
    /// Temperature → color, warm end at the maximum.
    pub color: SequentialScale,
}

impl HeatmapScales {
    /// Build the scales for a `width` x `height` plot area.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or the size is not finite.
    pub fn new(domain: &Domain, width: f64, height: f64) -> Result<Self> {
        let years = BandScale::new(domain.years.iter().copied(), (0.0, width))?;
        let months = BandScale::new(domain.months.iter().copied(), (0.0, height))?;
        let (min, max) = domain.value_range;
        let color = SequentialScale::warm_high(min, max);

        debug!(
            "Scales: year bandwidth {:.3}px, month bandwidth {:.3}px, color domain {max}..{min}",
            years.bandwidth(),
            months.bandwidth()
        );

        Ok(Self { years, months, color })
    }
}

/// Map every record to a [`RenderCell`], in dataset order.
///
/// Duplicate `(year, month)` pairs are kept; when drawn in order the last one
/// is the one left visible.
///
/// # Errors
///
/// Returns [`Error::ScaleDomain`] if a record falls outside the scales.
pub fn build_cells(dataset: &Dataset, scales: &HeatmapScales) -> Result<Vec<RenderCell>> {
    let width = scales.years.bandwidth();
    let height = scales.months.bandwidth();
    let mut seen = HashSet::with_capacity(dataset.len());
    let mut duplicates = 0_usize;

    let cells = dataset
        .records()
        .iter()
        .map(|record| {
            let x = scales.years.position(record.year).ok_or_else(|| {
                Error::ScaleDomain(format!("year {} is outside the year scale", record.year))
            })?;
            let y = scales.months.position(record.month).ok_or_else(|| {
                Error::ScaleDomain(format!("month {} is outside the month scale", record.month))
            })?;

            if !seen.insert((record.year, record.month)) {
                duplicates += 1;
            }

            let temperature = dataset.absolute_temperature(record);
            Ok(RenderCell {
                rect: Rect::new(x, y, width, height),
                fill: scales.color.scale(temperature),
                year: record.year,
                month: record.month,
                temperature,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if duplicates > 0 {
        warn!("{duplicates} duplicate (year, month) records; the last drawn cell wins");
    }

    Ok(cells)
}

/// A fully mapped heatmap, ready to draw.
#[derive(Debug, Clone)]
pub struct HeatmapChart {
    config: ChartConfig,
    dataset: Dataset,
    domain: Domain,
    scales: HeatmapScales,
    cells: Vec<RenderCell>,
    legend: Legend,
}

impl HeatmapChart {
    /// Run the mapping pipeline: domain, scales, cells and legend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a bad config and
    /// [`Error::EmptyDataset`] when there are no records.
    pub fn new(dataset: Dataset, config: &ChartConfig) -> Result<Self> {
        config.validate()?;

        let domain = Domain::extract(&dataset)?;
        let scales = HeatmapScales::new(&domain, config.width, config.height)?;
        let cells = build_cells(&dataset, &scales)?;
        let legend = Legend::new(domain.value_range, &scales.color, &config.legend)?;

        Ok(Self { config: config.clone(), dataset, domain, scales, cells, legend })
    }

    /// Source dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Extracted domain.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Chart scales.
    #[must_use]
    pub fn scales(&self) -> &HeatmapScales {
        &self.scales
    }

    /// Cells in draw order.
    #[must_use]
    pub fn cells(&self) -> &[RenderCell] {
        &self.cells
    }

    /// Color legend.
    #[must_use]
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Configuration the chart was built with.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Year axis.
    #[must_use]
    pub fn x_axis(&self) -> Axis {
        Axis::years(&self.scales.years)
    }

    /// Month axis.
    #[must_use]
    pub fn y_axis(&self) -> Axis {
        Axis::months(&self.scales.months)
    }

    /// Topmost cell under a point in plot-area coordinates.
    #[must_use]
    pub fn cell_at(&self, point: Point) -> Option<&RenderCell> {
        self.cells.iter().rev().find(|cell| cell.rect.contains(point))
    }

    /// Visible cell for a year and month.
    #[must_use]
    pub fn find_cell(&self, year: i32, month: u8) -> Option<&RenderCell> {
        self.cells.iter().rev().find(|cell| cell.year == year && cell.month == month)
    }

    /// Convert a plot-area point to document coordinates.
    #[must_use]
    pub fn to_document(&self, point: Point) -> Point {
        point.offset(self.config.margin.left, self.config.margin.top)
    }

    /// Heading text under the title.
    #[must_use]
    pub fn description(&self) -> String {
        let (first, last) = self.domain.year_span();
        format!("{first} - {last}: base temperature {}℃", self.dataset.baseline())
    }

    /// Draw the chart into a new SVG document.
    #[must_use]
    pub fn render(&self) -> SvgEncoder {
        let config = &self.config;
        let mut svg = SvgEncoder::new(config.outer_width(), config.outer_height());

        let center = config.outer_width() / 2.0;
        svg.push(
            SvgElement::text(
                center,
                config.margin.top * 0.45,
                "Monthly Global Land-Surface Temperature",
                20.0,
                TextAnchor::Middle,
            )
            .attr("id", "title"),
        );
        svg.push(
            SvgElement::text(
                center,
                config.margin.top * 0.8,
                &self.description(),
                13.0,
                TextAnchor::Middle,
            )
            .attr("id", "description"),
        );

        let mut plot = SvgGroup::new().translate(config.margin.left, config.margin.top);
        self.x_axis().draw("x-axis", (0.0, config.height), &mut plot);
        self.y_axis().draw("y-axis", (0.0, 0.0), &mut plot);
        for cell in &self.cells {
            plot.push(cell.to_element());
        }
        svg.push(plot.into());

        let legend_origin = (config.margin.left, config.margin.top + config.height + LEGEND_GAP);
        self.legend.draw(legend_origin, &mut svg);

        svg
    }

    /// Draw the chart with the tooltip frame at time `now` on top.
    #[must_use]
    pub fn render_with_tooltip(&self, tooltip: &TooltipController, now: Duration) -> SvgEncoder {
        let mut svg = self.render();
        tooltip.draw(now, &mut svg);
        svg
    }
}

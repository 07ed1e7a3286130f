//! Color legend: a strip of swatches sampled from the color scale, with an axis.

use crate::axis::Axis;
use crate::color::Rgba;
use crate::config::LegendConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::output::{DrawSink, SvgElement, SvgGroup};
use crate::scale::{LinearScale, Scale, SequentialScale};

/// One legend swatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendSwatch {
    /// Swatch bounds in legend coordinates.
    pub rect: Rect,
    /// Temperature the swatch samples.
    pub value: f64,
    /// Swatch color.
    pub fill: Rgba,
}

/// Legend for the heatmap color scale.
///
/// Swatch `i` sits at `i * swatch_width` and is colored with the value found
/// by inverting that pixel position through a linear scale over the
/// temperature extent. Swatches always run left to right in pixel order; with
/// the chart's reversed color domain that reads cool to warm.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    scale: LinearScale,
    swatches: Vec<LegendSwatch>,
    tick_count: usize,
    swatch_height: f64,
    inset: f64,
}

impl Legend {
    /// Sample `color` across `value_range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value range is not finite or the legend
    /// configuration is out of bounds.
    pub fn new(
        value_range: (f64, f64),
        color: &SequentialScale,
        config: &LegendConfig,
    ) -> Result<Self> {
        config.validate()?;
        let scale = LinearScale::new(value_range, (0.0, config.width))?;

        let swatches = (0..config.swatch_count)
            .map(|i| {
                let x = i as f64 * config.swatch_width;
                let value = scale.invert(x);
                LegendSwatch {
                    rect: Rect::new(x, 0.0, config.swatch_width, config.swatch_height),
                    value,
                    fill: color.scale(value),
                }
            })
            .collect();

        Ok(Self {
            scale,
            swatches,
            tick_count: config.tick_count,
            swatch_height: config.swatch_height,
            inset: config.inset,
        })
    }

    /// Swatches in drawing order.
    #[must_use]
    pub fn swatches(&self) -> &[LegendSwatch] {
        &self.swatches
    }

    /// Linear scale from temperature to legend pixels.
    #[must_use]
    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    /// Legend axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        Axis::linear(&self.scale, self.tick_count)
    }

    /// Draw the legend with its box's top-left corner at `origin`.
    pub fn draw(&self, origin: (f64, f64), sink: &mut impl DrawSink) {
        let mut group =
            SvgGroup::with_id("legend").translate(origin.0 + self.inset, origin.1 + self.inset);

        for swatch in &self.swatches {
            group.push(
                SvgElement::rect(swatch.rect, swatch.fill)
                    .attr("class", "legend-rect")
                    .attr("data-temp", swatch.value),
            );
        }
        self.axis().draw("legend-axis", (0.0, self.swatch_height), &mut group);

        sink.push(group.into());
    }
}

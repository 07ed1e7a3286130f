//! Axis tick selection, labels and drawing.

use crate::color::Rgba;
use crate::output::{DrawSink, SvgElement, SvgGroup, TextAnchor};
use crate::scale::{BandScale, LinearScale, Scale};

/// Full English month names; month `m` is entry `m - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Length of the tick marks.
pub const TICK_SIZE: f64 = 6.0;
/// Gap between a tick mark and its label.
pub const TICK_PADDING: f64 = 3.0;
/// Label font size.
pub const TICK_FONT_SIZE: f64 = 10.0;

/// Calendar name of `month` (1-12).
#[must_use]
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTH_NAMES.get(usize::from(month).checked_sub(1)?).copied()
}

/// Years divisible by ten, in the order given.
#[must_use]
pub fn decade_years(years: &[i32]) -> Vec<i32> {
    years.iter().copied().filter(|year| year.rem_euclid(10) == 0).collect()
}

/// Side of the plot an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal axis with ticks and labels below the line.
    Bottom,
    /// Vertical axis with ticks and labels left of the line.
    Left,
}

/// One labelled tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Position along the axis in pixels.
    pub position: f64,
    /// Label text.
    pub label: String,
}

/// A fully resolved axis: where the ticks go and what they say.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    orientation: Orientation,
    extent: (f64, f64),
    ticks: Vec<AxisTick>,
}

impl Axis {
    /// Bottom axis over a year band scale, ticked at each decade.
    #[must_use]
    pub fn years(scale: &BandScale<i32>) -> Self {
        let ticks = decade_years(scale.domain())
            .into_iter()
            .filter_map(|year| {
                scale.center(year).map(|position| AxisTick { position, label: year.to_string() })
            })
            .collect();

        Self { orientation: Orientation::Bottom, extent: scale.range(), ticks }
    }

    /// Left axis over a month band scale, labelled with month names.
    #[must_use]
    pub fn months(scale: &BandScale<u8>) -> Self {
        let ticks = scale
            .domain()
            .iter()
            .filter_map(|&month| {
                let position = scale.center(month)?;
                let label = month_name(month)?.to_string();
                Some(AxisTick { position, label })
            })
            .collect();

        Self { orientation: Orientation::Left, extent: scale.range(), ticks }
    }

    /// Bottom axis over a linear scale with about `count` ticks.
    #[must_use]
    pub fn linear(scale: &LinearScale, count: usize) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|value| AxisTick {
                position: scale.scale(value),
                label: scale.tick_format(count, value),
            })
            .collect();

        Self { orientation: Orientation::Bottom, extent: scale.range(), ticks }
    }

    /// Axis orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Resolved ticks in axis order.
    #[must_use]
    pub fn ticks(&self) -> &[AxisTick] {
        &self.ticks
    }

    /// Tick labels in axis order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|t| t.label.as_str()).collect()
    }

    /// Draw the axis as a group with the given `id`, translated by `offset`.
    pub fn draw(&self, id: &str, offset: (f64, f64), sink: &mut impl DrawSink) {
        let (r0, r1) = self.extent;
        let mut group = SvgGroup::with_id(id).translate(offset.0, offset.1);

        let domain_path = match self.orientation {
            Orientation::Bottom => format!("M{r0},{TICK_SIZE}V0H{r1}V{TICK_SIZE}"),
            Orientation::Left => format!("M-{TICK_SIZE},{r0}H0V{r1}H-{TICK_SIZE}"),
        };
        group.push(
            SvgElement::Path {
                d: domain_path,
                fill: None,
                stroke: Some(Rgba::BLACK),
                stroke_width: 1.0,
                attrs: Vec::new(),
            }
            .attr("class", "domain"),
        );

        let label_offset = TICK_SIZE + TICK_PADDING;
        for tick in &self.ticks {
            let mut tick_group = SvgGroup::new().attr("class", "tick");
            match self.orientation {
                Orientation::Bottom => {
                    tick_group = tick_group.translate(tick.position, 0.0);
                    tick_group.line((0.0, 0.0), (0.0, TICK_SIZE), Rgba::BLACK, 1.0);
                    tick_group.text(
                        0.0,
                        label_offset + 0.71 * TICK_FONT_SIZE,
                        &tick.label,
                        TICK_FONT_SIZE,
                        TextAnchor::Middle,
                    );
                }
                Orientation::Left => {
                    tick_group = tick_group.translate(0.0, tick.position);
                    tick_group.line((0.0, 0.0), (-TICK_SIZE, 0.0), Rgba::BLACK, 1.0);
                    tick_group.text(
                        -label_offset,
                        0.32 * TICK_FONT_SIZE,
                        &tick.label,
                        TICK_FONT_SIZE,
                        TextAnchor::End,
                    );
                }
            }
            group.push(tick_group.into());
        }

        sink.push(group.into());
    }
}

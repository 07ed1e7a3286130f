//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use crate::color::{ColorRamp, Rgba};
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

// ============================================================================
// Linear scale
// ============================================================================

/// Linear scale for continuous-to-continuous mapping.
///
/// A collapsed domain (`min == max`) is allowed: every value then maps to the
/// middle of the range and inverting always yields the single domain value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if ![domain.0, domain.1, range.0, range.1].iter().all(|v| v.is_finite()) {
            return Err(Error::ScaleDomain(format!(
                "Linear scale bounds must be finite: domain {domain:?}, range {range:?}"
            )));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let t = normalize(self.range_min, self.range_max, value);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Human-friendly tick values covering the domain.
    ///
    /// Steps are 1, 2 or 5 times a power of ten, picked so that roughly
    /// `count` ticks fall inside the domain. Ticks never extend past the
    /// domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }

        let (mut start, mut stop) = (self.domain_min, self.domain_max);
        if start == stop {
            return vec![start];
        }

        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let (i1, i2, inc) = tick_spec(start, stop, count as f64);
        if i2 < i1 {
            return Vec::new();
        }

        let mut ticks: Vec<f64> = (i1..=i2)
            .map(|i| if inc < 0.0 { i as f64 / -inc } else { i as f64 * inc })
            .collect();

        if reverse {
            ticks.reverse();
        }
        ticks
    }

    /// Distance between consecutive ticks for `count` requested ticks.
    #[must_use]
    pub fn tick_step(&self, count: usize) -> f64 {
        let (start, stop) = (self.domain_min, self.domain_max);
        if count == 0 || start == stop {
            return 0.0;
        }

        let reverse = stop < start;
        let (_, _, inc) = if reverse {
            tick_spec(stop, start, count as f64)
        } else {
            tick_spec(start, stop, count as f64)
        };
        let step = if inc < 0.0 { 1.0 / -inc } else { inc };
        if reverse {
            -step
        } else {
            step
        }
    }

    /// Format a tick value with the fixed precision implied by the tick step.
    #[must_use]
    pub fn tick_format(&self, count: usize, value: f64) -> String {
        let step = self.tick_step(count).abs();
        let precision = if step > 0.0 { (-step.log10().floor()).max(0.0) as usize } else { 0 };
        let label = format!("{value:.precision$}");

        // "-0" and "-0.0" read as noise on an axis.
        if label.starts_with('-') && label[1..].chars().all(|c| c == '0' || c == '.') {
            label[1..].to_string()
        } else {
            label
        }
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = normalize(self.domain_min, self.domain_max, value);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Position of `value` within `[a, b]` as a fraction; 0.5 for a collapsed interval.
fn normalize(a: f64, b: f64, value: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        0.5
    } else {
        (value - a) / span
    }
}

/// Tick index bounds and increment for `[start, stop]`.
///
/// A negative increment `-k` means ticks are `i / k`, which keeps sub-unit
/// steps exact (0.1 is represented as `1 / 10` rather than `0.1 * i`).
fn tick_spec(start: f64, stop: f64, count: f64) -> (i64, i64, f64) {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let k = 10f64.powf(-power) / factor;
        i1 = (start * k).round() as i64;
        i2 = (stop * k).round() as i64;
        if (i1 as f64) / k < start {
            i1 += 1;
        }
        if (i2 as f64) / k > stop {
            i2 -= 1;
        }
        inc = -k;
    } else {
        let k = 10f64.powf(power) * factor;
        i1 = (start / k).round() as i64;
        i2 = (stop / k).round() as i64;
        if (i1 as f64) * k < start {
            i1 += 1;
        }
        if (i2 as f64) * k > stop {
            i2 -= 1;
        }
        inc = k;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

// ============================================================================
// Band scale
// ============================================================================

/// Discrete scale dividing a pixel range into equal, contiguous bands.
///
/// Bands are assigned in ascending domain order, so band `i` covers
/// `[start + i * bandwidth, start + (i + 1) * bandwidth)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<T> {
    domain: Vec<T>,
    range: (f64, f64),
    step: f64,
}

impl<T: Copy + Ord> BandScale<T> {
    /// Create a band scale over the distinct values of `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or the range is not finite.
    pub fn new(domain: impl IntoIterator<Item = T>, range: (f64, f64)) -> Result<Self> {
        let mut values: Vec<T> = domain.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        if values.is_empty() {
            return Err(Error::ScaleDomain("Band scale requires a non-empty domain".to_string()));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(Error::ScaleDomain(format!("Band scale range must be finite: {range:?}")));
        }

        let step = (range.1 - range.0) / values.len() as f64;
        Ok(Self { domain: values, range, step })
    }

    /// Start of the band for `value`, or `None` if it is not in the domain.
    #[must_use]
    pub fn position(&self, value: T) -> Option<f64> {
        self.index_of(value).map(|i| self.range.0 + i as f64 * self.step)
    }

    /// Center of the band for `value`.
    #[must_use]
    pub fn center(&self, value: T) -> Option<f64> {
        self.position(value).map(|p| p + self.step / 2.0)
    }

    /// Index of `value` in the sorted domain.
    #[must_use]
    pub fn index_of(&self, value: T) -> Option<usize> {
        self.domain.binary_search(&value).ok()
    }

    /// Width of every band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step
    }

    /// Sorted, distinct domain values.
    #[must_use]
    pub fn domain(&self) -> &[T] {
        &self.domain
    }

    /// Pixel range covered by the bands.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

// ============================================================================
// Sequential color scale
// ============================================================================

/// Continuous scale from a numeric domain onto a [`ColorRamp`].
///
/// `domain.0` maps to the start of the ramp and `domain.1` to its end; the
/// domain may be given in descending order to flip the ramp. Values outside
/// the domain clamp to the nearest end color.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    domain: (f64, f64),
    ramp: ColorRamp,
}

impl SequentialScale {
    /// Create a sequential scale.
    #[must_use]
    pub fn new(domain: (f64, f64), ramp: ColorRamp) -> Self {
        Self { domain, ramp }
    }

    /// Red-yellow-blue scale with the domain reversed (max first) so the
    /// warm end of the ramp corresponds to the highest value.
    #[must_use]
    pub fn warm_high(min: f64, max: f64) -> Self {
        Self::new((max, min), ColorRamp::rd_yl_bu())
    }

    /// Position of `value` along the ramp, clamped to `[0, 1]`.
    #[must_use]
    pub fn ramp_position(&self, value: f64) -> f64 {
        normalize(self.domain.0, self.domain.1, value).clamp(0.0, 1.0)
    }
}

impl Scale<f64, Rgba> for SequentialScale {
    fn scale(&self, value: f64) -> Rgba {
        self.ramp.interpolate(self.ramp_position(value))
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (Rgba, Rgba) {
        (self.ramp.interpolate(0.0), self.ramp.interpolate(1.0))
    }
}

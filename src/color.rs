//! Color types and the diverging color ramp used by the heatmap.
//!
//! The ramp interpolates a fixed list of control colors with a uniform cubic
//! B-spline per RGB channel, which gives a smooth (C2 continuous) gradient that
//! still passes exactly through the first and last control colors.
//!
//! # References
//!
//! - Harrower, M., & Brewer, C. A. (2003). "ColorBrewer.org: An Online Tool for
//!   Selecting Colour Schemes for Maps." *The Cartographic Journal*, 40(1), 27-37.

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a 6-digit hex color (`"a50026"` or `"#a50026"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::ScaleDomain(format!("invalid hex color '{hex}'")));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::ScaleDomain(format!("invalid hex color '{hex}'")))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Build an opaque color from floating-point channels, rounding and
    /// clamping each to 0-255.
    #[must_use]
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        let quantize = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        Self::rgb(quantize(r), quantize(g), quantize(b))
    }

    /// CSS color string (`rgb(r,g,b)` when opaque, `rgba(...)` otherwise).
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, f32::from(self.a) / 255.0)
        }
    }
}

/// The 11-class red-yellow-blue diverging scheme, warm end first.
const RD_YL_BU: &str = "a50026d73027f46d43fdae61fee090ffffbfe0f3f8abd9e974add14575b4313695";

/// A continuous color ramp over `t` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Rgba>,
}

impl ColorRamp {
    /// Create a ramp from control colors.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two control colors are given.
    pub fn new(stops: Vec<Rgba>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::ScaleDomain(
                "Color ramp requires at least two control colors".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    /// Create a ramp from a concatenated string of 6-digit hex colors.
    ///
    /// # Errors
    ///
    /// Returns an error if the string length is not a multiple of six or a
    /// color fails to parse.
    pub fn from_scheme(scheme: &str) -> Result<Self> {
        if scheme.len() % 6 != 0 || !scheme.is_ascii() {
            return Err(Error::ScaleDomain(format!("invalid color scheme '{scheme}'")));
        }

        let stops = (0..scheme.len())
            .step_by(6)
            .map(|i| Rgba::from_hex(&scheme[i..i + 6]))
            .collect::<Result<Vec<_>>>()?;

        Self::new(stops)
    }

    /// Red-yellow-blue diverging ramp: `t = 0` is dark red, `t = 1` dark blue.
    #[must_use]
    pub fn rd_yl_bu() -> Self {
        Self::from_scheme(RD_YL_BU).expect("built-in scheme is well-formed")
    }

    /// Control colors of the ramp.
    #[must_use]
    pub fn stops(&self) -> &[Rgba] {
        &self.stops
    }

    /// Sample the ramp at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn interpolate(&self, t: f64) -> Rgba {
        let n = self.stops.len() - 1;
        let (t, i) = if t <= 0.0 {
            (0.0, 0)
        } else if t >= 1.0 {
            (1.0, n - 1)
        } else {
            (t, ((t * n as f64).floor() as usize).min(n - 1))
        };

        let v1 = self.stops[i];
        let v2 = self.stops[i + 1];
        let v0 = if i > 0 { Some(self.stops[i - 1]) } else { None };
        let v3 = if i < n - 1 { Some(self.stops[i + 2]) } else { None };
        let local_t = (t - i as f64 / n as f64) * n as f64;

        let channel = |pick: fn(Rgba) -> u8| {
            let c1 = f64::from(pick(v1));
            let c2 = f64::from(pick(v2));
            // Missing neighbours are reflected so the curve reaches the end stops.
            let c0 = v0.map_or(2.0 * c1 - c2, |c| f64::from(pick(c)));
            let c3 = v3.map_or(2.0 * c2 - c1, |c| f64::from(pick(c)));
            basis(local_t, c0, c1, c2, c3)
        };

        Rgba::from_channels(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b))
    }
}

/// Uniform cubic B-spline basis evaluated at `t1` over four control values.
fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

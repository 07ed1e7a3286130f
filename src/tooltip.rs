//! Hover tooltip state machine.
//!
//! The tooltip has two logical phases, [`TooltipPhase::Hidden`] and
//! [`TooltipPhase::Visible`]. Opacity changes are timed fades evaluated
//! against a caller-supplied monotonic clock, so the controller has no
//! dependency on any animation runtime:
//!
//! ```text
//!   Hidden --hover--> Visible (fade in to 0.9 over 200ms)
//!   Visible --hover--> Visible (new content, fade restarts from current opacity)
//!   Visible --unhover--> Visible (fade out to 0 over 500ms)
//!   Visible --fade-out complete--> Hidden (content reset)
//! ```
//!
//! The `*_at(now)` accessors observe a finished fade-out even if
//! [`TooltipController::tick`] has not been called since; `tick` only commits
//! the transition to the stored state.

use crate::axis::month_name;
use crate::color::Rgba;
use crate::config::TooltipConfig;
use crate::geometry::{Point, Rect};
use crate::output::{DrawSink, SvgElement, SvgGroup, TextAnchor};
use crate::plots::RenderCell;
use std::time::Duration;

const FONT_SIZE: f64 = 12.0;
const LINE_HEIGHT: f64 = 15.0;
const PADDING: f64 = 6.0;
const BOX_WIDTH: f64 = 130.0;

/// Tooltip text for a cell: year, month name and temperature to 2 decimals.
#[must_use]
pub fn format_content(year: i32, month: u8, temperature: f64) -> String {
    format!(
        "Year: {year}\nMonth: {}\nTemp: {temperature:.2}℃",
        month_name(month).unwrap_or_default()
    )
}

/// Logical tooltip phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipPhase {
    /// Not shown.
    #[default]
    Hidden,
    /// Shown, possibly fading in or out.
    Visible,
}

/// Snapshot of the tooltip's observable state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipState {
    /// Whether the tooltip is logically visible.
    pub visible: bool,
    /// Text content.
    pub content: String,
    /// Top-left corner of the tooltip.
    pub position: Point,
    /// Year of the hovered cell.
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeKind {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    kind: FadeKind,
    from: f64,
    to: f64,
    start: Duration,
    duration: Duration,
}

impl Fade {
    fn is_complete(&self, now: Duration) -> bool {
        now >= self.start.saturating_add(self.duration)
    }

    fn value_at(&self, now: Duration) -> f64 {
        if self.duration.is_zero() || self.is_complete(now) {
            return self.to;
        }
        let t = now.saturating_sub(self.start).as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_cubic_in_out(t)
    }
}

/// Symmetric cubic easing.
fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Drives the tooltip from hover/unhover events.
#[derive(Debug, Clone)]
pub struct TooltipController {
    config: TooltipConfig,
    phase: TooltipPhase,
    state: TooltipState,
    fade: Option<Fade>,
    settled_opacity: f64,
}

impl TooltipController {
    /// Create a hidden tooltip.
    #[must_use]
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            phase: TooltipPhase::Hidden,
            state: TooltipState::default(),
            fade: None,
            settled_opacity: 0.0,
        }
    }

    /// Pointer entered `cell` at `pointer` (document coordinates).
    ///
    /// Any running fade, including a fade-out, is replaced by a fade-in that
    /// starts from the current opacity.
    pub fn hover(&mut self, cell: &RenderCell, pointer: Point, now: Duration) {
        let from = self.opacity(now);

        self.phase = TooltipPhase::Visible;
        self.state = TooltipState {
            visible: true,
            content: cell.tooltip_text(),
            position: pointer.offset(self.config.offset_x, self.config.offset_y),
            year: Some(cell.year),
        };
        self.fade = Some(Fade {
            kind: FadeKind::In,
            from,
            to: self.config.visible_opacity,
            start: now,
            duration: self.config.fade_in(),
        });
    }

    /// Pointer left the hovered cell.
    pub fn unhover(&mut self, now: Duration) {
        if self.phase == TooltipPhase::Hidden {
            return;
        }

        let from = self.opacity(now);
        self.fade = Some(Fade {
            kind: FadeKind::Out,
            from,
            to: 0.0,
            start: now,
            duration: self.config.fade_out(),
        });
    }

    /// Advance the clock, settling finished fades.
    pub fn tick(&mut self, now: Duration) -> TooltipPhase {
        if let Some(fade) = self.fade.filter(|f| f.is_complete(now)) {
            self.fade = None;
            self.settled_opacity = fade.to;
            if fade.kind == FadeKind::Out {
                self.phase = TooltipPhase::Hidden;
                self.state = TooltipState::default();
            }
        }
        self.phase
    }

    /// Whether a fade-out has run to completion by `now`.
    fn faded_out(&self, now: Duration) -> bool {
        self.fade.is_some_and(|f| f.kind == FadeKind::Out && f.is_complete(now))
    }

    /// Logical phase at time `now`.
    #[must_use]
    pub fn phase_at(&self, now: Duration) -> TooltipPhase {
        if self.faded_out(now) {
            TooltipPhase::Hidden
        } else {
            self.phase
        }
    }

    /// Whether the tooltip is logically visible at time `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: Duration) -> bool {
        self.phase_at(now) == TooltipPhase::Visible
    }

    /// State snapshot at time `now`; reset once the fade-out has ended.
    #[must_use]
    pub fn state_at(&self, now: Duration) -> TooltipState {
        if self.is_visible_at(now) {
            self.state.clone()
        } else {
            TooltipState::default()
        }
    }

    /// Phase as of the last event or [`tick`](Self::tick).
    #[must_use]
    pub fn phase(&self) -> TooltipPhase {
        self.phase
    }

    /// Whether the tooltip was visible as of the last event or tick.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == TooltipPhase::Visible
    }

    /// Whether a fade-out is in progress.
    #[must_use]
    pub fn is_fading_out(&self) -> bool {
        self.fade.is_some_and(|f| f.kind == FadeKind::Out)
    }

    /// Opacity at time `now`.
    #[must_use]
    pub fn opacity(&self, now: Duration) -> f64 {
        if self.phase == TooltipPhase::Hidden {
            return 0.0;
        }
        self.fade.map_or(self.settled_opacity, |fade| fade.value_at(now))
    }

    /// State as of the last event or tick.
    #[must_use]
    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Draw the tooltip frame at `now`; draws nothing while hidden.
    pub fn draw(&self, now: Duration, sink: &mut impl DrawSink) {
        if !self.is_visible_at(now) {
            return;
        }

        let lines: Vec<&str> = self.state.content.lines().collect();
        let height = lines.len() as f64 * LINE_HEIGHT + 2.0 * PADDING;

        let mut group = SvgGroup::with_id("tooltip")
            .translate(self.state.position.x, self.state.position.y)
            .opacity(self.opacity(now));
        if let Some(year) = self.state.year {
            group = group.attr("data-year", year);
        }

        group.rect(Rect::new(0.0, 0.0, BOX_WIDTH, height), Rgba::rgb(255, 255, 224));
        for (i, line) in lines.iter().enumerate() {
            group.push(SvgElement::text(
                PADDING,
                PADDING + FONT_SIZE + i as f64 * LINE_HEIGHT,
                line,
                FONT_SIZE,
                TextAnchor::Start,
            ));
        }

        sink.push(group.into());
    }
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new(TooltipConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgEncoder;
    use approx::assert_relative_eq;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn cell() -> RenderCell {
        RenderCell {
            rect: Rect::new(0.0, 0.0, 4.0, 40.0),
            fill: Rgba::BLACK,
            year: 1753,
            month: 1,
            temperature: 8.66 + -1.366,
        }
    }

    #[test]
    fn test_format_content() {
        assert_eq!(format_content(1900, 2, 10.0), "Year: 1900\nMonth: February\nTemp: 10.00℃");
        assert_eq!(format_content(1753, 1, 7.294_000_000_000_001), "Year: 1753\nMonth: January\nTemp: 7.29℃");
    }

    #[test]
    fn test_starts_hidden() {
        let tooltip = TooltipController::default();
        assert_eq!(tooltip.phase(), TooltipPhase::Hidden);
        assert!(!tooltip.state().visible);
        assert_relative_eq!(tooltip.opacity(ms(0)), 0.0);
    }

    #[test]
    fn test_hover_shows_content_and_fades_in() {
        let mut tooltip = TooltipController::default();
        tooltip.hover(&cell(), Point::new(100.0, 200.0), ms(0));

        assert!(tooltip.is_visible());
        let state = tooltip.state();
        assert!(state.visible);
        assert!(state.content.contains("1753"));
        assert!(state.content.contains("January"));
        assert!(state.content.contains("7.29℃"));
        assert_eq!(state.position, Point::new(105.0, 172.0));

        assert_relative_eq!(tooltip.opacity(ms(0)), 0.0);
        assert_relative_eq!(tooltip.opacity(ms(100)), 0.45, epsilon = 1e-9);
        assert_relative_eq!(tooltip.opacity(ms(200)), 0.9);

        tooltip.tick(ms(250));
        assert_relative_eq!(tooltip.opacity(ms(1000)), 0.9);
    }

    #[test]
    fn test_unhover_hides_after_fade_out() {
        let mut tooltip = TooltipController::default();
        tooltip.hover(&cell(), Point::new(0.0, 0.0), ms(0));
        tooltip.tick(ms(200));
        tooltip.unhover(ms(1000));

        assert!(tooltip.is_fading_out());
        assert_eq!(tooltip.tick(ms(1499)), TooltipPhase::Visible);
        assert!(tooltip.opacity(ms(1499)) > 0.0);

        assert_eq!(tooltip.tick(ms(1500)), TooltipPhase::Hidden);
        assert!(!tooltip.state().visible);
        assert!(tooltip.state().content.is_empty());
        assert_relative_eq!(tooltip.opacity(ms(1500)), 0.0);
    }

    #[test]
    fn test_fade_out_hides_without_tick() {
        let mut tooltip = TooltipController::default();
        tooltip.hover(&cell(), Point::new(0.0, 0.0), ms(0));
        tooltip.unhover(ms(300));

        assert!(tooltip.is_visible_at(ms(799)));
        assert!(tooltip.state_at(ms(799)).visible);

        let later = Duration::from_secs(60);
        assert_eq!(tooltip.phase_at(later), TooltipPhase::Hidden);
        assert!(!tooltip.is_visible_at(later));
        let state = tooltip.state_at(later);
        assert!(!state.visible);
        assert!(state.content.is_empty());
        assert_relative_eq!(tooltip.opacity(later), 0.0);

        let mut encoder = SvgEncoder::new(200.0, 200.0);
        tooltip.draw(later, &mut encoder);
        assert!(encoder.find_group("tooltip").is_none());
        assert!(encoder.elements().is_empty());
    }

    #[test]
    fn test_hover_during_fade_out_cancels_it() {
        let mut tooltip = TooltipController::default();
        tooltip.hover(&cell(), Point::new(0.0, 0.0), ms(0));
        tooltip.tick(ms(200));
        tooltip.unhover(ms(300));

        let mid_fade = tooltip.opacity(ms(550));
        let next = RenderCell { year: 1754, month: 3, ..cell() };
        tooltip.hover(&next, Point::new(10.0, 10.0), ms(550));

        assert!(!tooltip.is_fading_out());
        assert_relative_eq!(tooltip.opacity(ms(550)), mid_fade);
        // The cancelled fade-out would have ended at 800ms.
        assert_eq!(tooltip.tick(ms(900)), TooltipPhase::Visible);
        assert!(tooltip.state().content.contains("March"));
        assert_relative_eq!(tooltip.opacity(ms(900)), 0.9);
    }

    #[test]
    fn test_unhover_while_hidden_is_noop() {
        let mut tooltip = TooltipController::default();
        tooltip.unhover(ms(10));
        assert_eq!(tooltip.tick(ms(10_000)), TooltipPhase::Hidden);
        assert!(!tooltip.is_fading_out());
    }

    #[test]
    fn test_zero_duration_fades() {
        let config = TooltipConfig { fade_in_ms: 0, fade_out_ms: 0, ..TooltipConfig::default() };
        let mut tooltip = TooltipController::new(config);
        tooltip.hover(&cell(), Point::ORIGIN, ms(5));
        assert_relative_eq!(tooltip.opacity(ms(5)), 0.9);

        tooltip.unhover(ms(6));
        assert_eq!(tooltip.tick(ms(6)), TooltipPhase::Hidden);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_relative_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_relative_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn test_draw_visible_tooltip() {
        let mut tooltip = TooltipController::default();
        tooltip.hover(&cell(), Point::new(100.0, 200.0), ms(0));

        let mut encoder = SvgEncoder::new(200.0, 200.0);
        tooltip.draw(ms(200), &mut encoder);
        let svg = encoder.render();

        assert!(svg.contains(r#"<g id="tooltip" data-year="1753" transform="translate(105,172)" opacity="0.9">"#));
        assert!(svg.contains(">Month: January</text>"));
    }

    #[test]
    fn test_draw_hidden_tooltip_is_empty() {
        let mut encoder = SvgEncoder::new(200.0, 200.0);
        TooltipController::default().draw(ms(0), &mut encoder);
        assert!(encoder.elements().is_empty());
    }
}

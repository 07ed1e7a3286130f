//! SVG output encoder.
//!
//! The encoder is the drawing sink of the chart: renderers push
//! [`SvgElement`]s into it (directly or through nested [`SvgGroup`]s) and it
//! serializes them to a standalone SVG document.

use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Rect;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Anything that accepts draw instructions.
pub trait DrawSink {
    /// Append an element.
    fn push(&mut self, element: SvgElement);

    /// Append a filled rectangle.
    fn rect(&mut self, rect: Rect, fill: Rgba) {
        self.push(SvgElement::rect(rect, fill));
    }

    /// Append a line.
    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Rgba, stroke_width: f64) {
        self.push(SvgElement::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            stroke,
            stroke_width,
            attrs: Vec::new(),
        });
    }

    /// Append text.
    fn text(&mut self, x: f64, y: f64, text: &str, font_size: f64, anchor: TextAnchor) {
        self.push(SvgElement::text(x, y, text, font_size, anchor));
    }
}

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: f64,
    /// SVG height
    height: f64,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names. `attrs`
/// holds extra attributes (`id`, `class`, `data-*`) written in insertion order.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle, optionally carrying a hover `<title>`.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f64,
        title: Option<String>,
        attrs: Vec<(String, String)>,
    },
    /// Line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        stroke_width: f64,
        attrs: Vec<(String, String)>,
    },
    /// Path (SVG path data)
    Path {
        d: String,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f64,
        attrs: Vec<(String, String)>,
    },
    /// Text
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
        attrs: Vec<(String, String)>,
    },
    /// Group of elements sharing a transform and opacity.
    Group(SvgGroup),
}

impl SvgElement {
    /// Filled rectangle without stroke.
    #[must_use]
    pub fn rect(rect: Rect, fill: Rgba) -> Self {
        Self::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill,
            stroke: None,
            stroke_width: 1.0,
            title: None,
            attrs: Vec::new(),
        }
    }

    /// Black text.
    #[must_use]
    pub fn text(x: f64, y: f64, text: &str, font_size: f64, anchor: TextAnchor) -> Self {
        Self::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            fill: Rgba::BLACK,
            anchor,
            attrs: Vec::new(),
        }
    }

    /// Add an extra attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        let entry = (key.to_string(), value.to_string());
        match &mut self {
            Self::Rect { attrs, .. }
            | Self::Line { attrs, .. }
            | Self::Path { attrs, .. }
            | Self::Text { attrs, .. } => attrs.push(entry),
            Self::Group(group) => group.attrs.push(entry),
        }
        self
    }

    /// Attach a `<title>` (hover text) to a rectangle. No-op for other elements.
    #[must_use]
    pub fn title(mut self, text: impl Into<String>) -> Self {
        if let Self::Rect { title, .. } = &mut self {
            *title = Some(text.into());
        }
        self
    }

    /// Value of an extra attribute, if present.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        let attrs = match self {
            Self::Rect { attrs, .. }
            | Self::Line { attrs, .. }
            | Self::Path { attrs, .. }
            | Self::Text { attrs, .. } => attrs,
            Self::Group(group) => &group.attrs,
        };
        attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// A `<g>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgGroup {
    attrs: Vec<(String, String)>,
    translate: Option<(f64, f64)>,
    opacity: Option<f64>,
    children: Vec<SvgElement>,
}

impl SvgGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group with an `id`.
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        Self::new().attr("id", id)
    }

    /// Add an extra attribute.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    /// Translate the group's coordinate system.
    #[must_use]
    pub fn translate(mut self, dx: f64, dy: f64) -> Self {
        self.translate = Some((dx, dy));
        self
    }

    /// Set the group opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Child elements.
    #[must_use]
    pub fn children(&self) -> &[SvgElement] {
        &self.children
    }

    /// Value of an extra attribute, if present.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

impl DrawSink for SvgGroup {
    fn push(&mut self, element: SvgElement) {
        self.children.push(element);
    }
}

impl From<SvgGroup> for SvgElement {
    fn from(group: SvgGroup) -> Self {
        Self::Group(group)
    }
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions and a white background.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, elements: Vec::new() }
    }

    /// Top-level elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Find a group by `id`, searching nested groups depth-first.
    #[must_use]
    pub fn find_group(&self, id: &str) -> Option<&SvgGroup> {
        fn search<'a>(elements: &'a [SvgElement], id: &str) -> Option<&'a SvgGroup> {
            elements.iter().find_map(|element| match element {
                SvgElement::Group(group) if group.get_attr("id") == Some(id) => Some(group),
                SvgElement::Group(group) => search(&group.children, id),
                _ => None,
            })
        }
        search(&self.elements, id)
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 128);

        // SVG header
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        // Background
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            Rgba::WHITE.to_css()
        );

        // Elements
        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        // Close SVG
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        self.write_to(&mut file)
    }
}

impl DrawSink for SvgEncoder {
    fn push(&mut self, element: SvgElement) {
        self.elements.push(element);
    }
}

/// Escape XML special characters for text content and attribute values.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn attrs_to_svg(attrs: &[(String, String)]) -> String {
    attrs.iter().fold(String::new(), |mut out, (key, value)| {
        let _ = write!(out, r#" {key}="{}""#, escape_xml(value));
        out
    })
}

fn stroke_to_svg(stroke: Option<Rgba>, stroke_width: f64) -> String {
    stroke
        .map(|s| format!(r#" stroke="{}" stroke-width="{stroke_width}""#, s.to_css()))
        .unwrap_or_default()
}

/// Write an SVG element (and its children) at the given indentation depth.
fn write_element(svg: &mut String, element: &SvgElement, depth: usize) {
    let indent = "  ".repeat(depth);

    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke, stroke_width, title, attrs } => {
            let head = format!(
                r#"<rect{} x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"{}"#,
                attrs_to_svg(attrs),
                fill.to_css(),
                stroke_to_svg(*stroke, *stroke_width)
            );
            match title {
                Some(title) => {
                    let _ =
                        writeln!(svg, "{indent}{head}><title>{}</title></rect>", escape_xml(title));
                }
                None => {
                    let _ = writeln!(svg, "{indent}{head}/>");
                }
            }
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width, attrs } => {
            let _ = writeln!(
                svg,
                r#"{indent}<line{} x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{stroke_width}"/>"#,
                attrs_to_svg(attrs),
                stroke.to_css()
            );
        }
        SvgElement::Path { d, fill, stroke, stroke_width, attrs } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), Rgba::to_css);
            let _ = writeln!(
                svg,
                r#"{indent}<path{} d="{d}" fill="{fill_attr}"{}/>"#,
                attrs_to_svg(attrs),
                stroke_to_svg(*stroke, *stroke_width)
            );
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor, attrs } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = writeln!(
                svg,
                r#"{indent}<text{} x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif">{}</text>"#,
                attrs_to_svg(attrs),
                fill.to_css(),
                escape_xml(text)
            );
        }
        SvgElement::Group(group) => {
            let transform = group
                .translate
                .map(|(dx, dy)| format!(r#" transform="translate({dx},{dy})""#))
                .unwrap_or_default();
            let opacity =
                group.opacity.map(|o| format!(r#" opacity="{o}""#)).unwrap_or_default();
            let _ = writeln!(svg, "{indent}<g{}{transform}{opacity}>", attrs_to_svg(&group.attrs));
            for child in &group.children {
                write_element(svg, child, depth + 1);
            }
            let _ = writeln!(svg, "{indent}</g>");
        }
    }
}

//! Output encoders.

mod svg;

pub use svg::{DrawSink, SvgElement, SvgEncoder, SvgGroup, TextAnchor};

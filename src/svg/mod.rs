//! SVG document carrier and the static error placeholder
//!
//! Holds finished drawings on their way to the transport boundary. Chart
//! drawing itself lives with the renderers, not here.

mod document;
mod error;

pub use document::SvgDocument;
pub use error::error_svg;

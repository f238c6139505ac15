//! Static placeholder image for failed renders

use super::SvgDocument;

/// Builds the fixed error image substituted when a rendering handler fails
///
/// The placeholder is always well-formed, so the transport body stays a
/// valid image even when drawing fails.
pub fn error_svg() -> SvgDocument {
    SvgDocument::new(300, 100)
        .rect(0, 0, 300, 100, "#f6f8fa")
        .text(20, 45, 16, "#24292f", "Something went wrong")
        .text(20, 70, 12, "#57606a", "Unable to render this chart, try again later")
}

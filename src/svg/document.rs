//! Minimal SVG document carrier
//!
//! Chart renderers assemble their drawings elsewhere; this type only holds a
//! finished drawing and serializes it to standalone SVG text for the
//! transport boundary.

/// A standalone SVG drawing assembled from raw elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    width: u32,
    height: u32,
    elements: Vec<String>,
}

impl SvgDocument {
    /// Creates an empty drawing with the given pixel dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Adds a filled rectangle
    pub fn rect(mut self, x: u32, y: u32, width: u32, height: u32, fill: &str) -> Self {
        self.elements.push(format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}"/>"#
        ));
        self
    }

    /// Adds a text element anchored at its start
    ///
    /// The content is XML-escaped, so arbitrary strings are safe to embed.
    pub fn text(mut self, x: u32, y: u32, size: u32, fill: &str, content: &str) -> Self {
        self.elements.push(format!(
            r#"<text x="{x}" y="{y}" font-size="{size}" font-family="Helvetica, Arial, sans-serif" fill="{fill}">{}</text>"#,
            escape_text(content)
        ));
        self
    }

    /// Serializes the drawing to its textual SVG representation
    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
            self.width, self.height
        );
        for element in &self.elements {
            xml.push_str(element);
        }
        xml.push_str("</svg>");
        xml
    }
}

/// Escapes the characters XML reserves inside text content
fn escape_text(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

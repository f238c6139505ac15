//! Transport-ready SVG responses for rendering handlers
//!
//! Rendering endpoints never signal drawing failure through the transport
//! status; a failed render is replaced by the static error placeholder so
//! the caller always receives a valid image.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use reqwest::StatusCode;

use crate::svg::{error_svg, SvgDocument};

/// MIME type carried by every rendered chart response
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Final transport response for a rendering handler
#[derive(Debug, Clone)]
pub struct SvgResponse {
    /// Serialized SVG body; on failure this is the static error image
    pub body: String,
    /// Always [`SVG_CONTENT_TYPE`]
    pub content_type: &'static str,
    /// Always 200; drawing failures are communicated visually
    pub status_code: StatusCode,
}

/// Runs async rendering work and converts the outcome into an [`SvgResponse`]
///
/// On success the returned drawing is serialized as the body. On failure
/// the error is logged and the static error placeholder is serialized
/// instead; the status stays 200 on both branches. Elapsed time goes to the
/// operator log, not to the caller.
pub async fn wrap_svg<E, F, Fut>(work: F) -> SvgResponse
where
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<SvgDocument, E>>,
{
    let start = Instant::now();
    let document = match work().await {
        Ok(document) => document,
        Err(error) => {
            tracing::error!(%error, "rendering handler failed");
            error_svg()
        }
    };

    let body = document.to_xml();
    tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "rendered svg response");

    SvgResponse {
        body,
        content_type: SVG_CONTENT_TYPE,
        status_code: StatusCode::OK,
    }
}

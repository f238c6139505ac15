//! Uniform response envelopes for request handlers
//!
//! Every unit of handler work passes through one of the wrappers here on
//! its way out of the system: [`wrap`] and [`wrap_sync`] for JSON data
//! endpoints, [`wrap_ack`] for push-delivery acknowledgments, and
//! [`wrap_svg`] for rendered images. All of them absorb failures, log them
//! for the operator, and hand the HTTP layer a well-formed result.

mod image;
mod wrapper;

pub use image::{wrap_svg, SvgResponse, SVG_CONTENT_TYPE};
pub use wrapper::{wrap, wrap_ack, wrap_sync, Envelope};

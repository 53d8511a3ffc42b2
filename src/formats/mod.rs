//! Format detection and dispatch.

pub mod exif;
pub mod jpeg;
pub mod png;

use tracing::debug;

use crate::config::ParseOptions;
use crate::core::{ParseError, Result};
pub use crate::types::FormatKind;
use crate::types::ParsedImageMetadata;

/// Identify the container from its magic bytes. The TIFF byte-order probe
/// is only used inside JPEG APP1 segments, never here.
#[inline]
pub fn detect(data: &[u8]) -> Option<FormatKind> {
    if jpeg::can_parse(data) {
        Some(FormatKind::Jpeg)
    } else if png::can_parse(data) {
        Some(FormatKind::Png)
    } else {
        None
    }
}

pub fn parse(data: &[u8]) -> Result<ParsedImageMetadata> {
    parse_with(data, &ParseOptions::default())
}

pub fn parse_with(data: &[u8], options: &ParseOptions) -> Result<ParsedImageMetadata> {
    let format = detect(data).ok_or(ParseError::UnsupportedFormat)?;
    debug!(%format, len = data.len(), "parsing buffer");

    match format {
        FormatKind::Jpeg => jpeg::JpegParser::with_options(options.clone()).parse(data),
        FormatKind::Png => png::PngParser::new().parse(data),
    }
}

use tracing::{debug, warn};

use crate::config::ParseOptions;
use crate::core::{ByteCursor, ParseError, Result};
use crate::formats::exif::{EXIF_HEADER, ExifReader};
use crate::types::{ColorMode, ExifField, FormatKind, ParsedImageMetadata};

pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
pub const JPEG_SOS: [u8; 2] = [0xFF, 0xDA];
pub const JPEG_APP1: [u8; 2] = [0xFF, 0xE1];

/// Marker prefix plus the length field that follows it.
const SEGMENT_HEADER_LEN: usize = 2;
/// From the length field to the TIFF byte-order mark: length (2) + `Exif\0\0` (6).
const EXIF_BLOCK_SKIP: usize = 8;

/// Start-Of-Frame codes: baseline, extended, progressive and lossless in
/// Huffman and arithmetic flavours. 0xC4 (DHT), 0xC8 (JPG) and 0xCC (DAC)
/// are not frames.
#[inline]
pub fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

#[inline]
pub fn can_parse(data: &[u8]) -> bool {
    data.starts_with(&JPEG_SOI)
}

pub fn color_mode_for_channels(channels: u8) -> ColorMode {
    match channels {
        1 => ColorMode::Grayscale,
        3 => ColorMode::Rgb,
        4 => ColorMode::Cmyk,
        _ => ColorMode::Unknown,
    }
}

/// Frame header fields read from a Start-Of-Frame segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub width: u16,
    pub height: u16,
    pub channels: u8,
}

impl FrameHeader {
    /// `length_field` is the offset of the segment's length bytes; precision
    /// sits right after them and is skipped.
    pub fn read(cursor: &ByteCursor<'_>, length_field: usize) -> Result<Self> {
        Ok(Self {
            height: cursor.u16_be(length_field + 3)?,
            width: cursor.u16_be(length_field + 5)?,
            channels: cursor.u8_at(length_field + 7)?,
        })
    }
}

/// Walks JPEG marker segments up to Start-Of-Scan or End-Of-Image.
///
/// A stream that never reaches either marker ends with `TruncatedStream`
/// once the walk runs off the buffer; every step advances by at least the
/// two marker bytes, so the walk always terminates.
#[derive(Debug, Clone, Default)]
pub struct JpegParser {
    options: ParseOptions,
}

impl JpegParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, data: &[u8]) -> Result<ParsedImageMetadata> {
        let cursor = ByteCursor::new(data);
        let mut metadata = ParsedImageMetadata::new(FormatKind::Jpeg);
        let mut pos = JPEG_SOI.len();

        loop {
            let marker = cursor.array::<2>(pos)?;
            pos += SEGMENT_HEADER_LEN;

            if marker == JPEG_SOS || marker == JPEG_EOI {
                debug!(offset = pos - 2, marker = marker[1], "end of header segments");
                break;
            }

            let length = cursor.u16_be(pos)? as usize;

            if marker[0] == 0xFF && is_sof_marker(marker[1]) {
                if metadata.has_frame() {
                    debug!(offset = pos - 2, marker = marker[1], "ignoring additional frame header");
                } else {
                    let frame = FrameHeader::read(&cursor, pos)?;
                    debug!(
                        marker = marker[1],
                        width = frame.width,
                        height = frame.height,
                        channels = frame.channels,
                        "frame header"
                    );
                    metadata.set_frame(
                        u32::from(frame.width),
                        u32::from(frame.height),
                        color_mode_for_channels(frame.channels),
                    );
                }
            }

            if marker == JPEG_APP1
                && self.options.extract_exif
                && cursor.starts_with_at(pos + SEGMENT_HEADER_LEN, &EXIF_HEADER)
            {
                self.read_exif(data, pos, length, &mut metadata)?;
            }

            pos += length;
        }

        Ok(metadata)
    }

    /// Resolve each wanted EXIF field independently; a field that cannot be
    /// found leaves no entry.
    fn read_exif(
        &self,
        data: &[u8],
        length_field: usize,
        length: usize,
        metadata: &mut ParsedImageMetadata,
    ) -> Result<()> {
        if length < EXIF_BLOCK_SKIP {
            warn!(offset = length_field, length, "APP1 length shorter than its Exif header");
        }

        let mut reader =
            ExifReader::with_options(data, length_field + EXIF_BLOCK_SKIP, length, self.options.exif)?;

        for field in ExifField::ALL {
            match reader.search_tag(field.tag(), true) {
                Ok(value) => {
                    debug!(field = field.key(), ?value, "EXIF field");
                    metadata.set_exif(field, value);
                }
                Err(ParseError::TagNotFound(tag)) => {
                    debug!(field = field.key(), tag, "EXIF field not present");
                }
                Err(err @ ParseError::UnknownFieldType { .. }) => {
                    warn!(field = field.key(), %err, "skipping EXIF field");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

use tracing::{debug, trace};

use crate::core::{ByteCursor, ParseError, Result};
use crate::types::{ColorMode, FormatKind, ParsedImageMetadata};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub const IHDR_CHUNK_TYPE: &[u8; 4] = b"IHDR";

/// Length (4) + type (4) + CRC (4) around every payload.
pub const CHUNK_OVERHEAD: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

#[inline]
pub fn can_parse(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

pub fn color_mode_for_color_type(color_type: u8) -> ColorMode {
    match color_type {
        0 => ColorMode::Grayscale,
        2 => ColorMode::Rgb,
        3 => ColorMode::Indexed,
        4 => ColorMode::GrayscaleAlpha,
        6 => ColorMode::RgbAlpha,
        _ => ColorMode::Unknown,
    }
}

/// Chunk header; the payload and CRC are not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngChunk {
    pub offset: usize,
    pub length: u32,
    pub chunk_type: [u8; 4],
}

impl PngChunk {
    #[inline]
    pub fn payload_offset(&self) -> usize {
        self.offset + CHUNK_HEADER_LEN
    }
}

/// Iterates chunk headers from just past the signature. Running off the end
/// of the buffer yields one `TruncatedStream` error, then the iterator is done.
pub struct PngChunkIterator<'a> {
    cursor: ByteCursor<'a>,
    pos: Option<usize>,
}

impl<'a> PngChunkIterator<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            pos: Some(PNG_SIGNATURE.len()),
        }
    }

    fn read_chunk(&self, pos: usize) -> Result<PngChunk> {
        Ok(PngChunk {
            offset: pos,
            length: self.cursor.u32_be(pos)?,
            chunk_type: self.cursor.array::<4>(pos + 4)?,
        })
    }
}

impl Iterator for PngChunkIterator<'_> {
    type Item = Result<PngChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos.take()?;
        let chunk = match self.read_chunk(pos) {
            Ok(chunk) => chunk,
            Err(err) => return Some(Err(err)),
        };

        let advance = (chunk.length as usize).checked_add(CHUNK_OVERHEAD);
        self.pos = advance.and_then(|n| pos.checked_add(n));
        if self.pos.is_none() {
            return Some(Err(ParseError::truncated(
                pos,
                chunk.length as usize,
                self.cursor.len(),
            )));
        }
        Some(Ok(chunk))
    }
}

/// IHDR fields the metadata is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
}

impl ImageHeader {
    pub fn read(cursor: &ByteCursor<'_>, payload: usize) -> Result<Self> {
        Ok(Self {
            width: cursor.u32_be(payload)?,
            height: cursor.u32_be(payload + 4)?,
            bit_depth: cursor.u8_at(payload + 8)?,
            color_type: cursor.u8_at(payload + 9)?,
        })
    }
}

/// Walks PNG chunks until IHDR. CRCs are never checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngParser;

impl PngParser {
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    pub fn parse(&self, data: &[u8]) -> Result<ParsedImageMetadata> {
        let cursor = ByteCursor::new(data);

        for chunk in PngChunkIterator::new(data) {
            let chunk = chunk?;
            trace!(offset = chunk.offset, length = chunk.length, chunk_type = ?chunk.chunk_type, "chunk");

            if &chunk.chunk_type != IHDR_CHUNK_TYPE {
                continue;
            }

            let header = ImageHeader::read(&cursor, chunk.payload_offset())?;
            debug!(
                width = header.width,
                height = header.height,
                bit_depth = header.bit_depth,
                color_type = header.color_type,
                "image header"
            );

            let mut metadata = ParsedImageMetadata::new(FormatKind::Png);
            metadata.set_frame(
                header.width,
                header.height,
                color_mode_for_color_type(header.color_type),
            );
            return Ok(metadata);
        }

        // The iterator only ends after yielding an error, which `?` returned above.
        Err(ParseError::truncated(data.len(), CHUNK_HEADER_LEN, data.len()))
    }
}

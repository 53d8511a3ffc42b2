//! EXIF (TIFF-structured) metadata embedded in JPEG APP1 segments.
//!
//! The block starts with a two-byte byte-order mark (`II` or `MM`), the TIFF
//! magic and a 4-byte offset to the 0th IFD. Every pointer inside the block
//! is relative to the byte-order mark, which [`ExifReader`] records as its
//! base offset.

use serde::{Deserialize, Serialize};

mod reader;
mod value;

pub use reader::{ExifReader, IfdEntry};
pub use value::{FieldType, SRational, TagValue, URational};

/// Header preceding the TIFF block inside an APP1 segment.
pub const EXIF_HEADER: [u8; 6] = *b"Exif\0\0";
/// Byte-order mark, TIFF magic and 0th-IFD offset.
pub const TIFF_HEADER_LEN: usize = 8;
/// tag-id, type-id, count, value-or-pointer.
pub const IFD_ENTRY_LEN: usize = 12;

pub const TAG_GPS_LATITUDE: u16 = 2;
pub const TAG_GPS_LONGITUDE: u16 = 4;
pub const TAG_MAKE: u16 = 271;
pub const TAG_MODEL: u16 = 272;
pub const TAG_EXIF_IFD_POINTER: u16 = 34665;
pub const TAG_GPS_IFD_POINTER: u16 = 34853;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 36867;

pub const DEFAULT_MAX_IFD_DEPTH: usize = 32;
pub const DEFAULT_MAX_IFD_VISITS: usize = 256;

/// Tags whose value is the offset of a nested IFD.
#[inline]
pub fn is_ifd_pointer(tag: u16) -> bool {
    matches!(tag, TAG_EXIF_IFD_POINTER | TAG_GPS_IFD_POINTER)
}

/// Probe for a TIFF byte-order mark (`II` or `MM`) at the start of `data`.
#[inline]
pub fn has_tiff_byte_order(data: &[u8]) -> bool {
    matches!(data, [b'I', b'I', ..] | [b'M', b'M', ..])
}

/// Tuning for the IFD walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifOptions {
    /// Maximum combined depth of chained and nested IFDs before the walk
    /// gives up with `IfdDepthExceeded`.
    pub max_ifd_depth: usize,
    /// Maximum number of directories one search may visit.
    pub max_ifd_visits: usize,
    /// Locate the 0th IFD through the header's offset field instead of
    /// assuming it follows the 8-byte header.
    pub honor_ifd0_offset: bool,
}

impl Default for ExifOptions {
    fn default() -> Self {
        Self {
            max_ifd_depth: DEFAULT_MAX_IFD_DEPTH,
            max_ifd_visits: DEFAULT_MAX_IFD_VISITS,
            honor_ifd0_offset: false,
        }
    }
}

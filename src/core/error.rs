use thiserror::Error;

/// Errors raised while extracting metadata from an image buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unsupported format: magic bytes match neither JPEG nor PNG")]
    UnsupportedFormat,

    #[error("Truncated stream: {needed} bytes at offset {offset} exceed buffer length {len}")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("EXIF tag {0} not found")]
    TagNotFound(u16),

    #[error("Invalid argument: tag {0} is an IFD pointer and cannot be searched directly")]
    InvalidArgument(u16),

    #[error("Unknown EXIF field type {field_type} for tag {tag}")]
    UnknownFieldType { tag: u16, field_type: u16 },

    #[error("IFD nesting exceeded the depth limit of {limit}")]
    IfdDepthExceeded { limit: usize },

    #[error("IFD walk visited more than {limit} directories")]
    IfdVisitsExceeded { limit: usize },
}

impl ParseError {
    /// Shorthand for a bounds violation at `offset`.
    #[inline]
    pub(crate) fn truncated(offset: usize, needed: usize, len: usize) -> Self {
        Self::TruncatedStream {
            offset,
            needed,
            len,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

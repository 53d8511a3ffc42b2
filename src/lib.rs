//! Structural metadata from JPEG and PNG byte buffers: dimensions, color
//! mode and, for JPEG, a handful of EXIF tags.
//!
//! ```no_run
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let meta = imgmeta::parse(&bytes).unwrap();
//! println!("{:?}x{:?} {:?}", meta.width, meta.height, meta.mode);
//! ```

pub mod config;
pub mod core;
pub mod formats;
pub mod inputs;
pub mod types;

pub use config::ParseOptions;
pub use crate::core::{ByteCursor, Endian, ParseError, Result};
pub use formats::exif::{ExifOptions, ExifReader, TagValue};
pub use formats::{detect, parse, parse_with};
pub use types::{ColorMode, ExifField, FormatKind, ParsedImageMetadata};

//! Parse options, loadable from JSON.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::formats::exif::ExifOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Resolve EXIF fields from JPEG APP1 segments.
    pub extract_exif: bool,
    pub exif: ExifOptions,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_exif: true,
            exif: ExifOptions::default(),
        }
    }
}

impl ParseOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Skips APP1 segments entirely
    pub fn without_exif(mut self) -> Self {
        self.extract_exif = false;
        self
    }

    pub fn with_max_ifd_depth(mut self, depth: usize) -> Self {
        self.exif.max_ifd_depth = depth;
        self
    }

    /// Locate the 0th IFD through the TIFF header instead of at a fixed +8.
    pub fn honoring_ifd0_offset(mut self) -> Self {
        self.exif.honor_ifd0_offset = true;
        self
    }
}

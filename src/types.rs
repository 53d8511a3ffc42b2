use std::fmt;

use serde::{Deserialize, Serialize};

use crate::formats::exif::{
    TAG_DATE_TIME_ORIGINAL, TAG_GPS_LATITUDE, TAG_GPS_LONGITUDE, TAG_MAKE, TAG_MODEL, TagValue,
};

/// Container formats the facade dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Jpeg,
    Png,
}

impl FormatKind {
    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::Jpeg => "JPEG",
            FormatKind::Png => "PNG",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Color-mode label derived from the JPEG channel count or the PNG color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    #[serde(rename = "Grayscale")]
    Grayscale,
    #[serde(rename = "Grayscale with Alpha")]
    GrayscaleAlpha,
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "RGB with Alpha")]
    RgbAlpha,
    #[serde(rename = "Indexed Color")]
    Indexed,
    #[serde(rename = "CMYK")]
    Cmyk,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ColorMode {
    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Grayscale => "Grayscale",
            ColorMode::GrayscaleAlpha => "Grayscale with Alpha",
            ColorMode::Rgb => "RGB",
            ColorMode::RgbAlpha => "RGB with Alpha",
            ColorMode::Indexed => "Indexed Color",
            ColorMode::Cmyk => "CMYK",
            ColorMode::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// EXIF fields the JPEG parser resolves, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExifField {
    Maker,
    Model,
    Latitude,
    Longitude,
    DateTimeOriginal,
}

impl ExifField {
    pub const ALL: [ExifField; 5] = [
        ExifField::Maker,
        ExifField::Model,
        ExifField::Latitude,
        ExifField::Longitude,
        ExifField::DateTimeOriginal,
    ];

    pub const fn tag(self) -> u16 {
        match self {
            ExifField::Maker => TAG_MAKE,
            ExifField::Model => TAG_MODEL,
            ExifField::Latitude => TAG_GPS_LATITUDE,
            ExifField::Longitude => TAG_GPS_LONGITUDE,
            ExifField::DateTimeOriginal => TAG_DATE_TIME_ORIGINAL,
        }
    }

    /// Key used in the serialized metadata mapping.
    pub const fn key(self) -> &'static str {
        match self {
            ExifField::Maker => "maker",
            ExifField::Model => "model",
            ExifField::Latitude => "latitude",
            ExifField::Longitude => "longitude",
            ExifField::DateTimeOriginal => "DateTimeOriginal",
        }
    }
}

/// Metadata extracted from one image buffer.
///
/// Serializes to a flat mapping; fields that were not found are omitted
/// rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedImageMetadata {
    #[serde(skip)]
    pub format: FormatKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ColorMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<TagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<TagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<TagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<TagValue>,
    #[serde(rename = "DateTimeOriginal", skip_serializing_if = "Option::is_none")]
    pub date_time_original: Option<TagValue>,
}

impl ParsedImageMetadata {
    pub fn new(format: FormatKind) -> Self {
        Self {
            format,
            width: None,
            height: None,
            mode: None,
            maker: None,
            model: None,
            latitude: None,
            longitude: None,
            date_time_original: None,
        }
    }

    pub fn set_frame(&mut self, width: u32, height: u32, mode: ColorMode) {
        self.width = Some(width);
        self.height = Some(height);
        self.mode = Some(mode);
    }

    pub fn has_frame(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    pub fn exif(&self, field: ExifField) -> Option<&TagValue> {
        self.slot(field).as_ref()
    }

    pub fn set_exif(&mut self, field: ExifField, value: TagValue) {
        *self.slot_mut(field) = Some(value);
    }

    /// Number of EXIF fields that were resolved.
    pub fn exif_count(&self) -> usize {
        ExifField::ALL
            .iter()
            .filter(|field| self.exif(**field).is_some())
            .count()
    }

    fn slot(&self, field: ExifField) -> &Option<TagValue> {
        match field {
            ExifField::Maker => &self.maker,
            ExifField::Model => &self.model,
            ExifField::Latitude => &self.latitude,
            ExifField::Longitude => &self.longitude,
            ExifField::DateTimeOriginal => &self.date_time_original,
        }
    }

    fn slot_mut(&mut self, field: ExifField) -> &mut Option<TagValue> {
        match field {
            ExifField::Maker => &mut self.maker,
            ExifField::Model => &mut self.model,
            ExifField::Latitude => &mut self.latitude,
            ExifField::Longitude => &mut self.longitude,
            ExifField::DateTimeOriginal => &mut self.date_time_original,
        }
    }
}

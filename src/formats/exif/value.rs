//! Typed decoding of IFD entry values.

use serde::Serialize;

use crate::core::{ByteCursor, Endian, ParseError, Result};

/// Inline capacity of an IFD entry's value field.
pub const INLINE_VALUE_LEN: u64 = 4;

/// TIFF/EXIF field types (type-ids 1 to 12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl FieldType {
    pub fn from_id(id: u16) -> Option<Self> {
        Some(match id {
            1 => Self::Byte,
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            6 => Self::SByte,
            7 => Self::Undefined,
            8 => Self::SShort,
            9 => Self::SLong,
            10 => Self::SRational,
            11 => Self::Float,
            12 => Self::Double,
            _ => return None,
        })
    }

    /// Size in bytes of one element.
    #[inline]
    pub const fn element_width(self) -> usize {
        match self {
            Self::Byte | Self::Ascii | Self::SByte | Self::Undefined => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Float => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }

    /// Whether `count` elements overflow the 4-byte value field and are
    /// therefore stored out of line behind a pointer.
    #[inline]
    pub fn is_indirect(self, count: u32) -> bool {
        (self.element_width() as u64) * u64::from(count) > INLINE_VALUE_LEN
    }
}

/// Unsigned rational, serialized as `[numerator, denominator]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "(u32, u32)")]
pub struct URational {
    pub numerator: u32,
    pub denominator: u32,
}

impl URational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl From<URational> for (u32, u32) {
    fn from(r: URational) -> Self {
        (r.numerator, r.denominator)
    }
}

/// Signed rational, serialized as `[numerator, denominator]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "(i32, i32)")]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SRational {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }}

impl From<SRational> for (i32, i32) {
    fn from(r: SRational) -> Self {
        (r.numerator, r.denominator)
    }
}

/// Decoded value of one IFD entry, one variant per field type.
///
/// `Undefined` carries a single signed byte even when the entry's count is
/// larger; only the first byte of the data is decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<URational>),
    SByte(Vec<i8>),
    Undefined(i8),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl TagValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            TagValue::Byte(_) => FieldType::Byte,
            TagValue::Ascii(_) => FieldType::Ascii,
            TagValue::Short(_) => FieldType::Short,
            TagValue::Long(_) => FieldType::Long,
            TagValue::Rational(_) => FieldType::Rational,
            TagValue::SByte(_) => FieldType::SByte,
            TagValue::Undefined(_) => FieldType::Undefined,
            TagValue::SShort(_) => FieldType::SShort,
            TagValue::SLong(_) => FieldType::SLong,
            TagValue::SRational(_) => FieldType::SRational,
            TagValue::Float(_) => FieldType::Float,
            TagValue::Double(_) => FieldType::Double,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_rationals(&self) -> Option<&[URational]> {
        match self {
            TagValue::Rational(v) => Some(v),
            _ => None,
        }
    }
}

/// Absolute offset of an entry's data: the value field itself when the data
/// fits in four bytes, otherwise `base` plus the pointer stored there.
pub(crate) fn data_offset(
    cursor: &ByteCursor<'_>,
    endian: Endian,
    base: usize,
    field_type: FieldType,
    count: u32,
    field_offset: usize,
) -> Result<usize> {
    if !field_type.is_indirect(count) {
        return Ok(field_offset);
    }
    let pointer = cursor.u32_at(field_offset, endian)? as usize;
    base.checked_add(pointer)
        .ok_or_else(|| ParseError::truncated(base, pointer, cursor.len()))
}

/// Decode `count` elements of `field_type` for the entry whose value field
/// sits at `field_offset`.
pub(crate) fn decode_value(
    cursor: &ByteCursor<'_>,
    endian: Endian,
    base: usize,
    field_type: FieldType,
    count: u32,
    field_offset: usize,
) -> Result<TagValue> {
    let offset = data_offset(cursor, endian, base, field_type, count, field_offset)?;
    let width = field_type.element_width();
    let count = count as usize;

    let value = match field_type {
        FieldType::Ascii => {
            let text = cursor.bytes(offset, count.saturating_sub(1))?;
            TagValue::Ascii(String::from_utf8_lossy(text).into_owned())
        }
        FieldType::Undefined => TagValue::Undefined(cursor.i8_at(offset)?),
        FieldType::Byte => TagValue::Byte(run(cursor, offset, count, width)?.to_vec()),
        FieldType::SByte => TagValue::SByte(
            run(cursor, offset, count, width)?
                .iter()
                .map(|b| *b as i8)
                .collect(),
        ),
        FieldType::Short => TagValue::Short(collect(cursor, offset, count, width, |at| {
            cursor.u16_at(at, endian)
        })?),
        FieldType::SShort => TagValue::SShort(collect(cursor, offset, count, width, |at| {
            cursor.i16_at(at, endian)
        })?),
        FieldType::Long => TagValue::Long(collect(cursor, offset, count, width, |at| {
            cursor.u32_at(at, endian)
        })?),
        FieldType::SLong => TagValue::SLong(collect(cursor, offset, count, width, |at| {
            cursor.i32_at(at, endian)
        })?),
        FieldType::Rational => TagValue::Rational(collect(cursor, offset, count, width, |at| {
            Ok(URational::new(
                cursor.u32_at(at, endian)?,
                cursor.u32_at(at + 4, endian)?,
            ))
        })?),
        FieldType::SRational => TagValue::SRational(collect(cursor, offset, count, width, |at| {
            Ok(SRational::new(
                cursor.i32_at(at, endian)?,
                cursor.i32_at(at + 4, endian)?,
            ))
        })?),
        FieldType::Float => TagValue::Float(collect(cursor, offset, count, width, |at| {
            cursor.f32_at(at, endian)
        })?),
        FieldType::Double => TagValue::Double(collect(cursor, offset, count, width, |at| {
            cursor.f64_at(at, endian)
        })?),
    };
    Ok(value)
}

/// The full `count * width` run at `offset`; checked before any element is decoded.
fn run<'a>(
    cursor: &ByteCursor<'a>,
    offset: usize,
    count: usize,
    width: usize,
) -> Result<&'a [u8]> {
    let total = count
        .checked_mul(width)
        .ok_or_else(|| ParseError::truncated(offset, usize::MAX, cursor.len()))?;
    cursor.bytes(offset, total)
}

fn collect<T>(
    cursor: &ByteCursor<'_>,
    offset: usize,
    count: usize,
    width: usize,
    read: impl Fn(usize) -> Result<T>,
) -> Result<Vec<T>> {
    run(cursor, offset, count, width)?;
    (0..count).map(|i| read(offset + i * width)).collect()
}

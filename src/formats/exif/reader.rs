use tracing::{debug, trace};

use super::value::{FieldType, TagValue, decode_value};
use super::{ExifOptions, IFD_ENTRY_LEN, TIFF_HEADER_LEN, is_ifd_pointer};
use crate::core::{ByteCursor, Endian, ParseError, Result};

/// One 12-byte IFD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    /// Absolute offset of the 4-byte value-or-pointer field.
    pub value_field: usize,
}

/// Outcome of walking one directory (and whatever it links to).
enum Lookup {
    Found(TagValue),
    Missing,
}

/// State of a single search, threaded through the recursive walk.
struct Walk {
    target: u16,
    /// Start of the directory the search is currently resting in.
    resting: usize,
    visits: usize,
}

/// Endian-aware IFD walker over an EXIF block inside a larger buffer.
///
/// Offsets stored in the block are relative to `base`, the position of the
/// byte-order mark; all offsets this reader hands out are absolute.
#[derive(Debug, Clone)]
pub struct ExifReader<'a> {
    cursor: ByteCursor<'a>,
    base: usize,
    length: usize,
    endian: Endian,
    ifd0: usize,
    position: usize,
    options: ExifOptions,
}

impl<'a> ExifReader<'a> {
    pub fn new(data: &'a [u8], base: usize, length: usize) -> Result<Self> {
        Self::with_options(data, base, length, ExifOptions::default())
    }

    pub fn with_options(
        data: &'a [u8],
        base: usize,
        length: usize,
        options: ExifOptions,
    ) -> Result<Self> {
        let cursor = ByteCursor::new(data);
        let endian = Endian::from_byte_order_mark(cursor.array::<2>(base)?);

        let ifd0 = if options.honor_ifd0_offset {
            let relative = cursor.u32_at(base + 4, endian)? as usize;
            base.checked_add(relative)
                .ok_or_else(|| ParseError::truncated(base, relative, cursor.len()))?
        } else {
            base + TIFF_HEADER_LEN
        };

        debug!(base, length, ?endian, ifd0, "EXIF block");

        Ok(Self {
            cursor,
            base,
            length,
            endian,
            ifd0,
            position: ifd0,
            options,
        })
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Declared length of the enclosing segment.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn ifd0_offset(&self) -> usize {
        self.ifd0
    }

    /// Absolute offset of the directory the next non-resetting search starts in.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reset(&mut self) {
        self.position = self.ifd0;
    }

    /// Search for `target` starting from the live cursor, or from the 0th IFD
    /// when `reset_to_start` is set.
    ///
    /// Entries pointing at the Exif or GPS sub-IFD are descended into; a miss
    /// there resumes the outer directory. After the last entry the
    /// next-IFD link is followed until it is zero.
    pub fn search_tag(&mut self, target: u16, reset_to_start: bool) -> Result<TagValue> {
        if is_ifd_pointer(target) {
            return Err(ParseError::InvalidArgument(target));
        }
        if reset_to_start {
            self.reset();
        }

        let mut walk = Walk {
            target,
            resting: self.position,
            visits: 0,
        };
        let outcome = self.walk_directory(&mut walk, self.position, 0);
        self.position = walk.resting;

        match outcome? {
            Lookup::Found(value) => Ok(value),
            Lookup::Missing => Err(ParseError::TagNotFound(target)),
        }
    }

    /// Search from the 0th IFD without moving the live cursor.
    pub fn find(&self, target: u16) -> Result<TagValue> {
        let mut reader = self.clone();
        reader.search_tag(target, true)
    }

    /// Read the entry at `offset`.
    pub fn entry_at(&self, offset: usize) -> Result<IfdEntry> {
        Ok(IfdEntry {
            tag: self.cursor.u16_at(offset, self.endian)?,
            field_type: self.cursor.u16_at(offset + 2, self.endian)?,
            count: self.cursor.u32_at(offset + 4, self.endian)?,
            value_field: offset + 8,
        })
    }

    /// Decode the value of an entry.
    pub fn value_of(&self, entry: &IfdEntry) -> Result<TagValue> {
        let field_type =
            FieldType::from_id(entry.field_type).ok_or(ParseError::UnknownFieldType {
                tag: entry.tag,
                field_type: entry.field_type,
            })?;
        decode_value(
            &self.cursor,
            self.endian,
            self.base,
            field_type,
            entry.count,
            entry.value_field,
        )
    }

    fn walk_directory(&self, walk: &mut Walk, directory: usize, depth: usize) -> Result<Lookup> {
        if depth > self.options.max_ifd_depth {
            return Err(ParseError::IfdDepthExceeded {
                limit: self.options.max_ifd_depth,
            });
        }
        walk.visits += 1;
        if walk.visits > self.options.max_ifd_visits {
            return Err(ParseError::IfdVisitsExceeded {
                limit: self.options.max_ifd_visits,
            });
        }
        walk.resting = directory;

        let count = self.cursor.u16_at(directory, self.endian)? as usize;
        let entries = directory + 2;

        for i in 0..count {
            let entry = self.entry_at(entries + i * IFD_ENTRY_LEN)?;
            trace!(
                directory,
                index = i,
                tag = entry.tag,
                field_type = entry.field_type,
                count = entry.count,
                "IFD entry"
            );

            if is_ifd_pointer(entry.tag) {
                let sub = self.relative(self.cursor.u32_at(entry.value_field, self.endian)?)?;
                debug!(pointer_tag = entry.tag, sub, "descending into sub-IFD");
                match self.walk_directory(walk, sub, depth + 1)? {
                    Lookup::Found(value) => return Ok(Lookup::Found(value)),
                    Lookup::Missing => {
                        walk.resting = directory;
                        continue;
                    }
                }
            }

            if entry.tag == walk.target {
                return self.value_of(&entry).map(Lookup::Found);
            }
        }

        let next = self
            .cursor
            .u32_at(entries + count * IFD_ENTRY_LEN, self.endian)?;
        if next == 0 {
            return Ok(Lookup::Missing);
        }

        let next = self.relative(next)?;
        debug!(next, "following next-IFD link");
        self.walk_directory(walk, next, depth + 1)
    }

    /// Absolute offset of a block-relative pointer.
    fn relative(&self, pointer: u32) -> Result<usize> {
        self.base
            .checked_add(pointer as usize)
            .ok_or_else(|| ParseError::truncated(self.base, pointer as usize, self.cursor.len()))
    }
}

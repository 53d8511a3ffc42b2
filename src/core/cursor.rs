//! Bounds-checked field extraction over a borrowed byte buffer.
//!
//! Every read takes an absolute offset into the buffer and fails with
//! [`ParseError::TruncatedStream`] instead of panicking when the requested
//! width runs past the end.

use super::error::{ParseError, Result};

/// Byte order of multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

impl Endian {
    /// TIFF byte-order mark: `II` is little-endian, anything else falls back
    /// to big-endian.
    #[inline]
    pub fn from_byte_order_mark(mark: [u8; 2]) -> Self {
        if mark == *b"II" {
            Endian::Little
        } else {
            Endian::Big
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    #[inline]
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| ParseError::truncated(offset, len, self.data.len()))?;
        self.data
            .get(offset..end)
            .ok_or_else(|| ParseError::truncated(offset, len, self.data.len()))
    }

    #[inline]
    pub fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    /// True when the buffer holds `prefix` at `offset`. Short buffers never match.
    #[inline]
    pub fn starts_with_at(&self, offset: usize, prefix: &[u8]) -> bool {
        self.bytes(offset, prefix.len())
            .map(|found| found == prefix)
            .unwrap_or(false)
    }

    #[inline]
    pub fn u8_at(&self, offset: usize) -> Result<u8> {
        Ok(self.array::<1>(offset)?[0])
    }

    #[inline]
    pub fn i8_at(&self, offset: usize) -> Result<i8> {
        Ok(i8::from_ne_bytes(self.array::<1>(offset)?))
    }

    #[inline]
    pub fn u16_at(&self, offset: usize, endian: Endian) -> Result<u16> {
        let raw = self.array::<2>(offset)?;
        Ok(match endian {
            Endian::Big => u16::from_be_bytes(raw),
            Endian::Little => u16::from_le_bytes(raw),
        })
    }

    #[inline]
    pub fn i16_at(&self, offset: usize, endian: Endian) -> Result<i16> {
        let raw = self.array::<2>(offset)?;
        Ok(match endian {
            Endian::Big => i16::from_be_bytes(raw),
            Endian::Little => i16::from_le_bytes(raw),
        })
    }

    #[inline]
    pub fn u32_at(&self, offset: usize, endian: Endian) -> Result<u32> {
        let raw = self.array::<4>(offset)?;
        Ok(match endian {
            Endian::Big => u32::from_be_bytes(raw),
            Endian::Little => u32::from_le_bytes(raw),
        })
    }

    #[inline]
    pub fn i32_at(&self, offset: usize, endian: Endian) -> Result<i32> {
        let raw = self.array::<4>(offset)?;
        Ok(match endian {
            Endian::Big => i32::from_be_bytes(raw),
            Endian::Little => i32::from_le_bytes(raw),
        })
    }

    #[inline]
    pub fn f32_at(&self, offset: usize, endian: Endian) -> Result<f32> {
        let raw = self.array::<4>(offset)?;
        Ok(match endian {
            Endian::Big => f32::from_be_bytes(raw),
            Endian::Little => f32::from_le_bytes(raw),
        })
    }

    #[inline]
    pub fn f64_at(&self, offset: usize, endian: Endian) -> Result<f64> {
        let raw = self.array::<8>(offset)?;
        Ok(match endian {
            Endian::Big => f64::from_be_bytes(raw),
            Endian::Little => f64::from_le_bytes(raw),
        })
    }

    #[inline]
    pub fn u16_be(&self, offset: usize) -> Result<u16> {
        self.u16_at(offset, Endian::Big)
    }

    #[inline]
    pub fn u32_be(&self, offset: usize) -> Result<u32> {
        self.u32_at(offset, Endian::Big)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_both_byte_orders() {
        let cursor = ByteCursor::new(&[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(cursor.u16_at(0, Endian::Big).unwrap(), 0x1234);
        assert_eq!(cursor.u16_at(0, Endian::Little).unwrap(), 0x3412);
        assert_eq!(cursor.u32_at(0, Endian::Big).unwrap(), 0x1234_5678);
        assert_eq!(cursor.u32_at(0, Endian::Little).unwrap(), 0x7856_3412);
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let cursor = ByteCursor::new(&[0x00, 0x01, 0x02]);
        assert_eq!(
            cursor.u32_be(0),
            Err(ParseError::TruncatedStream {
                offset: 0,
                needed: 4,
                len: 3
            })
        );
        assert!(cursor.u16_be(2).is_err());
        assert!(cursor.u8_at(2).is_ok());
    }

    #[test]
    fn test_offset_overflow_is_truncated() {
        let cursor = ByteCursor::new(&[0x00; 4]);
        assert!(matches!(
            cursor.bytes(usize::MAX, 2),
            Err(ParseError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_empty_buffer() {
        let cursor = ByteCursor::new(&[]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.len(), 0);
        assert!(cursor.u8_at(0).is_err());
        assert!(!ByteCursor::new(&[0x00]).is_empty());
    }

    #[test]
    fn test_signed_reads() {
        let cursor = ByteCursor::new(&[0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(cursor.i8_at(0).unwrap(), -1);
        assert_eq!(cursor.i16_at(0, Endian::Big).unwrap(), -2);
        assert_eq!(cursor.i32_at(2, Endian::Little).unwrap(), -1);
    }

    #[test]
    fn test_byte_order_mark() {
        assert_eq!(Endian::from_byte_order_mark(*b"II"), Endian::Little);
        assert_eq!(Endian::from_byte_order_mark(*b"MM"), Endian::Big);
        assert_eq!(Endian::from_byte_order_mark(*b"XX"), Endian::Big);
    }

    #[test]
    fn test_starts_with_at_short_buffer() {
        let cursor = ByteCursor::new(b"Exi");
        assert!(!cursor.starts_with_at(0, b"Exif"));
        assert!(cursor.starts_with_at(1, b"xi"));
    }
}

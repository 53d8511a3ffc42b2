#![allow(dead_code)]

//! Builders for synthetic JPEG, PNG and TIFF/EXIF buffers.

pub const PNG_SIG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Where an entry's data lives once laid out.
pub enum Value {
    /// Raw 4-byte value field, already in the block's byte order.
    Inline([u8; 4]),
    /// Out-of-line data; the value field receives its block-relative offset.
    Data(Vec<u8>),
    /// Pointer to the IFD at this index of the layout.
    Ifd(usize),
}

pub struct Entry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub value: Value,
}

impl Entry {
    pub fn new(tag: u16, field_type: u16, count: u32, value: Value) -> Self {
        Self {
            tag,
            field_type,
            count,
            value,
        }
    }

    pub fn pointer(tag: u16, ifd: usize) -> Self {
        Self::new(tag, 4, 1, Value::Ifd(ifd))
    }
}

pub struct Ifd {
    pub entries: Vec<Entry>,
    /// Index of the IFD the next-IFD link points at.
    pub next: Option<usize>,
}

impl Ifd {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            next: None,
        }
    }

    pub fn linked(entries: Vec<Entry>, next: usize) -> Self {
        Self {
            entries,
            next: Some(next),
        }
    }
}

pub fn u16s(le: bool, values: &[u16]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| if le { v.to_le_bytes() } else { v.to_be_bytes() })
        .collect()
}

pub fn u32s(le: bool, values: &[u32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| if le { v.to_le_bytes() } else { v.to_be_bytes() })
        .collect()
}

pub fn inline(bytes: &[u8]) -> Value {
    let mut field = [0u8; 4];
    field[..bytes.len()].copy_from_slice(bytes);
    Value::Inline(field)
}

pub fn ascii(text: &str) -> (u32, Value) {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    let count = bytes.len() as u32;
    if bytes.len() <= 4 {
        (count, inline(&bytes))
    } else {
        (count, Value::Data(bytes))
    }
}

/// Lay out a TIFF block: header, the IFDs in order, then all out-of-line data.
pub fn build_tiff(le: bool, ifds: &[Ifd]) -> Vec<u8> {
    build_tiff_with_gap(le, ifds, 0)
}

/// Like [`build_tiff`] but leaves `gap` zero bytes between the header and the
/// 0th IFD, recording the real offset in the header.
pub fn build_tiff_with_gap(le: bool, ifds: &[Ifd], gap: usize) -> Vec<u8> {
    let mut offsets = Vec::with_capacity(ifds.len());
    let mut at = 8 + gap;
    for ifd in ifds {
        offsets.push(at);
        at += 2 + 12 * ifd.entries.len() + 4;
    }
    let mut data_area: Vec<u8> = Vec::new();
    let data_start = at;

    let mut out = Vec::new();
    out.extend_from_slice(if le { b"II" } else { b"MM" });
    out.extend(u16s(le, &[42]));
    out.extend(u32s(le, &[(8 + gap) as u32]));
    out.extend(std::iter::repeat_n(0u8, gap));

    for ifd in ifds {
        out.extend(u16s(le, &[ifd.entries.len() as u16]));
        for entry in &ifd.entries {
            out.extend(u16s(le, &[entry.tag, entry.field_type]));
            out.extend(u32s(le, &[entry.count]));
            match &entry.value {
                Value::Inline(field) => out.extend_from_slice(field),
                Value::Data(bytes) => {
                    let offset = (data_start + data_area.len()) as u32;
                    data_area.extend_from_slice(bytes);
                    out.extend(u32s(le, &[offset]));
                }
                Value::Ifd(index) => out.extend(u32s(le, &[offsets[*index] as u32])),
            }
        }
        let next = ifd.next.map(|i| offsets[i] as u32).unwrap_or(0);
        out.extend(u32s(le, &[next]));
    }
    out.extend(data_area);
    out
}

pub fn sof_segment(marker: u8, width: u16, height: u16, channels: u8) -> Vec<u8> {
    let mut seg = vec![0xFF, marker];
    let length = 8 + 3 * channels as u16;
    seg.extend_from_slice(&length.to_be_bytes());
    seg.push(8);
    seg.extend_from_slice(&height.to_be_bytes());
    seg.extend_from_slice(&width.to_be_bytes());
    seg.push(channels);
    for id in 0..channels {
        seg.extend_from_slice(&[id + 1, 0x11, 0x00]);
    }
    seg
}

pub fn app1_exif_segment(tiff: &[u8]) -> Vec<u8> {
    let mut seg = vec![0xFF, 0xE1];
    seg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    seg.extend_from_slice(b"Exif\x00\x00");
    seg.extend_from_slice(tiff);
    seg
}

pub fn app0_jfif_segment() -> Vec<u8> {
    let mut seg = vec![0xFF, 0xE0, 0x00, 0x10];
    seg.extend_from_slice(b"JFIF\x00\x01\x01\x00\x00\x48\x00\x48\x00\x00");
    seg
}

pub fn sos_and_eoi() -> Vec<u8> {
    let mut tail = vec![0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00];
    tail.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
    tail.extend_from_slice(&[0xFF, 0xD9]);
    tail
}

pub fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    for seg in segments {
        data.extend_from_slice(seg);
    }
    data.extend(sos_and_eoi());
    data
}

pub fn make_png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());
    chunk
}

pub fn ihdr_chunk(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.push(bit_depth);
    payload.push(color_type);
    payload.extend_from_slice(&[0, 0, 0]);
    make_png_chunk(b"IHDR", &payload)
}

pub fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut data = PNG_SIG.to_vec();
    for chunk in chunks {
        data.extend_from_slice(chunk);
    }
    data.extend(make_png_chunk(b"IEND", &[]));
    data
}

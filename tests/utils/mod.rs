#![allow(dead_code)]

//! Synthetic TIFF files in host byte order

use std::io::Cursor;

pub use tiffstack::*;

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub rows_per_strip: Option<u32>,
    pub compression: Option<u16>,
    /// Strip data as stored in the file
    pub strips: Vec<Vec<u8>>,
}

impl Frame {
    /// Single strip grayscale frame
    pub fn gray(width: u32, height: u32, bits_per_sample: u16, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bits_per_sample,
            samples_per_pixel: 1,
            rows_per_strip: Some(height),
            compression: None,
            strips: vec![data],
        }
    }
}

pub struct Tiff {
    pub data: Vec<u8>,
    /// Position of every directory
    pub ifd_offsets: Vec<u32>,
    /// Position of the next-directory field of every directory
    pub next_fields: Vec<usize>,
}

impl Tiff {
    pub fn build(frames: &[Frame]) -> Self {
        let mut data = Vec::new();
        data.extend_from_slice(&ByteOrder::host().marker());
        data.extend_from_slice(&42_u16.to_ne_bytes());
        data.extend_from_slice(&0_u32.to_ne_bytes());

        let mut ifd_offsets = Vec::new();
        let mut next_fields: Vec<usize> = Vec::new();

        for frame in frames {
            let mut strip_offsets = Vec::new();
            for strip in &frame.strips {
                strip_offsets.push(pos(&data));
                data.extend_from_slice(strip);
            }
            let strip_byte_counts: Vec<u32> = frame
                .strips
                .iter()
                .map(|x| u32::try_from(x.len()).unwrap())
                .collect();

            let offsets_value = long_array(&mut data, &strip_offsets);
            let counts_value = long_array(&mut data, &strip_byte_counts);
            let n_strips = u32::try_from(frame.strips.len()).unwrap();

            let mut entries = vec![
                entry(256, 4, 1, frame.width.to_ne_bytes()),
                entry(257, 4, 1, frame.height.to_ne_bytes()),
                entry(258, 3, 1, short(frame.bits_per_sample)),
            ];
            if let Some(compression) = frame.compression {
                entries.push(entry(259, 3, 1, short(compression)));
            }
            entries.push(entry(262, 3, 1, short(1)));
            entries.push(entry(273, 4, n_strips, offsets_value));
            entries.push(entry(277, 3, 1, short(frame.samples_per_pixel)));
            if let Some(rows_per_strip) = frame.rows_per_strip {
                entries.push(entry(278, 4, 1, rows_per_strip.to_ne_bytes()));
            }
            entries.push(entry(279, 4, n_strips, counts_value));

            // Directories start on a word boundary
            if data.len() % 2 == 1 {
                data.push(0);
            }

            let ifd_offset = pos(&data);
            match next_fields.last() {
                Some(&field) => patch_u32(&mut data, field, ifd_offset),
                None => patch_u32(&mut data, 4, ifd_offset),
            }

            data.extend_from_slice(&u16::try_from(entries.len()).unwrap().to_ne_bytes());
            for entry in entries {
                data.extend_from_slice(&entry);
            }
            next_fields.push(data.len());
            data.extend_from_slice(&0_u32.to_ne_bytes());
            ifd_offsets.push(ifd_offset);
        }

        Self {
            data,
            ifd_offsets,
            next_fields,
        }
    }

    pub fn reader(self) -> Result<Reader<Cursor<Vec<u8>>>> {
        Reader::new(Cursor::new(self.data))
    }
}

pub fn pos(data: &[u8]) -> u32 {
    u32::try_from(data.len()).unwrap()
}

pub fn patch_u32(data: &mut [u8], at: usize, value: u32) {
    data[at..at + 4].copy_from_slice(&value.to_ne_bytes());
}

pub fn entry(tag: u16, field_type: u16, count: u32, value: [u8; 4]) -> [u8; 12] {
    let mut entry = [0; 12];
    entry[0..2].copy_from_slice(&tag.to_ne_bytes());
    entry[2..4].copy_from_slice(&field_type.to_ne_bytes());
    entry[4..8].copy_from_slice(&count.to_ne_bytes());
    entry[8..12].copy_from_slice(&value);
    entry
}

pub fn short(value: u16) -> [u8; 4] {
    let [a, b] = value.to_ne_bytes();
    [a, b, 0, 0]
}

/// Stores LONG values inline if there is only one, elsewhere otherwise
fn long_array(data: &mut Vec<u8>, values: &[u32]) -> [u8; 4] {
    if let [value] = values {
        return value.to_ne_bytes();
    }

    let offset = pos(data);
    for value in values {
        data.extend_from_slice(&value.to_ne_bytes());
    }
    offset.to_ne_bytes()
}

pub fn bytes_u16(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_ne_bytes()).collect()
}

pub fn bytes_u32(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_ne_bytes()).collect()
}

pub fn bytes_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_ne_bytes()).collect()
}

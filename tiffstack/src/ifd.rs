//! Image file directories
//!
//! Every frame of a file is described by one directory: a table of 12 byte
//! field entries followed by the offset of the next directory.

use std::io::{Read, Seek};

use tiffstack_common::math::*;
use tiffstack_common::read::ReadExt;

use crate::decode::{decode_array, decode_signed, decode_unsigned};
use crate::tag::{Compression, PhotometricInterpretation, Tag};
use crate::{ByteOrder, Error, FieldType, Result};

/// One `(tag, type, count, value or offset)` record of a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry {
    pub tag: Tag,
    pub field_type: FieldType,
    pub count: u32,
    pub value_offset: ValueOffset,
}

/// This can either be a value or an offset where to find the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOffset {
    /// Raw bytes of a value stored inside the entry
    Value([u8; 4]),
    /// Position of the value in the file
    Offset(u32),
}

impl FieldEntry {
    pub const SIZE: usize = 12;

    pub fn parse(bytes: [u8; Self::SIZE], byte_order: ByteOrder) -> Self {
        let [t0, t1, f0, f1, c0, c1, c2, c3, v0, v1, v2, v3] = bytes;

        let field_type = FieldType::from(byte_order.read_u16([f0, f1]));
        let count = byte_order.read_u32([c0, c1, c2, c3]);
        let value = [v0, v1, v2, v3];

        let value_offset = if field_type.is_inline(count) {
            ValueOffset::Value(value)
        } else {
            ValueOffset::Offset(byte_order.read_u32(value))
        };

        Self {
            tag: Tag(byte_order.read_u16([t0, t1])),
            field_type,
            count,
            value_offset,
        }
    }

    /// Byte size of all values of this entry
    pub fn data_len(&self) -> Result<usize> {
        let len = self
            .field_type
            .data_len(self.count)
            .ok_or(Error::UnsupportedFieldType(self.field_type.code()))?;
        Ok(len.usize()?)
    }
}

/// Metadata of one frame
///
/// Scalar fields are `None` until the directory defines them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Directory {
    /// Position of this directory in the file
    pub byte_offset: u64,
    /// Position of the next directory, 0 for the last one
    pub next_byte_offset: u64,
    /// Number of entries in the field table
    pub field_count: u16,
    pub strip_offsets: Vec<u64>,
    pub strip_byte_counts: Vec<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bits_per_sample: Option<u32>,
    pub compression: Option<u32>,
    pub photometric_interpretation: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub rows_per_strip: Option<u32>,
}

impl Directory {
    /// Parse the directory at `byte_offset`
    pub fn read<R: Read + Seek>(
        source: &mut R,
        byte_offset: u64,
        host: ByteOrder,
        file: ByteOrder,
    ) -> Result<Self> {
        source.seek_start(byte_offset)?;
        let field_count = file.read_u16(source.read_bytes()?);

        tracing::debug!("Reading directory at byte {byte_offset} with {field_count} entries");

        // Entries and the four bytes of the next offset are read at once
        let entries_len = usize::from(field_count).safe_mul(FieldEntry::SIZE)?;
        let mut table = vec![0; entries_len.safe_add(4)?];
        source.read_exact(&mut table)?;
        let (entries, next) = table.split_at(entries_len);

        let mut directory = Self {
            byte_offset,
            field_count,
            ..Default::default()
        };

        for raw in entries.chunks_exact(FieldEntry::SIZE) {
            let mut bytes = [0; FieldEntry::SIZE];
            bytes.copy_from_slice(raw);
            let entry = FieldEntry::parse(bytes, file);
            directory.apply_entry(source, &entry, host, file)?;
        }

        directory.next_byte_offset = decode_unsigned(FieldType::Long, next)?;

        if directory.strip_offsets.len() != directory.strip_byte_counts.len() {
            return Err(Error::StripCountMismatch {
                byte_offset,
                offsets: directory.strip_offsets.len(),
                byte_counts: directory.strip_byte_counts.len(),
            });
        }

        tracing::debug!(
            "Directory at byte {byte_offset} has {} strips, next directory at {}",
            directory.strip_offsets.len(),
            directory.next_byte_offset
        );

        Ok(directory)
    }

    fn apply_entry<R: Read + Seek>(
        &mut self,
        source: &mut R,
        entry: &FieldEntry,
        host: ByteOrder,
        file: ByteOrder,
    ) -> Result<()> {
        let tag = entry.tag;

        if let Some(field) = self.scalar_mut(tag) {
            match entry.value_offset {
                ValueOffset::Value(bytes) if entry.count == 1 => {
                    let value = decode_signed(entry.field_type, &bytes)?;
                    let value = value
                        .u32()
                        .map_err(|_| Error::InvalidFieldValue { tag: tag.0, value })?;
                    *field = Some(value);
                }
                _ => tracing::warn!(
                    "Skipping {tag} with {} values of type {:?}",
                    entry.count,
                    entry.field_type
                ),
            }
        } else if tag.is_strip_array() {
            let values = read_strip_array(source, entry, host, file)?;
            if tag == Tag::STRIP_OFFSETS {
                self.strip_offsets = values;
            } else {
                self.strip_byte_counts = values;
            }
        } else {
            tracing::trace!("Ignoring {tag}");
        }

        Ok(())
    }

    fn scalar_mut(&mut self, tag: Tag) -> Option<&mut Option<u32>> {
        Some(match tag {
            Tag::IMAGE_WIDTH => &mut self.width,
            Tag::IMAGE_LENGTH => &mut self.height,
            Tag::BITS_PER_SAMPLE => &mut self.bits_per_sample,
            Tag::COMPRESSION => &mut self.compression,
            Tag::PHOTOMETRIC_INTERPRETATION => &mut self.photometric_interpretation,
            Tag::SAMPLES_PER_PIXEL => &mut self.samples_per_pixel,
            Tag::ROWS_PER_STRIP => &mut self.rows_per_strip,
            _ => return None,
        })
    }

    pub fn n_strips(&self) -> usize {
        self.strip_offsets.len()
    }

    /// Largest strip of this directory, `None` without strips
    pub fn max_strip_byte_count(&self) -> Option<u64> {
        self.strip_byte_counts.iter().max().copied()
    }

    /// `width * height * samples_per_pixel`, `None` if any of them is unset
    pub fn n_samples(&self) -> Option<Result<usize>> {
        let (width, height, samples_per_pixel) =
            (self.width?, self.height?, self.samples_per_pixel?);
        Some(sample_count(width, height, samples_per_pixel))
    }

    /// Compression scheme, defaulting to none if unset
    ///
    /// Values outside of the `u16` range also map to none. Check
    /// [`Self::compression`] directly to tell them apart.
    pub fn compression_scheme(&self) -> Compression {
        self.compression
            .and_then(|x| x.u16().ok())
            .map(Compression::from)
            .unwrap_or_default()
    }

    pub fn photometric(&self) -> Option<PhotometricInterpretation> {
        self.photometric_interpretation
            .and_then(|x| x.u16().ok())
            .map(PhotometricInterpretation::from)
    }
}

fn sample_count(width: u32, height: u32, samples_per_pixel: u32) -> Result<usize> {
    let (width, samples_per_pixel) = (width.usize()?, samples_per_pixel.usize()?);
    let height = height.usize()?;
    checked![height];
    Ok((height * width * samples_per_pixel).check()?)
}

/// Read values of [`Tag::STRIP_OFFSETS`] or [`Tag::STRIP_BYTE_COUNTS`]
fn read_strip_array<R: Read + Seek>(
    source: &mut R,
    entry: &FieldEntry,
    host: ByteOrder,
    file: ByteOrder,
) -> Result<Vec<u64>> {
    if !entry.field_type.is_unsigned_integer() {
        return Err(Error::InvalidStripFieldType {
            tag: entry.tag.0,
            field_type: entry.field_type.code(),
        });
    }

    let count = entry.count.usize()?;

    match entry.value_offset {
        ValueOffset::Value(bytes) => {
            if count == 1 {
                return Ok(vec![decode_unsigned(entry.field_type, &bytes)?]);
            }
            // Two SHORTs or up to four BYTEs can share the inline value
            let mut values = vec![0; count];
            decode_array(entry.field_type, count, host, file, &bytes, &mut values)?;
            Ok(values)
        }
        ValueOffset::Offset(offset) => {
            let bytes = source.read_vec_at(offset, entry.data_len()?)?;
            let mut values = vec![0; count];
            decode_array(entry.field_type, count, host, file, &bytes, &mut values)?;
            Ok(values)
        }
    }
}

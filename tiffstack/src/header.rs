use crate::{ByteOrder, Error, Result};

pub const MAGIC: u16 = 42;

/// The eight bytes at the start of every TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub byte_order: ByteOrder,
    /// Byte offset of the first directory, never zero
    pub first_ifd_offset: u32,
}

impl Header {
    pub const SIZE: usize = 8;

    /// Validate the header against the byte order of `host`
    ///
    /// The byte order is checked before the magic number since files in the
    /// other byte order cannot be read at all.
    pub fn parse(bytes: [u8; Self::SIZE], host: ByteOrder) -> Result<Self> {
        let [b0, b1, b2, b3, b4, b5, b6, b7] = bytes;

        let byte_order = ByteOrder::from_marker([b0, b1]).ok_or_else(|| {
            Error::NotATiffFile(format!("unknown byte order marker {:x?}", [b0, b1]))
        })?;

        if byte_order != host {
            return Err(Error::UnsupportedEndianness {
                host,
                file: byte_order,
            });
        }

        let magic = byte_order.read_u16([b2, b3]);
        if magic != MAGIC {
            return Err(Error::NotATiffFile(format!("magic number {magic} is not 42")));
        }

        let first_ifd_offset = byte_order.read_u32([b4, b5, b6, b7]);
        if first_ifd_offset == 0 {
            return Err(Error::EmptyDirectoryChain);
        }

        Ok(Self {
            byte_order,
            first_ifd_offset,
        })
    }
}

use std::io::{Read, Seek, SeekFrom};

use crate::math::*;

/// Positioned reads on seekable byte sources
pub trait ReadExt: Read + Seek + Sized {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let buf = &mut [0; N];
        self.read_exact(buf)?;
        Ok(*buf)
    }

    /// Move to absolute position `pos` from the start of the source
    fn seek_start(&mut self, pos: impl ToU64) -> Result<(), ReadError> {
        self.seek(SeekFrom::Start(pos.u64()?))?;
        Ok(())
    }

    /// Read exactly `len` bytes at absolute position `pos`
    ///
    /// The buffer only grows with the data actually read, so a bogus `len`
    /// ends in an error instead of a huge allocation.
    ///
    /// ```
    /// # use std::io::Cursor;
    /// # use tiffstack_common::read::*;
    /// let mut s = Cursor::new(b"II*\0\x08\0\0\0".to_vec());
    /// assert_eq!(s.read_vec_at(2_u32, 2).unwrap(), b"*\0");
    /// ```
    fn read_vec_at(&mut self, pos: impl ToU64, len: usize) -> Result<Vec<u8>, ReadError> {
        let mut buf = Vec::new();
        self.read_into_at(pos, len, &mut buf)?;
        Ok(buf)
    }

    /// Replace the content of `buf` with `len` bytes from position `pos`
    ///
    /// Keeps the allocation of `buf` for reuse.
    fn read_into_at(
        &mut self,
        pos: impl ToU64,
        len: usize,
        buf: &mut Vec<u8>,
    ) -> Result<(), ReadError> {
        self.seek_start(pos)?;
        buf.clear();
        self.by_ref().take(len.u64()?).read_to_end(buf)?;
        if buf.len() != len {
            return Err(ReadError::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        Ok(())
    }
}

impl<T: Read + Seek> ReadExt for T {}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_bytes_advances() {
        let mut s = Cursor::new([1_u8, 2, 3, 4, 5]);
        assert_eq!(s.read_bytes::<2>().unwrap(), [1, 2]);
        assert_eq!(s.read_bytes::<3>().unwrap(), [3, 4, 5]);
        assert!(matches!(s.read_bytes::<1>(), Err(ReadError::Io(_))));
    }

    #[test]
    fn read_into_reuses_buffer() {
        let mut s = Cursor::new(b"0123456789".to_vec());
        let mut buf = Vec::with_capacity(16);
        s.read_into_at(3_u64, 4, &mut buf).unwrap();
        assert_eq!(buf, b"3456");
        s.read_into_at(0_u64, 2, &mut buf).unwrap();
        assert_eq!(buf, b"01");
        assert!(buf.capacity() >= 16);
    }

    #[test]
    fn read_past_end() {
        let mut s = Cursor::new(vec![0_u8; 4]);
        assert!(s.read_vec_at(2_u32, 3).is_err());
    }
}

//! Bounded DEFLATE decompression of strip data
//!
//! TIFF stores DEFLATE strips as zlib streams. The compressed bytes are read
//! in chunks straight from the source and inflated into a caller buffer that
//! must never be exceeded.

use std::io::Read;

use miniz_oxide::inflate::stream::{inflate, InflateState};
use miniz_oxide::{DataFormat, MZError, MZFlush, MZStatus};
use tiffstack_common::math::*;

use crate::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 512 * 1024;

#[derive(Debug)]
pub struct Inflater {
    chunk_size: usize,
}

impl Default for Inflater {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Inflater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of compressed bytes read from the source at once
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Inflate `compressed_len` bytes from the current position of `source`
    ///
    /// Returns the number of bytes written to `out`. Fails with
    /// [`Error::OutputBufferTooSmall`] if the stream holds more data than
    /// `out` can take and with [`Error::CompressedStreamError`] if the stream
    /// is malformed or ends early.
    pub fn decompress<R: Read>(
        &self,
        source: &mut R,
        compressed_len: usize,
        out: &mut [u8],
    ) -> Result<usize> {
        let mut state = InflateState::new_boxed(DataFormat::Zlib);
        let mut chunk = vec![0; self.chunk_size.min(compressed_len)];
        let mut remaining = compressed_len;
        let mut written = 0_usize;
        // Receives output once `out` is full, to detect overlong streams
        let mut overflow = [0_u8; 1];

        while remaining > 0 {
            let n = remaining.min(chunk.len());
            let input = chunk.get_mut(..n).unwrap_or_default();
            source.read_exact(input)?;
            remaining = remaining.safe_sub(n)?;

            let mut input: &[u8] = input;
            loop {
                let full = written == out.len();
                let target = if full {
                    &mut overflow[..]
                } else {
                    out.get_mut(written..).unwrap_or_default()
                };

                let res = inflate(&mut state, input, target, MZFlush::None);

                if full && res.bytes_written > 0 {
                    return Err(Error::OutputBufferTooSmall {
                        needed: written.safe_add(res.bytes_written)?,
                        available: out.len(),
                    });
                }
                written = written.safe_add(res.bytes_written)?;
                input = input.get(res.bytes_consumed..).unwrap_or_default();

                match res.status {
                    Ok(MZStatus::StreamEnd) => {
                        tracing::trace!("Inflated {compressed_len} bytes to {written} bytes");
                        return Ok(written);
                    }
                    Ok(MZStatus::NeedDict) => {
                        return Err(Error::CompressedStreamError(String::from(
                            "preset dictionaries are not supported",
                        )));
                    }
                    Ok(MZStatus::Ok) => {}
                    // No progress possible without more input
                    Err(MZError::Buf) => break,
                    Err(err) => {
                        return Err(Error::CompressedStreamError(format!("{err:?}")));
                    }
                }

                if res.bytes_consumed == 0 && res.bytes_written == 0 {
                    break;
                }
                if input.is_empty() && !full && written < out.len() {
                    break;
                }
            }
        }

        Err(Error::CompressedStreamError(format!(
            "stream ended after {compressed_len} bytes without end marker"
        )))
    }
}

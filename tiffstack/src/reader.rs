use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tiffstack_common::math::*;
use tiffstack_common::read::ReadExt;

use crate::decode::{decode_elements, Element, Sample};
use crate::deflate::Inflater;
use crate::header::Header;
use crate::tag::Compression;
use crate::{ByteOrder, Directory, Error, Result};

/// Reader for all frames of one TIFF file
///
/// All directories are parsed when the reader is created. Pixel data is only
/// read on request and never cached.
#[derive(Debug)]
pub struct Reader<R> {
    source: R,
    host_byte_order: ByteOrder,
    file_byte_order: ByteOrder,
    ifds: Vec<Directory>,
    max_strip_size: usize,
    /// Raw strip bytes, grows up to `max_strip_size`
    strip_buffer: Vec<u8>,
    /// Inflated strip bytes
    inflate_buffer: Vec<u8>,
    inflater: Inflater,
}

impl Reader<BufReader<File>> {
    /// Open the file at `path` and parse all of its directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening {}", path.display());
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Parse header and directory chain of `source`
    pub fn new(source: R) -> Result<Self> {
        Self::with_inflater(source, Inflater::default())
    }

    /// Same as [`Self::new`] but with custom DEFLATE settings
    pub fn with_inflater(mut source: R, inflater: Inflater) -> Result<Self> {
        let host_byte_order = ByteOrder::host();

        source.seek_start(0_u64)?;
        let header = Header::parse(source.read_bytes()?, host_byte_order)?;
        let file_byte_order = header.byte_order;

        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut offset = u64::from(header.first_ifd_offset);
        while offset != 0 {
            if !visited.insert(offset) {
                return Err(Error::CyclicDirectoryChain(offset));
            }
            let ifd = Directory::read(&mut source, offset, host_byte_order, file_byte_order)?;
            offset = ifd.next_byte_offset;
            ifds.push(ifd);
        }

        let mut max_strip_size = 0;
        for ifd in &ifds {
            let size = ifd
                .max_strip_byte_count()
                .ok_or(Error::EmptyStripList(ifd.byte_offset))?;
            max_strip_size = max_strip_size.max(size);
        }
        let max_strip_size = max_strip_size.usize()?;

        tracing::debug!(
            "Found {} frames, largest strip has {max_strip_size} bytes",
            ifds.len()
        );

        Ok(Self {
            source,
            host_byte_order,
            file_byte_order,
            ifds,
            max_strip_size,
            strip_buffer: Vec::new(),
            inflate_buffer: Vec::new(),
            inflater,
        })
    }

    /// Decode the samples of `frame` into `out`
    ///
    /// Strips are decoded one after another into consecutive parts of `out`.
    /// The element type in the file follows the frame's bits per sample and
    /// is cast to `T`. Returns the number of samples written.
    pub fn read_frame<T: Sample>(&mut self, frame: usize, out: &mut [T]) -> Result<usize> {
        let Self {
            source,
            host_byte_order,
            file_byte_order,
            ifds,
            strip_buffer,
            inflate_buffer,
            inflater,
            ..
        } = self;

        let n_frames = ifds.len();
        let ifd = ifds
            .get(frame)
            .ok_or(Error::FrameOutOfRange { frame, n_frames })?;

        let bits_per_sample = ifd.bits_per_sample.ok_or(Error::MissingField {
            frame,
            field: "bits_per_sample",
        })?;
        let element = Element::for_bits_per_sample(bits_per_sample).ok_or(
            Error::UnsupportedBitsPerSample {
                frame,
                bits_per_sample,
            },
        )?;

        let compression = ifd.compression_scheme();
        let out_of_range = ifd.compression.is_some_and(|x| x > u32::from(u16::MAX));
        if out_of_range || (compression != Compression::None && !compression.is_deflate()) {
            return Err(Error::UnsupportedCompression {
                frame,
                compression: ifd.compression.unwrap_or_default(),
            });
        }

        let mut written = 0_usize;
        let strips = ifd.strip_offsets.iter().zip(&ifd.strip_byte_counts);
        for (strip, (&offset, &byte_count)) in strips.enumerate() {
            tracing::trace!("Reading strip {strip} of frame {frame} at byte {offset}");
            let byte_count = byte_count.usize()?;

            let data: &[u8] = if compression.is_deflate() {
                let len = decoded_strip_len(ifd, frame, strip, element)?;
                inflate_buffer.clear();
                inflate_buffer.resize(len, 0);
                source.seek_start(offset)?;
                let n = inflater.decompress(source, byte_count, inflate_buffer)?;
                inflate_buffer.get(..n).unwrap_or_default()
            } else {
                source.read_into_at(offset, byte_count, strip_buffer)?;
                strip_buffer.as_slice()
            };

            let count = data.len().safe_div(element.width())?;
            let needed = written.safe_add(count)?;
            let available = out.len();
            let dst = out
                .get_mut(written..needed)
                .ok_or(Error::OutputBufferTooSmall { needed, available })?;

            decode_elements(
                element,
                count,
                *host_byte_order,
                *file_byte_order,
                data,
                dst,
            )?;
            written = needed;
        }

        Ok(written)
    }

    /// Decode `frame` into a newly allocated buffer of
    /// [`n_samples`](Self::n_samples) elements
    ///
    /// Fails with [`Error::SampleCountMismatch`] if the strips hold fewer
    /// samples than the frame's geometry declares.
    pub fn read_frame_vec<T: Sample>(&mut self, frame: usize) -> Result<Vec<T>> {
        let expected = self.n_samples(frame)?;
        let mut out = vec![T::default(); expected];
        let decoded = self.read_frame(frame, &mut out)?;
        check_sample_count(frame, expected, decoded)?;
        Ok(out)
    }

    /// Decode all frames into `out`, one frame after another
    ///
    /// All frames must share height, width, samples per pixel and bits per
    /// sample. Every frame must decode to exactly that many samples.
    pub fn read_stack<T: Sample>(&mut self, out: &mut [T]) -> Result<usize> {
        self.check_homogeneous()?;

        let frame_len = self.n_samples(0)?;
        let needed = frame_len.safe_mul(self.n_frames())?;
        if out.len() < needed {
            return Err(Error::OutputBufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        if frame_len == 0 {
            return Ok(0);
        }

        let n_frames = self.n_frames();
        for (frame, frame_out) in out.chunks_mut(frame_len).take(n_frames).enumerate() {
            let decoded = self.read_frame(frame, frame_out)?;
            check_sample_count(frame, frame_len, decoded)?;
        }

        Ok(needed)
    }

    /// Decode all frames into a newly allocated buffer
    pub fn read_stack_vec<T: Sample>(&mut self) -> Result<Vec<T>> {
        self.check_homogeneous()?;
        let len = self.n_samples(0)?.safe_mul(self.n_frames())?;
        let mut out = vec![T::default(); len];
        self.read_stack(&mut out)?;
        Ok(out)
    }
}

impl<R> Reader<R> {
    pub fn n_frames(&self) -> usize {
        self.ifds.len()
    }

    /// Directories in the order of the chain
    pub fn directories(&self) -> &[Directory] {
        &self.ifds
    }

    pub fn directory(&self, frame: usize) -> Result<&Directory> {
        self.ifds.get(frame).ok_or(Error::FrameOutOfRange {
            frame,
            n_frames: self.n_frames(),
        })
    }

    /// Largest strip byte count over all frames
    pub fn max_strip_size(&self) -> usize {
        self.max_strip_size
    }

    pub fn host_byte_order(&self) -> ByteOrder {
        self.host_byte_order
    }

    pub fn file_byte_order(&self) -> ByteOrder {
        self.file_byte_order
    }

    /// Number of samples in `frame`
    pub fn n_samples(&self, frame: usize) -> Result<usize> {
        let ifd = self.directory(frame)?;
        ifd.n_samples().unwrap_or(Err(Error::MissingField {
            frame,
            field: missing_geometry(ifd),
        }))
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    fn check_homogeneous(&self) -> Result<()> {
        let Some(first) = self.ifds.first() else {
            return Ok(());
        };

        for (frame, ifd) in self.ifds.iter().enumerate().skip(1) {
            let field = if ifd.height != first.height {
                "height"
            } else if ifd.width != first.width {
                "width"
            } else if ifd.samples_per_pixel != first.samples_per_pixel {
                "samples_per_pixel"
            } else if ifd.bits_per_sample != first.bits_per_sample {
                "bits_per_sample"
            } else {
                continue;
            };

            return Err(Error::HeterogeneousStackError { frame, field });
        }

        Ok(())
    }
}

fn missing_geometry(ifd: &Directory) -> &'static str {
    if ifd.width.is_none() {
        "width"
    } else if ifd.height.is_none() {
        "height"
    } else {
        "samples_per_pixel"
    }
}

fn check_sample_count(frame: usize, expected: usize, decoded: usize) -> Result<()> {
    if decoded == expected {
        Ok(())
    } else {
        Err(Error::SampleCountMismatch {
            frame,
            expected,
            decoded,
        })
    }
}

/// Number of bytes strip `strip` of `ifd` holds once inflated
fn decoded_strip_len(
    ifd: &Directory,
    frame: usize,
    strip: usize,
    element: Element,
) -> Result<usize> {
    let missing = |field| Error::MissingField { frame, field };

    let height = ifd.height.ok_or(missing("height"))?.usize()?;
    let width = ifd.width.ok_or(missing("width"))?.usize()?;
    let samples_per_pixel = ifd
        .samples_per_pixel
        .ok_or(missing("samples_per_pixel"))?
        .usize()?;
    let rows_per_strip = ifd.rows_per_strip.map_or(Ok(height), |x| x.usize())?;

    let first_row = strip.safe_mul(rows_per_strip)?;
    let rows = height.saturating_sub(first_row).min(rows_per_strip);

    checked![rows];
    Ok((rows * width * samples_per_pixel * element.width()).check()?)
}

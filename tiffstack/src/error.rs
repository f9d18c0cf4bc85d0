use tiffstack_common::math::MathError;
use tiffstack_common::read::ReadError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("Not a TIFF file: {0}")]
    NotATiffFile(String),
    #[error("File byte order {file:?} differs from host byte order {host:?}")]
    UnsupportedEndianness {
        host: crate::ByteOrder,
        file: crate::ByteOrder,
    },
    #[error("Header does not point to any directory")]
    EmptyDirectoryChain,
    #[error("Directory at byte {0} was already visited")]
    CyclicDirectoryChain(u64),
    #[error("Unsupported field type {0}")]
    UnsupportedFieldType(u16),
    #[error("Tag {tag} must be BYTE, SHORT or LONG, found field type {field_type}")]
    InvalidStripFieldType { tag: u16, field_type: u16 },
    #[error("{0:?} elements cannot be byte swapped")]
    UnsupportedByteSwap(crate::decode::Element),
    #[error("Tag {tag} holds invalid value {value}")]
    InvalidFieldValue { tag: u16, value: i64 },
    #[error(
        "Directory at byte {byte_offset} has {offsets} strip offsets but {byte_counts} strip byte counts"
    )]
    StripCountMismatch {
        byte_offset: u64,
        offsets: usize,
        byte_counts: usize,
    },
    #[error("Directory at byte {0} has no strips")]
    EmptyStripList(u64),
    #[error("Frame {frame} differs from frame 0 in {field}")]
    HeterogeneousStackError { frame: usize, field: &'static str },
    #[error("Output buffer too small: {needed} elements needed, {available} available")]
    OutputBufferTooSmall { needed: usize, available: usize },
    #[error("Frame {frame} decoded to {decoded} samples instead of {expected}")]
    SampleCountMismatch {
        frame: usize,
        expected: usize,
        decoded: usize,
    },
    #[error("DEFLATE data invalid: {0}")]
    CompressedStreamError(String),
    #[error("Frame {frame} out of range, file has {n_frames} frames")]
    FrameOutOfRange { frame: usize, n_frames: usize },
    #[error("Frame {frame} does not define {field}")]
    MissingField { frame: usize, field: &'static str },
    #[error("Frame {frame} has unsupported bits per sample {bits_per_sample}")]
    UnsupportedBitsPerSample { frame: usize, bits_per_sample: u32 },
    #[error("Frame {frame} uses unsupported compression {compression}")]
    UnsupportedCompression { frame: usize, compression: u32 },
    #[error("Needed {needed} bytes to decode, only {available} given")]
    ShortBuffer { needed: usize, available: usize },
    #[error("Math: {0}")]
    Math(#[from] MathError),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::Io(err) => Self::IoFailure(err),
            ReadError::Math(err) => Self::Math(err),
        }
    }
}

//! Tags of the baseline bilevel, grayscale, palette and RGB image classes
//! that the reader picks up. All other tags are skipped.

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(pub u16);

impl Tag {
    pub const IMAGE_WIDTH: Self = Self(256);
    pub const IMAGE_LENGTH: Self = Self(257);
    pub const BITS_PER_SAMPLE: Self = Self(258);
    pub const COMPRESSION: Self = Self(259);
    pub const PHOTOMETRIC_INTERPRETATION: Self = Self(262);
    pub const STRIP_OFFSETS: Self = Self(273);
    pub const SAMPLES_PER_PIXEL: Self = Self(277);
    pub const ROWS_PER_STRIP: Self = Self(278);
    pub const STRIP_BYTE_COUNTS: Self = Self(279);

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::IMAGE_WIDTH => "ImageWidth",
            Self::IMAGE_LENGTH => "ImageLength",
            Self::BITS_PER_SAMPLE => "BitsPerSample",
            Self::COMPRESSION => "Compression",
            Self::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
            Self::STRIP_OFFSETS => "StripOffsets",
            Self::SAMPLES_PER_PIXEL => "SamplesPerPixel",
            Self::ROWS_PER_STRIP => "RowsPerStrip",
            Self::STRIP_BYTE_COUNTS => "StripByteCounts",
            _ => return None,
        })
    }

    /// Tags that hold one value per strip
    pub fn is_strip_array(self) -> bool {
        matches!(self, Self::STRIP_OFFSETS | Self::STRIP_BYTE_COUNTS)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:X}", self.0),
        }
    }
}

tiffstack_common::utils::convertible_enum!(
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub enum Compression {
        None = 1,
        CcittHuffman = 2,
        Lzw = 5,
        Jpeg = 7,
        AdobeDeflate = 8,
        PackBits = 32773,
        Deflate = 32946,
    }
);

impl Compression {
    pub fn is_deflate(self) -> bool {
        matches!(self, Self::AdobeDeflate | Self::Deflate)
    }
}

impl Default for Compression {
    fn default() -> Self {
        Self::None
    }
}

tiffstack_common::utils::convertible_enum!(
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub enum PhotometricInterpretation {
        WhiteIsZero = 0,
        BlackIsZero = 1,
        Rgb = 2,
        Palette = 3,
        TransparencyMask = 4,
    }
);

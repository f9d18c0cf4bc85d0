/// Byte order of a file or of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ByteOrder {
    /// `II`
    LittleEndian,
    /// `MM`
    BigEndian,
}

impl ByteOrder {
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = *b"II";
    pub const BIG_ENDIAN_MARKER: [u8; 2] = *b"MM";

    /// Byte order of the running host
    ///
    /// Probes how a known integer is laid out in memory instead of relying on
    /// the compile target.
    pub fn host() -> Self {
        if 1_u16.to_ne_bytes() == [1, 0] {
            Self::LittleEndian
        } else {
            Self::BigEndian
        }
    }

    /// Byte order declared by the first two header bytes
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match marker {
            Self::LITTLE_ENDIAN_MARKER => Some(Self::LittleEndian),
            Self::BIG_ENDIAN_MARKER => Some(Self::BigEndian),
            _ => None,
        }
    }

    pub fn marker(self) -> [u8; 2] {
        match self {
            Self::LittleEndian => Self::LITTLE_ENDIAN_MARKER,
            Self::BigEndian => Self::BIG_ENDIAN_MARKER,
        }
    }

    pub fn is_big_endian(self) -> bool {
        self == Self::BigEndian
    }

    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }
}

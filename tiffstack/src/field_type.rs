//! Field types of directory entries
//!
//! The field type decides how many bytes one element of a field occupies and
//! how those bytes are interpreted.

use crate::decode::Element;

/// Byte width of field types 1 to 12, indexed by `code - 1`
pub const FIELD_TYPE_SIZES: [u8; 12] = [1, 1, 2, 4, 8, 1, 1, 2, 4, 8, 4, 8];

/// Number of bytes that fit into the value part of a field entry
pub const INLINE_CAPACITY: u64 = 4;

tiffstack_common::utils::convertible_enum!(
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FieldType {
        Byte = 1,
        Ascii = 2,
        Short = 3,
        Long = 4,
        Rational = 5,
        SByte = 6,
        Undefined = 7,
        SShort = 8,
        SLong = 9,
        SRational = 10,
        Float = 11,
        Double = 12,
    }
);

impl FieldType {
    pub fn code(self) -> u16 {
        self.into()
    }

    /// Byte width of one element, `None` for type codes outside 1 to 12
    pub fn size(self) -> Option<u8> {
        let index = usize::from(self.code()).checked_sub(1)?;
        FIELD_TYPE_SIZES.get(index).copied()
    }

    /// Total byte size of `count` elements
    pub fn data_len(self, count: u32) -> Option<u64> {
        u64::from(self.size()?).checked_mul(u64::from(count))
    }

    /// Whether `count` elements are stored in the entry itself
    ///
    /// Values are stored inline if and only if they fit into four bytes.
    /// Unknown types are never inline.
    pub fn is_inline(self, count: u32) -> bool {
        self.data_len(count).is_some_and(|len| len <= INLINE_CAPACITY)
    }

    /// Whether the type is one of the unsigned integer types allowed for
    /// strip locations
    pub fn is_unsigned_integer(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Long)
    }

    /// Element representation used when decoding arrays of this type
    pub fn element(self) -> Option<Element> {
        match self {
            Self::Byte => Some(Element::U8),
            Self::Short => Some(Element::U16),
            Self::Long => Some(Element::U32),
            Self::SByte => Some(Element::I8),
            Self::SShort => Some(Element::I16),
            Self::SLong => Some(Element::I32),
            Self::Float => Some(Element::F32),
            Self::Double => Some(Element::F64),
            Self::Ascii
            | Self::Undefined
            | Self::Rational
            | Self::SRational
            | Self::Unknown(_) => None,
        }
    }
}

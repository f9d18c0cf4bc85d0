//! Decoding of raw field and sample bytes into numbers
//!
//! Single values are read in host byte order since the reader only accepts
//! files in host byte order. Arrays take both byte orders and can swap the
//! unsigned integer elements.

use tiffstack_common::math::*;

use crate::{ByteOrder, Error, FieldType, Result};

/// In-file representation of one array element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl Element {
    pub fn width(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Element for pixel samples of the given bit depth
    ///
    /// 64 bit samples are read as `f64`.
    pub fn for_bits_per_sample(bits_per_sample: u32) -> Option<Self> {
        match bits_per_sample {
            8 => Some(Self::U8),
            16 => Some(Self::U16),
            32 => Some(Self::U32),
            64 => Some(Self::F64),
            _ => None,
        }
    }
}

/// Numeric type that decoded elements can be written to
///
/// All conversions are plain `as` casts: values out of range wrap or
/// truncate, floats saturate.
pub trait Sample: Copy + Default {
    fn from_u8(v: u8) -> Self;
    fn from_u16(v: u16) -> Self;
    fn from_u32(v: u32) -> Self;
    fn from_i8(v: i8) -> Self;
    fn from_i16(v: i16) -> Self;
    fn from_i32(v: i32) -> Self;
    fn from_f32(v: f32) -> Self;
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_possible_wrap,
                clippy::cast_sign_loss,
                clippy::cast_lossless
            )]
            impl Sample for $t {
                fn from_u8(v: u8) -> Self { v as $t }
                fn from_u16(v: u16) -> Self { v as $t }
                fn from_u32(v: u32) -> Self { v as $t }
                fn from_i8(v: i8) -> Self { v as $t }
                fn from_i16(v: i16) -> Self { v as $t }
                fn from_i32(v: i32) -> Self { v as $t }
                fn from_f32(v: f32) -> Self { v as $t }
                fn from_f64(v: f64) -> Self { v as $t }
            }
        )*
    };
}

impl_sample!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    let mut buf = [0; N];
    let src = bytes.get(..N).ok_or(Error::ShortBuffer {
        needed: N,
        available: bytes.len(),
    })?;
    buf.copy_from_slice(src);
    Ok(buf)
}

/// Decode one unsigned value of type BYTE, ASCII, SHORT or LONG
pub fn decode_unsigned(field_type: FieldType, bytes: &[u8]) -> Result<u64> {
    Ok(match field_type {
        FieldType::Byte | FieldType::Ascii => u8::from_ne_bytes(take(bytes)?).into(),
        FieldType::Short => u16::from_ne_bytes(take(bytes)?).into(),
        FieldType::Long => u32::from_ne_bytes(take(bytes)?).into(),
        other => return Err(Error::UnsupportedFieldType(other.code())),
    })
}

/// Decode one integer value, additionally accepting SBYTE, SSHORT and SLONG
pub fn decode_signed(field_type: FieldType, bytes: &[u8]) -> Result<i64> {
    Ok(match field_type {
        FieldType::Byte | FieldType::Ascii => u8::from_ne_bytes(take(bytes)?).into(),
        FieldType::Short => u16::from_ne_bytes(take(bytes)?).into(),
        FieldType::Long => u32::from_ne_bytes(take(bytes)?).into(),
        FieldType::SByte => i8::from_ne_bytes(take(bytes)?).into(),
        FieldType::SShort => i16::from_ne_bytes(take(bytes)?).into(),
        FieldType::SLong => i32::from_ne_bytes(take(bytes)?).into(),
        other => return Err(Error::UnsupportedFieldType(other.code())),
    })
}

/// Decode `count` elements of `field_type` from `src` into `dst`
pub fn decode_array<T: Sample>(
    field_type: FieldType,
    count: usize,
    host: ByteOrder,
    file: ByteOrder,
    src: &[u8],
    dst: &mut [T],
) -> Result<()> {
    let element = field_type
        .element()
        .ok_or(Error::UnsupportedFieldType(field_type.code()))?;

    decode_elements(element, count, host, file, src, dst)
}

/// Decode `count` elements of `element` from `src` into `dst`
///
/// Only the first `count` entries of `dst` are written.
pub fn decode_elements<T: Sample>(
    element: Element,
    count: usize,
    host: ByteOrder,
    file: ByteOrder,
    src: &[u8],
    dst: &mut [T],
) -> Result<()> {
    let len = count.safe_mul(element.width())?;
    let src = src.get(..len).ok_or(Error::ShortBuffer {
        needed: len,
        available: src.len(),
    })?;
    let available = dst.len();
    let dst = dst
        .get_mut(..count)
        .ok_or(Error::OutputBufferTooSmall {
            needed: count,
            available,
        })?;

    if host == file {
        match element {
            Element::U8 => convert(src, dst, |b| T::from_u8(u8::from_ne_bytes(b))),
            Element::U16 => convert(src, dst, |b| T::from_u16(u16::from_ne_bytes(b))),
            Element::U32 => convert(src, dst, |b| T::from_u32(u32::from_ne_bytes(b))),
            Element::I8 => convert(src, dst, |b| T::from_i8(i8::from_ne_bytes(b))),
            Element::I16 => convert(src, dst, |b| T::from_i16(i16::from_ne_bytes(b))),
            Element::I32 => convert(src, dst, |b| T::from_i32(i32::from_ne_bytes(b))),
            Element::F32 => convert(src, dst, |b| T::from_f32(f32::from_ne_bytes(b))),
            Element::F64 => convert(src, dst, |b| T::from_f64(f64::from_ne_bytes(b))),
        }
    } else {
        match element {
            Element::U16 => convert(src, dst, |b| {
                T::from_u16(u16::from_ne_bytes(b).swap_bytes())
            }),
            Element::U32 => convert(src, dst, |b| {
                T::from_u32(u32::from_ne_bytes(b).swap_bytes())
            }),
            other => return Err(Error::UnsupportedByteSwap(other)),
        }
    }

    Ok(())
}

fn convert<const N: usize, T>(src: &[u8], dst: &mut [T], f: impl Fn([u8; N]) -> T) {
    for (chunk, out) in src.chunks_exact(N).zip(dst) {
        let mut bytes = [0; N];
        bytes.copy_from_slice(chunk);
        *out = f(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn other(order: ByteOrder) -> ByteOrder {
        match order {
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
        }
    }

    #[test]
    fn single_unsigned() {
        assert_eq!(decode_unsigned(FieldType::Byte, &[200, 1, 2, 3]).unwrap(), 200);
        assert_eq!(decode_unsigned(FieldType::Ascii, b"A").unwrap(), 65);
        assert_eq!(
            decode_unsigned(FieldType::Short, &700_u16.to_ne_bytes()).unwrap(),
            700
        );
        assert_eq!(
            decode_unsigned(FieldType::Long, &70_000_u32.to_ne_bytes()).unwrap(),
            70_000
        );
    }

    #[test]
    fn single_unsigned_rejects_signed() {
        for field_type in [FieldType::SShort, FieldType::Rational, FieldType::Float] {
            let err = decode_unsigned(field_type, &[0; 8]).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFieldType(c) if c == field_type.code()));
        }
    }

    #[test]
    fn single_signed() {
        assert_eq!(decode_signed(FieldType::SByte, &[0xFF]).unwrap(), -1);
        assert_eq!(
            decode_signed(FieldType::SShort, &(-300_i16).to_ne_bytes()).unwrap(),
            -300
        );
        assert_eq!(
            decode_signed(FieldType::SLong, &(-70_000_i32).to_ne_bytes()).unwrap(),
            -70_000
        );
        assert_eq!(decode_signed(FieldType::Byte, &[0xFF]).unwrap(), 255);
        assert!(matches!(
            decode_signed(FieldType::Double, &[0; 8]),
            Err(Error::UnsupportedFieldType(12))
        ));
    }

    #[test]
    fn single_short_input() {
        let err = decode_unsigned(FieldType::Long, &[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortBuffer {
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn unsigned_round_trip() {
        let host = ByteOrder::host();

        let bytes = [0_u8, 1, 127, 128, u8::MAX];
        let mut dst = [0_u64; 5];
        decode_array(FieldType::Byte, bytes.len(), host, host, &bytes, &mut dst).unwrap();
        let encoded: Vec<u8> = dst.iter().map(|x| u8::try_from(*x).unwrap()).collect();
        assert_eq!(encoded, bytes);

        let shorts = [0_u16, 1, 255, 256, 40_000, u16::MAX];
        let src: Vec<u8> = shorts.iter().flat_map(|x| x.to_ne_bytes()).collect();
        let mut dst = [0_u64; 6];
        decode_array(FieldType::Short, shorts.len(), host, host, &src, &mut dst).unwrap();
        let encoded: Vec<u8> = dst
            .iter()
            .flat_map(|x| u16::try_from(*x).unwrap().to_ne_bytes())
            .collect();
        assert_eq!(encoded, src);

        let longs = [0_u32, 1, 65_536, 3_000_000_000, u32::MAX];
        let src: Vec<u8> = longs.iter().flat_map(|x| x.to_ne_bytes()).collect();
        let mut dst = [0_u64; 5];
        decode_array(FieldType::Long, longs.len(), host, host, &src, &mut dst).unwrap();
        let encoded: Vec<u8> = dst
            .iter()
            .flat_map(|x| u32::try_from(*x).unwrap().to_ne_bytes())
            .collect();
        assert_eq!(encoded, src);
    }

    #[test]
    fn widen_and_narrow() {
        let host = ByteOrder::host();

        let mut wide = [0_i64; 3];
        let src: Vec<u8> = [-1_i16, 2, -3].iter().flat_map(|x| x.to_ne_bytes()).collect();
        decode_array(FieldType::SShort, 3, host, host, &src, &mut wide).unwrap();
        assert_eq!(wide, [-1, 2, -3]);

        // Narrowing is a plain cast
        let mut narrow = [0_u8; 2];
        let src: Vec<u8> = [0x1234_u32, 7].iter().flat_map(|x| x.to_ne_bytes()).collect();
        decode_array(FieldType::Long, 2, host, host, &src, &mut narrow).unwrap();
        assert_eq!(narrow, [0x34, 7]);

        let mut floats = [0_f32; 2];
        let src: Vec<u8> = [1.5_f64, -2.25].iter().flat_map(|x| x.to_ne_bytes()).collect();
        decode_array(FieldType::Double, 2, host, host, &src, &mut floats).unwrap();
        assert_eq!(floats, [1.5, -2.25]);
    }

    #[test]
    fn only_count_elements_written() {
        let host = ByteOrder::host();
        let mut dst = [9_u16; 4];
        decode_array(FieldType::Byte, 2, host, host, &[1, 2, 3, 4], &mut dst).unwrap();
        assert_eq!(dst, [1, 2, 9, 9]);
    }

    #[test]
    fn unsupported_array_types() {
        let host = ByteOrder::host();
        let mut dst = [0_u32; 1];
        for code in [2, 5, 7, 10, 13] {
            let err =
                decode_array(FieldType::from(code), 1, host, host, &[0; 8], &mut dst).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFieldType(c) if c == code));
        }
    }

    #[test]
    fn byte_swap() {
        let host = ByteOrder::host();
        let file = other(host);

        let src: Vec<u8> = [0x0102_u16, 0xA0B0]
            .iter()
            .flat_map(|x| x.swap_bytes().to_ne_bytes())
            .collect();
        let mut dst = [0_u32; 2];
        decode_array(FieldType::Short, 2, host, file, &src, &mut dst).unwrap();
        assert_eq!(dst, [0x0102, 0xA0B0]);

        let src = 0x0102_0304_u32.swap_bytes().to_ne_bytes();
        let mut dst = [0_u64; 1];
        decode_array(FieldType::Long, 1, host, file, &src, &mut dst).unwrap();
        assert_eq!(dst, [0x0102_0304]);
    }

    #[test]
    fn byte_swap_unsupported() {
        let host = ByteOrder::host();
        let file = other(host);
        let mut dst = [0_u8; 4];

        for (field_type, element) in [
            (FieldType::Byte, Element::U8),
            (FieldType::SShort, Element::I16),
            (FieldType::Float, Element::F32),
        ] {
            let err = decode_array(field_type, 1, host, file, &[0; 4], &mut dst).unwrap_err();
            assert!(matches!(err, Error::UnsupportedByteSwap(e) if e == element));
        }
    }

    #[test]
    fn bounds() {
        let host = ByteOrder::host();

        let mut dst = [0_u32; 1];
        let err = decode_array(FieldType::Short, 2, host, host, &[0; 4], &mut dst).unwrap_err();
        assert!(matches!(
            err,
            Error::OutputBufferTooSmall {
                needed: 2,
                available: 1
            }
        ));

        let mut dst = [0_u32; 4];
        let err = decode_array(FieldType::Long, 2, host, host, &[0; 6], &mut dst).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortBuffer {
                needed: 8,
                available: 6
            }
        ));
    }

    #[test]
    fn elements_for_bit_depths() {
        assert_eq!(Element::for_bits_per_sample(8), Some(Element::U8));
        assert_eq!(Element::for_bits_per_sample(16), Some(Element::U16));
        assert_eq!(Element::for_bits_per_sample(32), Some(Element::U32));
        assert_eq!(Element::for_bits_per_sample(64), Some(Element::F64));
        assert_eq!(Element::for_bits_per_sample(12), None);
    }
}

//! Fixed-width little-endian reads at absolute offsets.
//!
//! Every read is bounds-checked against the slice and fails with
//! [`CodecError::BoundsViolation`] instead of panicking.

use byteorder::{ByteOrder, LittleEndian};
use crate::codec::CodecError;

#[inline]
fn window(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], CodecError> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| CodecError::bounds("binary read", offset, len, buf.len()))
}

/// Read a little-endian `u32` at `offset`.
#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32, CodecError> {
    Ok(LittleEndian::read_u32(window(buf, offset, 4)?))
}

/// Read a little-endian `i32` at `offset`.
#[inline]
pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32, CodecError> {
    Ok(LittleEndian::read_i32(window(buf, offset, 4)?))
}

/// Read an 8-byte little-endian value as `lo + hi * 2^32`, where `lo` is the
/// low word taken unsigned and `hi` the high word taken signed.
///
/// # Precision
/// The result is an `i64`, which holds every value this rule can produce
/// exactly; there is no 2^53 ceiling here.  Callers that need the value as a
/// length must convert with a checked cast, since negative or oversized
/// values are representable.
#[inline]
pub fn read_i64_as_number(buf: &[u8], offset: usize) -> Result<i64, CodecError> {
    let w  = window(buf, offset, 8)?;
    let lo = LittleEndian::read_u32(&w[..4]) as i64;
    let hi = LittleEndian::read_i32(&w[4..]) as i64;
    Ok(hi * 0x1_0000_0000 + lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_words() {
        let buf = [0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(read_u32(&buf, 0).unwrap(), 0x1234_5678);
        assert_eq!(read_i32(&buf, 4).unwrap(), -1);
        assert_eq!(read_u32(&buf, 4).unwrap(), u32::MAX);
    }

    #[test]
    fn read_i64_combines_words() {
        let mut buf = [0u8; 10];
        buf[2..10].copy_from_slice(&0x0000_0003_8000_0001u64.to_le_bytes());
        assert_eq!(read_i64_as_number(&buf, 2).unwrap(), 3 * 0x1_0000_0000 + 0x8000_0001);

        let neg = (-5i64).to_le_bytes();
        assert_eq!(read_i64_as_number(&neg, 0).unwrap(), -5);
    }

    #[test]
    fn out_of_range_is_a_bounds_violation() {
        let buf = [0u8; 6];
        let err = read_u32(&buf, 4).unwrap_err();
        assert!(matches!(
            err,
            CodecError::BoundsViolation { offset: 4, len: 4, limit: 6, .. }
        ));
        assert!(read_i64_as_number(&buf, 0).is_err());
        assert!(read_i32(&buf, usize::MAX).is_err());
    }
}

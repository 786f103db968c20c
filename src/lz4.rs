//! Raw LZ4 block decoder.
//!
//! Decodes the unframed block variant only: a run of sequences, each a token
//! byte, optional extended literal length, literals, a 2-byte little-endian
//! match offset, optional extended match length.  No magic, no block
//! headers, no checksums.  The final sequence of a block carries literals
//! only; decoding stops as soon as the requested output length is reached.
//!
//! # Bounds
//! Every source read and destination write is checked.  Malformed input
//! surfaces as [`CodecError::BoundsViolation`] or
//! [`CodecError::InvalidOffset`], never as a panic.  On error the contents
//! of `dst` are unspecified and must be discarded by the caller.

use crate::codec::CodecError;

/// Minimum match length encoded by a zero low nibble.
pub const MIN_MATCH: usize = 4;

const RUN_MASK: usize = 0x0f;

#[inline]
fn next_byte(src: &[u8], s: &mut usize) -> Result<u8, CodecError> {
    let b = *src
        .get(*s)
        .ok_or_else(|| CodecError::bounds("lz4 source", *s, 1, src.len()))?;
    *s += 1;
    Ok(b)
}

/// Extension bytes for a length nibble of 15: each 255 adds 255 and
/// continues, the first byte below 255 is added and terminates.
#[inline]
fn read_extended_length(src: &[u8], s: &mut usize) -> Result<usize, CodecError> {
    let mut len = 0usize;
    loop {
        let b = next_byte(src, s)?;
        len += b as usize;
        if b != 255 {
            return Ok(len);
        }
    }
}

/// Decode one raw LZ4 block from `src[src_offset..]` into
/// `dst[dst_offset..dst_offset + original_size]`.
///
/// Exactly `original_size` bytes are written on success.  `dst` must already
/// be large enough; the decoder never grows it.  Matches may reach back
/// before `dst_offset` as long as they stay inside `dst`.
pub fn decompress_block(
    src:           &[u8],
    src_offset:    usize,
    dst:           &mut [u8],
    dst_offset:    usize,
    original_size: usize,
) -> Result<(), CodecError> {
    let d_end = dst_offset
        .checked_add(original_size)
        .filter(|&end| end <= dst.len())
        .ok_or_else(|| CodecError::bounds("lz4 destination", dst_offset, original_size, dst.len()))?;

    let mut s = src_offset;
    let mut d = dst_offset;

    while d < d_end {
        let token = next_byte(src, &mut s)? as usize;

        // ── Literals ────────────────────────────────────────────────────────
        let mut literal_len = token >> 4;
        if literal_len == RUN_MASK {
            literal_len += read_extended_length(src, &mut s)?;
        }
        let lit_src = s
            .checked_add(literal_len)
            .and_then(|end| src.get(s..end))
            .ok_or_else(|| CodecError::bounds("lz4 literal source", s, literal_len, src.len()))?;
        if literal_len > d_end - d {
            return Err(CodecError::bounds("lz4 literal destination", d, literal_len, d_end));
        }
        dst[d..d + literal_len].copy_from_slice(lit_src);
        s += literal_len;
        d += literal_len;

        // Trailing literal run.
        if d >= d_end {
            break;
        }

        // ── Match ───────────────────────────────────────────────────────────
        let offset_at = s;
        let offset = next_byte(src, &mut s)? as usize | (next_byte(src, &mut s)? as usize) << 8;
        if offset == 0 {
            return Err(CodecError::InvalidOffset { src_offset: offset_at, dst_offset: d });
        }
        if offset > d {
            return Err(CodecError::bounds("lz4 match source", d, offset, dst_offset));
        }

        let mut match_len = (token & RUN_MASK) + MIN_MATCH;
        if token & RUN_MASK == RUN_MASK {
            match_len += read_extended_length(src, &mut s)?;
        }
        if match_len > d_end - d {
            return Err(CodecError::bounds("lz4 match destination", d, match_len, d_end));
        }

        let from = d - offset;
        if offset >= match_len {
            dst.copy_within(from..from + match_len, d);
        } else {
            // Overlapping: the copy reads bytes it has just written.
            for i in 0..match_len {
                dst[d + i] = dst[from + i];
            }
        }
        d += match_len;
    }

    Ok(())
}

/// Upper bound on the output a block of `src_len` bytes can describe.  No
/// source byte expands to more than 255 output bytes; the constant covers
/// the base lengths carried by a single token.
pub fn max_decoded_len(src_len: usize) -> usize {
    src_len.saturating_mul(255).saturating_add(RUN_MASK + MIN_MATCH)
}

/// Decode a block that starts at `src_offset` into a new buffer of exactly
/// `original_size` bytes.
///
/// A declared size the remaining source could never produce is rejected
/// before the buffer is allocated.
pub fn decompress_block_to_vec(
    src:           &[u8],
    src_offset:    usize,
    original_size: usize,
) -> Result<Vec<u8>, CodecError> {
    let limit = max_decoded_len(src.len().saturating_sub(src_offset));
    if original_size > limit {
        return Err(CodecError::bounds("lz4 declared size", src_offset, original_size, limit));
    }
    let mut out = vec![0u8; original_size];
    decompress_block(src, src_offset, &mut out, 0, original_size)?;
    Ok(out)
}

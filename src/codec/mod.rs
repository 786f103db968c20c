//! Decompression stages used by timelapse saves.
//!
//! Two codecs appear in the save format:
//!   - **LZ4 block**: every frame (in-progress file or complete-save
//!     sub-frame) is one raw, unframed LZ4 block.  Decoded by the in-crate
//!     decoder in [`crate::lz4`].
//!   - **Zstandard**: a complete save wraps the concatenated sub-frame
//!     records in a single zstd stream.  Delegated to the `zstd` crate.
//!
//! Both codecs decode into a buffer whose size is declared by the
//! surrounding header, so [`Codec::decompress`] always receives the
//! expected output length.  Only the LZ4 block codec treats that length
//! as authoritative; zstd treats it as a capacity hint and the caller
//! checks the result.

use std::io;
use thiserror::Error;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    /// An LZ4 match references offset 0, which the format never produces.
    #[error("LZ4: invalid match offset 0 (src offset {src_offset}, dst offset {dst_offset})")]
    InvalidOffset { src_offset: usize, dst_offset: usize },
    /// A read or write would fall outside the buffer it addresses.
    #[error("{what}: access at {offset}+{len} exceeds buffer extent {limit}")]
    BoundsViolation {
        what:   &'static str,
        offset: usize,
        len:    usize,
        limit:  usize,
    },
    #[error("Decompression error: {0}")]
    Decompression(String),
}

impl CodecError {
    pub(crate) fn bounds(what: &'static str, offset: usize, len: usize, limit: usize) -> Self {
        CodecError::BoundsViolation { what, offset, len, limit }
    }
}

// ── CodecId ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecId {
    Lz4Block,
    Zstd,
}

impl CodecId {
    /// Human-readable name (diagnostics only, never parsed from disk).
    pub fn name(self) -> &'static str {
        match self {
            CodecId::Lz4Block => "lz4-block",
            CodecId::Zstd     => "zstd",
        }
    }
}

// ── Codec trait ──────────────────────────────────────────────────────────────

pub trait Codec: Send + Sync {
    fn codec_id(&self) -> CodecId;
    /// Decode `data` into a fresh buffer.  `expected_len` is the size the
    /// container header declares for the output.
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError>;
}

// ── Built-in codec implementations ──────────────────────────────────────────

pub struct Lz4BlockCodec;
impl Codec for Lz4BlockCodec {
    fn codec_id(&self) -> CodecId { CodecId::Lz4Block }
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
        crate::lz4::decompress_block_to_vec(data, 0, expected_len)
    }
}

pub struct ZstdCodec;
impl Codec for ZstdCodec {
    fn codec_id(&self) -> CodecId { CodecId::Zstd }
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(expected_len);
        let mut decoder = zstd::stream::read::Decoder::new(data)
            .map_err(|e| CodecError::Decompression(e.to_string()))?;
        io::copy(&mut decoder, &mut out)
            .map_err(|e| CodecError::Decompression(e.to_string()))?;
        Ok(out)
    }
}

// ── Factory ──────────────────────────────────────────────────────────────────

/// Resolve a CodecId to a built-in codec.
pub fn get_codec(id: CodecId) -> Box<dyn Codec> {
    match id {
        CodecId::Lz4Block => Box::new(Lz4BlockCodec),
        CodecId::Zstd     => Box::new(ZstdCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zstd_codec_decodes_encoder_output() {
        let data = b"zstd wrapped payload ".repeat(64);
        let packed = zstd::encode_all(&data[..], 3).unwrap();
        let out = get_codec(CodecId::Zstd).decompress(&packed, data.len()).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn zstd_codec_rejects_garbage() {
        let err = ZstdCodec.decompress(b"definitely not zstd", 16).unwrap_err();
        assert!(matches!(err, CodecError::Decompression(_)));
    }

    #[test]
    fn lz4_block_codec_decodes_reference_block() {
        let data = b"abcabcabcabcabcabc-lz4-block".to_vec();
        let block = lz4_flex::block::compress(&data);
        let out = get_codec(CodecId::Lz4Block).decompress(&block, data.len()).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn lz4_block_codec_rejects_impossible_declared_size() {
        let err = Lz4BlockCodec.decompress(&[0x10, b'a', 0x01, 0x00], u32::MAX as usize).unwrap_err();
        assert!(matches!(err, CodecError::BoundsViolation { what: "lz4 declared size", .. }));
    }

    #[test]
    fn codec_names() {
        assert_eq!(CodecId::Zstd.name(), "zstd");
        assert_eq!(Lz4BlockCodec.codec_id().name(), "lz4-block");
    }
}

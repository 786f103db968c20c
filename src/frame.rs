//! Frame records: one LZ4 block plus its 20-byte header.
//!
//! An in-progress save stores one record per file.  A complete save stores
//! all records back to back inside its zstd payload; [`SubFrameIter`] walks
//! that concatenation without decoding, so the caller can choose sequential
//! or parallel decoding.

use crate::codec::{get_codec, CodecError, CodecId};
use crate::header::{FrameHeader, FRAME_HEADER_SIZE};

/// Decode the single frame stored in an in-progress `.sav` file.
pub fn decode_in_progress_frame(data: &[u8]) -> Result<(FrameHeader, Vec<u8>), CodecError> {
    let header = FrameHeader::parse_at(data, 0)?;
    let block = data.get(FRAME_HEADER_SIZE..).unwrap_or_default();
    let jpeg = get_codec(CodecId::Lz4Block).decompress(block, header.block_uncompressed_size as usize)?;
    Ok((header, jpeg))
}

/// Location of one sub-frame record inside a complete-save payload.
#[derive(Debug, Clone)]
pub struct SubFrameRef {
    /// Position in the payload, counting from 0.
    pub index:  usize,
    /// Byte offset of the record header.
    pub offset: usize,
    pub header: FrameHeader,
}

impl SubFrameRef {
    pub fn block_offset(&self) -> usize {
        self.offset + FRAME_HEADER_SIZE
    }

    /// Decode this record's block.  Error offsets are relative to the block.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        let block = payload.get(self.block_offset()..).unwrap_or_default();
        get_codec(CodecId::Lz4Block).decompress(block, self.header.uncompressed_size as usize)
    }
}

/// Iterator over the sub-frame records of a decompressed complete payload.
///
/// Yields an error (and then stops) if a record header is truncated.
pub struct SubFrameIter<'a> {
    payload: &'a [u8],
    offset:  usize,
    index:   usize,
    failed:  bool,
}

impl<'a> SubFrameIter<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload, offset: 0, index: 0, failed: false }
    }
}

impl Iterator for SubFrameIter<'_> {
    type Item = Result<SubFrameRef, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.payload.len() {
            return None;
        }
        let header = match FrameHeader::parse_at(self.payload, self.offset) {
            Ok(h)  => h,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        let sub = SubFrameRef { index: self.index, offset: self.offset, header };
        self.offset = sub
            .block_offset()
            .saturating_add(sub.header.compressed_size as usize);
        self.index += 1;
        Some(Ok(sub))
    }
}

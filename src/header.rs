//! On-disk headers of the two save layouts.
//!
//! # Complete save (`*0-100.sav`)
//! ```text
//! offset  size  field
//!      0     4  checksum (unverified)
//!      4     4  width
//!      8     4  height
//!     12     8  uncompressed payload size
//!     20     8  compressed payload size
//!     28     …  zstd stream
//! ```
//!
//! # Frame record (in-progress file, or sub-frame inside a complete payload)
//! ```text
//! offset  size  field
//!      0     4  width   (zero / unused in sub-frames)
//!      4     4  height  (zero / unused in sub-frames)
//!      8     4  uncompressed size
//!     12     4  compressed size
//!     16     4  uncompressed size (repeated)
//!     20     …  LZ4 block
//! ```
//!
//! In-progress files are decoded using the repeated size at offset 16;
//! sub-frames use the size at offset 8 and advance by the compressed size at
//! offset 12.  All fields are little-endian.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::binary::{read_i64_as_number, read_u32};
use crate::codec::CodecError;

pub const SAVE_HEADER_SIZE:  usize = 28;
pub const FRAME_HEADER_SIZE: usize = 20;

// ── SaveHeader ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub checksum:          u32,
    pub width:             u32,
    pub height:            u32,
    pub uncompressed_size: i64,
    /// Informational; the payload always runs to end of file.
    pub compressed_size:   i64,
}

impl SaveHeader {
    pub fn parse(buf: &[u8]) -> Result<Self, CodecError> {
        Ok(Self {
            checksum:          read_u32(buf, 0)?,
            width:             read_u32(buf, 4)?,
            height:            read_u32(buf, 8)?,
            uncompressed_size: read_i64_as_number(buf, 12)?,
            compressed_size:   read_i64_as_number(buf, 20)?,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.checksum)?;
        writer.write_u32::<LittleEndian>(self.width)?;
        writer.write_u32::<LittleEndian>(self.height)?;
        writer.write_i64::<LittleEndian>(self.uncompressed_size)?;
        writer.write_i64::<LittleEndian>(self.compressed_size)?;
        Ok(())
    }
}

// ── FrameHeader ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub width:                   u32,
    pub height:                  u32,
    pub uncompressed_size:       u32,
    pub compressed_size:         u32,
    pub block_uncompressed_size: u32,
}

impl FrameHeader {
    /// Parse the 20-byte record header starting at `offset`.
    pub fn parse_at(buf: &[u8], offset: usize) -> Result<Self, CodecError> {
        let at = |rel: usize| {
            offset
                .checked_add(rel)
                .ok_or_else(|| CodecError::bounds("frame header", offset, FRAME_HEADER_SIZE, buf.len()))
        };
        Ok(Self {
            width:                   read_u32(buf, at(0)?)?,
            height:                  read_u32(buf, at(4)?)?,
            uncompressed_size:       read_u32(buf, at(8)?)?,
            compressed_size:         read_u32(buf, at(12)?)?,
            block_uncompressed_size: read_u32(buf, at(16)?)?,
        })
    }

    /// Header for a record of `uncompressed` bytes packed into a block of
    /// `compressed` bytes, with both size fields populated.
    pub fn new(width: u32, height: u32, uncompressed: u32, compressed: u32) -> Self {
        Self {
            width,
            height,
            uncompressed_size:       uncompressed,
            compressed_size:         compressed,
            block_uncompressed_size: uncompressed,
        }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.width)?;
        writer.write_u32::<LittleEndian>(self.height)?;
        writer.write_u32::<LittleEndian>(self.uncompressed_size)?;
        writer.write_u32::<LittleEndian>(self.compressed_size)?;
        writer.write_u32::<LittleEndian>(self.block_uncompressed_size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_header_field_offsets() {
        let hdr = SaveHeader {
            checksum:          0xdead_beef,
            width:             1920,
            height:            1080,
            uncompressed_size: 5_000_000_000,
            compressed_size:   123_456,
        };
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();
        assert_eq!(buf.len(), SAVE_HEADER_SIZE);
        assert_eq!(&buf[4..8], &1920u32.to_le_bytes());
        assert_eq!(&buf[12..20], &5_000_000_000i64.to_le_bytes());
        assert_eq!(SaveHeader::parse(&buf).unwrap(), hdr);
    }

    #[test]
    fn frame_header_at_offset() {
        let mut buf = vec![0xEE; 3];
        FrameHeader { width: 640, height: 480, uncompressed_size: 9, compressed_size: 7, block_uncompressed_size: 11 }
            .write(&mut buf)
            .unwrap();
        assert_eq!(buf.len(), 3 + FRAME_HEADER_SIZE);
        let h = FrameHeader::parse_at(&buf, 3).unwrap();
        assert_eq!(h.width, 640);
        assert_eq!(h.uncompressed_size, 9);
        assert_eq!(h.compressed_size, 7);
        assert_eq!(h.block_uncompressed_size, 11);
    }

    #[test]
    fn short_headers_fail() {
        assert!(SaveHeader::parse(&[0u8; 27]).is_err());
        assert!(FrameHeader::parse_at(&[0u8; 25], 6).is_err());
        assert!(FrameHeader::parse_at(&[0u8; 25], usize::MAX).is_err());
    }
}

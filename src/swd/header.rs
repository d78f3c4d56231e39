//! SWD header and sub-chunk framing

use crate::container::{encode_name, put_u16, put_u32, LinkBytes, Timestamp, FORMAT_TAG};

/// File header size in bytes
pub const SWD_HEADER_SIZE: usize = 0x50;

/// Sub-chunk framing size
pub const CHUNK_HEADER_SIZE: usize = 16;

pub const SWD_MAGIC: &[u8; 4] = b"swdl";
pub const WAVI_MAGIC: &[u8; 4] = b"wavi";
pub const PRGI_MAGIC: &[u8; 4] = b"prgi";
pub const KGRP_MAGIC: &[u8; 4] = b"kgrp";
pub const EOD_MAGIC: &[u8; 4] = b"eod ";

/// Header field offsets (in bytes)
pub mod offset {
    pub const FILE_LENGTH: usize = 0x08;
    pub const FORMAT: usize = 0x0C;
    pub const LINK: usize = 0x0E;
    pub const DATE: usize = 0x18;
    pub const NAME: usize = 0x20;
    pub const TRAILER: usize = 0x30;
    /// Length of the external sample data chunk
    pub const PCMD_LENGTH: usize = 0x40;
    pub const WAVI_SLOTS: usize = 0x46;
    pub const PRGI_SLOTS: usize = 0x48;
    pub const UNKNOWN: usize = 0x4A;
    /// Copy of the `wavi` chunk length
    pub const WAVI_LENGTH: usize = 0x4C;

    /// Sub-chunk framing: body length
    pub const CHUNK_LENGTH: usize = 0x0C;
}

const HEADER_TRAILER: [u8; 16] = [
    0x00, 0xAA, 0xAA, 0xAA, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00,
];

/// Sample data lives in the shared main bank
const PCMD_EXTERNAL: [u8; 4] = [0x00, 0x00, 0xAA, 0xAA];

/// SWD file header
#[derive(Debug, Clone)]
pub struct SwdHeader {
    data: [u8; SWD_HEADER_SIZE],
}

impl SwdHeader {
    pub fn new(link: LinkBytes, timestamp: Timestamp, name: &str) -> Self {
        let mut data = [0u8; SWD_HEADER_SIZE];
        data[0..4].copy_from_slice(SWD_MAGIC);
        data[offset::FORMAT..offset::FORMAT + 2].copy_from_slice(&FORMAT_TAG);
        data[offset::LINK..offset::LINK + 2].copy_from_slice(&link.0);
        data[offset::DATE..offset::DATE + 8].copy_from_slice(&timestamp.to_bytes());
        data[offset::NAME..offset::NAME + 16].copy_from_slice(&encode_name(name));
        data[offset::TRAILER..offset::TRAILER + 16].copy_from_slice(&HEADER_TRAILER);
        data[offset::PCMD_LENGTH..offset::PCMD_LENGTH + 4].copy_from_slice(&PCMD_EXTERNAL);
        data[offset::UNKNOWN..offset::UNKNOWN + 2].copy_from_slice(&[0x07, 0x02]);
        Self { data }
    }

    pub fn set_slots(&mut self, wavi_slots: u16, prgi_slots: u16) {
        put_u16(&mut self.data, offset::WAVI_SLOTS, wavi_slots);
        put_u16(&mut self.data, offset::PRGI_SLOTS, prgi_slots);
    }

    pub fn set_wavi_length(&mut self, length: u32) {
        put_u32(&mut self.data, offset::WAVI_LENGTH, length);
    }

    pub fn set_file_length(&mut self, length: u32) {
        put_u32(&mut self.data, offset::FILE_LENGTH, length);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Build a sub-chunk header
pub fn chunk_header(magic: &[u8; 4], length: u32) -> [u8; CHUNK_HEADER_SIZE] {
    let mut data = [0u8; CHUNK_HEADER_SIZE];
    data[0..4].copy_from_slice(magic);
    data[6..8].copy_from_slice(&FORMAT_TAG);
    data[8] = 0x10;
    put_u32(&mut data, offset::CHUNK_LENGTH, length);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut header = SwdHeader::new(LinkBytes([0x1A, 0x2B]), Timestamp::from_bytes(&[0; 8]), "");
        header.set_slots(621, 128);
        header.set_wavi_length(0x520);
        header.set_file_length(0x1000);
        let bytes = header.as_bytes();
        assert_eq!(bytes.len(), 80);
        assert_eq!(&bytes[0..4], b"swdl");
        assert_eq!(&bytes[8..16], &[0x00, 0x10, 0, 0, 0x15, 0x04, 0x1A, 0x2B]);
        assert_eq!(bytes[0x20], 0);
        assert!(bytes[0x21..0x30].iter().all(|&b| b == 0xAA));
        assert_eq!(&bytes[0x30..0x34], &[0x00, 0xAA, 0xAA, 0xAA]);
        assert_eq!(&bytes[0x3C..0x48], &[0x10, 0, 0, 0, 0, 0, 0xAA, 0xAA, 0, 0, 0x6D, 0x02]);
        assert_eq!(&bytes[0x48..0x50], &[0x80, 0x00, 0x07, 0x02, 0x20, 0x05, 0, 0]);
    }

    #[test]
    fn test_chunk_header() {
        assert_eq!(
            chunk_header(KGRP_MAGIC, 56),
            *b"kgrp\x00\x00\x15\x04\x10\x00\x00\x00\x38\x00\x00\x00"
        );
    }
}

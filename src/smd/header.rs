//! SMD header, song chunk and chunk framing

use crate::container::{encode_name, put_u16, LinkBytes, Timestamp, FORMAT_TAG};

/// File header size in bytes
pub const SMD_HEADER_SIZE: usize = 0x40;

/// Song chunk size in bytes
pub const SONG_CHUNK_SIZE: usize = 0x40;

/// Framing size of `trk ` and `eoc ` chunks
pub const CHUNK_HEADER_SIZE: usize = 16;

/// Track body bytes ahead of the events: track id, channel id, two zeros
pub const TRACK_PREAMBLE_SIZE: usize = 4;

pub const SMD_MAGIC: &[u8; 4] = b"smdl";
pub const SONG_MAGIC: &[u8; 4] = b"song";
pub const TRACK_MAGIC: &[u8; 4] = b"trk ";
pub const EOC_MAGIC: &[u8; 4] = b"eoc ";

/// Header field offsets (in bytes)
pub mod offset {
    /// Total file length
    pub const FILE_LENGTH: usize = 0x08;
    /// Format tag 0x15 0x04
    pub const FORMAT: usize = 0x0C;
    /// Link bytes shared with the instrument bank
    pub const LINK: usize = 0x0E;
    /// Last-modified timestamp
    pub const DATE: usize = 0x18;
    /// File name
    pub const NAME: usize = 0x20;
    /// Fixed trailer
    pub const TRAILER: usize = 0x30;

    /// Song chunk: ticks per quarter note
    pub const SONG_TPQN: usize = 0x12;
    /// Song chunk: number of track chunks
    pub const SONG_TRACKS: usize = 0x16;
    /// Song chunk: number of MIDI channels in use
    pub const SONG_CHANNELS: usize = 0x17;

    /// Chunk framing: body length
    pub const CHUNK_LENGTH: usize = 0x0C;
}

const HEADER_TRAILER: [u8; 8] = [0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];

/// Fixed bytes of the `trk ` and `eoc ` framing after the magic
const CHUNK_FIXED: [u8; 8] = [0x00, 0x00, 0x00, 0x01, 0x04, 0xFF, 0x00, 0x00];

/// SMD file header
#[derive(Debug, Clone)]
pub struct SmdHeader {
    data: [u8; SMD_HEADER_SIZE],
}

impl SmdHeader {
    pub fn new(link: LinkBytes, timestamp: Timestamp, name: &str) -> Self {
        let mut data = [0u8; SMD_HEADER_SIZE];
        data[0..4].copy_from_slice(SMD_MAGIC);
        data[offset::FORMAT..offset::FORMAT + 2].copy_from_slice(&FORMAT_TAG);
        data[offset::LINK..offset::LINK + 2].copy_from_slice(&link.0);
        data[offset::DATE..offset::DATE + 8].copy_from_slice(&timestamp.to_bytes());
        data[offset::NAME..offset::NAME + 16].copy_from_slice(&encode_name(name));
        data[offset::TRAILER..offset::TRAILER + 8].copy_from_slice(&HEADER_TRAILER);
        data[offset::TRAILER + 8..].fill(0xFF);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Build the 64-byte `song` chunk
pub fn song_chunk(tpqn: u16, track_count: u8, channel_count: u8) -> [u8; SONG_CHUNK_SIZE] {
    let mut data = [0xFFu8; SONG_CHUNK_SIZE];
    let fixed: [u8; 0x30] = [
        b's', b'o', b'n', b'g', 0x00, 0x00, 0x00, 0x01, 0x10, 0xFF, 0x00, 0x00, 0xB0, 0xFF,
        0xFF, 0xFF, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0F,
        0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x40, 0x00, 0x40, 0x40, 0x00, 0x00, 0x02,
        0x00, 0x08, 0x00, 0xFF, 0xFF, 0xFF,
    ];
    data[..fixed.len()].copy_from_slice(&fixed);
    put_u16(&mut data, offset::SONG_TPQN, tpqn);
    data[offset::SONG_TRACKS] = track_count;
    data[offset::SONG_CHANNELS] = channel_count;
    data
}

/// Build a chunk header with a zeroed length field
pub fn chunk_header(magic: &[u8; 4]) -> [u8; CHUNK_HEADER_SIZE] {
    let mut data = [0u8; CHUNK_HEADER_SIZE];
    data[0..4].copy_from_slice(magic);
    data[4..12].copy_from_slice(&CHUNK_FIXED);
    data
}

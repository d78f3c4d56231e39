//! Sample (wave info) records

use crate::error::{Error, Result};

/// Size of a sample record
pub const SAMPLE_SIZE: usize = 64;

/// Record field offsets
pub mod offset {
    pub const ID: usize = 2;
    /// Position of the sample data in sound memory
    pub const POSITION: usize = 36;
    pub const LOOP_START: usize = 40;
    pub const LOOP_LENGTH: usize = 44;
}

/// A 64-byte sample record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    data: [u8; SAMPLE_SIZE],
}

impl Sample {
    /// Validate a raw record; `id` names the record in error messages
    pub fn parse(id: u16, data: &[u8]) -> Result<Self> {
        let data: [u8; SAMPLE_SIZE] = data.try_into().map_err(|_| Error::MalformedSample {
            id,
            message: format!("record is {} bytes, expected {}", data.len(), SAMPLE_SIZE),
        })?;
        Ok(Self { data })
    }

    pub fn id(&self) -> u16 {
        u16::from_le_bytes([self.data[offset::ID], self.data[offset::ID + 1]])
    }

    fn read_u32(&self, at: usize) -> u32 {
        u32::from_le_bytes([
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ])
    }

    pub fn position(&self) -> u32 {
        self.read_u32(offset::POSITION)
    }

    pub fn loop_start(&self) -> u32 {
        self.read_u32(offset::LOOP_START)
    }

    pub fn loop_length(&self) -> u32 {
        self.read_u32(offset::LOOP_LENGTH)
    }

    /// Bytes of sound memory the sample occupies
    pub fn footprint(&self) -> u64 {
        (self.loop_start() as u64 + self.loop_length() as u64) * 4
    }

    /// Record bytes relocated to `position`
    pub fn with_position(&self, position: u32) -> [u8; SAMPLE_SIZE] {
        let mut data = self.data;
        data[offset::POSITION..offset::POSITION + 4].copy_from_slice(&position.to_le_bytes());
        data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

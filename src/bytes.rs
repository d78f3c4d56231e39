//! Positional byte reader shared by the MIDI decoder and the container parsers

use crate::error::{Error, Result};

/// Longest variable-length quantity allowed by the MIDI standard
const MAX_VLQ_BYTES: usize = 4;

/// Byte reader over an in-memory buffer
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if we've reached the end of data
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Seek to a position
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn eof_error(&self) -> Error {
        Error::UnexpectedEof(self.pos)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = *self.data.get(self.pos).ok_or_else(|| self.eof_error())?;
        self.pos += 1;
        Ok(b)
    }

    /// Read bytes as a borrowed slice
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.eof_error());
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read bytes into an owned buffer
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.read_slice(len).map(<[u8]>::to_vec)
    }

    /// Read a four byte chunk tag
    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(self.read_slice(4)?);
        Ok(magic)
    }

    /// Read a 16-bit big-endian value
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    /// Read a 32-bit big-endian value
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let hi = self.read_u16_be()? as u32;
        let lo = self.read_u16_be()? as u32;
        Ok((hi << 16) | lo)
    }

    /// Read a 16-bit little-endian value
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let lo = self.read_u8()? as u16;
        let hi = self.read_u8()? as u16;
        Ok(lo | (hi << 8))
    }

    /// Read a 32-bit little-endian value
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let lo = self.read_u16_le()? as u32;
        let hi = self.read_u16_le()? as u32;
        Ok(lo | (hi << 16))
    }

    /// Read a MIDI variable-length quantity
    ///
    /// Seven bits per byte, most significant group first, top bit set on
    /// every byte except the last.
    pub fn read_vlq(&mut self) -> Result<u32> {
        let start = self.pos;
        let mut value = 0u32;
        for _ in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::MidiParse {
            offset: start,
            message: "Variable-length quantity longer than 4 bytes".into(),
        })
    }
}

/// Encode a value as a MIDI variable-length quantity
pub fn encode_vlq(mut value: u32) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push(((value & 0x7F) as u8) | 0x80);
        value >>= 7;
    }
    groups.reverse();
    groups
}

//! SMD wait-time encoding and decoding

use super::commands::{opcode, FIXED_PAUSES};

/// Largest pause a single Pause24 event can carry
pub const MAX_PAUSE: u64 = 0xFF_FFFF;

/// Encode a gap of `delta` ticks
///
/// `last` is the most recent pause value emitted on this track. Returns the
/// event bytes and the new last pause value.
pub fn encode_wait(mut delta: u64, mut last: Option<u32>) -> (Vec<u8>, Option<u32>) {
    let mut bytes = Vec::new();

    while delta > 0 {
        let chunk = delta.min(MAX_PAUSE) as u32;
        delta -= chunk as u64;

        if last == Some(chunk) {
            bytes.push(opcode::REPEAT_LAST_PAUSE);
        } else if chunk <= 0xFF {
            bytes.push(opcode::PAUSE_8);
            bytes.push(chunk as u8);
        } else if chunk <= 0xFFFF {
            bytes.push(opcode::PAUSE_16);
            bytes.extend_from_slice(&(chunk as u16).to_le_bytes());
        } else {
            bytes.push(opcode::PAUSE_24);
            bytes.extend_from_slice(&chunk.to_le_bytes()[..3]);
        }
        last = Some(chunk);
    }

    (bytes, last)
}

/// Tracks the pause register while decoding a track
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitDecoder {
    last: Option<u32>,
}

impl WaitDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length in ticks of the wait event starting with `op`
    ///
    /// Returns `None` when `op` is not a wait event.
    pub fn wait_ticks(&mut self, op: u8, operands: &[u8]) -> Option<u32> {
        let ticks = match op {
            0x80..=0x8F => FIXED_PAUSES[(op - opcode::FIXED_PAUSE_BASE) as usize],
            opcode::REPEAT_LAST_PAUSE => self.last.unwrap_or(0),
            opcode::ADD_TO_LAST_PAUSE => {
                self.last.unwrap_or(0) + operands.first().copied().unwrap_or(0) as u32
            }
            opcode::PAUSE_8 | opcode::PAUSE_16 | opcode::PAUSE_24 => operands
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32),
            _ => return None,
        };
        self.last = Some(ticks);
        Some(ticks)
    }
}

/// Sum the ticks of a byte sequence made only of wait events
pub fn decode_waits(bytes: &[u8]) -> Option<u64> {
    let mut decoder = WaitDecoder::new();
    let mut pos = 0;
    let mut total = 0u64;
    while pos < bytes.len() {
        let op = bytes[pos];
        let len = super::commands::operand_len(op)?;
        let operands = bytes.get(pos + 1..pos + 1 + len)?;
        total += decoder.wait_ticks(op, operands)? as u64;
        pos += 1 + len;
    }
    Some(total)
}

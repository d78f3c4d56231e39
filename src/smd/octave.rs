//! Octave delta coding for Play Note events
//!
//! Each track keeps an octave register. A note either reuses it, nudges it by
//! -2..=+1 through the 2-bit shift field, or resets it with an explicit
//! Set Octave event.

use super::commands::opcode;
use crate::error::{Error, Result};

/// Highest octave the engine can address
pub const MAX_OCTAVE: u8 = 9;

/// Shift code meaning "no change"
pub const NEUTRAL_SHIFT: u8 = 2;

/// MIDI key to (semitone, octave); keys 0-11 fold onto octave 0
pub const NOTE_TABLE: [(u8, u8); 128] = build_note_table();

const fn build_note_table() -> [(u8, u8); 128] {
    let mut table = [(0u8, 0u8); 128];
    let mut key = 0;
    while key < 128 {
        let octave = key / 12;
        table[key] = ((key % 12) as u8, if octave == 0 { 0 } else { (octave - 1) as u8 });
        key += 1;
    }
    table
}

/// Result of encoding one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNote {
    /// Set Octave event to emit before the note, if any
    pub prefix: Vec<u8>,
    /// Semitone 0-11
    pub note: u8,
    /// 2-bit shift code for the packed note byte
    pub shift_code: u8,
}

/// Per-track octave register on the encoding side
#[derive(Debug, Clone, Copy, Default)]
pub struct OctaveEncoder {
    current: Option<u8>,
}

impl OctaveEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Encode a MIDI key against the register, updating it
    pub fn encode(&mut self, key: u8) -> Result<EncodedNote> {
        let (note, octave) = *NOTE_TABLE.get(key as usize).ok_or(Error::OctaveOutOfRange {
            key,
            octave: key as i32 / 12 - 1,
        })?;
        if octave > MAX_OCTAVE {
            return Err(Error::OctaveOutOfRange {
                key,
                octave: octave as i32,
            });
        }

        let shift = self.current.map(|current| octave as i32 - current as i32);
        let (prefix, shift_code) = match shift {
            Some(0) => (Vec::new(), NEUTRAL_SHIFT),
            Some(1) => (Vec::new(), 3),
            Some(-1) => (Vec::new(), 1),
            Some(-2) => (Vec::new(), 0),
            _ => (vec![opcode::SET_OCTAVE, octave], NEUTRAL_SHIFT),
        };
        self.current = Some(octave);

        Ok(EncodedNote {
            prefix,
            note,
            shift_code,
        })
    }
}

/// Per-track octave register on the decoding side
#[derive(Debug, Clone, Copy, Default)]
pub struct OctaveDecoder {
    current: u8,
}

impl OctaveDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a Set Octave event
    pub fn set(&mut self, octave: u8) {
        self.current = octave;
    }

    /// Apply an Add Octave event
    pub fn add(&mut self, delta: i8) {
        self.current = (self.current as i16 + delta as i16).clamp(0, u8::MAX as i16) as u8;
    }

    /// Resolve a packed note to a MIDI key, updating the register
    pub fn decode(&mut self, note: u8, shift_code: u8) -> u8 {
        let octave = (self.current as i16 + (shift_code & 0x03) as i16 - NEUTRAL_SHIFT as i16).max(0);
        self.current = octave as u8;
        ((octave + 1) * 12 + note as i16).clamp(0, 127) as u8
    }
}

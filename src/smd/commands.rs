//! SMD track event definitions and the shared opcode width table

use serde::Serialize;

/// SMD track opcodes
///
/// Bytes 0x00-0x7F are Play Note events (the byte is the velocity).
pub mod opcode {
    /// First fixed-duration pause (0x80-0x8F)
    pub const FIXED_PAUSE_BASE: u8 = 0x80;
    pub const REPEAT_LAST_PAUSE: u8 = 0x90;
    pub const ADD_TO_LAST_PAUSE: u8 = 0x91;
    pub const PAUSE_8: u8 = 0x92;
    pub const PAUSE_16: u8 = 0x93;
    pub const PAUSE_24: u8 = 0x94;
    pub const PAUSE_UNTIL_RELEASE: u8 = 0x95;
    pub const END_OF_TRACK: u8 = 0x98;
    pub const LOOP_POINT: u8 = 0x99;
    pub const SET_OCTAVE: u8 = 0xA0;
    pub const ADD_OCTAVE: u8 = 0xA1;
    pub const SET_TEMPO: u8 = 0xA4;
    pub const SET_TEMPO_ALT: u8 = 0xA5;
    /// First byte of the 2-byte resource link identifier
    pub const LINK_BYTE_0: u8 = 0xA9;
    /// Second byte of the 2-byte resource link identifier
    pub const LINK_BYTE_1: u8 = 0xAA;
    pub const SET_PROGRAM: u8 = 0xAC;
    pub const PITCH_BEND: u8 = 0xD7;
    pub const SET_VOLUME: u8 = 0xE0;
    pub const SET_EXPRESSION: u8 = 0xE3;
    pub const SET_PAN: u8 = 0xE8;
}

/// Tick lengths of the fixed pauses 0x80-0x8F
pub const FIXED_PAUSES: [u32; 16] = [96, 72, 64, 48, 36, 32, 24, 18, 16, 12, 9, 8, 6, 4, 3, 2];

/// Number of operand bytes following an opcode in 0x80-0xFF
///
/// Returns `None` for bytes the engine does not define. Play Note events
/// (0x00-0x7F) are variable length and handled by [`note_operand_len`].
pub fn operand_len(opcode: u8) -> Option<usize> {
    let len = match opcode {
        0x80..=0x8F => 0,
        0x90 | 0x98 | 0x99 | 0xAB | 0xB0 | 0xCB | 0xF8 => 0,
        0x91 | 0x92 | 0x95 | 0x9C | 0x9D | 0x9E | 0xA0 | 0xA1 | 0xA4 | 0xA5 | 0xA9 | 0xAA
        | 0xAC | 0xB1 | 0xB2 | 0xB3 | 0xB5 | 0xB6 | 0xBC | 0xBF | 0xC0 | 0xC3 | 0xD1 | 0xD2
        | 0xDB | 0xDF | 0xE0 | 0xE1 | 0xE3 | 0xE7 | 0xE8 | 0xE9 | 0xEF | 0xF6 => 1,
        0x93 | 0xA8 | 0xB4 | 0xBE | 0xD0 | 0xD3 | 0xD5 | 0xD6 | 0xD7 | 0xD8 | 0xF2 => 2,
        0x94 | 0xAF | 0xD4 | 0xE2 | 0xEA | 0xF3 => 3,
        0xDD | 0xE5 | 0xED | 0xF1 => 4,
        0xDC | 0xE4 | 0xEC | 0xF0 => 5,
        _ => return None,
    };
    Some(len)
}

/// Number of duration bytes after the packed note byte of a Play Note
pub fn note_operand_len(note_byte: u8) -> usize {
    (note_byte >> 6) as usize
}

/// Pack the note byte of a Play Note event
pub fn pack_note(note: u8, octave_code: u8, width: u8) -> u8 {
    (note & 0x0F) | ((octave_code & 0x03) << 4) | ((width & 0x03) << 6)
}

/// A parsed SMD track event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SmdCommand {
    /// Play a note relative to the track octave
    PlayNote {
        velocity: u8,
        /// Semitone 0-11
        note: u8,
        /// Octave change applied before the note, -2..=1
        octave_shift: i8,
        /// Key-down duration; absent means reuse the previous one
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
    },
    /// Pause from the fixed duration table
    FixedPause { ticks: u32 },
    RepeatLastPause,
    AddToLastPause { ticks: u8 },
    Pause { ticks: u32 },
    PauseUntilRelease { value: u8 },
    EndOfTrack,
    LoopPoint,
    SetOctave { octave: u8 },
    AddOctave { delta: i8 },
    SetTempo { bpm: u8 },
    SetProgram { program: u8 },
    /// One byte of the resource link identifier
    LinkByte { index: u8, value: u8 },
    PitchBend { lsb: u8, msb: u8 },
    SetVolume { volume: u8 },
    SetExpression { expression: u8 },
    SetPan { pan: u8 },
    /// Defined opcode without a typed representation
    Other { opcode: u8, operands: Vec<u8> },
}

impl SmdCommand {
    /// Decode an event from its opcode and operand bytes
    pub fn from_parts(opcode: u8, operands: &[u8]) -> Self {
        let arg = |i: usize| operands.get(i).copied().unwrap_or(0);
        match opcode {
            0x00..=0x7F => {
                let packed = arg(0);
                let width = note_operand_len(packed);
                let duration = (width > 0).then(|| {
                    operands
                        .get(1..=width)
                        .unwrap_or(&[])
                        .iter()
                        .rev()
                        .fold(0u32, |acc, &b| (acc << 8) | b as u32)
                });
                SmdCommand::PlayNote {
                    velocity: opcode,
                    note: packed & 0x0F,
                    octave_shift: ((packed >> 4) & 0x03) as i8 - 2,
                    duration,
                }
            }
            0x80..=0x8F => SmdCommand::FixedPause {
                ticks: FIXED_PAUSES[(opcode - opcode::FIXED_PAUSE_BASE) as usize],
            },
            opcode::REPEAT_LAST_PAUSE => SmdCommand::RepeatLastPause,
            opcode::ADD_TO_LAST_PAUSE => SmdCommand::AddToLastPause { ticks: arg(0) },
            opcode::PAUSE_8 | opcode::PAUSE_16 | opcode::PAUSE_24 => SmdCommand::Pause {
                ticks: operands
                    .iter()
                    .rev()
                    .fold(0u32, |acc, &b| (acc << 8) | b as u32),
            },
            opcode::PAUSE_UNTIL_RELEASE => SmdCommand::PauseUntilRelease { value: arg(0) },
            opcode::END_OF_TRACK => SmdCommand::EndOfTrack,
            opcode::LOOP_POINT => SmdCommand::LoopPoint,
            opcode::SET_OCTAVE => SmdCommand::SetOctave { octave: arg(0) },
            opcode::ADD_OCTAVE => SmdCommand::AddOctave { delta: arg(0) as i8 },
            opcode::SET_TEMPO | opcode::SET_TEMPO_ALT => SmdCommand::SetTempo { bpm: arg(0) },
            opcode::SET_PROGRAM => SmdCommand::SetProgram { program: arg(0) },
            opcode::LINK_BYTE_0 => SmdCommand::LinkByte {
                index: 0,
                value: arg(0),
            },
            opcode::LINK_BYTE_1 => SmdCommand::LinkByte {
                index: 1,
                value: arg(0),
            },
            opcode::PITCH_BEND => SmdCommand::PitchBend {
                lsb: arg(0),
                msb: arg(1),
            },
            opcode::SET_VOLUME => SmdCommand::SetVolume { volume: arg(0) },
            opcode::SET_EXPRESSION => SmdCommand::SetExpression { expression: arg(0) },
            opcode::SET_PAN => SmdCommand::SetPan { pan: arg(0) },
            _ => SmdCommand::Other {
                opcode,
                operands: operands.to_vec(),
            },
        }
    }
}

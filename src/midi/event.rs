//! Raw MIDI events as they come off the byte stream

use serde::Serialize;

/// MIDI status nibbles
pub mod status {
    pub const NOTE_OFF: u8 = 0x8;
    pub const NOTE_ON: u8 = 0x9;
    pub const POLY_AFTERTOUCH: u8 = 0xA;
    pub const CONTROL_CHANGE: u8 = 0xB;
    pub const PROGRAM_CHANGE: u8 = 0xC;
    pub const CHANNEL_AFTERTOUCH: u8 = 0xD;
    pub const PITCH_BEND: u8 = 0xE;
    /// Full status bytes outside the channel range
    pub const SYSEX: u8 = 0xF0;
    pub const SYSEX_ESCAPE: u8 = 0xF7;
    pub const META: u8 = 0xFF;
}

/// Controller numbers the decoder intercepts
pub mod controller {
    pub const BANK_SELECT_MSB: u8 = 0;
    pub const VOLUME: u8 = 7;
    pub const PAN: u8 = 10;
    pub const EXPRESSION: u8 = 11;
    pub const BANK_SELECT_LSB: u8 = 32;
}

/// Meta event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetaKind {
    SequenceNumber,
    Text,
    Copyright,
    TrackName,
    InstrumentName,
    Lyric,
    Marker,
    CuePoint,
    ChannelPrefix,
    EndOfTrack,
    SetTempo,
    SmpteOffset,
    TimeSignature,
    KeySignature,
    SequencerSpecific,
    Unknown(u8),
}

impl MetaKind {
    pub fn from_type(meta_type: u8) -> Self {
        match meta_type {
            0x00 => Self::SequenceNumber,
            0x01 => Self::Text,
            0x02 => Self::Copyright,
            0x03 => Self::TrackName,
            0x04 => Self::InstrumentName,
            0x05 => Self::Lyric,
            0x06 => Self::Marker,
            0x07 => Self::CuePoint,
            0x20 => Self::ChannelPrefix,
            0x2F => Self::EndOfTrack,
            0x51 => Self::SetTempo,
            0x54 => Self::SmpteOffset,
            0x58 => Self::TimeSignature,
            0x59 => Self::KeySignature,
            0x7F => Self::SequencerSpecific,
            other => Self::Unknown(other),
        }
    }

    pub fn type_byte(self) -> u8 {
        match self {
            Self::SequenceNumber => 0x00,
            Self::Text => 0x01,
            Self::Copyright => 0x02,
            Self::TrackName => 0x03,
            Self::InstrumentName => 0x04,
            Self::Lyric => 0x05,
            Self::Marker => 0x06,
            Self::CuePoint => 0x07,
            Self::ChannelPrefix => 0x20,
            Self::EndOfTrack => 0x2F,
            Self::SetTempo => 0x51,
            Self::SmpteOffset => 0x54,
            Self::TimeSignature => 0x58,
            Self::KeySignature => 0x59,
            Self::SequencerSpecific => 0x7F,
            Self::Unknown(other) => other,
        }
    }

    /// Name used in instruction listings
    pub fn name(self) -> String {
        match self {
            Self::Unknown(other) => format!("Unknown{:02X}", other),
            known => format!("{:?}", known),
        }
    }

    /// Inverse of [`MetaKind::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(hex) = name.strip_prefix("Unknown") {
            return u8::from_str_radix(hex, 16).ok().map(Self::Unknown);
        }
        (0..=0x7Fu8)
            .map(Self::from_type)
            .find(|kind| !matches!(kind, Self::Unknown(_)) && kind.name() == name)
    }
}

/// Decoded MIDI primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEventKind {
    NoteOff { key: u8, velocity: u8 },
    NoteOn { key: u8, velocity: u8 },
    PolyAftertouch { key: u8, pressure: u8 },
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
    ChannelAftertouch { pressure: u8 },
    PitchBend { lsb: u8, msb: u8 },
    Meta { kind: MetaKind, payload: Vec<u8> },
    Sysex { payload: Vec<u8> },
}

/// A MIDI event with its delta time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Channel 0-15, `None` for meta and system exclusive events
    pub channel: Option<u8>,
    pub delta_ticks: u32,
    pub kind: RawEventKind,
}

impl RawEvent {
    pub fn is_end_of_track(&self) -> bool {
        matches!(
            self.kind,
            RawEventKind::Meta {
                kind: MetaKind::EndOfTrack,
                ..
            }
        )
    }
}

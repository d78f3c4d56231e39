//! Semantic instructions produced by the MIDI decoder

use crate::midi::MetaKind;

/// Instruction payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    /// A note with its hold duration in ticks
    PlayNote { key: u8, velocity: u8, duration: u64 },
    /// Generic controller change (bank select controllers are paired separately)
    ControlChange { controller: u8, value: u8 },
    /// 14-bit bank number assembled from controllers 0 and 32
    BankSelect { bank: u16 },
    /// MIDI program change
    InstrChange { program: u8 },
    PitchBend { lsb: u8, msb: u8 },
    MetaMessage { kind: MetaKind, payload: Vec<u8> },
    LoopPoint,
    Sysex { payload: Vec<u8> },
}

/// Instruction at an absolute tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub start_tick: u64,
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(start_tick: u64, kind: InstructionKind) -> Self {
        Self { start_tick, kind }
    }

    pub fn play_note(start_tick: u64, key: u8, velocity: u8, duration: u64) -> Self {
        Self::new(
            start_tick,
            InstructionKind::PlayNote {
                key,
                velocity,
                duration,
            },
        )
    }

    /// Ticks the instruction keeps sounding after its start
    pub fn hold_duration(&self) -> u64 {
        match self.kind {
            InstructionKind::PlayNote { duration, .. } => duration,
            _ => 0,
        }
    }

    /// Tick at which the instruction stops sounding
    pub fn end_tick(&self) -> u64 {
        self.start_tick + self.hold_duration()
    }

    /// Tempo in microseconds per quarter note, for Set Tempo meta messages
    pub fn tempo(&self) -> Option<u32> {
        match &self.kind {
            InstructionKind::MetaMessage {
                kind: MetaKind::SetTempo,
                payload,
            } if payload.len() == 3 => Some(
                payload
                    .iter()
                    .fold(0u32, |acc, &b| (acc << 8) | b as u32),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_tick() {
        assert_eq!(Instruction::play_note(10, 60, 100, 96).end_tick(), 106);
        let cc = Instruction::new(
            10,
            InstructionKind::ControlChange {
                controller: 7,
                value: 100,
            },
        );
        assert_eq!(cc.end_tick(), 10);
    }

    #[test]
    fn test_tempo() {
        let tempo = Instruction::new(
            0,
            InstructionKind::MetaMessage {
                kind: MetaKind::SetTempo,
                payload: vec![0x07, 0xA1, 0x20],
            },
        );
        assert_eq!(tempo.tempo(), Some(500_000));
    }
}

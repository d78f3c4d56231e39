//! Channel track to SMD track body encoding

use tracing::{debug, warn};

use super::commands::{opcode, operand_len, pack_note};
use super::delay::{encode_wait, MAX_PAUSE};
use super::header::TRACK_PREAMBLE_SIZE;
use super::octave::OctaveEncoder;
use crate::container::{padding, LinkBytes};
use crate::error::{Error, Result};
use crate::midi::event::controller;
use crate::song::{ChannelTrack, Instruction, InstructionKind};
use crate::swd::preset::{PresetKey, PresetRegistry};

/// An encoded track body
#[derive(Debug, Clone)]
pub struct EncodedTrack {
    /// Preamble, events, end of track and alignment padding
    pub body: Vec<u8>,
    /// Declared chunk length: preamble through the first End Of Track
    pub length: usize,
}

/// Convert microseconds per quarter note to the engine's one-byte tempo
pub fn tempo_to_bpm(us_per_quarter: u32) -> Option<u8> {
    if us_per_quarter == 0 {
        return None;
    }
    let mut bpm = 60_000_000 / us_per_quarter;
    while bpm >= 256 {
        bpm /= 2;
    }
    Some(bpm as u8)
}

/// Encoder state for one track
pub struct TrackEncoder<'a> {
    registry: &'a mut PresetRegistry,
    link: LinkBytes,
    body: Vec<u8>,
    clock: u64,
    last_pause: Option<u32>,
    octave: OctaveEncoder,
    bank: u16,
}

impl<'a> TrackEncoder<'a> {
    pub fn new(registry: &'a mut PresetRegistry, link: LinkBytes) -> Self {
        Self {
            registry,
            link,
            body: Vec::new(),
            clock: 0,
            last_pause: None,
            octave: OctaveEncoder::new(),
            bank: 0,
        }
    }

    /// Encode `track` as track `track_id` playing on MIDI channel `channel`
    pub fn encode(
        mut self,
        track: &ChannelTrack,
        track_id: u8,
        channel: u8,
        song_duration: u64,
    ) -> Result<EncodedTrack> {
        self.body.extend_from_slice(&[track_id, channel, 0, 0]);

        for instruction in track.iter() {
            self.wait_until(instruction.start_tick);
            self.encode_instruction(instruction)?;
        }

        if song_duration < self.clock {
            return Err(Error::NegativeRemainder {
                song_duration,
                last_tick: self.clock,
            });
        }
        self.wait_until(song_duration);

        self.body.push(opcode::END_OF_TRACK);
        let length = self.body.len();
        let pad = padding(length, 4);
        self.body
            .extend(std::iter::repeat(opcode::END_OF_TRACK).take(pad));

        debug!(
            "Track {} (channel {}): {} bytes",
            track_id,
            channel,
            length - TRACK_PREAMBLE_SIZE
        );
        Ok(EncodedTrack {
            body: self.body,
            length,
        })
    }

    fn wait_until(&mut self, tick: u64) {
        let delta = tick.saturating_sub(self.clock);
        let (bytes, last) = encode_wait(delta, self.last_pause);
        self.body.extend(bytes);
        self.last_pause = last;
        self.clock = self.clock.max(tick);
    }

    fn push_command(&mut self, op: u8, operands: &[u8]) {
        debug_assert_eq!(operand_len(op), Some(operands.len()), "opcode 0x{:02X}", op);
        self.body.push(op);
        self.body.extend_from_slice(operands);
    }

    fn encode_instruction(&mut self, instruction: &Instruction) -> Result<()> {
        match &instruction.kind {
            InstructionKind::PlayNote {
                key,
                velocity,
                duration,
            } => self.play_note(*key, *velocity, *duration)?,
            InstructionKind::ControlChange { controller, value } => {
                let op = match *controller {
                    controller::VOLUME => opcode::SET_VOLUME,
                    controller::EXPRESSION => opcode::SET_EXPRESSION,
                    controller::PAN => opcode::SET_PAN,
                    other => {
                        debug!(
                            "Controller {} at tick {} has no track event, dropped",
                            other, instruction.start_tick
                        );
                        return Ok(());
                    }
                };
                self.push_command(op, &[*value]);
            }
            InstructionKind::BankSelect { bank } => self.bank = *bank,
            InstructionKind::InstrChange { program } => {
                let id = self
                    .registry
                    .id_for(PresetKey::new(self.bank, *program))?;
                let [link0, link1] = self.link.0;
                self.push_command(opcode::LINK_BYTE_0, &[link0]);
                self.push_command(opcode::LINK_BYTE_1, &[link1]);
                self.push_command(opcode::SET_PROGRAM, &[id]);
            }
            InstructionKind::PitchBend { lsb, msb } => {
                self.push_command(opcode::PITCH_BEND, &[*lsb, *msb]);
            }
            InstructionKind::LoopPoint => self.push_command(opcode::LOOP_POINT, &[]),
            InstructionKind::MetaMessage { .. } => {
                if let Some(us) = instruction.tempo() {
                    match tempo_to_bpm(us) {
                        Some(bpm) => self.push_command(opcode::SET_TEMPO, &[bpm]),
                        None => warn!("Zero tempo at tick {} ignored", instruction.start_tick),
                    }
                }
            }
            InstructionKind::Sysex { .. } => {}
        }
        Ok(())
    }

    fn play_note(&mut self, key: u8, velocity: u8, duration: u64) -> Result<()> {
        if duration > MAX_PAUSE {
            return Err(Error::HoldTooLong(duration));
        }
        let width: u8 = match duration {
            0 => 0,
            1..=0xFF => 1,
            0x100..=0xFFFF => 2,
            _ => 3,
        };

        let encoded = self.octave.encode(key)?;
        self.body.extend_from_slice(&encoded.prefix);
        self.body.push(velocity.min(0x7F));
        self.body
            .push(pack_note(encoded.note, encoded.shift_code, width));
        self.body
            .extend_from_slice(&(duration as u32).to_le_bytes()[..width as usize]);
        Ok(())
    }
}

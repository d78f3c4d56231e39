//! Standard MIDI File decoder
//!
//! Turns the raw event stream into [`Song`] instructions, pairing Note-On with
//! Note-Off and Bank Select MSB with LSB.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use super::event::{controller, status, MetaKind, RawEvent, RawEventKind};
use crate::bytes::ByteReader;
use crate::error::{Error, Result};
use crate::song::{Instruction, InstructionKind, Song, META_CHANNEL};

const HEADER_MAGIC: &[u8; 4] = b"MThd";
const TRACK_MAGIC: &[u8; 4] = b"MTrk";
const HEADER_LENGTH: u32 = 6;

/// Header chunk contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiHeader {
    pub format: u16,
    pub track_count: u16,
    /// Ticks per quarter note
    pub tpqn: u16,
}

/// A Note-On waiting for its Note-Off
#[derive(Debug, Clone, Copy)]
struct PendingNote {
    start_tick: u64,
    velocity: u8,
}

/// A Bank Select MSB waiting for its LSB
#[derive(Debug, Clone, Copy)]
struct PendingBankSelect {
    start_tick: u64,
    msb: u8,
}

/// Stateful decoder; pairing state persists across tracks
pub struct MidiDecoder {
    /// FIFO of open notes keyed by (key, channel)
    pending_notes: HashMap<(u8, u8), VecDeque<PendingNote>>,
    /// Latest unmatched MSB per channel
    pending_banks: HashMap<u8, PendingBankSelect>,
    song: Song,
}

impl MidiDecoder {
    pub fn new(tpqn: u16) -> Self {
        Self {
            pending_notes: HashMap::new(),
            pending_banks: HashMap::new(),
            song: Song::new(tpqn),
        }
    }

    /// Decode every track chunk following the header
    pub fn decode_tracks(&mut self, reader: &mut ByteReader, track_count: u16) -> Result<()> {
        for index in 0..track_count {
            if reader.is_eof() {
                warn!(
                    "MIDI header declares {} tracks but only {} are present",
                    track_count, index
                );
                break;
            }
            self.decode_track(reader)?;
        }
        Ok(())
    }

    /// Decode one `MTrk` chunk
    pub fn decode_track(&mut self, reader: &mut ByteReader) -> Result<()> {
        let offset = reader.position();
        let magic = reader.read_magic()?;
        if &magic != TRACK_MAGIC {
            return Err(Error::MidiParse {
                offset,
                message: format!("Expected MTrk chunk, found {:?}", magic),
            });
        }
        let length = reader.read_u32_be()? as usize;
        let chunk_end = reader.position() + length;

        // Each track restarts the master clock
        let mut tick = 0u64;
        let mut running_status = None;
        loop {
            let event = read_event(reader, &mut running_status)?;
            tick += event.delta_ticks as u64;
            if event.is_end_of_track() {
                break;
            }
            self.apply(event, tick);
        }

        if chunk_end > reader.position() {
            reader.seek(chunk_end);
        }
        Ok(())
    }

    /// Fold one event into the song model
    fn apply(&mut self, event: RawEvent, tick: u64) {
        let channel = event.channel.unwrap_or(0);
        match event.kind {
            RawEventKind::NoteOn { key, velocity } if velocity > 0 => {
                self.pending_notes
                    .entry((key, channel))
                    .or_default()
                    .push_back(PendingNote {
                        start_tick: tick,
                        velocity,
                    });
            }
            RawEventKind::NoteOn { key, .. } | RawEventKind::NoteOff { key, .. } => {
                self.note_off(key, channel, tick);
            }
            RawEventKind::ControlChange {
                controller: controller::BANK_SELECT_MSB,
                value,
            } => {
                self.pending_banks.insert(
                    channel,
                    PendingBankSelect {
                        start_tick: tick,
                        msb: value,
                    },
                );
            }
            RawEventKind::ControlChange {
                controller: controller::BANK_SELECT_LSB,
                value,
            } => match self.pending_banks.remove(&channel) {
                Some(pending) => {
                    debug!(
                        "Bank select on channel {}: MSB at tick {}, LSB at tick {}",
                        channel, pending.start_tick, tick
                    );
                    let bank = ((pending.msb as u16) << 7) | value as u16;
                    self.push(channel, tick, InstructionKind::BankSelect { bank });
                }
                None => warn!(
                    "Bank select LSB without MSB on channel {} at tick {}, dropped",
                    channel, tick
                ),
            },
            RawEventKind::ControlChange { controller, value } => {
                self.push(
                    channel,
                    tick,
                    InstructionKind::ControlChange { controller, value },
                );
            }
            RawEventKind::ProgramChange { program } => {
                self.push(channel, tick, InstructionKind::InstrChange { program });
            }
            RawEventKind::PitchBend { lsb, msb } => {
                self.push(channel, tick, InstructionKind::PitchBend { lsb, msb });
            }
            RawEventKind::PolyAftertouch { .. } | RawEventKind::ChannelAftertouch { .. } => {
                debug!("Aftertouch on channel {} at tick {} ignored", channel, tick);
            }
            RawEventKind::Meta { kind, payload } => {
                if let MetaKind::Unknown(meta_type) = kind {
                    debug!("Unknown meta event type 0x{:02X} at tick {}", meta_type, tick);
                }
                self.song
                    .channel_mut(META_CHANNEL)
                    .push(Instruction::new(tick, InstructionKind::MetaMessage { kind, payload }));
            }
            RawEventKind::Sysex { payload } => {
                self.song
                    .channel_mut(META_CHANNEL)
                    .push(Instruction::new(tick, InstructionKind::Sysex { payload }));
            }
        }
    }

    fn push(&mut self, channel: u8, tick: u64, kind: InstructionKind) {
        self.song
            .channel_mut(channel as usize)
            .push(Instruction::new(tick, kind));
    }

    fn note_off(&mut self, key: u8, channel: u8, tick: u64) {
        let pending = self
            .pending_notes
            .get_mut(&(key, channel))
            .and_then(VecDeque::pop_front);
        match pending {
            Some(note) => {
                let duration = tick.saturating_sub(note.start_tick);
                self.push(
                    channel,
                    note.start_tick,
                    InstructionKind::PlayNote {
                        key,
                        velocity: note.velocity,
                        duration,
                    },
                );
            }
            None => warn!(
                "Note-off for key {} on channel {} at tick {} has no matching note-on, dropped",
                key, channel, tick
            ),
        }
    }

    /// Finish decoding, reporting anything left unpaired
    pub fn finish(self) -> Song {
        for ((key, channel), notes) in &self.pending_notes {
            for note in notes {
                warn!(
                    "Note-on for key {} on channel {} at tick {} was never released, dropped",
                    key, channel, note.start_tick
                );
            }
        }
        for (channel, bank) in &self.pending_banks {
            warn!(
                "Bank select MSB on channel {} at tick {} has no LSB, dropped",
                channel, bank.start_tick
            );
        }
        self.song
    }
}

/// Parse and validate the `MThd` chunk
pub fn parse_header(reader: &mut ByteReader) -> Result<MidiHeader> {
    let magic = reader.read_magic()?;
    if &magic != HEADER_MAGIC {
        return Err(Error::MidiParse {
            offset: 0,
            message: "Not a MIDI file (missing MThd)".into(),
        });
    }
    let length = reader.read_u32_be()?;
    if length != HEADER_LENGTH {
        return Err(Error::MidiParse {
            offset: 4,
            message: format!("Header length {} (expected {})", length, HEADER_LENGTH),
        });
    }
    let format = reader.read_u16_be()?;
    let track_count = reader.read_u16_be()?;
    let division = reader.read_u16_be()?;

    if format > 1 {
        return Err(Error::UnsupportedMidi(format!("format {}", format)));
    }
    if division & 0x8000 != 0 {
        return Err(Error::UnsupportedMidi("SMPTE time division".into()));
    }

    Ok(MidiHeader {
        format,
        track_count,
        tpqn: division & 0x7FFF,
    })
}

/// Read one event, updating the running status
pub fn read_event(reader: &mut ByteReader, running_status: &mut Option<u8>) -> Result<RawEvent> {
    let delta_ticks = reader.read_vlq()?;
    let offset = reader.position();
    let first = reader.read_u8()?;

    let status_byte = match first {
        status::META => {
            let meta_type = reader.read_u8()?;
            let length = reader.read_vlq()? as usize;
            let payload = reader.read_bytes(length)?;
            return Ok(RawEvent {
                channel: None,
                delta_ticks,
                kind: RawEventKind::Meta {
                    kind: MetaKind::from_type(meta_type),
                    payload,
                },
            });
        }
        status::SYSEX | status::SYSEX_ESCAPE => {
            let length = reader.read_vlq()? as usize;
            let payload = reader.read_bytes(length)?;
            return Ok(RawEvent {
                channel: None,
                delta_ticks,
                kind: RawEventKind::Sysex { payload },
            });
        }
        0x80..=0xEF => {
            *running_status = Some(first);
            first
        }
        0xF1..=0xFE => return Err(Error::UnknownStatus { status: first, offset }),
        _ => {
            // Data byte: reuse the previous channel status
            let previous = running_status.ok_or(Error::UnknownStatus { status: first, offset })?;
            reader.seek(offset);
            previous
        }
    };

    let channel = status_byte & 0x0F;
    let data1 = reader.read_u8()?;
    let kind = match status_byte >> 4 {
        status::NOTE_OFF => RawEventKind::NoteOff {
            key: data1,
            velocity: reader.read_u8()?,
        },
        status::NOTE_ON => RawEventKind::NoteOn {
            key: data1,
            velocity: reader.read_u8()?,
        },
        status::POLY_AFTERTOUCH => RawEventKind::PolyAftertouch {
            key: data1,
            pressure: reader.read_u8()?,
        },
        status::CONTROL_CHANGE => RawEventKind::ControlChange {
            controller: data1,
            value: reader.read_u8()?,
        },
        status::PROGRAM_CHANGE => RawEventKind::ProgramChange { program: data1 },
        status::CHANNEL_AFTERTOUCH => RawEventKind::ChannelAftertouch { pressure: data1 },
        status::PITCH_BEND => RawEventKind::PitchBend {
            lsb: data1,
            msb: reader.read_u8()?,
        },
        _ => {
            return Err(Error::UnknownStatus {
                status: status_byte,
                offset,
            })
        }
    };

    Ok(RawEvent {
        channel: Some(channel),
        delta_ticks,
        kind,
    })
}

/// Decode a complete Standard MIDI File
pub fn decode(data: &[u8]) -> Result<Song> {
    let mut reader = ByteReader::new(data);
    let header = parse_header(&mut reader)?;
    debug!(
        "MIDI format {}, {} tracks, {} ticks per quarter note",
        header.format, header.track_count, header.tpqn
    );

    let mut decoder = MidiDecoder::new(header.tpqn);
    decoder.decode_tracks(&mut reader, header.track_count)?;
    Ok(decoder.finish())
}

//! Text listing of a decoded song
//!
//! ```text
//! ntrks 2
//! tpqn 48
//! song_duration 96
//!
//! channel meta
//! starttime 0, MetaMessage, type SetTempo, data 07A120
//!
//! channel 0
//! starttime 0, PlayNote, key_note 60, velocity 100, duration 96
//! ```
//!
//! Field names follow [`InstructionKind`]: `ControlChange` carries
//! `controller`/`value`, `InstrChange` carries `program` and meta types are
//! written without spaces (`SetTempo`). The older spelling, with
//! `key_note`/`velocity` on controllers, `controller_number` on program
//! changes and `Set Tempo`, is rejected with a listing error.

use std::fmt::Write;

use super::{Instruction, InstructionKind, Song, META_CHANNEL};
use crate::error::{Error, Result};
use crate::midi::MetaKind;

/// Render a song as a listing
pub fn write_listing(song: &Song) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "ntrks {}", song.track_count());
    let _ = writeln!(out, "tpqn {}", song.tpqn);
    let _ = writeln!(out, "song_duration {}", song.song_duration());

    for (index, track) in song.tracks_in_use() {
        out.push('\n');
        if index == META_CHANNEL {
            out.push_str("channel meta\n");
        } else {
            let _ = writeln!(out, "channel {}", index);
        }
        for instruction in track.iter() {
            out.push_str(&format_instruction(instruction));
            out.push('\n');
        }
    }
    out
}

/// Render one instruction line
pub fn format_instruction(instruction: &Instruction) -> String {
    let fields = match &instruction.kind {
        InstructionKind::PlayNote {
            key,
            velocity,
            duration,
        } => format!(
            "PlayNote, key_note {}, velocity {}, duration {}",
            key, velocity, duration
        ),
        InstructionKind::ControlChange { controller, value } => format!(
            "ControlChange, controller {}, value {}",
            controller, value
        ),
        InstructionKind::BankSelect { bank } => format!("BankSelect, bank {}", bank),
        InstructionKind::InstrChange { program } => format!("InstrChange, program {}", program),
        InstructionKind::PitchBend { lsb, msb } => format!(
            "PitchBend, least_bytes {}, most_bytes {}",
            lsb, msb
        ),
        InstructionKind::MetaMessage { kind, payload } => format!(
            "MetaMessage, type {}, data {}",
            kind.name(),
            to_hex(payload)
        ),
        InstructionKind::LoopPoint => "LoopPoint".to_string(),
        InstructionKind::Sysex { payload } => format!("Sysex, data {}", to_hex(payload)),
    };
    format!("starttime {}, {}", instruction.start_tick, fields)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

fn from_hex(text: &str, line: usize) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 {
        return Err(listing_error(line, "odd number of hex digits"));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| listing_error(line, format!("invalid hex data '{}'", text)))
        })
        .collect()
}

fn listing_error(line: usize, message: impl Into<String>) -> Error {
    Error::Listing {
        line,
        message: message.into(),
    }
}

/// Parse a listing back into a song
pub fn parse_listing(text: &str) -> Result<Song> {
    let mut tpqn = None;
    let mut song: Option<Song> = None;
    let mut channel: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(value) = line.strip_prefix("tpqn ") {
            let value = parse_number::<u16>(value, line_no)?;
            tpqn = Some(value);
            song = Some(Song::new(value));
            continue;
        }
        if line.starts_with("ntrks ") || line.starts_with("song_duration ") {
            // Derived values, recomputed from the instructions
            continue;
        }
        if let Some(name) = line.strip_prefix("channel ") {
            channel = Some(if name == "meta" {
                META_CHANNEL
            } else {
                let n = parse_number::<usize>(name, line_no)?;
                if n >= META_CHANNEL {
                    return Err(listing_error(line_no, format!("channel {} out of range", n)));
                }
                n
            });
            continue;
        }

        let song = song
            .as_mut()
            .ok_or_else(|| listing_error(line_no, "instruction before tpqn header"))?;
        let target =
            channel.ok_or_else(|| listing_error(line_no, "instruction outside a channel block"))?;
        let instruction = parse_instruction(line, line_no)?;
        song.channel_mut(target).push(instruction);
    }

    match (tpqn, song) {
        (Some(_), Some(song)) => Ok(song),
        _ => Err(listing_error(0, "missing tpqn header")),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, line: usize) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| listing_error(line, format!("invalid number '{}'", text.trim())))
}

fn lookup_field<'a>(fields: &[(&str, &'a str)], name: &str, line: usize) -> Result<&'a str> {
    fields
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| *v)
        .ok_or_else(|| listing_error(line, format!("missing field '{}'", name)))
}

/// Parse one `starttime <tick>, <Kind>, <field> <value>...` line
pub fn parse_instruction(line: &str, line_no: usize) -> Result<Instruction> {
    let mut parts = line.split(',').map(str::trim).filter(|p| !p.is_empty());

    let start = parts
        .next()
        .and_then(|p| p.strip_prefix("starttime "))
        .ok_or_else(|| listing_error(line_no, "expected 'starttime <tick>'"))?;
    let start_tick = parse_number::<u64>(start, line_no)?;
    let kind_name = parts
        .next()
        .ok_or_else(|| listing_error(line_no, "missing instruction kind"))?;

    // A field with an empty value (e.g. `data` of an empty payload) has no space
    let fields: Vec<(&str, &str)> = parts
        .map(|p| p.split_once(' ').map(|(k, v)| (k, v.trim())).unwrap_or((p, "")))
        .collect();
    let field = |name: &'static str| lookup_field(&fields, name, line_no);

    let kind = match kind_name {
        "PlayNote" => InstructionKind::PlayNote {
            key: parse_number(field("key_note")?, line_no)?,
            velocity: parse_number(field("velocity")?, line_no)?,
            duration: parse_number(field("duration")?, line_no)?,
        },
        "ControlChange" => InstructionKind::ControlChange {
            controller: parse_number(field("controller")?, line_no)?,
            value: parse_number(field("value")?, line_no)?,
        },
        "BankSelect" => InstructionKind::BankSelect {
            bank: parse_number(field("bank")?, line_no)?,
        },
        "InstrChange" => InstructionKind::InstrChange {
            program: parse_number(field("program")?, line_no)?,
        },
        "PitchBend" => InstructionKind::PitchBend {
            lsb: parse_number(field("least_bytes")?, line_no)?,
            msb: parse_number(field("most_bytes")?, line_no)?,
        },
        "MetaMessage" => {
            let type_name = field("type")?;
            let kind = MetaKind::from_name(type_name).ok_or_else(|| {
                listing_error(line_no, format!("unknown meta type '{}'", type_name))
            })?;
            InstructionKind::MetaMessage {
                kind,
                payload: from_hex(field("data")?, line_no)?,
            }
        }
        "LoopPoint" => InstructionKind::LoopPoint,
        "Sysex" => InstructionKind::Sysex {
            payload: from_hex(field("data")?, line_no)?,
        },
        other => {
            return Err(listing_error(
                line_no,
                format!("unknown instruction kind '{}'", other),
            ))
        }
    };
    Ok(Instruction::new(start_tick, kind))
}

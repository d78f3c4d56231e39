//! SMD file reader and parser

use super::commands::{note_operand_len, opcode, operand_len, SmdCommand};
use super::delay::WaitDecoder;
use super::header::{
    offset, CHUNK_HEADER_SIZE, EOC_MAGIC, SMD_HEADER_SIZE, SMD_MAGIC, SONG_CHUNK_SIZE,
    SONG_MAGIC, TRACK_MAGIC, TRACK_PREAMBLE_SIZE,
};
use super::octave::{OctaveDecoder, NEUTRAL_SHIFT};
use crate::bytes::ByteReader;
use crate::container::{decode_name, padding, LinkBytes, Timestamp, NAME_LEN};
use crate::error::{Error, Result};

/// Parsed file header
#[derive(Debug, Clone)]
pub struct SmdInfo {
    pub file_length: u32,
    pub link: LinkBytes,
    pub timestamp: Timestamp,
    pub name: String,
}

/// Parsed song chunk
#[derive(Debug, Clone, Copy)]
pub struct SongInfo {
    pub tpqn: u16,
    pub track_count: u8,
    pub channel_count: u8,
}

/// A track event with the tick it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmdEvent {
    pub tick: u64,
    pub command: SmdCommand,
}

/// A note resolved to its MIDI key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackNote {
    pub tick: u64,
    pub key: u8,
    pub velocity: u8,
    pub duration: Option<u32>,
}

/// One parsed `trk ` chunk
#[derive(Debug, Clone)]
pub struct SmdTrack {
    pub track_id: u8,
    pub channel: u8,
    /// Declared chunk length
    pub length: u32,
    pub events: Vec<SmdEvent>,
    pub notes: Vec<TrackNote>,
    total_ticks: u64,
}

impl SmdTrack {
    /// Tick reached after the last event
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn commands(&self) -> impl Iterator<Item = &SmdCommand> {
        self.events.iter().map(|event| &event.command)
    }
}

/// Byte length of the event at `pos` in a track body, opcode included
pub fn event_len(body: &[u8], pos: usize) -> Result<usize> {
    let op = *body
        .get(pos)
        .ok_or_else(|| Error::SmdParse(format!("track ends without End Of Track at {}", pos)))?;
    let len = if op < 0x80 {
        let packed = *body
            .get(pos + 1)
            .ok_or_else(|| Error::SmdParse(format!("truncated note at {}", pos)))?;
        2 + note_operand_len(packed)
    } else {
        let operands = operand_len(op).ok_or_else(|| {
            Error::SmdParse(format!("undefined opcode 0x{:02X} at {}", op, pos))
        })?;
        1 + operands
    };
    if pos + len > body.len() {
        return Err(Error::SmdParse(format!(
            "event 0x{:02X} at {} runs past the track",
            op, pos
        )));
    }
    Ok(len)
}

/// Length of a track body from the preamble through the first End Of Track
pub fn track_length(body: &[u8]) -> Result<usize> {
    let mut pos = TRACK_PREAMBLE_SIZE;
    loop {
        let len = event_len(body, pos)?;
        let op = body[pos];
        pos += len;
        if op == opcode::END_OF_TRACK {
            return Ok(pos);
        }
    }
}

/// SMD file reader
pub struct SmdReader<'a> {
    reader: ByteReader<'a>,
}

impl<'a> SmdReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(data),
        }
    }

    /// Parse the 64-byte file header
    pub fn parse_header(&mut self) -> Result<SmdInfo> {
        self.reader.seek(0);
        let header = self
            .reader
            .read_slice(SMD_HEADER_SIZE)
            .map_err(|_| Error::SmdParse("file too small for SMD header".into()))?;
        if &header[0..4] != SMD_MAGIC {
            return Err(Error::SmdParse("invalid SMD magic".into()));
        }
        let mut date = [0u8; 8];
        date.copy_from_slice(&header[offset::DATE..offset::DATE + 8]);
        Ok(SmdInfo {
            file_length: u32::from_le_bytes([
                header[offset::FILE_LENGTH],
                header[offset::FILE_LENGTH + 1],
                header[offset::FILE_LENGTH + 2],
                header[offset::FILE_LENGTH + 3],
            ]),
            link: LinkBytes([header[offset::LINK], header[offset::LINK + 1]]),
            timestamp: Timestamp::from_bytes(&date),
            name: decode_name(&header[offset::NAME..offset::NAME + NAME_LEN]),
        })
    }

    /// Parse the `song` chunk following the header
    pub fn parse_song(&mut self) -> Result<SongInfo> {
        self.reader.seek(SMD_HEADER_SIZE);
        let chunk = self
            .reader
            .read_slice(SONG_CHUNK_SIZE)
            .map_err(|_| Error::SmdParse("file too small for song chunk".into()))?;
        if &chunk[0..4] != SONG_MAGIC {
            return Err(Error::SmdParse("missing song chunk".into()));
        }
        Ok(SongInfo {
            tpqn: u16::from_le_bytes([chunk[offset::SONG_TPQN], chunk[offset::SONG_TPQN + 1]]),
            track_count: chunk[offset::SONG_TRACKS],
            channel_count: chunk[offset::SONG_CHANNELS],
        })
    }

    /// Parse every track chunk up to the `eoc ` chunk
    pub fn parse_tracks(&mut self) -> Result<Vec<SmdTrack>> {
        self.reader.seek(SMD_HEADER_SIZE + SONG_CHUNK_SIZE);
        let mut tracks = Vec::new();
        loop {
            let chunk_start = self.reader.position();
            let header = self.reader.read_slice(CHUNK_HEADER_SIZE).map_err(|_| {
                Error::SmdParse(format!("missing eoc chunk after byte {}", chunk_start))
            })?;
            let magic = &header[0..4];
            if magic == EOC_MAGIC {
                break;
            }
            if magic != TRACK_MAGIC {
                return Err(Error::SmdParse(format!(
                    "unexpected chunk {:?} at byte {}",
                    String::from_utf8_lossy(magic),
                    chunk_start
                )));
            }
            let at = offset::CHUNK_LENGTH;
            let length = u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]]);
            let body = self.reader.read_slice(length as usize).map_err(|_| {
                Error::SmdParse(format!("track at byte {} runs past the file", chunk_start))
            })?;
            tracks.push(parse_track(body, length)?);

            let skip = padding(length as usize, 4).min(self.reader.remaining());
            self.reader.seek(self.reader.position() + skip);
        }
        Ok(tracks)
    }
}

fn parse_track(body: &[u8], length: u32) -> Result<SmdTrack> {
    if body.len() < TRACK_PREAMBLE_SIZE {
        return Err(Error::SmdParse("track shorter than its preamble".into()));
    }
    let mut track = SmdTrack {
        track_id: body[0],
        channel: body[1],
        length,
        events: Vec::new(),
        notes: Vec::new(),
        total_ticks: 0,
    };

    let mut waits = WaitDecoder::new();
    let mut octave = OctaveDecoder::new();
    let mut tick = 0u64;
    let mut pos = TRACK_PREAMBLE_SIZE;
    while pos < body.len() {
        let len = event_len(body, pos)?;
        let op = body[pos];
        let operands = &body[pos + 1..pos + len];
        let command = SmdCommand::from_parts(op, operands);
        pos += len;

        match &command {
            SmdCommand::PlayNote {
                velocity,
                note,
                octave_shift,
                duration,
            } => {
                let shift_code = (*octave_shift + NEUTRAL_SHIFT as i8) as u8;
                track.notes.push(TrackNote {
                    tick,
                    key: octave.decode(*note, shift_code),
                    velocity: *velocity,
                    duration: *duration,
                });
            }
            SmdCommand::SetOctave { octave: value } => octave.set(*value),
            SmdCommand::AddOctave { delta } => octave.add(*delta),
            _ => {}
        }

        let start = tick;
        if let Some(ticks) = waits.wait_ticks(op, operands) {
            tick += ticks as u64;
        }
        track.events.push(SmdEvent {
            tick: start,
            command,
        });
        if op == opcode::END_OF_TRACK {
            break;
        }
    }
    track.total_ticks = tick;
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smd::header::{chunk_header, song_chunk, SmdHeader};

    fn build_file(bodies: &[&[u8]]) -> Vec<u8> {
        let mut data = SmdHeader::new(LinkBytes([0xAB, 0xCD]), Timestamp::from_bytes(&[0; 8]), "test")
            .as_bytes()
            .to_vec();
        data.extend_from_slice(&song_chunk(48, bodies.len() as u8, 1));
        for body in bodies {
            let mut header = chunk_header(TRACK_MAGIC);
            let length = track_length(body).unwrap();
            header[12..16].copy_from_slice(&(length as u32).to_le_bytes());
            data.extend_from_slice(&header);
            data.extend_from_slice(body);
        }
        data.extend_from_slice(&chunk_header(EOC_MAGIC));
        data
    }

    #[test]
    fn test_track_length_walks_events() {
        // Note with two duration bytes, a 16-bit pause, padding after End Of Track
        let body = [0, 0, 0, 0, 100, 0xA0, 0x00, 0x01, 0x93, 0x00, 0x01, 0x98, 0x98];
        assert_eq!(track_length(&body).unwrap(), 12);
        assert!(track_length(&[0, 0, 0, 0, 0x96, 0x98]).is_err());
        assert!(track_length(&[0, 0, 0, 0, 0xE0]).is_err());
    }

    #[test]
    fn test_parse_file() {
        let first: &[u8] = &[0, 0, 0, 0, 0xA4, 120, 0x92, 96, 0x98, 0x98, 0x98, 0x98];
        let second: &[u8] = &[1, 2, 0, 0, 0xA0, 4, 100, 0x60, 96, 0x92, 96, 0x98];
        let data = build_file(&[first, second]);

        let mut reader = SmdReader::new(&data);
        let info = reader.parse_header().unwrap();
        assert_eq!(info.link, LinkBytes([0xAB, 0xCD]));
        assert_eq!(info.name, "test");
        let song = reader.parse_song().unwrap();
        assert_eq!(song.tpqn, 48);
        assert_eq!(song.track_count, 2);

        let tracks = reader.parse_tracks().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].length, 9);
        assert_eq!(tracks[0].total_ticks(), 96);
        assert_eq!(
            tracks[0].commands().cloned().collect::<Vec<_>>(),
            vec![
                SmdCommand::SetTempo { bpm: 120 },
                SmdCommand::Pause { ticks: 96 },
                SmdCommand::EndOfTrack
            ]
        );

        assert_eq!(tracks[1].track_id, 1);
        assert_eq!(tracks[1].channel, 2);
        assert_eq!(
            tracks[1].notes,
            vec![TrackNote {
                tick: 0,
                key: 60,
                velocity: 100,
                duration: Some(96)
            }]
        );
        assert_eq!(tracks[1].events.last().map(|e| e.tick), Some(96));
    }

    #[test]
    fn test_bad_magic() {
        let mut data = build_file(&[]);
        data[0] = b'x';
        assert!(SmdReader::new(&data).parse_header().is_err());

        let data = build_file(&[]);
        let mut truncated = data[..SMD_HEADER_SIZE + SONG_CHUNK_SIZE].to_vec();
        assert!(SmdReader::new(&truncated).parse_tracks().is_err());
        truncated.extend_from_slice(b"junk\0\0\0\0\0\0\0\0\0\0\0\0");
        assert!(SmdReader::new(&truncated).parse_tracks().is_err());
    }
}

//! MIDI to SMD conversion

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::PresetSelection;
use crate::container::{LinkBytes, Timestamp};
use crate::error::Result;
use crate::midi;
use crate::smd::{EncodedTrack, SmdHeader, SmdWriter, TrackEncoder};
use crate::song::{Song, META_CHANNEL};
use crate::swd::PresetRegistry;

/// Options shared by every conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Link identifier written to the header and every program change
    pub link: LinkBytes,
    /// Song name stored in the header
    pub name: String,
    /// Tick at which playback loops back
    pub loop_tick: Option<u64>,
    pub timestamp: Timestamp,
}

impl ConvertOptions {
    pub fn new(link: LinkBytes) -> Self {
        Self {
            link,
            name: String::new(),
            loop_tick: None,
            timestamp: Timestamp::now(),
        }
    }
}

/// Track bodies of a song and the presets they use
#[derive(Debug, Clone)]
pub struct EncodedSong {
    pub tpqn: u16,
    pub channel_count: u8,
    pub tracks: Vec<EncodedTrack>,
    pub registry: PresetRegistry,
}

pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Decode a MIDI file and apply the loop point
    pub fn load_song(&self, data: &[u8]) -> Result<Song> {
        let mut song = midi::decode(data)?;
        if let Some(tick) = self.options.loop_tick {
            song.insert_loop_point(tick);
        }
        Ok(song)
    }

    /// Encode every non-empty channel into a track body
    pub fn encode(&self, song: &Song) -> Result<EncodedSong> {
        let song_duration = song.song_duration();
        let mut registry = PresetRegistry::new();
        let mut tracks = Vec::new();
        for (track_id, (index, track)) in song.tracks_in_use().enumerate() {
            let channel = if index == META_CHANNEL { 0 } else { index as u8 };
            let encoded = TrackEncoder::new(&mut registry, self.options.link).encode(
                track,
                track_id as u8,
                channel,
                song_duration,
            )?;
            tracks.push(encoded);
        }
        debug!(
            "Encoded {} tracks, {} presets, {} ticks",
            tracks.len(),
            registry.len(),
            song_duration
        );
        Ok(EncodedSong {
            tpqn: song.tpqn,
            channel_count: song.note_channel_count() as u8,
            tracks,
            registry,
        })
    }

    /// Write an encoded song as an `smdl` file
    pub fn write(&self, encoded: &EncodedSong, output: &Path) -> Result<()> {
        let header = SmdHeader::new(self.options.link, self.options.timestamp, &self.options.name);
        let mut writer = SmdWriter::new(output, header)?;
        writer.write_song(encoded.tpqn, encoded.tracks.len() as u8, encoded.channel_count)?;
        for track in &encoded.tracks {
            writer.write_track(track)?;
        }
        writer.finalize()
    }

    /// Convert MIDI bytes to an `smdl` file, returning the presets it uses
    pub fn convert(&self, data: &[u8], output: &Path) -> Result<PresetSelection> {
        let song = self.load_song(data)?;
        let encoded = self.encode(&song)?;
        self.write(&encoded, output)?;
        info!(
            "Wrote {} ({} tracks, {} presets)",
            output.display(),
            encoded.tracks.len(),
            encoded.registry.len()
        );
        Ok(PresetSelection::from_registry(self.options.link, &encoded.registry))
    }

    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<PresetSelection> {
        let data = fs::read(input)?;
        self.convert(&data, output)
    }
}

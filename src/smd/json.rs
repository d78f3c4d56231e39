//! JSON serialization types for SMD data

use serde::Serialize;

use super::commands::SmdCommand;
use super::reader::{SmdEvent, SmdInfo, SmdTrack, SongInfo};
use crate::container::{LinkBytes, Timestamp};

/// Top-level JSON structure for an SMD file
#[derive(Debug, Clone, Serialize)]
pub struct SmdJson {
    pub header: SmdHeaderJson,
    pub song: SongJson,
    pub tracks: Vec<TrackJson>,
}

/// JSON representation of the file header
#[derive(Debug, Clone, Serialize)]
pub struct SmdHeaderJson {
    pub file_length: u32,
    /// Link identifier shared with the instrument bank
    pub link_byte: LinkBytes,
    /// Last modified, `YYYY-MM-DD hh:mm:ss`
    pub modified: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SongJson {
    pub tpqn: u16,
    pub track_count: u8,
    pub channel_count: u8,
}

/// One track chunk
#[derive(Debug, Clone, Serialize)]
pub struct TrackJson {
    pub track_id: u8,
    pub channel: u8,
    pub length: u32,
    /// Tick at which the track ends
    pub ticks: u64,
    pub events: Vec<EventJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventJson {
    pub tick: u64,
    #[serde(flatten)]
    pub command: SmdCommand,
}

impl SmdJson {
    /// Create an SmdJson from parsed SMD data
    pub fn new(info: &SmdInfo, song: &SongInfo, tracks: &[SmdTrack]) -> Self {
        Self {
            header: SmdHeaderJson::from(info),
            song: SongJson {
                tpqn: song.tpqn,
                track_count: song.track_count,
                channel_count: song.channel_count,
            },
            tracks: tracks.iter().map(TrackJson::from).collect(),
        }
    }
}

impl From<&SmdInfo> for SmdHeaderJson {
    fn from(info: &SmdInfo) -> Self {
        Self {
            file_length: info.file_length,
            link_byte: info.link,
            modified: format_timestamp(&info.timestamp),
            name: info.name.clone(),
        }
    }
}

impl From<&SmdTrack> for TrackJson {
    fn from(track: &SmdTrack) -> Self {
        Self {
            track_id: track.track_id,
            channel: track.channel,
            length: track.length,
            ticks: track.total_ticks(),
            events: track.events.iter().map(EventJson::from).collect(),
        }
    }
}

impl From<&SmdEvent> for EventJson {
    fn from(event: &SmdEvent) -> Self {
        Self {
            tick: event.tick,
            command: event.command.clone(),
        }
    }
}

fn format_timestamp(stamp: &Timestamp) -> String {
    if stamp.year == 0 && stamp.month == 0 {
        String::new()
    } else {
        stamp.to_string()
    }
}

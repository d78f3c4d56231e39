//! Per-channel instruction model

pub mod instruction;
pub mod listing;

pub use instruction::{Instruction, InstructionKind};

use std::collections::BTreeMap;

/// Number of MIDI note channels
pub const NOTE_CHANNELS: usize = 16;

/// Index of the tempo / meta message track
pub const META_CHANNEL: usize = 16;

/// Note channels plus the meta track
pub const CHANNEL_COUNT: usize = NOTE_CHANNELS + 1;

/// Tick-ordered instruction sequence of one channel
///
/// Instructions sharing a tick keep the order they were pushed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTrack {
    instructions: BTreeMap<u64, Vec<Instruction>>,
}

impl ChannelTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instruction at its start tick
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions
            .entry(instruction.start_tick)
            .or_default()
            .push(instruction);
    }

    /// All instructions in tick order
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.instructions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Start tick of the last instruction
    pub fn last_tick(&self) -> Option<u64> {
        self.instructions.keys().next_back().copied()
    }

    /// Latest tick at which anything on this channel is still sounding
    pub fn end_tick(&self) -> u64 {
        self.iter().map(Instruction::end_tick).max().unwrap_or(0)
    }

    /// Add a loop point, only if the channel already carries instructions
    pub fn insert_loop_point(&mut self, tick: u64) -> bool {
        if self.is_empty() {
            return false;
        }
        self.push(Instruction::new(tick, InstructionKind::LoopPoint));
        true
    }
}

/// A decoded song: one track per MIDI channel plus the meta track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Ticks per quarter note
    pub tpqn: u16,
    /// Indexed by channel, [`META_CHANNEL`] last
    pub channels: [ChannelTrack; CHANNEL_COUNT],
}

impl Song {
    pub fn new(tpqn: u16) -> Self {
        Self {
            tpqn,
            channels: std::array::from_fn(|_| ChannelTrack::new()),
        }
    }

    pub fn channel(&self, index: usize) -> &ChannelTrack {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut ChannelTrack {
        &mut self.channels[index]
    }

    pub fn meta(&self) -> &ChannelTrack {
        &self.channels[META_CHANNEL]
    }

    /// Latest end tick over every channel
    pub fn song_duration(&self) -> u64 {
        self.channels
            .iter()
            .map(ChannelTrack::end_tick)
            .max()
            .unwrap_or(0)
    }

    /// Non-empty tracks in container order: the meta track first, then the
    /// note channels ascending
    pub fn tracks_in_use(&self) -> impl Iterator<Item = (usize, &ChannelTrack)> {
        std::iter::once(META_CHANNEL)
            .chain(0..NOTE_CHANNELS)
            .map(move |index| (index, &self.channels[index]))
            .filter(|(_, track)| !track.is_empty())
    }

    /// Number of tracks that will produce a track chunk
    pub fn track_count(&self) -> usize {
        self.tracks_in_use().count()
    }

    /// Number of MIDI note channels carrying instructions
    pub fn note_channel_count(&self) -> usize {
        self.channels[..NOTE_CHANNELS]
            .iter()
            .filter(|track| !track.is_empty())
            .count()
    }

    /// Add a loop point to every non-empty note channel
    pub fn insert_loop_point(&mut self, tick: u64) {
        for track in &mut self.channels[..NOTE_CHANNELS] {
            track.insert_loop_point(tick);
        }
    }
}

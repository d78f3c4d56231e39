use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected end of data at byte {0}")]
    UnexpectedEof(usize),

    #[error("MIDI parse error at byte {offset}: {message}")]
    MidiParse { offset: usize, message: String },

    #[error("Unsupported MIDI file: {0}")]
    UnsupportedMidi(String),

    #[error("Unknown MIDI status byte 0x{status:02X} at byte {offset}")]
    UnknownStatus { status: u8, offset: usize },

    #[error("SMD parse error: {0}")]
    SmdParse(String),

    #[error("SWD parse error: {0}")]
    SwdParse(String),

    #[error("Octave {octave} for key {key} is outside the playable range")]
    OctaveOutOfRange { key: u8, octave: i32 },

    #[error("Note hold of {0} ticks does not fit in 24 bits")]
    HoldTooLong(u64),

    #[error("Song ends at tick {song_duration} but channel has events up to tick {last_tick}")]
    NegativeRemainder { song_duration: u64, last_tick: u64 },

    #[error("Song uses {0} distinct presets, the bank holds at most 128")]
    TooManyPresets(usize),

    #[error("Preset '{name}' is malformed: {message}")]
    MalformedPreset { name: String, message: String },

    #[error("Sample {id} is malformed: {message}")]
    MalformedSample { id: u16, message: String },

    #[error("Listing error at line {line}: {message}")]
    Listing { line: usize, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

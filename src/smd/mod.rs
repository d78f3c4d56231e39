pub mod commands;
pub mod delay;
pub mod encoder;
pub mod header;
pub mod json;
pub mod octave;
pub mod reader;
pub mod writer;

pub use commands::SmdCommand;
pub use encoder::{EncodedTrack, TrackEncoder};
pub use header::SmdHeader;
pub use json::SmdJson;
pub use reader::{SmdInfo, SmdReader, SmdTrack, SongInfo, TrackNote};
pub use writer::SmdWriter;

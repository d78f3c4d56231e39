//! MIDI input handling

pub mod decoder;
pub mod event;

pub use decoder::{decode, parse_header, MidiDecoder, MidiHeader};
pub use event::{MetaKind, RawEvent, RawEventKind};

pub mod bank;
pub mod harvest;
pub mod header;
pub mod keygroup;
pub mod library;
pub mod preset;
pub mod reader;
pub mod sample;
pub mod writer;

pub use bank::Bank;
pub use harvest::Harvest;
pub use library::Library;
pub use preset::{Preset, PresetKey, PresetRegistry};
pub use reader::{SwdInfo, SwdReader};
pub use sample::Sample;
pub use writer::SwdWriter;

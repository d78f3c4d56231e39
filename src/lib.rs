pub mod bytes;
pub mod config;
pub mod container;
pub mod converter;
pub mod error;
pub mod midi;
pub mod names;
pub mod smd;
pub mod song;
pub mod swd;

pub use config::PresetSelection;
pub use container::LinkBytes;
pub use converter::{ConvertOptions, Converter};
pub use error::Error;

//! On-disk resource library of preset and sample records
//!
//! ```text
//! <root>/presets/<name>.bin
//! <root>/samples/<id>.bin
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::preset::Preset;
use super::sample::Sample;
use crate::error::Result;

pub const PRESETS_DIR: &str = "presets";
pub const SAMPLES_DIR: &str = "samples";

#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn preset_path(&self, name: &str) -> PathBuf {
        self.root.join(PRESETS_DIR).join(format!("{}.bin", name))
    }

    pub fn sample_path(&self, id: u16) -> PathBuf {
        self.root.join(SAMPLES_DIR).join(format!("{}.bin", id))
    }

    /// Load a preset record; `Ok(None)` when the library has no such file
    pub fn load_preset(&self, name: &str) -> Result<Option<Preset>> {
        match read_optional(&self.preset_path(name))? {
            Some(data) => Ok(Some(Preset::parse(name, data)?)),
            None => Ok(None),
        }
    }

    /// Load a sample record; `Ok(None)` when the library has no such file
    pub fn load_sample(&self, id: u16) -> Result<Option<Sample>> {
        match read_optional(&self.sample_path(id))? {
            Some(data) => Ok(Some(Sample::parse(id, &data)?)),
            None => Ok(None),
        }
    }

    pub fn save_preset(&self, name: &str, preset: &Preset) -> Result<()> {
        let path = self.preset_path(name);
        create_parent(&path)?;
        fs::write(path, preset.as_bytes())?;
        Ok(())
    }

    pub fn save_sample(&self, sample: &Sample) -> Result<()> {
        let path = self.sample_path(sample.id());
        create_parent(&path)?;
        fs::write(path, sample.as_bytes())?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

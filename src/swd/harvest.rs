//! Build the resource library from the game's own `bgmNNNN.swd` banks

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::library::Library;
use super::preset::Preset;
use super::reader::SwdReader;
use super::sample::Sample;
use crate::error::Result;
use crate::names::harvest_name;

/// Highest bank file number scanned
pub const LAST_FILE: u16 = 200;

/// Banks that are not instrument banks
pub const SKIPPED_FILES: [u16; 6] = [109, 194, 195, 196, 197, 198];

/// Bank file numbers scanned, in order
pub fn file_numbers() -> impl Iterator<Item = u16> {
    (0..=LAST_FILE).filter(|n| !SKIPPED_FILES.contains(n))
}

pub fn bank_path(dir: &Path, file_number: u16) -> PathBuf {
    dir.join(format!("bgm{:04}.swd", file_number))
}

/// Named presets and samples collected from one or more banks
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub presets: BTreeMap<String, Preset>,
    pub samples: BTreeMap<u16, Sample>,
}

impl Harvest {
    /// Collect the records of one bank
    ///
    /// Presets without a name for `(file_number, id)` are skipped.
    pub fn from_bank(file_number: u16, data: &[u8]) -> Result<Self> {
        let reader = SwdReader::new(data);
        let info = reader.parse_header()?;
        let mut harvest = Self::default();
        for sample in reader.parse_samples(&info)? {
            harvest.samples.insert(sample.id(), sample);
        }
        for preset in reader.parse_presets(&info)? {
            match harvest_name(file_number, preset.id()) {
                Some(name) => {
                    debug!("bgm{:04} program {}: {}", file_number, preset.id(), name);
                    harvest.presets.insert(name.to_string(), preset);
                }
                None => debug!("bgm{:04} program {}: unnamed", file_number, preset.id()),
            }
        }
        Ok(harvest)
    }

    /// Fold `other` into `self`; entries from `other` win
    pub fn merge(&mut self, other: Harvest) {
        self.presets.extend(other.presets);
        self.samples.extend(other.samples);
    }

    /// Write every record into `library`
    pub fn save(&self, library: &Library) -> Result<()> {
        for (name, preset) in &self.presets {
            library.save_preset(name, preset)?;
        }
        for sample in self.samples.values() {
            library.save_sample(sample)?;
        }
        Ok(())
    }
}

/// Harvest every bank in `dir`
///
/// Banks are parsed in parallel and merged in file order, so a later bank
/// overrides records of the same name or id. Missing banks are skipped.
pub fn harvest_dir(dir: &Path) -> Result<Harvest> {
    let numbers: Vec<u16> = file_numbers().collect();
    let banks: Result<Vec<Option<Harvest>>> = numbers
        .par_iter()
        .map(|&number| {
            let path = bank_path(dir, number);
            match fs::read(&path) {
                Ok(data) => Harvest::from_bank(number, &data).map(Some),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("{} not found, skipped", path.display());
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .collect();

    let mut harvest = Harvest::default();
    for bank in banks?.into_iter().flatten() {
        harvest.merge(bank);
    }
    info!(
        "Harvested {} presets and {} samples",
        harvest.presets.len(),
        harvest.samples.len()
    );
    Ok(harvest)
}

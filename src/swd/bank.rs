//! Assemble an instrument bank from a preset selection

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use super::header::SwdHeader;
use super::keygroup::DEFAULT_KEYGROUPS;
use super::library::Library;
use super::preset::Preset;
use super::sample::Sample;
use super::writer::SwdWriter;
use crate::config::PresetSelection;
use crate::container::Timestamp;
use crate::error::Result;

/// Presets in program id order plus every sample they reference
#[derive(Debug, Clone, Default)]
pub struct Bank {
    pub presets: Vec<Option<Preset>>,
    pub samples: BTreeMap<u16, Sample>,
}

impl Bank {
    /// Load the selected presets and their samples from `library`
    ///
    /// A preset missing from the library, or referencing a sample missing
    /// from it, is reported and left out; its program slot stays empty.
    pub fn gather(selection: &PresetSelection, library: &Library) -> Result<Self> {
        let mut bank = Bank::default();
        for entry in &selection.presets {
            let Some(preset) = library.load_preset(&entry.name)? else {
                warn!(
                    "Preset '{}' (bank {}, program {}) is not in the library",
                    entry.name, entry.bank, entry.program
                );
                bank.presets.push(None);
                continue;
            };

            let mut samples = BTreeMap::new();
            let mut missing = Vec::new();
            for id in preset.sample_ids() {
                if samples.contains_key(&id) || bank.samples.contains_key(&id) {
                    continue;
                }
                match library.load_sample(id)? {
                    Some(sample) => {
                        samples.insert(id, sample);
                    }
                    None => missing.push(id),
                }
            }
            if !missing.is_empty() {
                warn!(
                    "Preset '{}' uses samples {:?} that are not in the library, left out",
                    entry.name, missing
                );
                bank.presets.push(None);
                continue;
            }
            bank.samples.extend(samples);
            bank.presets.push(Some(preset));
        }
        Ok(bank)
    }

    /// Write the bank as an `swdl` file
    pub fn write(&self, path: &Path, header: SwdHeader) -> Result<()> {
        SwdWriter::new(path, header)?.write_bank(&self.presets, &self.samples, &DEFAULT_KEYGROUPS)?;
        info!(
            "Wrote {} ({} presets, {} samples)",
            path.display(),
            self.presets.iter().flatten().count(),
            self.samples.len()
        );
        Ok(())
    }
}

/// Build the bank for `selection` and write it to `output`
pub fn generate(
    selection: &PresetSelection,
    library: &Library,
    output: &Path,
    timestamp: Timestamp,
) -> Result<Bank> {
    let bank = Bank::gather(selection, library)?;
    bank.write(output, SwdHeader::new(selection.link_byte, timestamp, ""))?;
    Ok(bank)
}

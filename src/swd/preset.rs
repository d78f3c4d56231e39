//! Program (preset) records and the per-run preset registry

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Program table slots in every generated bank
pub const PRESET_SLOTS: usize = 128;

/// Fixed part of a preset record ahead of the LFO table
pub const PRESET_HEADER_SIZE: usize = 16;

pub const LFO_SIZE: usize = 16;

/// Separator between the LFO table and the splits
pub const SEPARATOR_SIZE: usize = 16;

pub const SPLIT_SIZE: usize = 48;

/// Offset of the sample id inside a split
pub const SPLIT_SAMPLE_ID: usize = 18;

/// Record field offsets
mod offset {
    pub const SPLIT_COUNT: usize = 2;
    pub const LFO_COUNT: usize = 11;
}

/// MIDI bank and program identifying an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresetKey {
    pub bank: u16,
    pub program: u8,
}

impl PresetKey {
    pub fn new(bank: u16, program: u8) -> Self {
        Self { bank, program }
    }
}

/// Assigns dense ids `0..n` to presets in first-use order
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    ids: HashMap<PresetKey, u8>,
    order: Vec<PresetKey>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `key`, allocating the next one on first use
    pub fn id_for(&mut self, key: PresetKey) -> Result<u8> {
        if let Some(&id) = self.ids.get(&key) {
            return Ok(id);
        }
        if self.order.len() >= PRESET_SLOTS {
            return Err(Error::TooManyPresets(self.order.len() + 1));
        }
        let id = self.order.len() as u8;
        self.ids.insert(key, id);
        self.order.push(key);
        Ok(id)
    }

    /// Keys in id order
    pub fn keys(&self) -> &[PresetKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A validated preset record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    data: Vec<u8>,
    lfo_count: usize,
    split_count: usize,
}

impl Preset {
    /// Validate a raw record against its own LFO and split counts
    pub fn parse(name: &str, data: Vec<u8>) -> Result<Self> {
        let malformed = |message: String| Error::MalformedPreset {
            name: name.to_string(),
            message,
        };
        if data.len() < PRESET_HEADER_SIZE {
            return Err(malformed(format!(
                "record is {} bytes, shorter than its header",
                data.len()
            )));
        }
        let split_count =
            u16::from_le_bytes([data[offset::SPLIT_COUNT], data[offset::SPLIT_COUNT + 1]]) as usize;
        let lfo_count = data[offset::LFO_COUNT] as usize;
        let expected = Self::record_len(lfo_count, split_count);
        if data.len() != expected {
            return Err(malformed(format!(
                "record is {} bytes but {} LFOs and {} splits need {}",
                data.len(),
                lfo_count,
                split_count,
                expected
            )));
        }
        if split_count == 0 {
            return Err(malformed("record has no splits".into()));
        }
        Ok(Self {
            data,
            lfo_count,
            split_count,
        })
    }

    /// Record length implied by the LFO and split counts
    pub fn record_len(lfo_count: usize, split_count: usize) -> usize {
        PRESET_HEADER_SIZE + LFO_SIZE * lfo_count + SEPARATOR_SIZE + SPLIT_SIZE * split_count
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Id stored in the record
    pub fn id(&self) -> u16 {
        u16::from_le_bytes([self.data[0], self.data[1]])
    }

    pub fn split_count(&self) -> usize {
        self.split_count
    }

    pub fn lfo_count(&self) -> usize {
        self.lfo_count
    }

    /// Sample ids referenced by each split, in split order
    pub fn sample_ids(&self) -> Vec<u16> {
        let splits_start = PRESET_HEADER_SIZE + LFO_SIZE * self.lfo_count + SEPARATOR_SIZE;
        (0..self.split_count)
            .map(|i| {
                let at = splits_start + SPLIT_SIZE * i + SPLIT_SAMPLE_ID;
                u16::from_le_bytes([self.data[at], self.data[at + 1]])
            })
            .collect()
    }

    /// Record bytes with the id byte replaced
    pub fn with_id(&self, id: u8) -> Vec<u8> {
        let mut data = self.data.clone();
        data[0] = id;
        data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a preset record with the given sample ids, one split each
    pub(crate) fn preset_bytes(id: u8, lfos: u8, samples: &[u16]) -> Vec<u8> {
        let mut data = vec![0u8; Preset::record_len(lfos as usize, samples.len())];
        data[0] = id;
        data[2..4].copy_from_slice(&(samples.len() as u16).to_le_bytes());
        data[11] = lfos;
        let splits_start = PRESET_HEADER_SIZE + LFO_SIZE * lfos as usize + SEPARATOR_SIZE;
        for (i, sample) in samples.iter().enumerate() {
            let at = splits_start + SPLIT_SIZE * i + SPLIT_SAMPLE_ID;
            data[at..at + 2].copy_from_slice(&sample.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_registry_dense_first_use_ids() {
        let mut registry = PresetRegistry::new();
        assert_eq!(registry.id_for(PresetKey::new(0, 5)).unwrap(), 0);
        assert_eq!(registry.id_for(PresetKey::new(1, 2)).unwrap(), 1);
        assert_eq!(registry.id_for(PresetKey::new(0, 5)).unwrap(), 0);
        assert_eq!(registry.id_for(PresetKey::new(0, 7)).unwrap(), 2);
        assert_eq!(
            registry.keys(),
            &[
                PresetKey::new(0, 5),
                PresetKey::new(1, 2),
                PresetKey::new(0, 7)
            ]
        );
    }

    #[test]
    fn test_registry_limit() {
        let mut registry = PresetRegistry::new();
        for program in 0..128u8 {
            registry.id_for(PresetKey::new(0, program)).unwrap();
        }
        assert!(matches!(
            registry.id_for(PresetKey::new(1, 0)),
            Err(Error::TooManyPresets(129))
        ));
        // Known keys still resolve
        assert_eq!(registry.id_for(PresetKey::new(0, 127)).unwrap(), 127);
    }

    #[test]
    fn test_standard_preset_layout() {
        // Four LFOs and one split: the sample id sits at byte 114
        let data = preset_bytes(9, 4, &[620]);
        assert_eq!(data.len(), 144);
        assert_eq!(u16::from_le_bytes([data[114], data[115]]), 620);

        let preset = Preset::parse("Piano", data).unwrap();
        assert_eq!(preset.id(), 9);
        assert_eq!(preset.sample_ids(), vec![620]);
        assert_eq!(preset.with_id(3)[0], 3);
    }

    #[test]
    fn test_multi_split_preset() {
        let preset = Preset::parse("Drumkit", preset_bytes(0, 2, &[10, 11, 10])).unwrap();
        assert_eq!(preset.split_count(), 3);
        assert_eq!(preset.lfo_count(), 2);
        assert_eq!(preset.sample_ids(), vec![10, 11, 10]);
    }

    #[test]
    fn test_malformed_preset() {
        let mut data = preset_bytes(0, 4, &[1]);
        data.push(0);
        assert!(matches!(
            Preset::parse("Broken", data),
            Err(Error::MalformedPreset { .. })
        ));
        assert!(Preset::parse("Short", vec![0; 8]).is_err());
    }
}

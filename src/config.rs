//! Preset selection file shared by `smdgen` and `swdgen`
//!
//! ```json
//! {
//!   "link_byte": "1A2B",
//!   "presets": [{ "bank": 0, "program": 5, "name": "Harpsichord 1" }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::container::LinkBytes;
use crate::error::Result;
use crate::names::preset_name;
use crate::swd::preset::PresetRegistry;

/// One preset used by a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub bank: u16,
    pub program: u8,
    /// Library file name without extension
    pub name: String,
}

/// Presets a song needs, listed in program id order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSelection {
    pub link_byte: LinkBytes,
    pub presets: Vec<PresetEntry>,
}

/// On-disk form, before the link byte is validated
#[derive(Deserialize)]
struct RawSelection {
    link_byte: String,
    #[serde(default)]
    presets: Vec<PresetEntry>,
}

impl PresetSelection {
    /// Selection for the presets registered while encoding a song
    pub fn from_registry(link_byte: LinkBytes, registry: &PresetRegistry) -> Self {
        let presets = registry
            .keys()
            .iter()
            .map(|key| PresetEntry {
                bank: key.bank,
                program: key.program,
                name: preset_name(key.bank, key.program),
            })
            .collect();
        Self { link_byte, presets }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawSelection = serde_json::from_str(text)?;
        Ok(Self {
            link_byte: raw.link_byte.parse()?,
            presets: raw.presets,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text = self.to_json()?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::swd::preset::PresetKey;

    #[test]
    fn test_from_registry() {
        let mut registry = PresetRegistry::new();
        registry.id_for(PresetKey::new(0, 5)).unwrap();
        registry.id_for(PresetKey::new(9, 1)).unwrap();
        let selection = PresetSelection::from_registry(LinkBytes([0x1A, 0x2B]), &registry);
        assert_eq!(selection.presets.len(), 2);
        assert_eq!(selection.presets[0].name, "Harpsichord 1");
        assert_eq!(selection.presets[1].name, "bank9_prog1");
    }

    #[test]
    fn test_json_round_trip() {
        let selection = PresetSelection {
            link_byte: LinkBytes([0x00, 0x7F]),
            presets: vec![PresetEntry {
                bank: 1,
                program: 2,
                name: "Piano".into(),
            }],
        };
        let json = selection.to_json().unwrap();
        assert!(json.contains("\"link_byte\": \"007F\""));
        assert_eq!(PresetSelection::from_json(&json).unwrap(), selection);
    }

    #[test]
    fn test_bad_link_byte() {
        let result = PresetSelection::from_json(r#"{"link_byte": "12345", "presets": []}"#);
        assert!(matches!(result, Err(Error::Config(_))));
        let result = PresetSelection::from_json(r#"{"presets": []}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}

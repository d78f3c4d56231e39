//! SWD bank writer

use std::collections::BTreeMap;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use super::header::{
    chunk_header, SwdHeader, EOD_MAGIC, KGRP_MAGIC, PRGI_MAGIC, WAVI_MAGIC,
};
use super::keygroup::{Keygroup, KEYGROUP_PAD};
use super::preset::{Preset, PRESET_SLOTS};
use super::sample::Sample;
use crate::container::{padding, PartFile};
use crate::error::{Error, Result};

/// Size of the program pointer table
const PRGI_TABLE_SIZE: usize = 2 * PRESET_SLOTS;

/// Number of `wavi` slots needed to address every sample
pub fn wavi_slots(samples: &BTreeMap<u16, Sample>) -> usize {
    samples.keys().next_back().map_or(0, |&id| id as usize + 1)
}

/// Build the `wavi` chunk body
///
/// Records follow the pointer table in ascending id order, each relocated
/// to the end of the previous sample's data.
pub fn wavi_body(samples: &BTreeMap<u16, Sample>) -> Result<Vec<u8>> {
    let slots = wavi_slots(samples);
    let table_size = 2 * slots + padding(2 * slots, 16);
    let mut body = vec![0u8; 2 * slots];
    body.resize(table_size, 0xAA);

    let mut pointer = table_size;
    let mut position = 0u64;
    for (&id, sample) in samples {
        let entry = u16::try_from(pointer).map_err(|_| Error::MalformedSample {
            id,
            message: "sample table exceeds 16-bit offsets".into(),
        })?;
        body[2 * id as usize..2 * id as usize + 2].copy_from_slice(&entry.to_le_bytes());
        let at = u32::try_from(position).map_err(|_| Error::MalformedSample {
            id,
            message: "sample data exceeds 32-bit memory positions".into(),
        })?;
        body.extend_from_slice(&sample.with_position(at));
        pointer += sample.as_bytes().len();
        position += sample.footprint();
    }
    Ok(body)
}

/// Build the `prgi` chunk body
///
/// `presets[i]` is written as program `i`; `None` leaves the slot empty.
pub fn prgi_body(presets: &[Option<Preset>]) -> Result<Vec<u8>> {
    if presets.len() > PRESET_SLOTS {
        return Err(Error::TooManyPresets(presets.len()));
    }
    let mut body = vec![0u8; PRGI_TABLE_SIZE];
    for (id, preset) in presets.iter().enumerate() {
        let Some(preset) = preset else { continue };
        let entry = u16::try_from(body.len()).map_err(|_| Error::MalformedPreset {
            name: format!("program {}", id),
            message: "program table exceeds 16-bit offsets".into(),
        })?;
        body[2 * id..2 * id + 2].copy_from_slice(&entry.to_le_bytes());
        body.extend_from_slice(&preset.with_id(id as u8));
    }
    Ok(body)
}

/// Build the `kgrp` chunk body; the returned length excludes the padding
pub fn kgrp_body(keygroups: &[Keygroup]) -> (Vec<u8>, usize) {
    let mut body: Vec<u8> = keygroups.iter().flat_map(|group| group.to_bytes()).collect();
    let length = body.len();
    body.resize(length + padding(length, 16), KEYGROUP_PAD);
    (body, length)
}

/// SWD file writer
pub struct SwdWriter {
    file: PartFile,
    header: SwdHeader,
    data_pos: u64,
}

impl SwdWriter {
    pub fn new(path: &Path, header: SwdHeader) -> Result<Self> {
        Ok(Self {
            file: PartFile::create(path)?,
            header,
            data_pos: 0,
        })
    }

    fn write_data(&mut self, data: &[u8]) -> Result<()> {
        let pos = self.data_pos;
        let file = self.file.file()?;
        file.seek(SeekFrom::Start(pos))?;
        file.write_all(data)?;
        self.data_pos += data.len() as u64;
        Ok(())
    }

    /// Write the header and every chunk, then commit the file
    pub fn write_bank(
        mut self,
        presets: &[Option<Preset>],
        samples: &BTreeMap<u16, Sample>,
        keygroups: &[Keygroup],
    ) -> Result<()> {
        let wavi = wavi_body(samples)?;
        let prgi = prgi_body(presets)?;
        let (kgrp, kgrp_len) = kgrp_body(keygroups);

        self.header
            .set_slots(wavi_slots(samples) as u16, PRESET_SLOTS as u16);
        self.header.set_wavi_length(wavi.len() as u32);
        let header = self.header.clone();
        self.write_data(header.as_bytes())?;

        self.write_data(&chunk_header(WAVI_MAGIC, wavi.len() as u32))?;
        self.write_data(&wavi)?;
        self.write_data(&chunk_header(PRGI_MAGIC, prgi.len() as u32))?;
        self.write_data(&prgi)?;
        self.write_data(&chunk_header(KGRP_MAGIC, kgrp_len as u32))?;
        self.write_data(&kgrp)?;
        self.write_data(&chunk_header(EOD_MAGIC, 0))?;

        self.finalize()
    }

    fn finalize(mut self) -> Result<()> {
        let total = self.data_pos as u32;
        self.header.set_file_length(total);
        let file = self.file.file()?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(self.header.as_bytes())?;
        file.flush()?;
        debug!("SWD file length {} bytes", total);
        self.file.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{LinkBytes, Timestamp};
    use crate::swd::keygroup::DEFAULT_KEYGROUPS;
    use crate::swd::preset::tests::preset_bytes;
    use crate::swd::sample::tests::sample_bytes;

    fn samples(ids: &[(u16, u32, u32)]) -> BTreeMap<u16, Sample> {
        ids.iter()
            .map(|&(id, start, len)| (id, Sample::parse(id, &sample_bytes(id, start, len)).unwrap()))
            .collect()
    }

    #[test]
    fn test_wavi_body() {
        let body = wavi_body(&samples(&[(3, 10, 6), (1, 4, 4)])).unwrap();
        // Four slots, table padded to 16 bytes, two records
        assert_eq!(body.len(), 16 + 128);
        assert_eq!(&body[..8], &[0, 0, 16, 0, 0, 0, 80, 0]);
        assert!(body[8..16].iter().all(|&b| b == 0xAA));
        // Sample 1 first at position 0, sample 3 after its 32 bytes
        assert_eq!(&body[16 + 2..16 + 4], &[1, 0]);
        assert_eq!(&body[16 + 36..16 + 40], &[0, 0, 0, 0]);
        assert_eq!(&body[80 + 2..80 + 4], &[3, 0]);
        assert_eq!(&body[80 + 36..80 + 40], &[32, 0, 0, 0]);
    }

    #[test]
    fn test_empty_wavi_body() {
        assert!(wavi_body(&BTreeMap::new()).unwrap().is_empty());
    }

    #[test]
    fn test_prgi_body() {
        let first = Preset::parse("a", preset_bytes(40, 4, &[1])).unwrap();
        let second = Preset::parse("b", preset_bytes(41, 2, &[3, 1])).unwrap();
        let body = prgi_body(&[Some(first), None, Some(second)]).unwrap();
        assert_eq!(body.len(), 256 + 144 + 160);
        assert_eq!(&body[..6], &[0, 1, 0, 0, 144, 1]);
        assert!(body[6..256].iter().all(|&b| b == 0));
        assert_eq!(body[256], 0);
        assert_eq!(body[400], 2);
    }

    #[test]
    fn test_kgrp_body() {
        let (body, length) = kgrp_body(&DEFAULT_KEYGROUPS);
        assert_eq!(length, 56);
        assert_eq!(body.len(), 64);
        assert!(body[56..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_write_bank_patches_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.swd");
        let header = SwdHeader::new(LinkBytes([0x1A, 0x2B]), Timestamp::from_bytes(&[0; 8]), "");
        let preset = Preset::parse("a", preset_bytes(0, 4, &[1])).unwrap();
        SwdWriter::new(&path, header)
            .unwrap()
            .write_bank(&[Some(preset)], &samples(&[(1, 4, 4)]), &DEFAULT_KEYGROUPS)
            .unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[8..12], &(data.len() as u32).to_le_bytes());
        // Two wavi slots padded to 16, one record
        assert_eq!(&data[0x4C..0x50], &[80, 0, 0, 0]);
        assert_eq!(&data[data.len() - 16..data.len() - 12], b"eod ");
        assert!(!dir.path().join("bank.swd.part").exists());
    }
}

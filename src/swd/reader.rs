//! SWD bank reader

use super::header::{
    offset, CHUNK_HEADER_SIZE, PRGI_MAGIC, SWD_HEADER_SIZE, SWD_MAGIC, WAVI_MAGIC,
};
use super::preset::{Preset, PRESET_HEADER_SIZE};
use super::sample::{Sample, SAMPLE_SIZE};
use crate::bytes::ByteReader;
use crate::container::{padding, LinkBytes};
use crate::error::{Error, Result};

/// Parsed SWD header
#[derive(Debug, Clone, Copy)]
pub struct SwdInfo {
    pub file_length: u32,
    pub link: LinkBytes,
    pub wavi_slots: u16,
    pub prgi_slots: u16,
}

/// SWD file reader
pub struct SwdReader<'a> {
    data: &'a [u8],
}

impl<'a> SwdReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn parse_header(&self) -> Result<SwdInfo> {
        let mut reader = ByteReader::new(self.data);
        let magic = reader
            .read_magic()
            .map_err(|_| Error::SwdParse("file too small for SWD header".into()))?;
        if &magic != SWD_MAGIC {
            return Err(Error::SwdParse("invalid SWD magic".into()));
        }
        if self.data.len() < SWD_HEADER_SIZE {
            return Err(Error::SwdParse("file too small for SWD header".into()));
        }
        reader.seek(offset::FILE_LENGTH);
        let file_length = reader.read_u32_le()?;
        let link = LinkBytes([self.data[offset::LINK], self.data[offset::LINK + 1]]);
        reader.seek(offset::WAVI_SLOTS);
        let wavi_slots = reader.read_u16_le()?;
        let prgi_slots = reader.read_u16_le()?;
        Ok(SwdInfo {
            file_length,
            link,
            wavi_slots,
            prgi_slots,
        })
    }

    /// Locate a sub-chunk by magic, returning its body
    fn chunk(&self, start: usize, magic: &[u8; 4]) -> Result<(&'a [u8], usize)> {
        let mut reader = ByteReader::new(self.data);
        reader.seek(start);
        let found = reader.read_magic().map_err(|_| {
            Error::SwdParse(format!("missing {} chunk", String::from_utf8_lossy(magic)))
        })?;
        if &found != magic {
            return Err(Error::SwdParse(format!(
                "expected {} chunk at byte {}, found {:?}",
                String::from_utf8_lossy(magic),
                start,
                String::from_utf8_lossy(&found)
            )));
        }
        reader.seek(start + offset::CHUNK_LENGTH);
        let length = reader.read_u32_le()? as usize;
        let body = reader.read_slice(length).map_err(|_| {
            Error::SwdParse(format!(
                "{} chunk runs past the file",
                String::from_utf8_lossy(magic)
            ))
        })?;
        let end = start + CHUNK_HEADER_SIZE + length;
        Ok((body, end + padding(end, 16)))
    }

    /// Read every table slot of a chunk body, pairing slot index and pointer
    fn pointers(body: &[u8], slots: u16) -> Result<Vec<(u16, usize)>> {
        let mut reader = ByteReader::new(body);
        let mut pointers = Vec::new();
        for slot in 0..slots {
            let pointer = reader.read_u16_le()?;
            if pointer != 0 {
                pointers.push((slot, pointer as usize));
            }
        }
        Ok(pointers)
    }

    /// Sample records of the `wavi` chunk, in slot order
    pub fn parse_samples(&self, info: &SwdInfo) -> Result<Vec<Sample>> {
        let (body, _) = self.chunk(SWD_HEADER_SIZE, WAVI_MAGIC)?;
        Self::pointers(body, info.wavi_slots)?
            .into_iter()
            .map(|(slot, pointer)| {
                let record = body.get(pointer..pointer + SAMPLE_SIZE).ok_or_else(|| {
                    Error::MalformedSample {
                        id: slot,
                        message: format!("record at {} runs past the chunk", pointer),
                    }
                })?;
                Sample::parse(slot, record)
            })
            .collect()
    }

    /// Preset records of the `prgi` chunk, in slot order
    pub fn parse_presets(&self, info: &SwdInfo) -> Result<Vec<Preset>> {
        let (_, wavi_end) = self.chunk(SWD_HEADER_SIZE, WAVI_MAGIC)?;
        let (body, _) = self.chunk(wavi_end, PRGI_MAGIC)?;
        Self::pointers(body, info.prgi_slots)?
            .into_iter()
            .map(|(slot, pointer)| {
                let name = format!("program {}", slot);
                let header = body
                    .get(pointer..pointer + PRESET_HEADER_SIZE)
                    .ok_or_else(|| Error::MalformedPreset {
                        name: name.clone(),
                        message: format!("record at {} runs past the chunk", pointer),
                    })?;
                let splits = u16::from_le_bytes([header[2], header[3]]) as usize;
                let lfos = header[11] as usize;
                let len = Preset::record_len(lfos, splits);
                let record = body.get(pointer..pointer + len).ok_or_else(|| {
                    Error::MalformedPreset {
                        name: name.clone(),
                        message: format!("{} byte record at {} runs past the chunk", len, pointer),
                    }
                })?;
                Preset::parse(&name, record.to_vec())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Timestamp;
    use crate::swd::header::SwdHeader;
    use crate::swd::keygroup::DEFAULT_KEYGROUPS;
    use crate::swd::preset::tests::preset_bytes;
    use crate::swd::sample::tests::sample_bytes;
    use crate::swd::writer::SwdWriter;
    use std::collections::BTreeMap;

    #[test]
    fn test_read_written_bank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.swd");

        let presets = vec![
            Some(Preset::parse("a", preset_bytes(9, 4, &[620])).unwrap()),
            Some(Preset::parse("b", preset_bytes(9, 1, &[2, 620])).unwrap()),
        ];
        let samples: BTreeMap<u16, Sample> = [(2u16, (1, 1)), (620, (8, 8))]
            .into_iter()
            .map(|(id, (start, len))| (id, Sample::parse(id, &sample_bytes(id, start, len)).unwrap()))
            .collect();

        let header = SwdHeader::new(LinkBytes([0x1A, 0x2B]), Timestamp::from_bytes(&[0; 8]), "");
        SwdWriter::new(&path, header)
            .unwrap()
            .write_bank(&presets, &samples, &DEFAULT_KEYGROUPS)
            .unwrap();

        let data = std::fs::read(&path).unwrap();
        let reader = SwdReader::new(&data);
        let info = reader.parse_header().unwrap();
        assert_eq!(info.file_length as usize, data.len());
        assert_eq!(info.link, LinkBytes([0x1A, 0x2B]));
        assert_eq!(info.wavi_slots, 621);
        assert_eq!(info.prgi_slots, 128);

        let read_samples = reader.parse_samples(&info).unwrap();
        assert_eq!(read_samples.iter().map(Sample::id).collect::<Vec<_>>(), vec![2, 620]);
        assert_eq!(read_samples[0].position(), 0);
        assert_eq!(read_samples[1].position(), 8);

        let read_presets = reader.parse_presets(&info).unwrap();
        assert_eq!(read_presets.len(), 2);
        assert_eq!(read_presets[0].id(), 0);
        assert_eq!(read_presets[1].id(), 1);
        assert_eq!(read_presets[1].sample_ids(), vec![2, 620]);
    }

    #[test]
    fn test_bad_magic() {
        assert!(SwdReader::new(b"smdl").parse_header().is_err());
        assert!(SwdReader::new(b"sw").parse_header().is_err());
    }
}

//! SMD file writer

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use super::encoder::EncodedTrack;
use super::header::{
    chunk_header, offset, song_chunk, SmdHeader, CHUNK_HEADER_SIZE, EOC_MAGIC, SMD_HEADER_SIZE,
    SONG_CHUNK_SIZE, TRACK_MAGIC,
};
use super::reader::track_length;
use crate::container::{padding, PartFile};
use crate::error::{Error, Result};

/// SMD file writer
///
/// Chunks are written with zeroed length fields; [`SmdWriter::finalize`]
/// fills them in from the written bytes and moves the file into place.
pub struct SmdWriter {
    file: PartFile,
    header: SmdHeader,
    data_pos: u64,
}

impl SmdWriter {
    pub fn new(path: &Path, header: SmdHeader) -> Result<Self> {
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

    /// Write the file header and the `song` chunk
    pub fn write_song(&mut self, tpqn: u16, track_count: u8, channel_count: u8) -> Result<()> {
        let header = self.header.clone();
        self.write_data(header.as_bytes())?;
        self.write_data(&song_chunk(tpqn, track_count, channel_count))
    }

    /// Append a `trk ` chunk
    pub fn write_track(&mut self, track: &EncodedTrack) -> Result<()> {
        self.write_data(&chunk_header(TRACK_MAGIC))?;
        self.write_data(&track.body)
    }

    /// Write the `eoc ` chunk, backpatch every length and commit the file
    pub fn finalize(mut self) -> Result<()> {
        self.write_data(&chunk_header(EOC_MAGIC))?;
        let file = self.file.file()?;
        let total = patch_chunk_lengths(file)?;
        file.flush()?;
        debug!("SMD file length {} bytes", total);
        self.file.commit()
    }
}

/// Recompute every track chunk length and the file length in place
///
/// Lengths are derived by walking the event stream, so running this on an
/// already patched file changes nothing. Returns the file length.
pub fn patch_chunk_lengths<F: Read + Write + Seek>(file: &mut F) -> Result<u32> {
    let mut data = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut data)?;

    let mut pos = SMD_HEADER_SIZE + SONG_CHUNK_SIZE;
    loop {
        let magic = data
            .get(pos..pos + 4)
            .ok_or_else(|| Error::SmdParse(format!("missing eoc chunk after byte {}", pos)))?;
        if magic == EOC_MAGIC {
            break;
        }
        if magic != TRACK_MAGIC {
            return Err(Error::SmdParse(format!("unexpected chunk at byte {}", pos)));
        }
        let body_start = pos + CHUNK_HEADER_SIZE;
        let body = data.get(body_start..).unwrap_or(&[]);
        let length = track_length(body)?;

        file.seek(SeekFrom::Start((pos + offset::CHUNK_LENGTH) as u64))?;
        file.write_all(&(length as u32).to_le_bytes())?;
        pos = body_start + length + padding(length, 4);
    }

    let total = data.len() as u32;
    file.seek(SeekFrom::Start(offset::FILE_LENGTH as u64))?;
    file.write_all(&total.to_le_bytes())?;
    Ok(total)
}

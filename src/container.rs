//! Pieces shared by the `smdl` and `swdl` containers

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Container format tag written after the file length
pub const FORMAT_TAG: [u8; 2] = [0x15, 0x04];

/// Size of the file name field
pub const NAME_LEN: usize = 16;

/// Filler after the name terminator
pub const NAME_PAD: u8 = 0xAA;

/// Two-byte identifier linking a sequence to its instrument bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LinkBytes(pub [u8; 2]);

impl FromStr for LinkBytes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 4 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Config(format!(
                "link byte must be 4 hex digits, got '{}'",
                s
            )));
        }
        let value = u16::from_str_radix(s, 16)
            .map_err(|e| Error::Config(format!("invalid link byte '{}': {}", s, e)))?;
        Ok(LinkBytes(value.to_be_bytes()))
    }
}

impl fmt::Display for LinkBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.0[0], self.0[1])
    }
}

impl Serialize for LinkBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LinkBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Last-modified stamp stored in container headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub centisecond: u8,
}

impl Timestamp {
    /// Current local time
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            year: time.year().clamp(0, u16::MAX as i32) as u16,
            month: time.month() as u8,
            day: time.day() as u8,
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
            centisecond: 0,
        }
    }

    /// Eight-byte on-disk form
    pub fn to_bytes(self) -> [u8; 8] {
        let year = self.year.to_le_bytes();
        [
            year[0],
            year[1],
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.centisecond,
        ]
    }

    pub fn from_bytes(bytes: &[u8; 8]) -> Self {
        Self {
            year: u16::from_le_bytes([bytes[0], bytes[1]]),
            month: bytes[2],
            day: bytes[3],
            hour: bytes[4],
            minute: bytes[5],
            second: bytes[6],
            centisecond: bytes[7],
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Encode a file name: ASCII, NUL-terminated, padded with 0xAA
///
/// Non-ASCII characters become `_`; names are cut to 15 bytes.
pub fn encode_name(name: &str) -> [u8; NAME_LEN] {
    let mut field = [NAME_PAD; NAME_LEN];
    let mut len = 0;
    for c in name.chars().take(NAME_LEN - 1) {
        field[len] = if c.is_ascii() && !c.is_ascii_control() {
            c as u8
        } else {
            b'_'
        };
        len += 1;
    }
    field[len] = 0;
    field
}

/// Decode a name field written by [`encode_name`]
pub fn decode_name(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    field[..end].iter().map(|&b| b as char).collect()
}

/// Bytes needed to bring `len` up to a multiple of `align`
pub fn padding(len: usize, align: usize) -> usize {
    (align - len % align) % align
}

/// Write a little-endian u16 into `buf` at `offset`
pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Write a little-endian u32 into `buf` at `offset`
pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Output file written under a `.part` name and renamed into place on commit
///
/// Dropping an uncommitted file deletes it, so a failed conversion leaves no
/// output behind.
pub struct PartFile {
    file: Option<File>,
    part: PathBuf,
    target: PathBuf,
}

impl PartFile {
    pub fn create(target: &Path) -> Result<Self> {
        let mut part = OsString::from(target.as_os_str());
        part.push(".part");
        let part = PathBuf::from(part);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&part)?;
        Ok(Self {
            file: Some(file),
            part,
            target: target.to_path_buf(),
        })
    }

    pub fn file(&mut self) -> Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| Error::Io(std::io::Error::other("output already committed")))
    }

    /// Flush and move the file to its final name
    pub fn commit(mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        fs::rename(&self.part, &self.target)?;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            let _ = fs::remove_file(&self.part);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_link_bytes_parse() {
        let link: LinkBytes = "1A2B".parse().unwrap();
        assert_eq!(link.0, [0x1A, 0x2B]);
        assert_eq!(link.to_string(), "1A2B");
        assert!("1A2".parse::<LinkBytes>().is_err());
        assert!("ZZZZ".parse::<LinkBytes>().is_err());
        assert!("+1A2".parse::<LinkBytes>().is_err());
    }

    #[test]
    fn test_link_bytes_serde() {
        let link = LinkBytes([0x00, 0xFF]);
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, "\"00FF\"");
        let back: LinkBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn test_timestamp_bytes() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 30))
            .unwrap();
        let stamp = Timestamp::from_datetime(time);
        assert_eq!(stamp.to_bytes(), [0xE8, 0x07, 3, 9, 14, 5, 30, 0]);
        assert_eq!(Timestamp::from_bytes(&stamp.to_bytes()), stamp);
        assert_eq!(stamp.to_string(), "2024-03-09 14:05:30");
    }

    #[test]
    fn test_name_field() {
        let field = encode_name("bgm0001");
        assert_eq!(&field[..8], b"bgm0001\0");
        assert!(field[8..].iter().all(|&b| b == NAME_PAD));
        assert_eq!(decode_name(&field), "bgm0001");

        let empty = encode_name("");
        assert_eq!(empty[0], 0);
        assert_eq!(decode_name(&empty), "");

        let long = encode_name("a_very_long_song_name");
        assert_eq!(long[15], 0);
        assert_eq!(decode_name(&long), "a_very_long_son");
    }

    #[test]
    fn test_part_file_commit_and_discard() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.smd");

        let mut part = PartFile::create(&target).unwrap();
        part.file().unwrap().write_all(b"data").unwrap();
        assert!(dir.path().join("out.smd.part").exists());
        drop(part);
        assert!(!dir.path().join("out.smd.part").exists());
        assert!(!target.exists());

        let mut part = PartFile::create(&target).unwrap();
        part.file().unwrap().write_all(b"data").unwrap();
        part.commit().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"data");
        assert!(!dir.path().join("out.smd.part").exists());
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding(16, 16), 0);
        assert_eq!(padding(17, 16), 15);
        assert_eq!(padding(6, 4), 2);
    }
}

//! sfnt serialization
//!
//! Tables are laid out by [`FontBuilder`]; `head.checksumAdjustment` is then
//! fixed up over the finished file.

use std::{borrow::Cow, collections::BTreeSet, fs, io::Write, path::Path};

use log::debug;
use read_fonts::{FontRef, TopLevelTable, types::Tag};
use tempfile::NamedTempFile;
use write_fonts::{FontBuilder, FontWrite, validate::Validate};

use crate::{
    AssembleError, Result,
    tables::{CMAP, GLYF, HEAD, HHEA, HMTX, LOCA, MAXP},
};

/// Byte offset of checksumAdjustment in head
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Tables every output font carries
pub const REQUIRED_TABLES: [Tag; 7] = [CMAP, GLYF, LOCA, HMTX, HHEA, MAXP, HEAD];

/// Collects finished tables and writes them out as one font file
#[derive(Default)]
pub struct FontSerializer<'a> {
    builder: FontBuilder<'a>,
    tags: BTreeSet<Tag>,
}

impl<'a> FontSerializer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and add a table, replacing any table with the same tag
    pub fn add_table<T>(&mut self, table: &T) -> Result<&mut Self>
    where
        T: FontWrite + Validate + TopLevelTable,
    {
        self.builder.add_table(table)?;
        self.tags.insert(T::TAG);
        Ok(self)
    }

    /// Add a table copied from a source font
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.builder.add_raw(tag, data);
        self.tags.insert(tag);
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tags.iter().copied()
    }

    /// The complete font file
    pub fn serialize(&mut self) -> Result<Vec<u8>> {
        if let Some(missing) = REQUIRED_TABLES.into_iter().find(|tag| !self.contains(*tag)) {
            return Err(AssembleError::MissingTable(missing));
        }

        let mut data = self.builder.build();
        let head = FontRef::new(&data)?
            .table_directory
            .table_records()
            .iter()
            .find(|record| record.tag() == HEAD)
            .map(|record| record.offset() as usize + CHECKSUM_ADJUSTMENT_OFFSET)
            .filter(|offset| offset + 4 <= data.len())
            .ok_or(AssembleError::MissingTable(HEAD))?;

        data[head..head + 4].fill(0);
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(table_checksum(&data));
        data[head..head + 4].copy_from_slice(&adjustment.to_be_bytes());

        debug!("Serialized {} tables, {} bytes", self.tags.len(), data.len());
        Ok(data)
    }

    /// Serialize and write to `path`
    ///
    /// The bytes go to a temporary file next to `path` that is renamed into
    /// place once complete, so `path` is either untouched or whole.
    pub fn write_atomically(&mut self, path: &Path) -> Result<usize> {
        let data = self.serialize()?;
        write_atomically(path, &data)?;
        Ok(data.len())
    }
}

/// Wrapping sum of big-endian u32 words, the last word zero padded
pub fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Write `data` to `path` through a temporary file in the same directory
pub fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| AssembleError::io(dir, e))?;
    file.write_all(data).map_err(|e| AssembleError::io(path, e))?;
    file.as_file().sync_all().map_err(|e| AssembleError::io(path, e))?;
    file.persist(path).map_err(|e| AssembleError::io(path, e.error))?;
    debug!("Wrote {} ({} bytes)", path.display(), data.len());
    Ok(())
}

/// Create `dir` and any missing parents
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| AssembleError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every required table as a few placeholder bytes, head at its real size
    fn minimal() -> FontSerializer<'static> {
        let mut s = FontSerializer::new();
        for tag in REQUIRED_TABLES {
            let len = if tag == HEAD { 54 } else { 6 };
            s.add_raw(tag, vec![1; len]);
        }
        s
    }

    #[test]
    fn test_table_checksum_pads_last_word() {
        assert_eq!(table_checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(table_checksum(&[1]), 0x0100_0000);
        assert_eq!(table_checksum(&[0xFF; 8]), 0xFFFF_FFFE);
    }

    #[test]
    fn test_missing_required_table() {
        let mut s = FontSerializer::new();
        s.add_raw(HEAD, vec![0; 54]);
        assert!(matches!(s.serialize(), Err(AssembleError::MissingTable(_))));
    }

    #[test]
    fn test_directory_is_sorted() {
        let data = minimal().serialize().unwrap();
        let font = FontRef::new(&data).unwrap();
        let tags: Vec<Tag> = font.table_directory.table_records().iter().map(|r| r.tag()).collect();
        assert_eq!(tags.len(), 7);
        assert!(tags.windows(2).all(|w| w[0] < w[1]));
        assert!(font.table_directory.table_records().iter().all(|r| r.offset() % 4 == 0));
    }

    #[test]
    fn test_whole_file_checksum() {
        let data = minimal().serialize().unwrap();
        assert_eq!(data.len() % 4, 0);
        assert_eq!(table_checksum(&data), CHECKSUM_MAGIC);
    }

    #[test]
    fn test_write_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ttf");
        let written = minimal().write_atomically(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), written);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_serialize_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ttf");
        assert!(FontSerializer::new().write_atomically(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("out.ttf");

        let err = write_atomically(&path, &[0; 4]).unwrap_err();
        assert!(matches!(err, AssembleError::Io { .. }));
        assert!(!path.exists());
    }
}

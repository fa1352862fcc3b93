//! Staging index
//!
//! The index tracks the files that will make up the next commit. On disk
//! it is a single binary stream: a `GIDX` header, path-sorted entries and
//! a trailing SHA-1 over everything before it. The checksum is verified
//! before any entry is decoded, so a flipped byte anywhere in the file is
//! caught up front.

use crate::artifacts::index::checksum::{Checksum, verify_trailing};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::anyhow;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.gogit/index`)
    path: Box<Path>,
    /// Staged entries keyed by path; map order is the on-disk order
    entries: BTreeMap<String, IndexEntry>,
    /// Set when the in-memory state has diverged from disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries, e.g. before rebuilding from a checked-out tree
    pub fn clear(&mut self) {
        self.entries.clear();
        self.changed = true;
    }

    /// Add an entry, replacing any existing entry with the same path
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.path.clone(), entry);
        self.changed = true;
    }

    /// Remove the entry with the given path; absent paths are a no-op
    pub fn remove(&mut self, path: &str) {
        if self.entries.remove(path).is_some() {
            self.changed = true;
        }
    }

    /// Load the index from disk.
    ///
    /// A missing file is not an error: the index is simply empty. A file
    /// that exists but fails the length, checksum, magic or version
    /// checks is corrupt.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        let data = match std::fs::read(self.path()) {
            Ok(data) => data,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(error.into()),
        };

        if data.len() < HEADER_SIZE {
            return Err(anyhow!("index file too short"));
        }

        let payload = verify_trailing(&data)?;
        let mut reader = Cursor::new(payload);

        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        Ok(())
    }

    fn parse_header(&self, reader: &mut Cursor<&[u8]>) -> anyhow::Result<u32> {
        let header = IndexHeader::deserialize(reader)?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("invalid index signature: {}", header.marker));
        }

        if header.version != VERSION {
            return Err(anyhow!("unsupported index version: {}", header.version));
        }

        Ok(header.entries_count)
    }

    fn parse_entries(
        &mut self,
        entries_count: u32,
        reader: &mut Cursor<&[u8]>,
    ) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let entry = IndexEntry::deserialize(&mut *reader)
                .map_err(|_| anyhow!("unexpected end-of-file while reading index"))?;
            self.entries.insert(entry.path.clone(), entry);
        }

        Ok(())
    }

    /// Serialize the entries in path order and replace the file on disk.
    ///
    /// Skipped when nothing changed since the last load or write.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed && self.path.exists() {
            return Ok(());
        }

        let index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;

        let mut writer = Checksum::new(index_file);

        let header = IndexHeader::new(SIGNATURE.to_string(), VERSION, self.entries.len() as u32);
        writer.write(&header.serialize()?)?;

        for entry in self.entries() {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::index::{CHECKSUM_SIZE, ENTRY_BLOCK};
    use crate::artifacts::objects::object_id::ObjectId;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index() -> (assert_fs::TempDir, Index) {
        let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
        let index = Index::new(dir.path().join("index").into_boxed_path());
        (dir, index)
    }

    fn oid(hex_digit: char) -> ObjectId {
        ObjectId::try_parse(hex_digit.to_string().repeat(40)).unwrap()
    }

    fn entry(path: &str, id: ObjectId) -> IndexEntry {
        IndexEntry::new(path.to_string(), id, EntryMetadata::default())
    }

    #[rstest]
    fn missing_file_reads_as_empty(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        index.rehydrate().unwrap();
        assert!(index.is_empty());
    }

    #[rstest]
    fn write_read_round_trip_sorts_by_path(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("zebra.txt", oid('a')));
        index.add(entry("alpha/beta.txt", oid('b')));
        index.add(entry("middle.txt", oid('c')));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(index.path().to_path_buf().into_boxed_path());
        reloaded.rehydrate().unwrap();

        let paths: Vec<&str> = reloaded.entries().map(|e| e.path.as_str()).collect();
        pretty_assertions::assert_eq!(paths, ["alpha/beta.txt", "middle.txt", "zebra.txt"]);
    }

    #[rstest]
    fn entry_region_is_block_aligned(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("one.txt", oid('1')));
        index.add(entry("deeply/nested/file.rs", oid('2')));
        index.write_updates().unwrap();

        let on_disk = std::fs::read(index.path()).unwrap();
        let entry_region = on_disk.len() - HEADER_SIZE - CHECKSUM_SIZE;
        assert_eq!(entry_region % ENTRY_BLOCK, 0);
    }

    #[rstest]
    fn adding_the_same_path_replaces_the_entry(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("hello.txt", oid('a')));
        index.add(entry("hello.txt", oid('b')));

        pretty_assertions::assert_eq!(index.entries().count(), 1);
        pretty_assertions::assert_eq!(index.entry_by_path("hello.txt").unwrap().oid, oid('b'));
    }

    #[rstest]
    fn removing_a_missing_path_is_a_no_op(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("kept.txt", oid('a')));
        index.remove("not-there.txt");

        pretty_assertions::assert_eq!(index.entries().count(), 1);
    }

    #[rstest]
    fn every_single_byte_flip_is_detected(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        index.add(entry("hello.txt", oid('a')));
        index.write_updates().unwrap();

        let pristine = std::fs::read(index.path()).unwrap();
        for position in 0..pristine.len() {
            let mut tampered = pristine.clone();
            tampered[position] ^= 0x01;
            std::fs::write(index.path(), &tampered).unwrap();

            assert!(
                index.rehydrate().is_err(),
                "flip at byte {position} went undetected"
            );
        }
    }

    #[rstest]
    fn truncated_file_is_corrupt(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;
        std::fs::write(index.path(), b"GIDX").unwrap();

        let error = index.rehydrate().unwrap_err();
        assert!(error.to_string().contains("too short"));
    }
}

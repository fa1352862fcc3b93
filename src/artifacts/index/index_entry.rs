//! Index entry codec
//!
//! One entry per staged file: three u32 stat fields, the 20-byte blob
//! hash, a u32 mode, then the length-prefixed path. Entries are NUL-padded
//! so their total size (38 fixed bytes + path) is a multiple of 8.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_FIXED_SIZE};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::io::{BufRead, Write};
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// A staged file: repository-relative path, blob hash and stat fields
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    /// Blob hash of the staged content
    pub oid: ObjectId,
    /// Stat fields captured when the entry was staged
    pub metadata: EntryMetadata,
}

/// Stat fields stored alongside each entry
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub mtime: u32,
    pub size: u32,
    pub mode: EntryMode,
}

/// NUL bytes needed to pad an entry with this path length to a block
fn padding_for(path_length: usize) -> usize {
    (ENTRY_BLOCK - (ENTRY_FIXED_SIZE + path_length) % ENTRY_BLOCK) % ENTRY_BLOCK
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        if self.path.len() > u16::MAX as usize {
            anyhow::bail!("index entry path too long: {}", self.path);
        }

        let mut entry_bytes = Vec::new();
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_raw_to(&mut entry_bytes)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.path.len() as u16)?;
        entry_bytes.write_all(self.path.as_bytes())?;

        for _ in 0..padding_for(self.path.len()) {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    /// Decode exactly one entry, leaving the reader at the next one
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let ctime = reader.read_u32::<byteorder::NetworkEndian>()?;
        let mtime = reader.read_u32::<byteorder::NetworkEndian>()?;
        let size = reader.read_u32::<byteorder::NetworkEndian>()?;
        let oid = ObjectId::read_raw_from(&mut reader)?;
        let mode: EntryMode = reader.read_u32::<byteorder::NetworkEndian>()?.into();
        let path_length = reader.read_u16::<byteorder::NetworkEndian>()? as usize;

        let mut path_bytes = vec![0u8; path_length];
        reader.read_exact(&mut path_bytes)?;
        let path = String::from_utf8(path_bytes)
            .map_err(|_| anyhow::anyhow!("invalid UTF-8 in index entry path"))?;

        let mut padding = vec![0u8; padding_for(path_length)];
        reader.read_exact(&mut padding)?;

        Ok(IndexEntry {
            path,
            oid,
            metadata: EntryMetadata::new(ctime, mtime, size, mode),
        })
    }
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        let mode = match file_path.is_executable() {
            true => EntryMode::File(FileMode::Executable),
            false => EntryMode::File(FileMode::Regular),
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            mtime: metadata.mtime() as u32,
            size: metadata.size() as u32,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn oid() -> ObjectId {
        ObjectId::try_parse("356a192b7913b04c54574d18c28d46e6395428ab".to_string()).unwrap()
    }

    #[rstest]
    fn serialized_length_is_a_block_multiple(oid: ObjectId) {
        for path in ["a", "ab", "path/with/segments.txt", &"x".repeat(57)] {
            let entry = IndexEntry::new(path.to_string(), oid.clone(), EntryMetadata::default());
            let serialized = entry.serialize().unwrap();
            assert_eq!(
                serialized.len() % ENTRY_BLOCK,
                0,
                "entry for {path:?} is not block-aligned"
            );
        }
    }

    #[rstest]
    fn entry_round_trip(oid: ObjectId) {
        let metadata = EntryMetadata::new(100, 200, 3, EntryMode::File(FileMode::Executable));
        let entry = IndexEntry::new("bin/run.sh".to_string(), oid, metadata);

        let serialized = entry.serialize().unwrap();
        let parsed = IndexEntry::deserialize(Cursor::new(serialized)).unwrap();
        pretty_assertions::assert_eq!(parsed, entry);
    }

    #[rstest]
    fn consecutive_entries_parse_in_sequence(oid: ObjectId) {
        let first = IndexEntry::new("a.txt".to_string(), oid.clone(), EntryMetadata::default());
        let second = IndexEntry::new("b/c.txt".to_string(), oid, EntryMetadata::default());

        let mut stream = first.serialize().unwrap().to_vec();
        stream.extend_from_slice(&second.serialize().unwrap());

        let mut reader = Cursor::new(stream);
        pretty_assertions::assert_eq!(IndexEntry::deserialize(&mut reader).unwrap(), first);
        pretty_assertions::assert_eq!(IndexEntry::deserialize(&mut reader).unwrap(), second);
    }

    proptest! {
        #[test]
        fn arbitrary_entries_round_trip(
            path in "[a-z][a-z0-9/._-]{0,80}",
            ctime in any::<u32>(),
            mtime in any::<u32>(),
            size in any::<u32>(),
        ) {
            let oid =
                ObjectId::try_parse("356a192b7913b04c54574d18c28d46e6395428ab".to_string())
                    .unwrap();
            let metadata = EntryMetadata::new(ctime, mtime, size, EntryMode::default());
            let entry = IndexEntry::new(path, oid, metadata);

            let serialized = entry.serialize().unwrap();
            prop_assert_eq!(serialized.len() % ENTRY_BLOCK, 0);

            let parsed = IndexEntry::deserialize(Cursor::new(serialized)).unwrap();
            prop_assert_eq!(parsed, entry);
        }
    }
}

//! Tree object
//!
//! Trees are directory snapshots. Each entry is `<mode> <name>\0<20-byte
//! id>`, entries concatenated in canonical order: names sorted with
//! directories compared as if suffixed with `/`, so two distinct logical
//! trees never share a hash.
//!
//! A tree has two faces. Trees loaded from the store expose read-only
//! records; trees under construction hold a directory trie built from
//! index entries, emitted depth-first so subtree IDs exist before their
//! parents are stored.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use derive_new::new;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// A single (mode, object) record read from a stored tree
#[derive(Debug, Clone, new)]
pub struct TreeRecord {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

/// Node in a tree under construction
#[derive(Debug, Clone)]
enum TreeNode {
    File { mode: EntryMode, oid: ObjectId },
    Directory(Tree),
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries loaded from the store (read side)
    readable_entries: BTreeMap<String, TreeRecord>,
    /// Trie being built from the index (write side); directory keys
    /// carry a trailing `/` so the map order is the canonical order
    writeable_entries: BTreeMap<String, TreeNode>,
}

impl Tree {
    /// Build the directory trie for a set of index entries
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let components: Vec<&str> = entry.path.split('/').collect();
            root.add_entry(&components, entry)?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, components: &[&str], entry: &IndexEntry) -> anyhow::Result<()> {
        match components {
            [] => Ok(()),
            [name] => {
                self.writeable_entries.insert(
                    (*name).to_string(),
                    TreeNode::File {
                        mode: entry.metadata.mode,
                        oid: entry.oid.clone(),
                    },
                );
                Ok(())
            }
            [directory, rest @ ..] => {
                let key = format!("{directory}/");
                let node = self
                    .writeable_entries
                    .entry(key)
                    .or_insert_with(|| TreeNode::Directory(Tree::default()));

                match node {
                    TreeNode::Directory(subtree) => subtree.add_entry(rest, entry),
                    TreeNode::File { .. } => Err(anyhow::anyhow!(
                        "path component '{}' is both a file and a directory",
                        directory
                    )),
                }
            }
        }
    }

    /// Visit every subtree depth-first, children before parents.
    ///
    /// Storing trees this way guarantees each subtree exists in the
    /// store before any tree that references it.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for node in self.writeable_entries.values() {
            if let TreeNode::Directory(subtree) = node {
                subtree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    /// Records of a tree loaded from the store
    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeRecord)> {
        self.readable_entries.iter()
    }
}

impl TreeNode {
    fn mode(&self) -> EntryMode {
        match self {
            TreeNode::File { mode, .. } => *mode,
            TreeNode::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeNode::File { oid, .. } => Ok(oid.clone()),
            TreeNode::Directory(subtree) => subtree.object_id(),
        }
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (name, node) in &self.writeable_entries {
            let name = name.trim_end_matches('/');
            let header = format!("{} {}", node.mode().as_octal_str(), name);

            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            node.oid()?.write_raw_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let read = reader.read_until(b' ', &mut mode_bytes)?;
            if read == 0 {
                break; // clean EOF, no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!("unexpected EOF in tree entry mode");
            }

            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            let read = reader.read_until(b'\0', &mut name_bytes)?;
            if read == 0 || name_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in tree entry name");
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid = ObjectId::read_raw_from(&mut reader)
                .map_err(|_| anyhow::anyhow!("unexpected EOF in tree entry object ID"))?;

            entries.insert(name, TreeRecord::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: BTreeMap::new(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

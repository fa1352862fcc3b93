//! Reference management
//!
//! References are named pointers into the object store. HEAD is either a
//! symbolic reference (`ref: refs/heads/<name>`) naming the current
//! branch, or a bare commit hash when detached. Branch references under
//! `refs/heads/` always hold a direct hash followed by a newline.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;

/// Pattern matching the content of a symbolic reference
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Prefix of every branch reference path
const HEADS_PREFIX: &str = "refs/heads/";

/// The branch HEAD points at right after `init`
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository state directory (`.gogit`)
    path: Box<Path>,
}

impl Refs {
    /// Read and trim the HEAD file
    pub fn read_head(&self) -> anyhow::Result<String> {
        let content = std::fs::read_to_string(self.head_path())
            .context("unable to read HEAD")?;

        Ok(content.trim().to_string())
    }

    /// Name of the current branch, or `None` when HEAD is detached
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        let head = self.read_head()?;

        match Self::parse_symref(&head)? {
            Some(target) => Ok(target
                .strip_prefix(HEADS_PREFIX)
                .map(|branch| branch.to_string())),
            None => Ok(None),
        }
    }

    /// Resolve HEAD to a commit hash.
    ///
    /// Follows a symbolic HEAD one hop to its branch file. `None` means
    /// the repository has no commits yet (unborn branch or empty HEAD).
    pub fn resolve_head(&self) -> anyhow::Result<Option<ObjectId>> {
        let head = self.read_head()?;

        match Self::parse_symref(&head)? {
            Some(target) => self.read_ref(&target),
            None if head.is_empty() => Ok(None),
            None => Ok(Some(ObjectId::try_parse(head)?)),
        }
    }

    /// Read a single reference file.
    ///
    /// Absence yields `None`; any other I/O error propagates.
    pub fn read_ref(&self, ref_path: &str) -> anyhow::Result<Option<ObjectId>> {
        let full_path = self.path.join(ref_path);

        let content = match std::fs::read_to_string(&full_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("unable to read ref file {}", full_path.display()));
            }
        };

        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Write a commit hash to a reference file, creating parent
    /// directories as needed
    pub fn write_ref(&self, ref_path: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let full_path = self.path.join(ref_path);

        std::fs::create_dir_all(full_path.parent().with_context(|| {
            format!("invalid ref path {}", full_path.display())
        })?)?;

        std::fs::write(&full_path, format!("{oid}\n"))
            .with_context(|| format!("unable to write ref file {}", full_path.display()))
    }

    /// Overwrite HEAD with the given content (symbolic or direct)
    pub fn update_head(&self, content: &str) -> anyhow::Result<()> {
        std::fs::write(self.head_path(), format!("{content}\n")).context("unable to write HEAD")
    }

    /// Sorted names of all branches.
    ///
    /// Only regular files directly under `refs/heads/` count; a missing
    /// heads directory simply means no branches.
    pub fn list_branches(&self) -> anyhow::Result<Vec<String>> {
        let heads_dir = self.path.join(HEADS_PREFIX);

        let entries = match std::fs::read_dir(&heads_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("unable to list branches in {}", heads_dir.display()));
            }
        };

        let mut branches = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                branches.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        branches.sort();
        Ok(branches)
    }

    /// Reference path for a branch name
    pub fn branch_ref(name: &str) -> String {
        format!("{HEADS_PREFIX}{name}")
    }

    /// Symbolic HEAD content for a branch name
    pub fn symref_to(name: &str) -> String {
        format!("ref: {HEADS_PREFIX}{name}")
    }

    fn parse_symref(content: &str) -> anyhow::Result<Option<String>> {
        let captures = regex::Regex::new(SYMREF_REGEX)?.captures(content);

        Ok(captures.map(|captures| captures[1].to_string()))
    }

    fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }
}

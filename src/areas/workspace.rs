//! Working directory operations
//!
//! The workspace is the checked-out file tree around the `.gogit`
//! directory. Everything here speaks repository-relative, `/`-separated
//! paths; the `.gogit` directory itself is invisible to walks.

use crate::artifacts::index::index_entry::EntryMetadata;
use crate::areas::repository::GOGIT_DIR;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [GOGIT_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List workspace files under the given absolute path (or the whole
    /// workspace), as repository-relative paths. `.gogit` is skipped.
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(path) => path,
            None => self.path.clone().into(),
        };

        if !root_file_path.exists() {
            anyhow::bail!("the specified path does not exist: {:?}", root_file_path);
        }

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
                .collect::<Vec<_>>())
        } else {
            Ok(vec![
                root_file_path
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ])
        }
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name = name.to_string_lossy();
                IGNORED_PATHS.contains(&name.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }

    /// Turn an absolute path into a repository-relative, `/`-separated one
    pub fn relativize(&self, absolute_path: &Path) -> anyhow::Result<String> {
        let relative = absolute_path
            .strip_prefix(self.path.as_ref())
            .with_context(|| format!("path {} is outside the repository", absolute_path.display()))?;

        Ok(relative.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let content = std::fs::read(self.path.join(file_path))?;

        Ok(Bytes::from(content))
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let absolute = self.path.join(file_path);
        let metadata = std::fs::metadata(&absolute)?;

        (absolute.as_path(), metadata).try_into()
    }

    /// Write a file with mode 0644, creating parent directories
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let absolute = self.path.join(file_path);

        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {:?}", parent))?;
        }

        std::fs::write(&absolute, data)
            .with_context(|| format!("failed to write file {:?}", file_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&absolute, std::fs::Permissions::from_mode(0o644))
                .with_context(|| format!("failed to set permissions for {:?}", file_path))?;
        }

        Ok(())
    }

    /// Remove a file, then walk upward deleting parent directories left
    /// empty, stopping at the repository root or the `.gogit` boundary.
    /// Removal failures are swallowed, matching the tolerant delete pass
    /// of checkout.
    pub fn remove_file_and_prune(&self, file_path: &Path) {
        let absolute = self.path.join(file_path);
        let _ = std::fs::remove_file(&absolute);

        let mut dir = absolute.parent().map(Path::to_path_buf);
        while let Some(current) = dir {
            if current == self.path.as_ref() || current.ends_with(GOGIT_DIR) {
                break;
            }
            match current.read_dir() {
                Ok(mut entries) => {
                    if entries.next().is_none() {
                        let _ = std::fs::remove_dir(&current);
                    } else {
                        break;
                    }
                }
                _ => break,
            }
            dir = current.parent().map(Path::to_path_buf);
        }
    }
}

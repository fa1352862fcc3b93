//! Status snapshot
//!
//! Gathers the three status views in one pass: staged changes (HEAD tree
//! versus index), unstaged changes (index versus working tree, compared
//! by blob hash), and untracked files (working tree minus index).

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct StatusReport {
    /// Current branch, `None` when HEAD is detached
    pub branch: Option<String>,
    /// HEAD tree vs index, keyed by path
    pub staged: BTreeMap<String, IndexChangeType>,
    /// Index vs working tree, keyed by path
    pub unstaged: BTreeMap<String, WorkspaceChangeType>,
    /// Working tree files not present in the index
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }

    /// Build the snapshot for the given repository and loaded index
    pub fn gather(repository: &Repository, index: &Index) -> anyhow::Result<Self> {
        let mut report = StatusReport {
            branch: repository.refs().current_branch()?,
            ..Default::default()
        };

        let head_tree = match repository.refs().resolve_head()? {
            Some(head_oid) => repository.database().flatten_commit_tree(&head_oid)?,
            None => BTreeMap::new(),
        };

        report.collect_staged_changes(index, &head_tree);
        report.collect_unstaged_changes(repository, index);
        report.collect_untracked_files(repository, index)?;

        Ok(report)
    }

    fn collect_staged_changes(
        &mut self,
        index: &Index,
        head_tree: &BTreeMap<String, ObjectId>,
    ) {
        for entry in index.entries() {
            match head_tree.get(&entry.path) {
                None => {
                    self.staged
                        .insert(entry.path.clone(), IndexChangeType::Added);
                }
                Some(head_oid) if head_oid != &entry.oid => {
                    self.staged
                        .insert(entry.path.clone(), IndexChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        for path in head_tree.keys() {
            if index.entry_by_path(path).is_none() {
                self.staged.insert(path.clone(), IndexChangeType::Deleted);
            }
        }
    }

    fn collect_unstaged_changes(&mut self, repository: &Repository, index: &Index) {
        for entry in index.entries() {
            let entry_path = Path::new(&entry.path);

            if !repository.workspace().file_exists(entry_path) {
                self.unstaged
                    .insert(entry.path.clone(), WorkspaceChangeType::Deleted);
                continue;
            }

            // unreadable files are skipped rather than failing the command
            let Ok(content) = repository.workspace().read_file(entry_path) else {
                continue;
            };

            let Ok(current_oid) = Blob::new(content).object_id() else {
                continue;
            };
            if current_oid != entry.oid {
                self.unstaged
                    .insert(entry.path.clone(), WorkspaceChangeType::Modified);
            }
        }
    }

    fn collect_untracked_files(
        &mut self,
        repository: &Repository,
        index: &Index,
    ) -> anyhow::Result<()> {
        for path in repository.workspace().list_files(None)? {
            let path = path.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");
            if index.entry_by_path(&path).is_none() {
                self.untracked.push(path);
            }
        }

        self.untracked.sort();
        Ok(())
    }
}

use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub async fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        let target_oid = self
            .refs()
            .read_ref(&Refs::branch_ref(target))?
            .ok_or_else(|| anyhow::anyhow!("branch '{}' not found", target))?;

        let current_oid = self.refs().resolve_head()?;

        if current_oid.as_ref() == Some(&target_oid) {
            // already on the right commit, only HEAD moves
            self.refs().update_head(&Refs::symref_to(target))?;
            writeln!(self.writer(), "Switched to branch '{target}'")?;
            return Ok(());
        }

        let current_tree = match &current_oid {
            Some(oid) => self.database().flatten_commit_tree(oid)?,
            None => BTreeMap::new(),
        };
        let target_tree = self.database().flatten_commit_tree(&target_oid)?;

        // drop files the target does not know about, pruning emptied
        // directories as we go
        for path in current_tree.keys() {
            if !target_tree.contains_key(path) {
                self.workspace().remove_file_and_prune(Path::new(path));
            }
        }

        let index = self.index();
        let mut index = index.lock().await;

        index.clear();
        self.materialize_tree(&mut index, &target_tree)?;
        index.write_updates()?;

        self.refs().update_head(&Refs::symref_to(target))?;

        writeln!(self.writer(), "Switched to branch '{target}'")?;

        Ok(())
    }

    /// Write every blob of a flattened tree into the working tree and
    /// stage it with the freshly written file's stat
    pub(crate) fn materialize_tree(
        &self,
        index: &mut Index,
        tree: &BTreeMap<String, ObjectId>,
    ) -> anyhow::Result<()> {
        for (path, blob_oid) in tree {
            let file_path = Path::new(path);

            let blob = self
                .database()
                .parse_object_as_blob(blob_oid)?
                .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", blob_oid))?;

            self.workspace().write_file(file_path, blob.content())?;

            let stat = self.workspace().stat_file(file_path)?;
            index.add(IndexEntry::new(path.clone(), blob_oid.clone(), stat));
        }

        Ok(())
    }
}

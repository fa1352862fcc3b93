use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::artifacts::merge::ancestry::{find_merge_base, is_ancestor};
use crate::artifacts::merge::file_merge::merge_trees;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub async fn merge(&mut self, target: &str) -> anyhow::Result<()> {
        let current_branch = self
            .refs()
            .current_branch()?
            .ok_or_else(|| anyhow::anyhow!("cannot merge in detached HEAD state"))?;

        let current_oid = self
            .refs()
            .resolve_head()?
            .ok_or_else(|| anyhow::anyhow!("no commits on current branch"))?;

        let target_oid = self
            .refs()
            .read_ref(&Refs::branch_ref(target))?
            .ok_or_else(|| anyhow::anyhow!("branch '{}' not found", target))?;

        if current_oid == target_oid {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(());
        }

        if is_ancestor(self.database(), &current_oid, &target_oid) {
            return self.fast_forward(&current_branch, &target_oid).await;
        }

        if is_ancestor(self.database(), &target_oid, &current_oid) {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(());
        }

        self.file_level_merge(&current_branch, target, &current_oid, &target_oid)
            .await
    }

    /// Move the current branch straight to the target commit and
    /// materialize its tree; no new commit is created
    async fn fast_forward(
        &mut self,
        current_branch: &str,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        self.refs()
            .write_ref(&Refs::branch_ref(current_branch), target_oid)?;

        let target_tree = self.database().flatten_commit_tree(target_oid)?;

        let index = self.index();
        let mut index = index.lock().await;

        index.clear();
        self.materialize_tree(&mut index, &target_tree)?;
        index.write_updates()?;

        writeln!(
            self.writer(),
            "Fast-forward merge: {} -> {}",
            current_branch,
            target_oid.to_short_oid()
        )?;

        Ok(())
    }

    async fn file_level_merge(
        &mut self,
        current_branch: &str,
        target_branch: &str,
        current_oid: &ObjectId,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        let base_tree = match find_merge_base(self.database(), current_oid, target_oid) {
            Some(base_oid) => self.database().flatten_commit_tree(&base_oid)?,
            None => BTreeMap::new(),
        };
        let current_tree = self.database().flatten_commit_tree(current_oid)?;
        let target_tree = self.database().flatten_commit_tree(target_oid)?;

        let resolution = merge_trees(&base_tree, &current_tree, &target_tree);

        if resolution.has_conflicts() {
            for path in &resolution.conflicts {
                writeln!(self.writer(), "CONFLICT (content): Merge conflict in {path}")?;
            }
            anyhow::bail!("automatic merge failed; fix conflicts and then commit");
        }

        let index = self.index();
        let mut index = index.lock().await;

        index.clear();
        self.materialize_tree(&mut index, &resolution.merged)?;
        index.write_updates()?;

        // files we had that the merged result no longer carries
        for path in current_tree.keys() {
            if !resolution.merged.contains_key(path) {
                let _ = std::fs::remove_file(self.workspace().path().join(Path::new(path)));
            }
        }

        let tree_oid = self.write_tree(&index)?;

        let author = Author::from_env();
        let message = format!("Merge branch '{target_branch}' into {current_branch}");
        let commit = Commit::new(
            vec![current_oid.clone(), target_oid.clone()],
            tree_oid,
            author,
            message.clone(),
        );
        let commit_oid = self.database().store(&commit)?;

        self.refs()
            .write_ref(&Refs::branch_ref(current_branch), &commit_oid)?;

        writeln!(self.writer(), "Merge made by the 'file-level' strategy.")?;
        writeln!(
            self.writer(),
            "[{} {}] {}",
            current_branch,
            commit_oid.to_short_oid(),
            message
        )?;

        Ok(())
    }
}

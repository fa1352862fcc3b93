use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        if index.is_empty() {
            anyhow::bail!("nothing to commit");
        }

        let tree_oid = self.write_tree(&index)?;

        let parents = match self.refs().resolve_head()? {
            Some(head_oid) => vec![head_oid],
            None => vec![],
        };

        let author = Author::from_env();
        let commit = Commit::new(parents, tree_oid, author, message.to_string());
        let commit_oid = self.database().store(&commit)?;

        let branch = self.advance_head(&commit_oid)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            branch.as_deref().unwrap_or("detached HEAD"),
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Store every tree in the index's directory trie, returning the
    /// root tree's identity
    pub(crate) fn write_tree(&self, index: &Index) -> anyhow::Result<ObjectId> {
        let tree = Tree::build(index.entries())?;

        tree.traverse(&|subtree| self.database().store(subtree).map(|_| ()))?;

        tree.object_id()
    }

    /// Point the current branch (or a detached HEAD) at the new commit,
    /// returning the branch name when on one
    pub(crate) fn advance_head(&self, commit_oid: &ObjectId) -> anyhow::Result<Option<String>> {
        match self.refs().current_branch()? {
            Some(branch) => {
                self.refs()
                    .write_ref(&Refs::branch_ref(&branch), commit_oid)?;
                Ok(Some(branch))
            }
            None => {
                self.refs().update_head(commit_oid.as_ref())?;
                Ok(None)
            }
        }
    }
}

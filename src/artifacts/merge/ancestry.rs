//! First-parent ancestry walks
//!
//! History here is deliberately linear: every walk follows only the
//! first parent of each commit, so the merge base is the nearest commit
//! on the first-parent chains of both sides rather than a true lowest
//! common ancestor over the full graph. Walks treat unreadable commits
//! the same as reaching a root; callers that actually need a missing
//! object will fail when they load it.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashSet;

/// Whether `ancestor` appears on the first-parent chain of `descendant`
pub fn is_ancestor(database: &Database, ancestor: &ObjectId, descendant: &ObjectId) -> bool {
    let mut cursor = Some(descendant.clone());

    while let Some(oid) = cursor {
        if &oid == ancestor {
            return true;
        }
        cursor = first_parent(database, &oid);
    }

    false
}

/// The merge base of two commits under first-parent traversal.
///
/// Collects the chain of `ours`, then walks `theirs` until a commit in
/// that chain turns up. `None` when the chains never meet.
pub fn find_merge_base(
    database: &Database,
    ours: &ObjectId,
    theirs: &ObjectId,
) -> Option<ObjectId> {
    let mut our_chain = HashSet::new();
    let mut cursor = Some(ours.clone());
    while let Some(oid) = cursor {
        cursor = first_parent(database, &oid);
        our_chain.insert(oid);
    }

    let mut cursor = Some(theirs.clone());
    while let Some(oid) = cursor {
        if our_chain.contains(&oid) {
            return Some(oid);
        }
        cursor = first_parent(database, &oid);
    }

    None
}

fn first_parent(database: &Database, oid: &ObjectId) -> Option<ObjectId> {
    match database.parse_object_as_commit(oid) {
        Ok(Some(commit)) => commit.parent().cloned(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::{Author, Commit};
    use crate::artifacts::objects::tree::Tree;
    use bytes::Bytes;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database() -> (assert_fs::TempDir, Database) {
        let dir = assert_fs::TempDir::new().expect("failed to create temp dir");
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        (dir, database)
    }

    fn commit_with_parents(
        database: &Database,
        content: &str,
        parents: Vec<ObjectId>,
    ) -> ObjectId {
        let blob = Blob::new(Bytes::from(content.as_bytes().to_vec()));
        let blob_oid = database.store(&blob).unwrap();

        let entry = IndexEntry::new("file.txt".to_string(), blob_oid, EntryMetadata::default());
        let tree = Tree::build(std::iter::once(&entry)).unwrap();
        let tree_oid = database.store(&tree).unwrap();

        let timestamp = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00").unwrap();
        let author = Author::new_with_timestamp(
            "Tester".to_string(),
            "tester@localhost".to_string(),
            timestamp,
        );
        let commit = Commit::new(parents, tree_oid, author, content.to_string());
        database.store(&commit).unwrap()
    }

    #[rstest]
    fn linear_chain_ancestry(database: (assert_fs::TempDir, Database)) {
        let (_dir, database) = database;
        let a = commit_with_parents(&database, "a", vec![]);
        let b = commit_with_parents(&database, "b", vec![a.clone()]);
        let c = commit_with_parents(&database, "c", vec![b.clone()]);

        assert!(is_ancestor(&database, &a, &c));
        assert!(is_ancestor(&database, &b, &c));
        assert!(!is_ancestor(&database, &c, &a));
    }

    #[rstest]
    fn every_commit_is_its_own_ancestor(database: (assert_fs::TempDir, Database)) {
        let (_dir, database) = database;
        let a = commit_with_parents(&database, "a", vec![]);

        assert!(is_ancestor(&database, &a, &a));
    }

    #[rstest]
    fn diverged_branches_share_their_fork_point(database: (assert_fs::TempDir, Database)) {
        let (_dir, database) = database;
        let base = commit_with_parents(&database, "base", vec![]);
        let left = commit_with_parents(&database, "left", vec![base.clone()]);
        let right = commit_with_parents(&database, "right", vec![base.clone()]);

        pretty_assertions::assert_eq!(
            find_merge_base(&database, &left, &right),
            Some(base.clone())
        );
        pretty_assertions::assert_eq!(find_merge_base(&database, &right, &left), Some(base));
    }

    #[rstest]
    fn unrelated_histories_have_no_base(database: (assert_fs::TempDir, Database)) {
        let (_dir, database) = database;
        let one = commit_with_parents(&database, "one", vec![]);
        let other = commit_with_parents(&database, "other", vec![]);

        pretty_assertions::assert_eq!(find_merge_base(&database, &one, &other), None);
    }

    #[rstest]
    fn walks_follow_only_the_first_parent(database: (assert_fs::TempDir, Database)) {
        let (_dir, database) = database;
        let root = commit_with_parents(&database, "root", vec![]);
        let side = commit_with_parents(&database, "side", vec![root.clone()]);
        let mainline = commit_with_parents(&database, "mainline", vec![root.clone()]);
        let merge = commit_with_parents(&database, "merge", vec![mainline.clone(), side.clone()]);

        // `side` is reachable through the merge's second parent only
        assert!(!is_ancestor(&database, &side, &merge));
        assert!(is_ancestor(&database, &mainline, &merge));
    }
}

//! Three-way file-level merge
//!
//! Each path seen by any of base, ours or theirs resolves independently by
//! comparing blob hashes, never content:
//!
//! | ours vs theirs | ours vs base | theirs vs base | outcome            |
//! |----------------|--------------|----------------|--------------------|
//! | equal          | any          | any            | keep ours          |
//! | different      | equal        | any            | take theirs        |
//! | different      | any          | equal          | keep ours          |
//! | different      | different    | different      | conflict           |
//!
//! "Keep"/"take" of an absent side means the path is dropped, so a
//! both-sides delete vanishes quietly while a delete racing a
//! modification is a conflict. Identical edits on both sides produce
//! identical hashes and merge silently.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of merging two flattened trees against their base
#[derive(Debug, Clone, Default)]
pub struct MergeResolution {
    /// Merged `path -> blob hash` mapping
    pub merged: BTreeMap<String, ObjectId>,
    /// Paths with divergent changes, in path order; conflicted paths
    /// keep our side's hash in `merged`
    pub conflicts: Vec<String>,
}

impl MergeResolution {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Merge `ours` and `theirs` relative to `base`, path by path
pub fn merge_trees(
    base: &BTreeMap<String, ObjectId>,
    ours: &BTreeMap<String, ObjectId>,
    theirs: &BTreeMap<String, ObjectId>,
) -> MergeResolution {
    let all_paths: BTreeSet<&String> = base
        .keys()
        .chain(ours.keys())
        .chain(theirs.keys())
        .collect();

    let mut resolution = MergeResolution::default();

    for path in all_paths {
        let base_hash = base.get(path);
        let our_hash = ours.get(path);
        let their_hash = theirs.get(path);

        let keep = if our_hash == their_hash {
            our_hash
        } else if our_hash == base_hash {
            their_hash
        } else if their_hash == base_hash {
            our_hash
        } else {
            resolution.conflicts.push(path.clone());
            our_hash
        };

        if let Some(oid) = keep {
            resolution.merged.insert(path.clone(), oid.clone());
        }
    }

    resolution
}

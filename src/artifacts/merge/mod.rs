//! Merge machinery: first-parent ancestry and the file-level three-way merge

pub(crate) mod ancestry;
pub(crate) mod file_merge;

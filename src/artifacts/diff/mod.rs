//! Line diffing: LCS edit script plus unified hunk assembly

pub(crate) mod diff_algorithm;
pub(crate) mod hunk;

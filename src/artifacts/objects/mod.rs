//! Object model: blobs, trees, commits and their identifiers

pub(crate) mod blob;
pub(crate) mod commit;
pub(crate) mod object;
pub(crate) mod object_id;
pub(crate) mod object_type;
pub(crate) mod tree;

/// Length of a hex-encoded object ID (SHA-1)
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a binary object ID (SHA-1)
pub const OBJECT_ID_RAW_LENGTH: usize = 20;

//! Index building blocks: header, entries, modes, integrity checksum

pub(crate) mod checksum;
pub(crate) mod entry_mode;
pub(crate) mod index_entry;
pub(crate) mod index_header;

/// Magic bytes opening every index file
pub const SIGNATURE: &str = "GIDX";

/// The only supported index format version
pub const VERSION: u32 = 1;

/// Bytes in the index header: magic + version + entry count
pub const HEADER_SIZE: usize = 12;

/// Bytes in the trailing SHA-1 checksum
pub const CHECKSUM_SIZE: usize = 20;

/// Fixed bytes per entry before the path: three u32 stat fields,
/// a 20-byte hash, a u32 mode and a u16 path length
pub const ENTRY_FIXED_SIZE: usize = 38;

/// Entries are NUL-padded to a multiple of this block size
pub const ENTRY_BLOCK: usize = 8;

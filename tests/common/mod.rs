#![allow(dead_code)]

use std::io::Read;
use std::path::Path;

pub mod command;
pub mod file;

/// Read the trimmed content of the HEAD file
pub fn read_head(dir: &Path) -> String {
    let content = std::fs::read_to_string(dir.join(".gogit").join("HEAD"))
        .expect("failed to read HEAD");
    content.trim().to_string()
}

/// Read the commit hash a branch points at
pub fn read_branch_ref(dir: &Path, branch: &str) -> String {
    let path = dir
        .join(".gogit")
        .join("refs")
        .join("heads")
        .join(branch);
    let content = std::fs::read_to_string(path).expect("failed to read branch ref");
    content.trim().to_string()
}

/// Decompress a stored object and return its full framed encoding
pub fn decompress_object(dir: &Path, hash: &str) -> Vec<u8> {
    let path = dir
        .join(".gogit")
        .join("objects")
        .join(&hash[..2])
        .join(&hash[2..]);
    let compressed = std::fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read object {hash}: {e}"));

    let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .expect("failed to decompress object");
    decompressed
}

/// The blob hash gogit computes for the given content
pub fn blob_hash(content: &[u8]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

//! Index integrity checksum
//!
//! Every index file ends with the SHA-1 of all preceding bytes. The
//! writer accumulates the digest as it goes; readers verify the stored
//! trailer before any entry is decoded.

use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::anyhow;
use sha1::{Digest, Sha1};
use std::io::Write;

/// Digest-tracking writer for the index file
#[derive(Debug)]
pub struct Checksum<W> {
    inner: W,
    digest: Sha1,
}

impl<W: Write> Checksum<W> {
    pub fn new(inner: W) -> Self {
        Checksum {
            inner,
            digest: Sha1::new(),
        }
    }

    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.inner.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    /// Append the accumulated digest, sealing the stream
    pub fn write_checksum(mut self) -> anyhow::Result<()> {
        let checksum = self.digest.finalize();
        self.inner
            .write_all(checksum.as_slice())
            .map_err(|_| anyhow!("failed to write index checksum"))?;

        Ok(())
    }
}

/// Verify the trailing checksum of a complete index image and return
/// the payload it covers
pub fn verify_trailing(data: &[u8]) -> anyhow::Result<&[u8]> {
    if data.len() < CHECKSUM_SIZE {
        return Err(anyhow!("index file too short"));
    }

    let (payload, stored) = data.split_at(data.len() - CHECKSUM_SIZE);
    let actual = Sha1::digest(payload);

    if actual.as_slice() != stored {
        return Err(anyhow!("index checksum mismatch"));
    }

    Ok(payload)
}

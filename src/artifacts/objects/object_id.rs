//! Content-addressed object identifier
//!
//! An object ID is the hex-encoded SHA-1 of an object's framed encoding.
//! It doubles as the object's location in the store: the first two hex
//! characters name the fan-out directory, the remaining 38 the file.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use std::io;
use std::path::PathBuf;

/// Hex-encoded SHA-1 identity of an object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate a 40-character hex string as an object ID
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Build an object ID from a 20-byte binary digest
    pub fn from_raw(raw: &[u8]) -> anyhow::Result<Self> {
        if raw.len() != OBJECT_ID_RAW_LENGTH {
            return Err(anyhow::anyhow!("invalid raw object ID length: {}", raw.len()));
        }

        let mut hex = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in raw {
            hex.push_str(&format!("{byte:02x}"));
        }

        Ok(Self(hex))
    }

    /// Decode the hex form back into its 20 raw bytes
    pub fn to_raw(&self) -> anyhow::Result<[u8; OBJECT_ID_RAW_LENGTH]> {
        let mut raw = [0u8; OBJECT_ID_RAW_LENGTH];
        for (i, chunk) in raw.iter_mut().enumerate() {
            *chunk = u8::from_str_radix(&self.0[2 * i..2 * i + 2], 16)
                .map_err(|_| anyhow::anyhow!("invalid hex digit in object ID"))?;
        }
        Ok(raw)
    }

    /// Write the binary form of the ID to the given writer
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_all(&self.to_raw()?)?;
        Ok(())
    }

    /// Read a binary object ID from the given reader
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_RAW_LENGTH];
        reader.read_exact(&mut raw)?;
        Self::from_raw(&raw)
    }

    /// Storage path relative to the objects directory (`ab/cdef12...`)
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First seven characters, the usual abbreviated form
    pub fn to_short_oid(&self) -> &str {
        &self.0[..7]
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

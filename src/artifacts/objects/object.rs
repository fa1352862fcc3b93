//! Core object traits
//!
//! Every object kind serializes to `<type> <size>\0<content>` and is
//! identified by the SHA-1 of that encoding. `Packable`/`Unpackable`
//! cover the wire codec; `Object` adds identity and store-path helpers.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

/// Serialization to the framed on-disk format
pub trait Packable {
    /// Serialize the object to bytes, header included
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialization from the framed on-disk format
pub trait Unpackable {
    /// Deserialize the object from a reader (header already consumed)
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Common operations over blobs, trees and commits
pub trait Object: Packable {
    /// The object's kind tag
    fn object_type(&self) -> ObjectType;

    /// Compute the object's content-addressed identity
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let digest = hasher.finalize();
        ObjectId::from_raw(digest.as_slice())
    }
}

/// Type-erased container for an object read from the store
#[derive(Debug)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

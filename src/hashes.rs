//! SHA-256 digests for leaves and internal nodes.
//!
//! Leaves and internal nodes go through the same function with no
//! distinguishing prefix: `leaf_hash(l ∥ r) == node_hash(l, r)`. An internal
//! node can therefore be passed off as a leaf whose value is the 64-byte
//! concatenation of its children. Adding a prefix would change every root, so
//! the scheme is kept as is.

use crate::bytes::{Bytes32, concat};
use sha2::{Digest, Sha256};

#[must_use]
pub fn sha256(data: &[u8]) -> Bytes32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[must_use]
pub fn leaf_hash(value: &[u8]) -> Bytes32 {
    sha256(value)
}

/// Digest of an internal node, always `left` then `right`.
#[must_use]
pub fn node_hash(left: &Bytes32, right: &Bytes32) -> Bytes32 {
    sha256(&concat(left, right))
}

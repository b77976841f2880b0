//! # merkle-inclusion
//!
//! A binary SHA-256 Merkle tree over an ordered list of strings, with
//! inclusion proofs that verify against the root alone.
//!
//! ## Construction
//!
//! - Each value becomes a leaf holding `sha256(value)`, in input order.
//! - Each level is paired left to right into parents holding
//!   `sha256(left ∥ right)`.
//! - A trailing odd node is paired with itself rather than promoted.
//! - Leaves and internal nodes share the same hash with no prefix, so roots
//!   match other implementations of this exact scheme.
//!
//! ## Example
//!
//! ```rust
//! use merkle_inclusion::{MerkleTree, build, prove, verify};
//!
//! let tree = build(&["alice", "bob", "charlie"]).unwrap();
//!
//! let proof = prove(&tree, "bob").unwrap();
//! assert!(verify(tree.root(), "bob", &proof));
//! assert!(!MerkleTree::verify(tree.root(), "mallory", &proof));
//! ```

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bytes;
pub mod core;
pub mod error;
pub mod hashes;
pub mod options;
pub mod proof;
pub mod tree;

pub use bytes::{Bytes32, HexString, ToBytes32, bytes32_to_hex, hex_to_bytes32};
pub use error::{MerkleTreeError, Result};
pub use hashes::{leaf_hash, node_hash, sha256};
pub use options::{DuplicatePolicy, MerkleTreeOptions};
pub use proof::{Position, Proof, ProofStep};
pub use tree::{MerkleTree, build, prove, verify};

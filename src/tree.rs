use crate::bytes::{Bytes32, HexString, bytes32_to_hex};
use crate::core::{
    Node, NodeId, get_proof, is_valid_merkle_tree, make_merkle_tree_from_values, process_proof,
    render_merkle_tree,
};
use crate::error::{MerkleTreeError, Result, invariant};
use crate::hashes::leaf_hash;
use crate::options::{DuplicatePolicy, MerkleTreeOptions};
use crate::proof::Proof;
use std::collections::HashMap;
use tracing::{debug, trace};

/// An immutable Merkle tree over an ordered list of strings.
///
/// Leaves are addressed by their position in the input. Looking a leaf up by
/// value is a convenience on top of that: when a value occurs more than once
/// (and duplicates are allowed) the lookup resolves to its last occurrence,
/// and earlier occurrences are only reachable by position.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    nodes: Vec<Node>,
    values: Vec<String>,
    leaf_lookup: HashMap<String, NodeId>,
    height: usize,
}

impl MerkleTree {
    pub fn of<S: AsRef<str>>(values: &[S], options: MerkleTreeOptions) -> Result<Self> {
        if values.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        let values: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();

        let mut leaf_lookup: HashMap<String, NodeId> = HashMap::with_capacity(values.len());
        for (position, value) in values.iter().enumerate() {
            if let Some(previous) = leaf_lookup.insert(value.clone(), position) {
                if options.duplicates == DuplicatePolicy::Reject {
                    return Err(MerkleTreeError::DuplicateValue(value.clone()));
                }
                debug!(value = %value, previous, position, "duplicate value, lookup moved to later leaf");
            }
        }

        let nodes = make_merkle_tree_from_values(&values, options.parallel)?;
        let height = leaf_depth(&nodes);

        let tree = Self {
            nodes,
            values,
            leaf_lookup,
            height,
        };
        debug!(
            leaves = tree.len(),
            height = tree.height,
            root = %tree.root_hex(),
            "built merkle tree"
        );
        Ok(tree)
    }

    pub fn build<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        Self::of(values, MerkleTreeOptions::default())
    }

    /// Checks `proof` for `value` against `root`, without needing the tree.
    #[must_use]
    pub fn verify(root: &Bytes32, value: &str, proof: &Proof) -> bool {
        let computed = process_proof(&leaf_hash(value.as_bytes()), proof);
        let valid = &computed == root;
        trace!(valid, steps = proof.len(), "verified proof");
        valid
    }

    pub fn root(&self) -> &Bytes32 {
        // make_merkle_tree never returns an empty arena
        &self.nodes[self.nodes.len() - 1].hash
    }

    pub fn root_hex(&self) -> HexString {
        bytes32_to_hex(self.root())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of hashing levels above the leaves.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn leaf_hash(&self, index: usize) -> Option<&Bytes32> {
        self.values.get(index).map(|_| &self.nodes[index].hash)
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.values.iter().enumerate().map(|(i, v)| (i, v.as_str()))
    }

    pub fn render(&self) -> Result<String> {
        render_merkle_tree(&self.nodes)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, value) in self.values.iter().enumerate() {
            invariant(
                leaf_hash(value.as_bytes()) == self.nodes[i].hash,
                "Merkle tree does not contain the expected value",
            )?;
        }
        for (value, &position) in &self.leaf_lookup {
            invariant(
                self.values.get(position) == Some(value),
                "Leaf lookup points at the wrong value",
            )?;
        }
        invariant(
            is_valid_merkle_tree(&self.nodes, self.values.len()),
            "Merkle tree is invalid",
        )?;
        Ok(())
    }

    /// Position of the leaf holding `value`, the last one for repeated values.
    pub fn leaf_lookup(&self, value: &str) -> Result<usize> {
        self.leaf_lookup
            .get(value)
            .copied()
            .ok_or_else(|| MerkleTreeError::NotFound(value.to_string()))
    }

    pub fn get_proof_by_index(&self, index: usize) -> Result<Proof> {
        if index >= self.values.len() {
            return Err(MerkleTreeError::IndexOutOfBounds);
        }
        let proof = get_proof(&self.nodes, index)?;
        if process_proof(&self.nodes[index].hash, &proof) != *self.root() {
            return Err(MerkleTreeError::UnableToProve);
        }
        Ok(proof)
    }

    pub fn get_proof(&self, value: &str) -> Result<Proof> {
        let index = self.leaf_lookup(value)?;
        self.get_proof_by_index(index)
    }

    pub fn verify_proof(&self, value: &str, proof: &Proof) -> bool {
        Self::verify(self.root(), value, proof)
    }
}

/// Steps from the first leaf up to the root; every leaf sits at this depth.
fn leaf_depth(nodes: &[Node]) -> usize {
    let mut depth = 0;
    let mut current = 0;
    while let Some(parent) = nodes[current].parent {
        depth += 1;
        current = parent;
    }
    depth
}

/// Builds a tree with default options.
pub fn build<S: AsRef<str>>(values: &[S]) -> Result<MerkleTree> {
    MerkleTree::build(values)
}

/// Inclusion proof for `value`, or `NotFound` if the tree does not hold it.
pub fn prove(tree: &MerkleTree, value: &str) -> Result<Proof> {
    tree.get_proof(value)
}

#[must_use]
pub fn verify(root: &Bytes32, value: &str, proof: &Proof) -> bool {
    MerkleTree::verify(root, value, proof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::{node_hash, sha256};
    use crate::proof::Position;

    fn make_test_values(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("value-{i}")).collect()
    }

    #[test]
    fn test_merkle_tree_basic() {
        let values = make_test_values(4);
        let tree = MerkleTree::build(&values).unwrap();

        assert_eq!(tree.len(), 4);
        assert!(!tree.is_empty());
        assert_eq!(tree.height(), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_empty_input() {
        let values: Vec<String> = vec![];
        let result = MerkleTree::build(&values);
        assert!(matches!(result, Err(MerkleTreeError::EmptyInput)));
    }

    #[test]
    fn test_single_leaf() {
        let tree = MerkleTree::build(&["a"]).unwrap();

        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root(), &sha256(b"a"));
        assert_eq!(
            tree.root_hex(),
            "0xca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
        );

        let proof = tree.get_proof("a").unwrap();
        assert!(proof.is_empty());
        assert!(tree.verify_proof("a", &proof));
    }

    #[test]
    fn test_three_leaves() {
        let tree = MerkleTree::build(&["a", "b", "c"]).unwrap();

        let (a, b, c) = (sha256(b"a"), sha256(b"b"), sha256(b"c"));
        let expected = node_hash(&node_hash(&a, &b), &node_hash(&c, &c));

        assert_eq!(tree.root(), &expected);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_height_is_ceil_log2() {
        for (count, height) in [(1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (16, 4)] {
            let tree = MerkleTree::build(&make_test_values(count)).unwrap();
            assert_eq!(tree.height(), height, "count {count}");
        }
    }

    #[test]
    fn test_proof_verification() {
        let values = make_test_values(7);
        let tree = MerkleTree::build(&values).unwrap();

        for (i, value) in values.iter().enumerate() {
            let proof = tree.get_proof(value).unwrap();
            assert_eq!(proof.len(), tree.height());
            assert!(tree.verify_proof(value, &proof));
            assert_eq!(proof, tree.get_proof_by_index(i).unwrap());
        }
    }

    #[test]
    fn test_static_verify() {
        let values = make_test_values(5);
        let tree = MerkleTree::build(&values).unwrap();

        for value in &values {
            let proof = prove(&tree, value).unwrap();
            assert!(verify(tree.root(), value, &proof));
        }
    }

    #[test]
    fn test_unknown_value() {
        let tree = MerkleTree::build(&make_test_values(4)).unwrap();
        let result = tree.get_proof("nonexistent");
        assert_eq!(
            result,
            Err(MerkleTreeError::NotFound("nonexistent".to_string()))
        );
    }

    #[test]
    fn test_reject_proof_from_other_tree() {
        let tree1 = MerkleTree::build(&make_test_values(4)).unwrap();
        let tree2 = MerkleTree::build(&["x", "y", "z", "value-0"]).unwrap();

        let proof = tree1.get_proof("value-0").unwrap();
        assert!(!tree2.verify_proof("value-0", &proof));
    }

    #[test]
    fn test_reject_wrong_value() {
        let tree = MerkleTree::build(&make_test_values(4)).unwrap();
        let proof = tree.get_proof("value-1").unwrap();
        assert!(!tree.verify_proof("value-2", &proof));
    }

    #[test]
    fn test_reject_flipped_position() {
        let tree = MerkleTree::build(&make_test_values(4)).unwrap();
        let mut proof = tree.get_proof("value-1").unwrap();
        assert_eq!(proof.steps[0].position, Position::Left);

        proof.steps[0].position = proof.steps[0].position.flipped();
        assert!(!tree.verify_proof("value-1", &proof));
    }

    #[test]
    fn test_duplicates_last_wins() {
        let tree = MerkleTree::build(&["a", "b", "a"]).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.leaf_lookup("a").unwrap(), 2);
        tree.validate().unwrap();

        // both occurrences still prove through their positions
        for index in [0, 2] {
            let proof = tree.get_proof_by_index(index).unwrap();
            assert!(tree.verify_proof("a", &proof));
        }
        assert_ne!(
            tree.get_proof_by_index(0).unwrap(),
            tree.get_proof("a").unwrap()
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        let options = MerkleTreeOptions::new().with_duplicates(DuplicatePolicy::Reject);
        let result = MerkleTree::of(&["a", "b", "a"], options);
        assert_eq!(result.unwrap_err(), MerkleTreeError::DuplicateValue("a".to_string()));
    }

    #[test]
    fn test_entries() {
        let values = make_test_values(4);
        let tree = MerkleTree::build(&values).unwrap();

        for (index, value) in tree.entries() {
            assert_eq!(value, tree.at(index).unwrap());
            assert_eq!(tree.leaf_hash(index), Some(&sha256(value.as_bytes())));
        }
        assert!(tree.at(tree.len()).is_none());
        assert!(tree.leaf_hash(tree.len()).is_none());
    }

    #[test]
    fn test_out_of_bounds() {
        let tree = MerkleTree::build(&make_test_values(4)).unwrap();
        let result = tree.get_proof_by_index(100);
        assert!(matches!(result, Err(MerkleTreeError::IndexOutOfBounds)));
    }

    #[test]
    fn test_internal_positions_are_not_leaves() {
        let tree = MerkleTree::build(&make_test_values(4)).unwrap();
        // arena ids past the leaves belong to internal nodes
        let result = tree.get_proof_by_index(4);
        assert!(matches!(result, Err(MerkleTreeError::IndexOutOfBounds)));
    }

    #[test]
    fn test_render() {
        let tree = MerkleTree::build(&make_test_values(3)).unwrap();
        let rendered = tree.render().unwrap();
        assert!(rendered.starts_with(&format!("5) {}", tree.root_hex())));
    }

    #[test]
    fn test_parallel_option_same_root() {
        let values = make_test_values(33);
        let serial = MerkleTree::build(&values).unwrap();
        let parallel =
            MerkleTree::of(&values, MerkleTreeOptions::new().with_parallel(true)).unwrap();
        assert_eq!(serial.root(), parallel.root());
    }
}

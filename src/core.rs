use crate::bytes::{Bytes32, bytes32_to_hex};
use crate::error::{MerkleTreeError, Result, validate_argument};
use crate::hashes::{leaf_hash, node_hash};
use crate::proof::{Position, Proof, ProofStep};
use std::ops::Range;
use tracing::trace;

/// Index of a node in the tree arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub hash: Bytes32,
    /// `(left, right)`; both point at the same node when it was self-paired.
    pub children: Option<(NodeId, NodeId)>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn leaf(hash: Bytes32) -> Self {
        Self {
            hash,
            children: None,
            parent: None,
        }
    }

    fn internal(hash: Bytes32, left: NodeId, right: NodeId) -> Self {
        Self {
            hash,
            children: Some((left, right)),
            parent: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Pairs up one level left to right. A trailing odd node is paired with itself.
fn pair_level(level: Range<NodeId>) -> Vec<(NodeId, NodeId)> {
    let end = level.end;
    level
        .step_by(2)
        .map(|left| (left, if left + 1 < end { left + 1 } else { left }))
        .collect()
}

fn hash_pairs_serial(nodes: &[Node], pairs: &[(NodeId, NodeId)]) -> Vec<Bytes32> {
    pairs
        .iter()
        .map(|&(left, right)| node_hash(&nodes[left].hash, &nodes[right].hash))
        .collect()
}

#[cfg(feature = "rayon")]
fn hash_pairs(nodes: &[Node], pairs: &[(NodeId, NodeId)], parallel: bool) -> Vec<Bytes32> {
    use rayon::prelude::*;

    if !parallel {
        return hash_pairs_serial(nodes, pairs);
    }
    pairs
        .par_iter()
        .map(|&(left, right)| node_hash(&nodes[left].hash, &nodes[right].hash))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn hash_pairs(nodes: &[Node], pairs: &[(NodeId, NodeId)], _parallel: bool) -> Vec<Bytes32> {
    hash_pairs_serial(nodes, pairs)
}

/// Builds the node arena over already hashed leaves.
///
/// Leaves take ids `0..leaves.len()` in input order. Every following level is
/// appended after the one below it, so the root is always the last node.
pub fn make_merkle_tree(leaves: &[Bytes32], parallel: bool) -> Result<Vec<Node>> {
    if leaves.is_empty() {
        return Err(MerkleTreeError::EmptyInput);
    }

    let mut nodes: Vec<Node> = Vec::with_capacity(2 * leaves.len());
    nodes.extend(leaves.iter().map(|hash| Node::leaf(*hash)));

    let mut level = 0..nodes.len();
    let mut depth = 0usize;

    while level.len() > 1 {
        let pairs = pair_level(level.clone());
        let hashes = hash_pairs(&nodes, &pairs, parallel);
        let start = nodes.len();

        for (offset, ((left, right), hash)) in pairs.into_iter().zip(hashes).enumerate() {
            let id = start + offset;
            nodes[left].parent = Some(id);
            nodes[right].parent = Some(id);
            nodes.push(Node::internal(hash, left, right));
        }

        depth += 1;
        trace!(depth, width = nodes.len() - start, "hashed tree level");
        level = start..nodes.len();
    }

    Ok(nodes)
}

/// Hashes each value as a leaf and builds the arena over them.
pub fn make_merkle_tree_from_values<V: AsRef<[u8]>>(
    values: &[V],
    parallel: bool,
) -> Result<Vec<Node>> {
    let leaves: Vec<Bytes32> = values.iter().map(|v| leaf_hash(v.as_ref())).collect();
    make_merkle_tree(&leaves, parallel)
}

#[inline]
pub fn root_id(nodes: &[Node]) -> Result<NodeId> {
    nodes.len().checked_sub(1).ok_or(MerkleTreeError::EmptyInput)
}

/// Walks parent links from `leaf` to the root, recording each sibling.
pub fn get_proof(nodes: &[Node], leaf: NodeId) -> Result<Proof> {
    let node = nodes.get(leaf).ok_or(MerkleTreeError::IndexOutOfBounds)?;
    if !node.is_leaf() {
        return Err(MerkleTreeError::NotALeaf);
    }

    let mut steps = Vec::new();
    let mut current = leaf;

    while let Some(parent) = nodes[current].parent {
        let (left, right) = nodes[parent]
            .children
            .ok_or_else(|| MerkleTreeError::Invariant("Parent has no children".to_string()))?;

        if left == current {
            steps.push(ProofStep::new(nodes[right].hash, Position::Right));
        } else {
            steps.push(ProofStep::new(nodes[left].hash, Position::Left));
        }
        current = parent;
    }

    trace!(leaf, steps = steps.len(), "generated proof");
    Ok(Proof::new(steps))
}

/// Folds a proof over a leaf digest and returns the implied root.
#[must_use]
pub fn process_proof(leaf: &Bytes32, proof: &Proof) -> Bytes32 {
    proof.iter().fold(*leaf, |current, step| match step.position {
        Position::Left => node_hash(&step.sibling, &current),
        Position::Right => node_hash(&current, &step.sibling),
    })
}

/// Checks the structural invariants of an arena built by [`make_merkle_tree`].
pub fn is_valid_merkle_tree(nodes: &[Node], leaf_count: usize) -> bool {
    if nodes.is_empty() || leaf_count == 0 || leaf_count > nodes.len() {
        return false;
    }
    let root = nodes.len() - 1;

    for (id, node) in nodes.iter().enumerate() {
        if (id < leaf_count) != node.is_leaf() {
            return false;
        }

        match node.parent {
            None if id != root => return false,
            Some(_) if id == root => return false,
            Some(parent) => {
                let Some((left, right)) = nodes.get(parent).and_then(|p| p.children) else {
                    return false;
                };
                if left != id && right != id {
                    return false;
                }
            }
            None => {}
        }

        if let Some((left, right)) = node.children {
            if left >= id || right >= id {
                return false;
            }
            if nodes[left].parent != Some(id) || nodes[right].parent != Some(id) {
                return false;
            }
            if node.hash != node_hash(&nodes[left].hash, &nodes[right].hash) {
                return false;
            }
        }
    }

    true
}

/// Draws the tree from the root down, one node per line.
pub fn render_merkle_tree(nodes: &[Node]) -> Result<String> {
    validate_argument(!nodes.is_empty(), "Expected non-zero number of nodes")?;

    let mut stack: Vec<(NodeId, Vec<usize>)> = vec![(nodes.len() - 1, vec![])];
    let mut lines = Vec::new();

    while let Some((i, path)) = stack.pop() {
        let mut line = String::new();

        for &p in path.iter().take(path.len().saturating_sub(1)) {
            line.push_str(if p == 0 { "   " } else { "│  " });
        }

        if let Some(&last) = path.last() {
            line.push_str(if last == 0 { "└─ " } else { "├─ " });
        }

        line.push_str(&format!("{}) {}", i, bytes32_to_hex(&nodes[i].hash)));
        lines.push(line);

        if let Some((left, right)) = nodes[i].children {
            stack.push((right, [path.clone(), vec![0]].concat()));
            stack.push((left, [path.clone(), vec![1]].concat()));
        }
    }

    Ok(lines.join("\n"))
}

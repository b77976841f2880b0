/// What to do when the same value appears at more than one position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep every leaf; value lookup resolves to the last occurrence.
    #[default]
    LastWins,
    /// Fail construction with `MerkleTreeError::DuplicateValue`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleTreeOptions {
    pub duplicates: DuplicatePolicy,
    /// Hash each level with rayon. Only honoured with the `rayon` feature.
    pub parallel: bool,
}

impl MerkleTreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

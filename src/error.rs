use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Expected non-zero number of values")]
    EmptyInput,

    #[error("Value is not in tree: {0:?}")]
    NotFound(String),

    #[error("Value appears more than once: {0:?}")]
    DuplicateValue(String),

    #[error("Node is not a leaf")]
    NotALeaf,

    #[error("Index out of bounds")]
    IndexOutOfBounds,

    #[error("Merkle tree nodes must be 32 bytes")]
    InvalidNodeLength,

    #[error("Hex decode error: {0}")]
    HexDecode(String),

    #[error("Unable to prove value")]
    UnableToProve,
}

pub type Result<T> = std::result::Result<T, MerkleTreeError>;

#[inline]
pub fn validate_argument<T: AsRef<str>>(condition: bool, message: T) -> Result<()> {
    if !condition {
        Err(MerkleTreeError::InvalidArgument(
            message.as_ref().to_string(),
        ))
    } else {
        Ok(())
    }
}

#[inline]
pub fn invariant<T: AsRef<str>>(condition: bool, message: T) -> Result<()> {
    if !condition {
        Err(MerkleTreeError::Invariant(message.as_ref().to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_argument() {
        assert!(validate_argument(true, "unused").is_ok());
        assert_eq!(
            validate_argument(false, "bad input"),
            Err(MerkleTreeError::InvalidArgument("bad input".to_string()))
        );
    }

    #[test]
    fn test_invariant() {
        assert!(invariant(true, "unused").is_ok());
        assert_eq!(
            invariant(false, "broken"),
            Err(MerkleTreeError::Invariant("broken".to_string()))
        );
    }

    #[test]
    fn test_not_found_message_quotes_value() {
        let err = MerkleTreeError::NotFound("nonexistent".to_string());
        assert_eq!(err.to_string(), "Value is not in tree: \"nonexistent\"");
    }
}

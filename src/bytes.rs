use crate::error::{MerkleTreeError, Result};

pub type Bytes32 = [u8; 32];
pub type HexString = String;

pub trait ToBytes32 {
    fn to_bytes32(&self) -> Result<Bytes32>;
}

impl ToBytes32 for [u8; 32] {
    fn to_bytes32(&self) -> Result<Bytes32> {
        Ok(*self)
    }
}

impl ToBytes32 for &[u8] {
    fn to_bytes32(&self) -> Result<Bytes32> {
        if self.len() != 32 {
            return Err(MerkleTreeError::InvalidNodeLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(self);
        Ok(arr)
    }
}

impl ToBytes32 for Vec<u8> {
    fn to_bytes32(&self) -> Result<Bytes32> {
        self.as_slice().to_bytes32()
    }
}

impl ToBytes32 for &str {
    fn to_bytes32(&self) -> Result<Bytes32> {
        hex_to_bytes32(self)
    }
}

impl ToBytes32 for String {
    fn to_bytes32(&self) -> Result<Bytes32> {
        hex_to_bytes32(self)
    }
}

/// Parses a 32-byte digest from hex, with or without a `0x` prefix.
pub fn hex_to_bytes32(s: &str) -> Result<Bytes32> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| MerkleTreeError::HexDecode(e.to_string()))?;
    bytes.as_slice().to_bytes32()
}

#[must_use]
pub fn bytes32_to_hex(bytes: &Bytes32) -> HexString {
    format!("0x{}", hex::encode(bytes))
}

pub fn to_hex<T: ToBytes32>(value: &T) -> Result<HexString> {
    Ok(bytes32_to_hex(&value.to_bytes32()?))
}

/// Concatenates two digests in the given order, `left` first.
#[must_use]
pub fn concat(left: &Bytes32, right: &Bytes32) -> [u8; 64] {
    let mut result = [0u8; 64];
    result[..32].copy_from_slice(left);
    result[32..].copy_from_slice(right);
    result
}

/// Serde adapter that writes a [`Bytes32`] as a `0x`-prefixed hex string.
///
/// Use with `#[serde(with = "crate::bytes::serde_hex")]`.
pub mod serde_hex {
    use super::{Bytes32, bytes32_to_hex, hex_to_bytes32};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Bytes32,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&bytes32_to_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Bytes32, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex_to_bytes32(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MerkleTreeError;

    #[test]
    fn test_hex_roundtrip() {
        let original = [0xab; 32];
        let hex = bytes32_to_hex(&original);
        assert!(hex.starts_with("0x"));
        let recovered = hex_to_bytes32(&hex).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn test_hex_without_prefix() {
        let hex = "0000000000000000000000000000000000000000000000000000000000000001";
        let bytes = hex_to_bytes32(hex).unwrap();
        assert_eq!(bytes[31], 1);
    }

    #[test]
    fn test_invalid_hex_length() {
        let result = hex_to_bytes32("0x00");
        assert!(matches!(result, Err(MerkleTreeError::InvalidNodeLength)));
    }

    #[test]
    fn test_invalid_hex_characters() {
        let result = hex_to_bytes32("0xzz");
        assert!(matches!(result, Err(MerkleTreeError::HexDecode(_))));
    }

    #[test]
    fn test_concat_keeps_order() {
        let a = [1u8; 32];
        let b = [2u8; 32];

        let ab = concat(&a, &b);
        let ba = concat(&b, &a);

        assert_eq!(&ab[..32], &a);
        assert_eq!(&ab[32..], &b);
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_to_bytes32_from_vec() {
        let vec = vec![2u8; 32];
        let bytes = vec.to_bytes32().unwrap();
        assert_eq!(bytes, [2u8; 32]);
    }

    #[test]
    fn test_to_bytes32_wrong_length() {
        let slice: &[u8] = &[1u8; 31];
        let result = slice.to_bytes32();
        assert!(matches!(result, Err(MerkleTreeError::InvalidNodeLength)));
    }

    #[test]
    fn test_to_hex_from_string() {
        let hex = "0x1".to_string();
        assert!(to_hex(&hex).is_err());

        let hex = format!("0x{}", "11".repeat(32));
        assert_eq!(to_hex(&hex).unwrap(), hex);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Digest algorithm used to compute object checksums.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// SHA-1, 20-byte digest. The format servers report on the wire.
    #[default]
    Sha1,
    /// BLAKE3, 32-byte digest.
    Blake3,
}

impl ChecksumAlgorithm {
    /// Digest length in bytes.
    pub const fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Blake3 => 32,
        }
    }

    /// Guess the algorithm from a digest length, if it matches one.
    pub fn from_digest_len(len: usize) -> Option<Self> {
        match len {
            20 => Some(Self::Sha1),
            32 => Some(Self::Blake3),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content digest of an object version, held as lowercase hex.
///
/// A checksum is for integrity reporting and lookup only. It never stands in
/// for the version's identity: two versions with identical bytes share a
/// checksum but have distinct UUIDs.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

impl Checksum {
    /// Wrap a raw digest.
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse a hex digest. Case is normalized to lowercase.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::InvalidIdentifier {
                kind: "checksum",
                value: s.to_string(),
                reason: "must not be empty",
            });
        }
        let lower = s.to_ascii_lowercase();
        if hex::decode(&lower).is_err() {
            return Err(TypeError::InvalidIdentifier {
                kind: "checksum",
                value: s.to_string(),
                reason: "not a hex digest",
            });
        }
        Ok(Self(lower))
    }

    pub fn to_hex(&self) -> &str {
        &self.0
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }

    /// The algorithm implied by the digest length, when recognizable.
    pub fn algorithm(&self) -> Option<ChecksumAlgorithm> {
        ChecksumAlgorithm::from_digest_len(self.0.len() / 2)
    }
}

impl TryFrom<String> for Checksum {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Checksum> for String {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.short_hex())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_normalizes_case() {
        let upper = Checksum::from_hex("AAF4C61DDCC5E8A2DABEDE0F3B482CD9AEA9434D").unwrap();
        let lower = Checksum::from_hex("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.algorithm(), Some(ChecksumAlgorithm::Sha1));
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(Checksum::from_hex("").is_err());
        assert!(Checksum::from_hex("xyz").is_err());
        assert!(Checksum::from_hex("abc").is_err());
    }

    #[test]
    fn from_digest_matches_hex() {
        let c = Checksum::from_digest(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(c.to_hex(), "deadbeef");
        assert_eq!(c.short_hex(), "deadbeef");
        assert_eq!(c.algorithm(), None);
    }

    #[test]
    fn algorithm_serde_names() {
        let json = serde_json::to_string(&ChecksumAlgorithm::Blake3).unwrap();
        assert_eq!(json, "\"blake3\"");
        assert_eq!(ChecksumAlgorithm::default(), ChecksumAlgorithm::Sha1);
    }
}

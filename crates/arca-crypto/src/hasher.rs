use arca_types::{Checksum, ChecksumAlgorithm};
use sha1::{Digest, Sha1};

/// Fixed-algorithm content hasher.
///
/// Unlike a domain-separated hasher, the digest covers the exact object
/// bytes and nothing else, so a checksum reported by the store can be
/// reproduced by any client with a stock `sha1sum` or `b3sum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: ChecksumAlgorithm,
}

impl ContentHasher {
    /// SHA-1 hasher. Matches the `checksum` servers report.
    pub const SHA1: Self = Self {
        algorithm: ChecksumAlgorithm::Sha1,
    };
    /// BLAKE3 hasher.
    pub const BLAKE3: Self = Self {
        algorithm: ChecksumAlgorithm::Blake3,
    };

    pub const fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash raw bytes.
    pub fn hash(&self, data: &[u8]) -> Checksum {
        match self.algorithm {
            ChecksumAlgorithm::Sha1 => {
                let mut hasher = Sha1::new();
                hasher.update(data);
                Checksum::from_digest(&hasher.finalize())
            }
            ChecksumAlgorithm::Blake3 => Checksum::from_digest(blake3::hash(data).as_bytes()),
        }
    }

    /// Verify that data produces the expected checksum.
    pub fn verify(&self, data: &[u8], expected: &Checksum) -> bool {
        self.hash(data) == *expected
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new(ChecksumAlgorithm::default())
    }
}

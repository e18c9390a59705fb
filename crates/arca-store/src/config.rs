use serde::{Deserialize, Serialize};

use arca_crypto::ContentHasher;
use arca_types::{BucketName, ChecksumAlgorithm};

use crate::error::{StoreError, StoreResult};
use crate::uuidgen::{RandomUuidGenerator, SequentialUuidGenerator, UuidGenerator};

/// How a store mints version UUIDs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum UuidStrategy {
    /// Random v4 UUIDs.
    #[default]
    Random,
    /// Counter-prefixed UUIDs from a seeded RNG; reproducible.
    Sequential { seed: u64 },
}

impl UuidStrategy {
    pub fn generator(&self) -> Box<dyn UuidGenerator> {
        match self {
            Self::Random => Box::new(RandomUuidGenerator),
            Self::Sequential { seed } => Box::new(SequentialUuidGenerator::new(*seed)),
        }
    }
}

/// Configuration for an in-memory store.
///
/// ```toml
/// default_bucket = "default"
/// checksum = "sha1"
///
/// [uuids]
/// strategy = "sequential"
/// seed = 42
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Bucket that exists from construction and after every reset.
    pub default_bucket: BucketName,
    /// Digest used for object checksums.
    pub checksum: ChecksumAlgorithm,
    pub uuids: UuidStrategy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_bucket: BucketName::default(),
            checksum: ChecksumAlgorithm::Sha1,
            uuids: UuidStrategy::Random,
        }
    }
}

impl StoreConfig {
    /// A configuration with reproducible UUIDs, for tests and demos.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            uuids: UuidStrategy::Sequential { seed },
            ..Default::default()
        }
    }

    /// Parse a TOML document. Names are validated while deserializing.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn hasher(&self) -> ContentHasher {
        ContentHasher::new(self.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.default_bucket.as_str(), "default");
        assert_eq!(c.checksum, ChecksumAlgorithm::Sha1);
        assert_eq!(c.uuids, UuidStrategy::Random);
    }

    #[test]
    fn parses_full_toml() {
        let c = StoreConfig::from_toml_str(
            r#"
            default_bucket = "media"
            checksum = "blake3"

            [uuids]
            strategy = "sequential"
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(c.default_bucket.as_str(), "media");
        assert_eq!(c.hasher(), ContentHasher::BLAKE3);
        assert_eq!(c.uuids, UuidStrategy::Sequential { seed: 42 });
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let c = StoreConfig::from_toml_str("checksum = \"sha1\"").unwrap();
        assert_eq!(c, StoreConfig::default());
    }

    #[test]
    fn empty_bucket_name_rejected() {
        let err = StoreConfig::from_toml_str("default_bucket = \"\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = StoreConfig::from_toml_str("bucket = \"x\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn deterministic_uses_sequential_uuids() {
        let c = StoreConfig::deterministic(9);
        let mut a = c.uuids.generator();
        let mut b = c.uuids.generator();
        assert_eq!(a.next_uuid(), b.next_uuid());
    }
}

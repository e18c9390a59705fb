//! Version UUID generation.
//!
//! The store never derives a version's UUID from its content. Generators are
//! pluggable so that tests can get stable, readable identifiers while
//! production uses OS randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

use arca_types::VersionUuid;

/// Source of fresh version UUIDs.
pub trait UuidGenerator: Send {
    fn next_uuid(&mut self) -> VersionUuid;
}

/// Random (v4) UUIDs from the operating system's CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomUuidGenerator;

impl UuidGenerator for RandomUuidGenerator {
    fn next_uuid(&mut self) -> VersionUuid {
        VersionUuid::from_uuid(Uuid::new_v4())
    }
}

/// Deterministic sequential+random hybrid.
///
/// The first 48 bits hold a 1-based counter, so UUIDs sort in issue order
/// and are easy to tell apart in logs (`00000000-0001-4...`,
/// `00000000-0002-4...`). The remaining bits come from an RNG seeded with
/// `seed`, making the whole sequence reproducible.
#[derive(Debug)]
pub struct SequentialUuidGenerator {
    counter: u64,
    rng: StdRng,
}

impl SequentialUuidGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            counter: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl UuidGenerator for SequentialUuidGenerator {
    fn next_uuid(&mut self) -> VersionUuid {
        self.counter += 1;
        let mut bytes = [0u8; 16];
        bytes[..6].copy_from_slice(&self.counter.to_be_bytes()[2..]);
        self.rng.fill(&mut bytes[6..]);
        VersionUuid::from_uuid(Builder::from_random_bytes(bytes).into_uuid())
    }
}

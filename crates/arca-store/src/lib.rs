//! Versioned object and collection storage for Arca.
//!
//! A store holds named buckets. Each bucket has two independent namespaces,
//! objects and collections, and every key in a namespace owns an append-only
//! chain of versions numbered 0, 1, 2, ... Versions are never rewritten: the
//! only change a version ever sees is a soft delete from `USED` to `DELETED`.
//!
//! # Entities
//!
//! - **Object versions** carry immutable content, its checksum and size.
//! - **Collection versions** carry an ordered, deduplicated list of object
//!   versions. References are checked once, at creation; a collection keeps
//!   pointing at its members even after they are deleted.
//!
//! # Storage Backends
//!
//! All backends implement the [`VersionedStore`] trait:
//!
//! - [`InMemoryStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Version numbers are dense per chain and never reused.
//! 2. A failed write leaves every chain untouched.
//! 3. Version UUIDs are generated, never derived from content.
//! 4. Only [`VersionedStore::reset`] physically removes versions.

pub mod bucket;
pub mod chain;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod integrity;
pub mod memory;
pub mod record;
pub mod traits;
pub mod uuidgen;

// Re-export primary types at crate root for ergonomic imports.
pub use bucket::{Bucket, BucketInfo};
pub use chain::Chain;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{StoreConfig, UuidStrategy};
pub use error::{StoreError, StoreResult};
pub use filter::{slice, ListQuery};
pub use memory::InMemoryStore;
pub use record::{
    CollectionAttrs, Entity, MemberRef, ObjectAttrs, ObjectContent, ObjectRef, Payload,
    VersionRecord,
};
pub use traits::VersionedStore;
pub use uuidgen::{RandomUuidGenerator, SequentialUuidGenerator, UuidGenerator};

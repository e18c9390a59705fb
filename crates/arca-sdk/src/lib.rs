//! High-level SDK for Arca.
//!
//! [`Arca`] owns a [`VersionedStore`] and hands out [`BucketHandle`]s that
//! take plain string keys and content, so callers never build a `RepoId` or
//! attribute struct by hand for the common cases.
//!
//! ```
//! use arca_sdk::{Arca, ObjectRef};
//!
//! let mut arca = Arca::in_memory();
//! let mut docs = arca.default_bucket();
//! docs.put_object("doc1", "hello")?;
//! docs.put_object("doc1", "world")?;
//! docs.put_collection("set", &[ObjectRef::latest("doc1")])?;
//!
//! assert_eq!(docs.read("doc1")?, "world");
//! # Ok::<(), arca_sdk::SdkError>(())
//! ```

pub mod client;
pub mod error;
pub mod handle;

pub use client::Arca;
pub use error::{SdkError, SdkResult};
pub use handle::BucketHandle;

// Re-export key types
pub use arca_meta::{CollectionMetadata, Metadata, ObjectMetadata, Value};
pub use arca_store::{
    BucketInfo, CollectionAttrs, InMemoryStore, ListQuery, ObjectAttrs, ObjectRef, StoreConfig,
    VersionedStore,
};
pub use arca_types::{
    BucketName, EntityKind, RepoId, Status, Tag, VersionNumber, VersionSelector, VersionUuid,
};

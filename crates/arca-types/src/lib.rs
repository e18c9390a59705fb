//! Foundation types for Arca.
//!
//! This crate provides the addressing and versioning vocabulary shared by
//! every other Arca crate: where an entity lives, which of its versions is
//! meant, and the small set of system fields every version carries.
//!
//! # Key Types
//!
//! - [`RepoId`] — Bucket name plus key; the address of one version chain
//! - [`VersionUuid`] — Generated identifier of a single version
//! - [`VersionNumber`] — 0-based ordinal of a version within its chain
//! - [`Tag`] — Optional, non-unique user label on a version
//! - [`Checksum`] — Content digest of an object version
//! - [`VersionSelector`] — One way of addressing a version (latest, uuid, number, tag, checksum)
//! - [`Status`] — `USED` or `DELETED`
//! - [`Timestamp`] — UTC instant with a fixed wire format

pub mod checksum;
pub mod error;
pub mod identity;
pub mod status;
pub mod temporal;
pub mod version;

pub use checksum::{Checksum, ChecksumAlgorithm};
pub use error::TypeError;
pub use identity::{BucketName, RepoId, Tag};
pub use status::Status;
pub use temporal::{Timestamp, TIMESTAMP_FORMAT};
pub use version::{EntityKind, VersionNumber, VersionSelector, VersionUuid};

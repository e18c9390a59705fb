//! Content hashing for Arca.
//!
//! Provides the [`ContentHasher`] used to compute the `checksum` of every
//! object version. Checksums are reported for integrity and display; they are
//! never used as version identifiers.
//!
//! All digests wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;

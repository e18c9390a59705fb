//! Metadata value model for Arca.
//!
//! Servers (and the in-memory reference store) describe every version as a
//! string-keyed JSON map. This crate freezes such a map into an immutable
//! [`Value`] tree and exposes typed accessors over it.
//!
//! # Design Rules
//!
//! 1. A raw map is deep-copied exactly once, at construction. Nothing reachable
//!    from a view can be mutated afterwards.
//! 2. Every JSON number becomes an `f64`, so `1` and `1.0` compare and hash
//!    equal.
//! 3. System fields (`uuid`, `status`, timestamps, ...) are parsed strictly and
//!    fail with a typed error.
//! 4. User metadata is opaque. Absent, empty, or malformed JSON reads as "no
//!    metadata" and never fails.

pub mod error;
pub mod fields;
pub mod metadata;
pub mod value;

pub use error::{MetaError, MetaResult};
pub use metadata::{CollectionMetadata, Metadata, ObjectMetadata};
pub use value::{Map, Value};

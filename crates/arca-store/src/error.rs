use arca_meta::MetaError;
use arca_types::{BucketName, EntityKind, TypeError, VersionSelector};

use crate::record::ObjectRef;

/// Errors from versioned store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `create_*` was called on a key that already has versions.
    #[error("{kind} {bucket}/{key} already exists")]
    AlreadyExists {
        bucket: BucketName,
        key: String,
        kind: EntityKind,
    },

    /// The chain is empty or the selector matches no version.
    #[error("{kind} {bucket}/{key}@{selector} not found")]
    NotFound {
        bucket: BucketName,
        key: String,
        kind: EntityKind,
        selector: VersionSelector,
    },

    #[error("bucket not found: {0}")]
    BucketNotFound(BucketName),

    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(BucketName),

    /// A collection member does not resolve to a live object version.
    /// Nothing was written.
    #[error("collection {bucket}/{key} references unresolvable object version {reference}")]
    DanglingReference {
        bucket: BucketName,
        key: String,
        reference: ObjectRef,
    },

    /// Bad pagination bounds or a selector that cannot apply.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Meta(#[from] MetaError),
}

impl StoreError {
    /// `true` for both missing versions and missing buckets.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::BucketNotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

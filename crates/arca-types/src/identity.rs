use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

fn require_non_empty(kind: &'static str, value: String) -> Result<String, TypeError> {
    if value.is_empty() {
        return Err(TypeError::InvalidIdentifier {
            kind,
            value,
            reason: "must not be empty",
        });
    }
    Ok(value)
}

/// Name of a bucket: the namespace holding object and collection chains.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketName(String);

impl BucketName {
    /// Validate and wrap a bucket name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        require_non_empty("bucket name", name.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The bucket every store starts with: `default`.
impl Default for BucketName {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl TryFrom<String> for BucketName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BucketName> for String {
    fn from(name: BucketName) -> Self {
        name.0
    }
}

impl AsRef<str> for BucketName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BucketName({})", self.0)
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of one version chain: a bucket plus a non-empty key.
///
/// The same `RepoId` names two independent chains, one in the object
/// namespace and one in the collection namespace; the
/// [`EntityKind`](crate::EntityKind) picks between them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoId {
    bucket: BucketName,
    key: String,
}

impl RepoId {
    /// Validate both parts and build an id.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, TypeError> {
        let bucket = BucketName::new(bucket)?;
        Self::in_bucket(&bucket, key)
    }

    /// Build an id for a key inside an already-validated bucket.
    pub fn in_bucket(bucket: &BucketName, key: impl Into<String>) -> Result<Self, TypeError> {
        let key = require_non_empty("key", key.into())?;
        Ok(Self {
            bucket: bucket.clone(),
            key,
        })
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepoId({}/{})", self.bucket, self.key)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// A user label attached to a version.
///
/// Tags are not unique: several versions of one chain may carry the same
/// tag, and lookups resolve to the earliest of them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Result<Self, TypeError> {
        require_non_empty("tag", tag.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

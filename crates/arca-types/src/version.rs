use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checksum::Checksum;
use crate::error::TypeError;
use crate::identity::Tag;

/// Generated identifier of one version.
///
/// Version UUIDs are independent of content: re-uploading identical bytes
/// yields a new UUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionUuid(Uuid);

impl VersionUuid {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the hyphenated (or simple) textual form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::MalformedUuid(s.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl fmt::Debug for VersionUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionUuid({})", self.short_id())
    }
}

impl fmt::Display for VersionUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 0-based ordinal of a version within its chain.
///
/// Ordinals are assigned at creation, strictly increase, and are never
/// reused, not even after a soft delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionNumber(u64);

impl VersionNumber {
    /// Ordinal of the first version of every chain.
    pub const FIRST: Self = Self(0);

    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The ordinal that follows this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for VersionNumber {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which namespace of a bucket a chain lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Object,
    Collection,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// One way of addressing a version inside a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionSelector {
    /// The newest version whose status is `USED`.
    #[default]
    Latest,
    Uuid(VersionUuid),
    Number(VersionNumber),
    /// The earliest version carrying this tag, whatever its status.
    Tag(Tag),
    /// The earliest object version with this checksum, whatever its status.
    Checksum(Checksum),
}

impl VersionSelector {
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl From<VersionUuid> for VersionSelector {
    fn from(uuid: VersionUuid) -> Self {
        Self::Uuid(uuid)
    }
}

impl From<VersionNumber> for VersionSelector {
    fn from(number: VersionNumber) -> Self {
        Self::Number(number)
    }
}

impl From<Tag> for VersionSelector {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<Checksum> for VersionSelector {
    fn from(checksum: Checksum) -> Self {
        Self::Checksum(checksum)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Uuid(uuid) => write!(f, "uuid:{uuid}"),
            Self::Number(n) => write!(f, "v{n}"),
            Self::Tag(tag) => write!(f, "tag:{tag}"),
            Self::Checksum(c) => write!(f, "checksum:{}", c.short_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uuid_parse_roundtrip() {
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let id = VersionUuid::parse(text).unwrap();
        assert_eq!(id.to_string(), text);
        assert_eq!(id.short_id(), "67e55044");
    }

    #[test]
    fn uuid_parse_rejects_garbage() {
        let err = VersionUuid::parse("not-a-uuid").unwrap_err();
        assert_eq!(err, TypeError::MalformedUuid("not-a-uuid".into()));
    }

    #[test]
    fn first_version_is_zero() {
        assert_eq!(VersionNumber::FIRST.get(), 0);
        assert_eq!(VersionNumber::FIRST.next(), VersionNumber::new(1));
    }

    #[test]
    fn selector_display() {
        assert_eq!(VersionSelector::Latest.to_string(), "latest");
        assert_eq!(VersionSelector::from(VersionNumber::new(3)).to_string(), "v3");
        let tag = Tag::new("stable").unwrap();
        assert_eq!(VersionSelector::from(tag).to_string(), "tag:stable");
    }

    #[test]
    fn selector_defaults_to_latest() {
        assert!(VersionSelector::default().is_latest());
    }

    #[test]
    fn kind_display() {
        assert_eq!(EntityKind::Object.to_string(), "object");
        assert_eq!(EntityKind::Collection.to_string(), "collection");
    }

    proptest! {
        #[test]
        fn next_is_strictly_greater(n in 0u64..u64::MAX) {
            let v = VersionNumber::new(n);
            prop_assert!(v.next() > v);
            prop_assert_eq!(v.next().get(), n + 1);
        }
    }
}

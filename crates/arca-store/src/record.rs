use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use arca_meta::fields;
use arca_types::{
    Checksum, EntityKind, Status, Tag, Timestamp, VersionNumber, VersionSelector, VersionUuid,
};

// ---------------------------------------------------------------------------
// Version record
// ---------------------------------------------------------------------------

/// Fields shared by every version, object or collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRecord {
    pub uuid: VersionUuid,
    pub number: VersionNumber,
    pub tag: Option<Tag>,
    pub status: Status,
    /// Set once at creation.
    pub creation_date: Timestamp,
    /// Last status change; equals `creation_date` until deleted.
    pub timestamp: Timestamp,
    /// Opaque to the store.
    pub user_metadata: Option<String>,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Immutable content of an object version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectContent {
    pub data: Bytes,
    pub checksum: Checksum,
    pub download_name: Option<String>,
    pub content_type: Option<String>,
}

/// A collection member pinned to one exact object version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub key: String,
    pub uuid: VersionUuid,
    pub number: VersionNumber,
}

/// What distinguishes an object version from a collection version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Object(ObjectContent),
    /// Deduplicated members in first-reference order.
    Collection(Vec<MemberRef>),
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One version in a chain: the shared record plus its kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    key: String,
    record: VersionRecord,
    payload: Payload,
}

impl Entity {
    pub(crate) fn new(key: String, record: VersionRecord, payload: Payload) -> Self {
        Self {
            key,
            record,
            payload,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn record(&self) -> &VersionRecord {
        &self.record
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn kind(&self) -> EntityKind {
        match self.payload {
            Payload::Object(_) => EntityKind::Object,
            Payload::Collection(_) => EntityKind::Collection,
        }
    }

    pub fn uuid(&self) -> VersionUuid {
        self.record.uuid
    }

    pub fn number(&self) -> VersionNumber {
        self.record.number
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.record.tag.as_ref()
    }

    pub fn status(&self) -> Status {
        self.record.status
    }

    pub fn is_used(&self) -> bool {
        self.record.status.is_used()
    }

    /// Object content, or `None` for a collection.
    pub fn content(&self) -> Option<&ObjectContent> {
        match &self.payload {
            Payload::Object(content) => Some(content),
            Payload::Collection(_) => None,
        }
    }

    pub fn checksum(&self) -> Option<&Checksum> {
        self.content().map(|c| &c.checksum)
    }

    /// Collection members, or `None` for an object.
    pub fn members(&self) -> Option<&[MemberRef]> {
        match &self.payload {
            Payload::Object(_) => None,
            Payload::Collection(members) => Some(members),
        }
    }

    /// Whether `selector` names this version. `Latest` never matches a
    /// single entity; it is a property of the whole chain.
    pub fn matches(&self, selector: &VersionSelector) -> bool {
        match selector {
            VersionSelector::Latest => false,
            VersionSelector::Uuid(uuid) => self.record.uuid == *uuid,
            VersionSelector::Number(n) => self.record.number == *n,
            VersionSelector::Tag(tag) => self.record.tag.as_ref() == Some(tag),
            VersionSelector::Checksum(c) => self.checksum() == Some(c),
        }
    }

    /// Flip `USED` to `DELETED` and refresh the timestamp.
    ///
    /// Returns `false`, changing nothing, if the version was already deleted.
    pub(crate) fn soft_delete(&mut self, now: Timestamp) -> bool {
        if !self.record.status.is_used() {
            return false;
        }
        self.record.status = Status::Deleted;
        self.record.timestamp = now;
        true
    }

    /// This version's wire-shaped metadata map.
    ///
    /// Collections get every field except `objects`, which needs the member
    /// versions and is filled in by the bucket.
    pub fn to_raw(&self) -> JsonMap<String, JsonValue> {
        let record = &self.record;
        let mut raw = JsonMap::new();
        raw.insert(fields::KEY.into(), JsonValue::from(self.key.as_str()));
        raw.insert(fields::UUID.into(), JsonValue::from(record.uuid.to_string()));
        raw.insert(fields::VERSION_NUMBER.into(), JsonValue::from(record.number.get()));
        if let Some(tag) = &record.tag {
            raw.insert(fields::TAG.into(), JsonValue::from(tag.as_str()));
        }
        raw.insert(fields::STATUS.into(), JsonValue::from(record.status.as_str()));
        raw.insert(fields::TIMESTAMP.into(), JsonValue::from(record.timestamp.to_wire()));
        raw.insert(
            fields::CREATION_DATE.into(),
            JsonValue::from(record.creation_date.to_wire()),
        );
        if let Some(user) = &record.user_metadata {
            raw.insert(fields::USER_METADATA.into(), JsonValue::from(user.as_str()));
        }
        if let Payload::Object(content) = &self.payload {
            raw.insert(fields::CHECKSUM.into(), JsonValue::from(content.checksum.to_hex()));
            raw.insert(fields::SIZE.into(), JsonValue::from(content.data.len() as u64));
            if let Some(name) = &content.download_name {
                raw.insert(fields::DOWNLOAD_NAME.into(), JsonValue::from(name.as_str()));
            }
            if let Some(content_type) = &content.content_type {
                raw.insert(fields::CONTENT_TYPE.into(), JsonValue::from(content_type.as_str()));
            }
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Caller-supplied attributes and references
// ---------------------------------------------------------------------------

/// Optional attributes of a new object version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectAttrs {
    pub tag: Option<Tag>,
    pub user_metadata: Option<String>,
    pub download_name: Option<String>,
    pub content_type: Option<String>,
}

impl ObjectAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_user_metadata(mut self, user_metadata: impl Into<String>) -> Self {
        self.user_metadata = Some(user_metadata.into());
        self
    }

    pub fn with_download_name(mut self, name: impl Into<String>) -> Self {
        self.download_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Optional attributes of a new collection version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionAttrs {
    pub tag: Option<Tag>,
    pub user_metadata: Option<String>,
}

impl CollectionAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_user_metadata(mut self, user_metadata: impl Into<String>) -> Self {
        self.user_metadata = Some(user_metadata.into());
        self
    }
}

/// A reference from a collection to an object version in the same bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub key: String,
    pub selector: VersionSelector,
}

impl ObjectRef {
    pub fn new(key: impl Into<String>, selector: impl Into<VersionSelector>) -> Self {
        Self {
            key: key.into(),
            selector: selector.into(),
        }
    }

    /// The newest live version of `key`, resolved when the collection is built.
    pub fn latest(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            selector: VersionSelector::Latest,
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_entity() -> Entity {
        let created = Timestamp::from_millis(1_000).unwrap();
        Entity::new(
            "doc".into(),
            VersionRecord {
                uuid: VersionUuid::parse("00000000-0001-4000-8000-000000000000").unwrap(),
                number: VersionNumber::new(3),
                tag: Some(Tag::new("draft").unwrap()),
                status: Status::Used,
                creation_date: created,
                timestamp: created,
                user_metadata: Some("{\"a\":1}".into()),
            },
            Payload::Object(ObjectContent {
                data: Bytes::from_static(b"hello"),
                checksum: Checksum::from_hex("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d").unwrap(),
                download_name: Some("hello.txt".into()),
                content_type: None,
            }),
        )
    }

    #[test]
    fn raw_uses_wire_field_names() {
        let raw = object_entity().to_raw();
        assert_eq!(raw["key"], "doc");
        assert_eq!(raw["versionNumber"], 3);
        assert_eq!(raw["tag"], "draft");
        assert_eq!(raw["status"], "USED");
        assert_eq!(raw["size"], 5);
        assert_eq!(raw["checksum"], "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
        assert_eq!(raw["downloadName"], "hello.txt");
        assert_eq!(raw["creationDate"], "1970-01-01T00:00:01.000Z");
        assert_eq!(raw["userMetadata"], "{\"a\":1}");
        assert!(!raw.contains_key("contentType"));
        assert!(!raw.contains_key("objects"));
    }

    #[test]
    fn soft_delete_is_one_way() {
        let mut entity = object_entity();
        let later = Timestamp::from_millis(5_000).unwrap();
        assert!(entity.soft_delete(later));
        assert_eq!(entity.status(), Status::Deleted);
        assert_eq!(entity.record().timestamp, later);
        assert_eq!(entity.record().creation_date.as_millis(), 1_000);

        assert!(!entity.soft_delete(Timestamp::from_millis(9_000).unwrap()));
        assert_eq!(entity.record().timestamp, later);
    }

    #[test]
    fn selector_matching() {
        let entity = object_entity();
        assert!(entity.matches(&VersionNumber::new(3).into()));
        assert!(entity.matches(&Tag::new("draft").unwrap().into()));
        assert!(entity.matches(&entity.checksum().unwrap().clone().into()));
        assert!(!entity.matches(&VersionSelector::Latest));
        assert!(!entity.matches(&VersionNumber::new(2).into()));
    }

    #[test]
    fn object_ref_display() {
        assert_eq!(ObjectRef::latest("a").to_string(), "a@latest");
        assert_eq!(ObjectRef::new("a", VersionNumber::new(1)).to_string(), "a@v1");
    }

    #[test]
    fn attrs_builders() {
        let attrs = ObjectAttrs::new()
            .with_content_type("text/plain")
            .with_user_metadata("{}");
        assert_eq!(attrs.content_type.as_deref(), Some("text/plain"));
        assert_eq!(attrs.user_metadata.as_deref(), Some("{}"));
        assert!(attrs.tag.is_none());
    }
}

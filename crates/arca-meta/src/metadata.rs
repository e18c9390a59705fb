//! Typed, immutable views over version metadata maps.
//!
//! [`Metadata`] covers the fields every version carries. [`ObjectMetadata`]
//! adds the content fields, and [`CollectionMetadata`] adds the ordered list of
//! member object records found under `objects`.

use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};
use tracing::debug;

use arca_types::{BucketName, Checksum, RepoId, Status, Tag, Timestamp, VersionNumber, VersionUuid};

use crate::error::{MetaError, MetaResult};
use crate::fields;
use crate::value::{freeze_map, Map, Value};

/// Immutable view over the system and user fields of one version.
///
/// The raw map is frozen on construction. User metadata is parsed on first
/// access and memoized.
#[derive(Clone)]
pub struct Metadata {
    fields: Arc<Map>,
    user: OnceLock<Option<Value>>,
}

impl Metadata {
    /// Freeze a raw JSON map.
    pub fn from_raw(raw: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_frozen(freeze_map(raw))
    }

    /// Freeze a raw JSON value, which must be an object.
    pub fn from_json(raw: &serde_json::Value) -> MetaResult<Self> {
        match raw {
            serde_json::Value::Object(map) => Ok(Self::from_raw(map)),
            other => Err(MetaError::WrongType {
                field: "<root>",
                expected: "map",
                found: Value::freeze(other).kind_name(),
            }),
        }
    }

    fn from_frozen(fields: Map) -> Self {
        Self {
            fields: Arc::new(fields),
            user: OnceLock::new(),
        }
    }

    /// The frozen field map, exactly as received.
    pub fn raw(&self) -> &Map {
        &self.fields
    }

    /// Any field by name; `None` when absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn key(&self) -> MetaResult<&str> {
        self.require_str(fields::KEY)
    }

    pub fn uuid(&self) -> MetaResult<VersionUuid> {
        Ok(VersionUuid::parse(self.require_str(fields::UUID)?)?)
    }

    pub fn version_number(&self) -> MetaResult<VersionNumber> {
        let n = self.require_u64(fields::VERSION_NUMBER)?;
        Ok(VersionNumber::new(n))
    }

    /// The version's tag. Absent, null, and empty strings all mean untagged.
    pub fn tag(&self) -> MetaResult<Option<Tag>> {
        match self.optional_str(fields::TAG)? {
            None | Some("") => Ok(None),
            Some(tag) => Ok(Some(Tag::new(tag)?)),
        }
    }

    pub fn status(&self) -> MetaResult<Status> {
        Ok(self.require_str(fields::STATUS)?.parse()?)
    }

    /// Last status change.
    pub fn timestamp(&self) -> MetaResult<Timestamp> {
        Ok(Timestamp::parse(self.require_str(fields::TIMESTAMP)?)?)
    }

    pub fn creation_date(&self) -> MetaResult<Timestamp> {
        Ok(Timestamp::parse(self.require_str(fields::CREATION_DATE)?)?)
    }

    /// Address of this version's chain within `bucket`.
    pub fn repo_id(&self, bucket: &BucketName) -> MetaResult<RepoId> {
        Ok(RepoId::in_bucket(bucket, self.key()?)?)
    }

    /// The opaque user-metadata string, if any.
    pub fn user_metadata_raw(&self) -> Option<&str> {
        self.fields.get(fields::USER_METADATA).and_then(Value::as_str)
    }

    /// User metadata parsed as JSON.
    ///
    /// Absent, blank, malformed, or `null` user metadata all yield `None`.
    /// This never fails: user metadata is opaque to the store and must not
    /// block reading system fields.
    pub fn user_metadata(&self) -> Option<&Value> {
        self.user
            .get_or_init(|| parse_user_metadata(self.user_metadata_raw()))
            .as_ref()
    }

    /// A copy of the field map with `userMetadata` replaced by its parsed
    /// value. The field is omitted when there is no parseable metadata.
    pub fn inline(&self) -> Value {
        Value::map(self.inline_fields())
    }

    fn inline_fields(&self) -> Map {
        let mut out = (*self.fields).clone();
        out.remove(fields::USER_METADATA);
        if let Some(user) = self.user_metadata() {
            out.insert(fields::USER_METADATA.to_string(), user.clone());
        }
        out
    }

    // ---------------------------------------------------------------
    // Field helpers
    // ---------------------------------------------------------------

    fn present(&self, field: &'static str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn require_str(&self, field: &'static str) -> MetaResult<&str> {
        self.optional_str(field)?
            .ok_or(MetaError::MissingField(field))
    }

    fn optional_str(&self, field: &'static str) -> MetaResult<Option<&str>> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_ref())),
            Some(other) => Err(MetaError::WrongType {
                field,
                expected: "string",
                found: other.kind_name(),
            }),
        }
    }

    fn require_u64(&self, field: &'static str) -> MetaResult<u64> {
        self.optional_u64(field)?
            .ok_or(MetaError::MissingField(field))
    }

    fn optional_u64(&self, field: &'static str) -> MetaResult<Option<u64>> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::Number(n)) if n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64 => {
                Ok(Some(*n as u64))
            }
            Some(other) => Err(MetaError::WrongType {
                field,
                expected: "non-negative integer",
                found: other.kind_name(),
            }),
        }
    }
}

fn parse_user_metadata(raw: Option<&str>) -> Option<Value> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Null) => None,
        Ok(parsed) => Some(Value::freeze(&parsed)),
        Err(err) => {
            debug!(error = %err, "ignoring unparseable user metadata");
            None
        }
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Metadata {}

impl std::fmt::Debug for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metadata")
            .field("key", &self.get(fields::KEY))
            .field("version", &self.get(fields::VERSION_NUMBER))
            .field("status", &self.get(fields::STATUS))
            .finish()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.as_ref().serialize(serializer)
    }
}

/// Metadata of one object version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObjectMetadata(Metadata);

impl ObjectMetadata {
    pub fn from_raw(raw: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self(Metadata::from_raw(raw))
    }

    pub fn from_json(raw: &serde_json::Value) -> MetaResult<Self> {
        Metadata::from_json(raw).map(Self)
    }

    fn from_value(value: &Value) -> MetaResult<Self> {
        match value.as_map() {
            Some(map) => Ok(Self(Metadata::from_frozen(map.clone()))),
            None => Err(MetaError::WrongType {
                field: fields::OBJECTS,
                expected: "list of maps",
                found: value.kind_name(),
            }),
        }
    }

    /// Content digest, when the server reported one.
    pub fn checksum(&self) -> MetaResult<Option<Checksum>> {
        self.0
            .optional_str(fields::CHECKSUM)?
            .map(Checksum::from_hex)
            .transpose()
            .map_err(MetaError::from)
    }

    /// Content length in bytes.
    pub fn size(&self) -> MetaResult<Option<u64>> {
        self.0.optional_u64(fields::SIZE)
    }

    pub fn download_name(&self) -> MetaResult<Option<&str>> {
        self.0.optional_str(fields::DOWNLOAD_NAME)
    }

    pub fn content_type(&self) -> MetaResult<Option<&str>> {
        self.0.optional_str(fields::CONTENT_TYPE)
    }

    /// Direct-download URL, when the backend offers one.
    pub fn reproxy_url(&self) -> MetaResult<Option<&str>> {
        self.0.optional_str(fields::REPROXY_URL)
    }

    pub fn into_inner(self) -> Metadata {
        self.0
    }
}

impl Deref for ObjectMetadata {
    type Target = Metadata;

    fn deref(&self) -> &Metadata {
        &self.0
    }
}

/// Metadata of one collection version, with its member object records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionMetadata {
    meta: Metadata,
    objects: Vec<ObjectMetadata>,
}

impl CollectionMetadata {
    /// Freeze a raw map and build the nested object records from `objects`.
    ///
    /// A missing or null `objects` field is an empty collection.
    pub fn from_raw(raw: &serde_json::Map<String, serde_json::Value>) -> MetaResult<Self> {
        Self::from_metadata(Metadata::from_raw(raw))
    }

    pub fn from_json(raw: &serde_json::Value) -> MetaResult<Self> {
        Self::from_metadata(Metadata::from_json(raw)?)
    }

    fn from_metadata(meta: Metadata) -> MetaResult<Self> {
        let objects = match meta.present(fields::OBJECTS) {
            None => Vec::new(),
            Some(Value::List(items)) => items
                .iter()
                .map(ObjectMetadata::from_value)
                .collect::<MetaResult<Vec<_>>>()?,
            Some(other) => {
                return Err(MetaError::WrongType {
                    field: fields::OBJECTS,
                    expected: "list of maps",
                    found: other.kind_name(),
                })
            }
        };
        Ok(Self { meta, objects })
    }

    /// Member object records, in collection order.
    pub fn objects(&self) -> &[ObjectMetadata] {
        &self.objects
    }

    /// Like [`Metadata::inline`], with every member object inlined too.
    pub fn inline(&self) -> Value {
        let mut out = self.meta.inline_fields();
        if out.contains_key(fields::OBJECTS) {
            let members = self.objects.iter().map(|o| o.inline()).collect();
            out.insert(fields::OBJECTS.to_string(), Value::list(members));
        }
        Value::map(out)
    }

    pub fn into_inner(self) -> Metadata {
        self.meta
    }
}

impl Deref for CollectionMetadata {
    type Target = Metadata;

    fn deref(&self) -> &Metadata {
        &self.meta
    }
}

impl Serialize for CollectionMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.meta.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object_json() -> serde_json::Value {
        json!({
            "key": "doc1",
            "uuid": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "versionNumber": 2,
            "tag": "stable",
            "status": "USED",
            "timestamp": "2024-03-01T10:00:00.250Z",
            "creationDate": "2024-03-01T09:00:00.000Z",
            "checksum": "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
            "size": 5,
            "userMetadata": "{\"a\":1}",
            "downloadName": "hello.txt",
            "contentType": "text/plain"
        })
    }

    fn object() -> ObjectMetadata {
        ObjectMetadata::from_json(&object_json()).unwrap()
    }

    #[test]
    fn system_fields_parse() {
        let meta = object();
        assert_eq!(meta.key().unwrap(), "doc1");
        assert_eq!(meta.uuid().unwrap().short_id(), "67e55044");
        assert_eq!(meta.version_number().unwrap(), VersionNumber::new(2));
        assert_eq!(meta.tag().unwrap().unwrap().as_str(), "stable");
        assert_eq!(meta.status().unwrap(), Status::Used);
        assert_eq!(meta.timestamp().unwrap().to_wire(), "2024-03-01T10:00:00.250Z");
        assert!(meta.creation_date().unwrap() < meta.timestamp().unwrap());
    }

    #[test]
    fn object_fields_parse() {
        let meta = object();
        assert_eq!(
            meta.checksum().unwrap().unwrap().to_hex(),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert_eq!(meta.size().unwrap(), Some(5));
        assert_eq!(meta.download_name().unwrap(), Some("hello.txt"));
        assert_eq!(meta.content_type().unwrap(), Some("text/plain"));
        assert_eq!(meta.reproxy_url().unwrap(), None);
    }

    #[test]
    fn user_metadata_numbers_normalize() {
        let meta = object();
        let expected = Value::freeze(&json!({"a": 1.0}));
        assert_eq!(meta.user_metadata(), Some(&expected));
        assert_eq!(meta.user_metadata_raw(), Some("{\"a\":1}"));
    }

    #[test]
    fn malformed_user_metadata_is_none() {
        for raw in [json!("{not json"), json!(""), json!("   "), json!("null"), json!(null)] {
            let mut doc = object_json();
            doc["userMetadata"] = raw.clone();
            let meta = Metadata::from_json(&doc).unwrap();
            assert!(meta.user_metadata().is_none(), "parsed {raw}");
            // System fields stay readable.
            assert_eq!(meta.key().unwrap(), "doc1");
        }
    }

    #[test]
    fn absent_user_metadata_is_none() {
        let mut doc = object_json();
        doc.as_object_mut().unwrap().remove("userMetadata");
        let meta = Metadata::from_json(&doc).unwrap();
        assert!(meta.user_metadata_raw().is_none());
        assert!(meta.user_metadata().is_none());
    }

    #[test]
    fn inline_substitutes_parsed_metadata() {
        let inline = object().inline();
        assert_eq!(inline.get("userMetadata"), Some(&Value::freeze(&json!({"a": 1}))));
        assert_eq!(inline.get("key").and_then(Value::as_str), Some("doc1"));
    }

    #[test]
    fn inline_omits_unparseable_metadata() {
        let mut doc = object_json();
        doc["userMetadata"] = json!("garbage");
        let inline = Metadata::from_json(&doc).unwrap().inline();
        assert!(inline.get("userMetadata").is_none());
    }

    #[test]
    fn bad_uuid_is_typed_error() {
        let mut doc = object_json();
        doc["uuid"] = json!("nope");
        let err = Metadata::from_json(&doc).unwrap().uuid().unwrap_err();
        assert!(matches!(err, MetaError::Type(arca_types::TypeError::MalformedUuid(_))));
    }

    #[test]
    fn bad_timestamp_is_typed_error() {
        let mut doc = object_json();
        doc["timestamp"] = json!("March 1st");
        let err = Metadata::from_json(&doc).unwrap().timestamp().unwrap_err();
        assert!(matches!(err, MetaError::Type(arca_types::TypeError::MalformedTimestamp(_))));
    }

    #[test]
    fn unknown_status_is_typed_error() {
        let mut doc = object_json();
        doc["status"] = json!("ARCHIVED");
        let err = Metadata::from_json(&doc).unwrap().status().unwrap_err();
        assert!(matches!(err, MetaError::Type(arca_types::TypeError::UnknownStatus(_))));
    }

    #[test]
    fn missing_and_mistyped_fields() {
        let meta = Metadata::from_json(&json!({"key": 7})).unwrap();
        assert!(matches!(
            meta.key(),
            Err(MetaError::WrongType { field: "key", .. })
        ));
        assert_eq!(meta.uuid().unwrap_err(), MetaError::MissingField("uuid"));

        let meta = Metadata::from_json(&json!({"versionNumber": 1.5})).unwrap();
        assert!(matches!(
            meta.version_number(),
            Err(MetaError::WrongType { .. })
        ));
    }

    #[test]
    fn empty_tag_is_untagged() {
        let meta = Metadata::from_json(&json!({"tag": ""})).unwrap();
        assert_eq!(meta.tag().unwrap(), None);
        let meta = Metadata::from_json(&json!({})).unwrap();
        assert_eq!(meta.tag().unwrap(), None);
    }

    #[test]
    fn non_object_root_rejected() {
        let err = Metadata::from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, MetaError::WrongType { found: "list", .. }));
    }

    #[test]
    fn view_is_independent_of_source() {
        let mut doc = object_json();
        let meta = Metadata::from_json(&doc).unwrap();
        doc["key"] = json!("changed");
        assert_eq!(meta.key().unwrap(), "doc1");
    }

    #[test]
    fn collection_nests_objects_in_order() {
        let doc = json!({
            "key": "c1",
            "uuid": "00000000-0000-4000-8000-000000000001",
            "versionNumber": 0,
            "status": "USED",
            "objects": [
                {"key": "b", "versionNumber": 1},
                {"key": "a", "versionNumber": 0, "userMetadata": "[true]"}
            ]
        });
        let coll = CollectionMetadata::from_json(&doc).unwrap();
        let keys: Vec<_> = coll.objects().iter().map(|o| o.key().unwrap()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(coll.key().unwrap(), "c1");

        let inline = coll.inline();
        let members = inline.get("objects").and_then(Value::as_list).unwrap();
        assert_eq!(
            members[1].get("userMetadata"),
            Some(&Value::freeze(&json!([true])))
        );
    }

    #[test]
    fn collection_without_objects_is_empty() {
        let coll = CollectionMetadata::from_json(&json!({"key": "c"})).unwrap();
        assert!(coll.objects().is_empty());
    }

    #[test]
    fn collection_objects_must_be_maps() {
        let err = CollectionMetadata::from_json(&json!({"objects": [1]})).unwrap_err();
        assert!(matches!(err, MetaError::WrongType { field: "objects", .. }));
        let err = CollectionMetadata::from_json(&json!({"objects": "x"})).unwrap_err();
        assert!(matches!(err, MetaError::WrongType { field: "objects", .. }));
    }

    #[test]
    fn serializes_raw_fields() {
        let meta = Metadata::from_json(&json!({"key": "k", "versionNumber": 3})).unwrap();
        let text = serde_json::to_string(&meta).unwrap();
        assert_eq!(text, "{\"key\":\"k\",\"versionNumber\":3.0}");
    }
}

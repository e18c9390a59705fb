use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use arca_meta::fields;
use arca_types::{BucketName, EntityKind, Timestamp, VersionSelector};

use crate::chain::Chain;
use crate::record::{Entity, Payload};

/// One namespace of the store: independent object and collection chains
/// keyed by string, plus a per-kind log of every append in creation order.
#[derive(Clone, Debug)]
pub struct Bucket {
    name: BucketName,
    creation_date: Timestamp,
    objects: BTreeMap<String, Chain>,
    collections: BTreeMap<String, Chain>,
    object_log: Vec<(String, usize)>,
    collection_log: Vec<(String, usize)>,
}

/// Summary of a bucket returned by bucket-level operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    pub name: BucketName,
    pub creation_date: Timestamp,
    pub object_keys: usize,
    pub collection_keys: usize,
}

impl Bucket {
    pub fn new(name: BucketName, creation_date: Timestamp) -> Self {
        Self {
            name,
            creation_date,
            objects: BTreeMap::new(),
            collections: BTreeMap::new(),
            object_log: Vec::new(),
            collection_log: Vec::new(),
        }
    }

    pub fn name(&self) -> &BucketName {
        &self.name
    }

    pub fn creation_date(&self) -> Timestamp {
        self.creation_date
    }

    fn chains(&self, kind: EntityKind) -> &BTreeMap<String, Chain> {
        match kind {
            EntityKind::Object => &self.objects,
            EntityKind::Collection => &self.collections,
        }
    }

    /// The chain for `key`, if it has ever had a version.
    pub fn chain(&self, kind: EntityKind, key: &str) -> Option<&Chain> {
        self.chains(kind).get(key)
    }

    pub(crate) fn chain_mut(&mut self, kind: EntityKind, key: &str) -> Option<&mut Chain> {
        match kind {
            EntityKind::Object => self.objects.get_mut(key),
            EntityKind::Collection => self.collections.get_mut(key),
        }
    }

    /// Number of versions stored under `key`, deleted ones included.
    pub fn version_count(&self, kind: EntityKind, key: &str) -> usize {
        self.chain(kind, key).map_or(0, Chain::len)
    }

    /// Append a version to its chain, creating the chain on first use.
    pub(crate) fn append(&mut self, entity: Entity) -> &Entity {
        let kind = entity.kind();
        let key = entity.key().to_string();
        let (chains, log) = match kind {
            EntityKind::Object => (&mut self.objects, &mut self.object_log),
            EntityKind::Collection => (&mut self.collections, &mut self.collection_log),
        };
        let chain = chains.entry(key.clone()).or_default();
        let index = chain.push(entity);
        log.push((key, index));
        &chain.as_slice()[index]
    }

    /// Every version of `kind` in this bucket, in creation order.
    pub fn log(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        let (chains, log) = match kind {
            EntityKind::Object => (&self.objects, &self.object_log),
            EntityKind::Collection => (&self.collections, &self.collection_log),
        };
        log.iter()
            .filter_map(move |(key, index)| chains.get(key).and_then(|c| c.get(*index)))
    }

    /// Keys with at least one version, sorted.
    pub fn keys(&self, kind: EntityKind) -> impl Iterator<Item = &str> + '_ {
        self.chains(kind).keys().map(String::as_str)
    }

    pub fn info(&self) -> BucketInfo {
        BucketInfo {
            name: self.name.clone(),
            creation_date: self.creation_date,
            object_keys: self.objects.len(),
            collection_keys: self.collections.len(),
        }
    }

    /// Wire-shaped metadata for `entity`. Collections get an `objects` list
    /// built from the pinned member versions, whatever their current status.
    pub fn raw_metadata(&self, entity: &Entity) -> JsonMap<String, JsonValue> {
        let mut raw = entity.to_raw();
        if let Payload::Collection(members) = entity.payload() {
            let objects = members
                .iter()
                .filter_map(|m| {
                    self.chain(EntityKind::Object, &m.key)
                        .and_then(|c| c.find(&VersionSelector::Uuid(m.uuid)))
                })
                .map(|object| JsonValue::Object(object.to_raw()))
                .collect();
            raw.insert(fields::OBJECTS.into(), JsonValue::Array(objects));
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MemberRef, ObjectContent, VersionRecord};
    use arca_types::{Checksum, Status, VersionNumber, VersionUuid};
    use bytes::Bytes;
    use uuid::Uuid;

    fn record(bucket: &Bucket, kind: EntityKind, key: &str, id: u128) -> VersionRecord {
        let number = bucket
            .chain(kind, key)
            .map_or(VersionNumber::FIRST, Chain::next_number);
        VersionRecord {
            uuid: VersionUuid::from_uuid(Uuid::from_u128(id)),
            number,
            tag: None,
            status: Status::Used,
            creation_date: Timestamp::epoch(),
            timestamp: Timestamp::epoch(),
            user_metadata: None,
        }
    }

    fn object(bucket: &Bucket, key: &str, id: u128) -> Entity {
        Entity::new(
            key.into(),
            record(bucket, EntityKind::Object, key, id),
            Payload::Object(ObjectContent {
                data: Bytes::from_static(b"x"),
                checksum: Checksum::from_digest(&[0u8; 20]),
                download_name: None,
                content_type: None,
            }),
        )
    }

    fn bucket() -> Bucket {
        Bucket::new(BucketName::new("b").unwrap(), Timestamp::epoch())
    }

    #[test]
    fn log_interleaves_keys_in_creation_order() {
        let mut b = bucket();
        for (key, id) in [("a", 1), ("b", 2), ("a", 3)] {
            let e = object(&b, key, id);
            b.append(e);
        }
        let seen: Vec<(String, u64)> = b
            .log(EntityKind::Object)
            .map(|e| (e.key().to_string(), e.number().get()))
            .collect();
        assert_eq!(
            seen,
            [("a".to_string(), 0), ("b".to_string(), 0), ("a".to_string(), 1)]
        );
        assert_eq!(b.log(EntityKind::Collection).count(), 0);
        assert_eq!(b.keys(EntityKind::Object).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn namespaces_are_independent() {
        let mut b = bucket();
        let e = object(&b, "same", 1);
        b.append(e);
        assert_eq!(b.version_count(EntityKind::Object, "same"), 1);
        assert_eq!(b.version_count(EntityKind::Collection, "same"), 0);

        let info = b.info();
        assert_eq!(info.object_keys, 1);
        assert_eq!(info.collection_keys, 0);
    }

    #[test]
    fn collection_raw_embeds_members() {
        let mut b = bucket();
        let e = object(&b, "doc", 7);
        let member = {
            let stored = b.append(e);
            MemberRef {
                key: stored.key().into(),
                uuid: stored.uuid(),
                number: stored.number(),
            }
        };
        let c = Entity::new(
            "c".into(),
            record(&b, EntityKind::Collection, "c", 8),
            Payload::Collection(vec![member]),
        );
        let collection = b.append(c).clone();
        let raw = b.raw_metadata(&collection);
        let objects = raw["objects"].as_array().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["key"], "doc");
        assert!(!raw.contains_key("checksum"));
    }
}

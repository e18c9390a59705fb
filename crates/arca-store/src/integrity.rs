//! Collection membership checks.
//!
//! A collection version may only reference object versions that exist and
//! are `USED` at the moment the collection version is created. Resolved
//! members are pinned by UUID; later deletes of those objects do not touch
//! the collection.

use std::collections::HashSet;

use tracing::warn;

use arca_types::EntityKind;

use crate::bucket::Bucket;
use crate::error::{StoreError, StoreResult};
use crate::record::{MemberRef, ObjectRef};

/// Resolve every reference of collection `key` against `bucket`.
///
/// Fails on the first reference that names no live object version. The
/// result is deduplicated by pinned version, in first-reference order.
pub fn resolve_members(
    bucket: &Bucket,
    key: &str,
    references: &[ObjectRef],
) -> StoreResult<Vec<MemberRef>> {
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(references.len());

    for reference in references {
        let target = bucket
            .chain(EntityKind::Object, &reference.key)
            .and_then(|chain| chain.find(&reference.selector))
            .filter(|object| object.is_used());

        let Some(object) = target else {
            warn!(
                bucket = %bucket.name(),
                collection = key,
                reference = %reference,
                "dangling collection reference"
            );
            return Err(StoreError::DanglingReference {
                bucket: bucket.name().clone(),
                key: key.to_string(),
                reference: reference.clone(),
            });
        };

        if seen.insert(object.uuid()) {
            members.push(MemberRef {
                key: object.key().to_string(),
                uuid: object.uuid(),
                number: object.number(),
            });
        }
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Entity, ObjectContent, Payload, VersionRecord};
    use arca_types::{BucketName, Checksum, Status, Tag, Timestamp, VersionNumber, VersionUuid};
    use bytes::Bytes;
    use uuid::Uuid;

    fn add_object(bucket: &mut Bucket, key: &str, id: u128, tag: Option<&str>) {
        let number = bucket
            .chain(EntityKind::Object, key)
            .map_or(VersionNumber::FIRST, |c| c.next_number());
        bucket.append(Entity::new(
            key.into(),
            VersionRecord {
                uuid: VersionUuid::from_uuid(Uuid::from_u128(id)),
                number,
                tag: tag.map(|t| Tag::new(t).unwrap()),
                status: Status::Used,
                creation_date: Timestamp::epoch(),
                timestamp: Timestamp::epoch(),
                user_metadata: None,
            },
            Payload::Object(ObjectContent {
                data: Bytes::new(),
                checksum: Checksum::from_digest(&[id as u8; 20]),
                download_name: None,
                content_type: None,
            }),
        ));
    }

    fn fixture() -> Bucket {
        let mut bucket = Bucket::new(BucketName::new("b").unwrap(), Timestamp::epoch());
        add_object(&mut bucket, "doc", 1, Some("old"));
        add_object(&mut bucket, "doc", 2, None);
        add_object(&mut bucket, "img", 3, None);
        bucket
    }

    #[test]
    fn resolves_and_pins() {
        let bucket = fixture();
        let members = resolve_members(
            &bucket,
            "c",
            &[ObjectRef::latest("doc"), ObjectRef::latest("img")],
        )
        .unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].key, "doc");
        assert_eq!(members[0].number, VersionNumber::new(1));
        assert_eq!(members[1].key, "img");
    }

    #[test]
    fn duplicates_collapse_in_first_order() {
        let bucket = fixture();
        let members = resolve_members(
            &bucket,
            "c",
            &[
                ObjectRef::new("img", VersionNumber::new(0)),
                ObjectRef::latest("doc"),
                ObjectRef::new("doc", VersionNumber::new(1)),
                ObjectRef::latest("img"),
            ],
        )
        .unwrap();
        let keys: Vec<&str> = members.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["img", "doc"]);
    }

    #[test]
    fn missing_key_is_dangling() {
        let bucket = fixture();
        let err = resolve_members(
            &bucket,
            "c",
            &[ObjectRef::latest("doc"), ObjectRef::latest("nope")],
        )
        .unwrap_err();
        match err {
            StoreError::DanglingReference { key, reference, .. } => {
                assert_eq!(key, "c");
                assert_eq!(reference, ObjectRef::latest("nope"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn deleted_target_is_dangling() {
        let mut bucket = fixture();
        bucket
            .chain_mut(EntityKind::Object, "doc")
            .unwrap()
            .find_mut(&Tag::new("old").unwrap().into())
            .unwrap()
            .soft_delete(Timestamp::epoch());

        let by_tag = ObjectRef::new("doc", Tag::new("old").unwrap());
        assert!(matches!(
            resolve_members(&bucket, "c", &[by_tag]),
            Err(StoreError::DanglingReference { .. })
        ));
        assert!(resolve_members(&bucket, "c", &[ObjectRef::latest("doc")]).is_ok());
    }

    #[test]
    fn empty_reference_list_is_fine() {
        assert!(resolve_members(&fixture(), "c", &[]).unwrap().is_empty());
    }
}

use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::{debug, info};

use arca_crypto::ContentHasher;
use arca_meta::{CollectionMetadata, ObjectMetadata};
use arca_types::{BucketName, EntityKind, RepoId, Status, VersionNumber, VersionSelector};

use crate::bucket::{Bucket, BucketInfo};
use crate::chain::Chain;
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::filter::{slice, ListQuery};
use crate::integrity::resolve_members;
use crate::record::{
    CollectionAttrs, Entity, ObjectAttrs, ObjectContent, ObjectRef, Payload, VersionRecord,
};
use crate::traits::VersionedStore;
use crate::uuidgen::UuidGenerator;

/// In-memory, `BTreeMap`-based versioned store.
///
/// The reference implementation of [`VersionedStore`], intended for tests and
/// embedding. Access is single-threaded: mutations take `&mut self`, so the
/// borrow checker rules out concurrent writers and no locking is needed.
/// Content is held as [`Bytes`] and shared on read.
pub struct InMemoryStore {
    default_bucket: BucketName,
    hasher: ContentHasher,
    uuids: Box<dyn UuidGenerator>,
    clock: Box<dyn Clock>,
    buckets: BTreeMap<BucketName, Bucket>,
}

impl InMemoryStore {
    /// A store with the default configuration: one bucket named `default`,
    /// SHA-1 checksums and random UUIDs.
    pub fn new() -> Self {
        Self::from_config(StoreConfig::default())
    }

    pub fn from_config(config: StoreConfig) -> Self {
        let mut clock: Box<dyn Clock> = Box::new(SystemClock);
        let buckets = fresh_buckets(&config.default_bucket, clock.as_mut());
        Self {
            hasher: config.hasher(),
            uuids: config.uuids.generator(),
            default_bucket: config.default_bucket,
            clock,
            buckets,
        }
    }

    /// Replace the UUID generator.
    pub fn with_uuid_generator(mut self, uuids: impl UuidGenerator + 'static) -> Self {
        self.uuids = Box::new(uuids);
        self
    }

    /// Replace the clock. All buckets are recreated so that their creation
    /// dates come from the new clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self.buckets = fresh_buckets(&self.default_bucket, self.clock.as_mut());
        self
    }

    pub fn hasher(&self) -> ContentHasher {
        self.hasher
    }

    /// Direct read access to a bucket's chains.
    pub fn bucket(&self, name: &BucketName) -> StoreResult<&Bucket> {
        self.buckets
            .get(name)
            .ok_or_else(|| StoreError::BucketNotFound(name.clone()))
    }

    fn resolve(
        &self,
        id: &RepoId,
        kind: EntityKind,
        selector: &VersionSelector,
    ) -> StoreResult<(&Bucket, &Entity)> {
        check_selector(kind, selector)?;
        let bucket = self.bucket(id.bucket())?;
        bucket
            .chain(kind, id.key())
            .and_then(|chain| chain.find(selector))
            .map(|entity| (bucket, entity))
            .ok_or_else(|| not_found(id, kind, selector))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionedStore for InMemoryStore {
    fn default_bucket(&self) -> &BucketName {
        &self.default_bucket
    }

    fn create_bucket(&mut self, name: &BucketName) -> StoreResult<BucketInfo> {
        if self.buckets.contains_key(name) {
            return Err(StoreError::BucketAlreadyExists(name.clone()));
        }
        let bucket = Bucket::new(name.clone(), self.clock.now());
        let info = bucket.info();
        self.buckets.insert(name.clone(), bucket);
        info!(bucket = %name, "created bucket");
        Ok(info)
    }

    fn get_bucket(&self, name: &BucketName) -> StoreResult<BucketInfo> {
        self.bucket(name).map(Bucket::info)
    }

    fn list_buckets(&self) -> Vec<BucketInfo> {
        self.buckets.values().map(Bucket::info).collect()
    }

    fn version_count(&self, id: &RepoId, kind: EntityKind) -> StoreResult<usize> {
        Ok(self.bucket(id.bucket())?.version_count(kind, id.key()))
    }

    fn auto_create_object(
        &mut self,
        id: &RepoId,
        content: Bytes,
        attrs: ObjectAttrs,
    ) -> StoreResult<ObjectMetadata> {
        let bucket = self
            .buckets
            .get_mut(id.bucket())
            .ok_or_else(|| StoreError::BucketNotFound(id.bucket().clone()))?;

        let checksum = self.hasher.hash(&content);
        let number = next_number(bucket, EntityKind::Object, id.key());
        let uuid = self.uuids.next_uuid();
        let now = self.clock.now();

        let entity = Entity::new(
            id.key().to_string(),
            VersionRecord {
                uuid,
                number,
                tag: attrs.tag,
                status: Status::Used,
                creation_date: now,
                timestamp: now,
                user_metadata: attrs.user_metadata,
            },
            Payload::Object(ObjectContent {
                data: content,
                checksum,
                download_name: attrs.download_name,
                content_type: attrs.content_type,
            }),
        );
        let raw = entity.to_raw();
        bucket.append(entity);

        debug!(%id, %number, uuid = %uuid.short_id(), "appended object version");
        Ok(ObjectMetadata::from_raw(&raw))
    }

    fn auto_create_collection(
        &mut self,
        id: &RepoId,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> StoreResult<CollectionMetadata> {
        let bucket = self
            .buckets
            .get_mut(id.bucket())
            .ok_or_else(|| StoreError::BucketNotFound(id.bucket().clone()))?;

        // Nothing is consumed from the generator or clock unless every
        // reference resolves.
        let members = resolve_members(bucket, id.key(), members)?;
        let number = next_number(bucket, EntityKind::Collection, id.key());
        let uuid = self.uuids.next_uuid();
        let now = self.clock.now();

        let entity = Entity::new(
            id.key().to_string(),
            VersionRecord {
                uuid,
                number,
                tag: attrs.tag,
                status: Status::Used,
                creation_date: now,
                timestamp: now,
                user_metadata: attrs.user_metadata,
            },
            Payload::Collection(members),
        );
        let raw = bucket.raw_metadata(&entity);
        bucket.append(entity);

        debug!(%id, %number, uuid = %uuid.short_id(), "appended collection version");
        Ok(CollectionMetadata::from_raw(&raw)?)
    }

    fn get_object(&self, id: &RepoId, selector: &VersionSelector) -> StoreResult<ObjectMetadata> {
        let (_, entity) = self.resolve(id, EntityKind::Object, selector)?;
        Ok(ObjectMetadata::from_raw(&entity.to_raw()))
    }

    fn get_content(&self, id: &RepoId, selector: &VersionSelector) -> StoreResult<Bytes> {
        let (_, entity) = self.resolve(id, EntityKind::Object, selector)?;
        entity
            .content()
            .map(|c| c.data.clone())
            .ok_or_else(|| not_found(id, EntityKind::Object, selector))
    }

    fn get_collection(
        &self,
        id: &RepoId,
        selector: &VersionSelector,
    ) -> StoreResult<CollectionMetadata> {
        let (bucket, entity) = self.resolve(id, EntityKind::Collection, selector)?;
        Ok(CollectionMetadata::from_raw(&bucket.raw_metadata(entity))?)
    }

    fn delete(
        &mut self,
        id: &RepoId,
        kind: EntityKind,
        selector: &VersionSelector,
    ) -> StoreResult<bool> {
        check_selector(kind, selector)?;
        let chain = self
            .buckets
            .get_mut(id.bucket())
            .ok_or_else(|| StoreError::BucketNotFound(id.bucket().clone()))?
            .chain_mut(kind, id.key())
            .ok_or_else(|| not_found(id, kind, selector))?;

        let entity = match chain.find_mut(selector) {
            Some(entity) => entity,
            // A chain whose versions are all deleted has no latest one left
            // to delete.
            None if selector.is_latest() => return Ok(false),
            None => return Err(not_found(id, kind, selector)),
        };
        if !entity.is_used() {
            return Ok(false);
        }

        let deleted = entity.soft_delete(self.clock.now());
        debug!(%id, %kind, number = %entity.number(), "soft-deleted version");
        Ok(deleted)
    }

    fn list_objects(
        &self,
        bucket: &BucketName,
        query: &ListQuery,
    ) -> StoreResult<Vec<ObjectMetadata>> {
        let bucket = self.bucket(bucket)?;
        Ok(slice(bucket.log(EntityKind::Object), query)
            .into_iter()
            .map(|e| ObjectMetadata::from_raw(&e.to_raw()))
            .collect())
    }

    fn list_object_versions(
        &self,
        id: &RepoId,
        query: &ListQuery,
    ) -> StoreResult<Vec<ObjectMetadata>> {
        let bucket = self.bucket(id.bucket())?;
        let Some(chain) = bucket.chain(EntityKind::Object, id.key()) else {
            return Ok(Vec::new());
        };
        Ok(slice(chain, query)
            .into_iter()
            .map(|e| ObjectMetadata::from_raw(&e.to_raw()))
            .collect())
    }

    fn list_collections(
        &self,
        bucket: &BucketName,
        query: &ListQuery,
    ) -> StoreResult<Vec<CollectionMetadata>> {
        let bucket = self.bucket(bucket)?;
        slice(bucket.log(EntityKind::Collection), query)
            .into_iter()
            .map(|e| CollectionMetadata::from_raw(&bucket.raw_metadata(e)).map_err(StoreError::from))
            .collect()
    }

    fn list_collection_versions(
        &self,
        id: &RepoId,
        query: &ListQuery,
    ) -> StoreResult<Vec<CollectionMetadata>> {
        let bucket = self.bucket(id.bucket())?;
        let Some(chain) = bucket.chain(EntityKind::Collection, id.key()) else {
            return Ok(Vec::new());
        };
        slice(chain, query)
            .into_iter()
            .map(|e| CollectionMetadata::from_raw(&bucket.raw_metadata(e)).map_err(StoreError::from))
            .collect()
    }

    fn reset(&mut self) {
        let dropped = self.buckets.len();
        self.buckets = fresh_buckets(&self.default_bucket, self.clock.as_mut());
        info!(dropped, default_bucket = %self.default_bucket, "store reset");
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("default_bucket", &self.default_bucket)
            .field("hasher", &self.hasher)
            .field("bucket_count", &self.buckets.len())
            .finish()
    }
}

fn fresh_buckets(default_bucket: &BucketName, clock: &mut dyn Clock) -> BTreeMap<BucketName, Bucket> {
    let mut buckets = BTreeMap::new();
    buckets.insert(
        default_bucket.clone(),
        Bucket::new(default_bucket.clone(), clock.now()),
    );
    buckets
}

fn next_number(bucket: &Bucket, kind: EntityKind, key: &str) -> VersionNumber {
    bucket
        .chain(kind, key)
        .map_or(VersionNumber::FIRST, Chain::next_number)
}

/// Collections have no content, so there is nothing to match a checksum on.
fn check_selector(kind: EntityKind, selector: &VersionSelector) -> StoreResult<()> {
    if kind == EntityKind::Collection && matches!(selector, VersionSelector::Checksum(_)) {
        return Err(StoreError::InvalidArgument(format!(
            "collections cannot be selected by checksum ({selector})"
        )));
    }
    Ok(())
}

fn not_found(id: &RepoId, kind: EntityKind, selector: &VersionSelector) -> StoreError {
    StoreError::NotFound {
        bucket: id.bucket().clone(),
        key: id.key().to_string(),
        kind,
        selector: selector.clone(),
    }
}

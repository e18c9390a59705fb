use bytes::Bytes;

use arca_meta::{CollectionMetadata, ObjectMetadata};
use arca_types::{BucketName, EntityKind, RepoId, VersionSelector};

use crate::bucket::BucketInfo;
use crate::error::{StoreError, StoreResult};
use crate::filter::ListQuery;
use crate::record::{CollectionAttrs, ObjectAttrs, ObjectRef};

/// Versioned object and collection store.
///
/// All implementations must satisfy these invariants:
/// - Chains are append-only. Version numbers start at 0 per key and namespace,
///   grow by one per append, and are never reused.
/// - The only mutation of an existing version is `USED` → `DELETED` together
///   with its timestamp. Nothing is physically removed except by [`reset`].
/// - A collection version is appended only if every reference resolves to a
///   `USED` object version; otherwise nothing is written.
/// - Every operation naming an unknown bucket fails with
///   [`StoreError::BucketNotFound`].
///
/// Implementors provide the `auto_create_*` primitives; `create_*` and
/// `version_*` are layered on top with their existence checks.
///
/// [`reset`]: VersionedStore::reset
pub trait VersionedStore: Send {
    /// The bucket that exists from construction and after every reset.
    fn default_bucket(&self) -> &BucketName;

    /// Create an empty bucket.
    fn create_bucket(&mut self, name: &BucketName) -> StoreResult<BucketInfo>;

    fn get_bucket(&self, name: &BucketName) -> StoreResult<BucketInfo>;

    /// All buckets, sorted by name.
    fn list_buckets(&self) -> Vec<BucketInfo>;

    /// Versions stored under `id` in the `kind` namespace, deleted included.
    fn version_count(&self, id: &RepoId, kind: EntityKind) -> StoreResult<usize>;

    /// Append a new object version, starting the chain if needed.
    fn auto_create_object(
        &mut self,
        id: &RepoId,
        content: Bytes,
        attrs: ObjectAttrs,
    ) -> StoreResult<ObjectMetadata>;

    /// Append a new collection version, starting the chain if needed.
    ///
    /// Fails with [`StoreError::DanglingReference`] if any reference does not
    /// resolve to a `USED` object version in the same bucket.
    fn auto_create_collection(
        &mut self,
        id: &RepoId,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> StoreResult<CollectionMetadata>;

    fn get_object(&self, id: &RepoId, selector: &VersionSelector) -> StoreResult<ObjectMetadata>;

    /// The exact bytes stored for an object version.
    fn get_content(&self, id: &RepoId, selector: &VersionSelector) -> StoreResult<Bytes>;

    /// A collection version with its pinned members materialized, whatever
    /// their current status.
    fn get_collection(
        &self,
        id: &RepoId,
        selector: &VersionSelector,
    ) -> StoreResult<CollectionMetadata>;

    /// Soft-delete the version `selector` resolves to.
    ///
    /// Returns `Ok(false)` if that version was already deleted. With
    /// [`VersionSelector::Latest`] the newest `USED` version is deleted, and
    /// `Ok(false)` means none was left.
    fn delete(
        &mut self,
        id: &RepoId,
        kind: EntityKind,
        selector: &VersionSelector,
    ) -> StoreResult<bool>;

    /// Object versions of every key in a bucket, in creation order.
    fn list_objects(&self, bucket: &BucketName, query: &ListQuery)
        -> StoreResult<Vec<ObjectMetadata>>;

    /// Versions of one object chain, oldest first.
    fn list_object_versions(
        &self,
        id: &RepoId,
        query: &ListQuery,
    ) -> StoreResult<Vec<ObjectMetadata>>;

    fn list_collections(
        &self,
        bucket: &BucketName,
        query: &ListQuery,
    ) -> StoreResult<Vec<CollectionMetadata>>;

    fn list_collection_versions(
        &self,
        id: &RepoId,
        query: &ListQuery,
    ) -> StoreResult<Vec<CollectionMetadata>>;

    /// Drop every bucket and start over with an empty default bucket.
    fn reset(&mut self);

    /// Start a new object chain. Fails if `id` already has object versions.
    fn create_object(
        &mut self,
        id: &RepoId,
        content: Bytes,
        attrs: ObjectAttrs,
    ) -> StoreResult<ObjectMetadata> {
        if self.version_count(id, EntityKind::Object)? > 0 {
            return Err(already_exists(id, EntityKind::Object));
        }
        self.auto_create_object(id, content, attrs)
    }

    /// Append to an existing object chain. Fails if `id` has no versions.
    fn version_object(
        &mut self,
        id: &RepoId,
        content: Bytes,
        attrs: ObjectAttrs,
    ) -> StoreResult<ObjectMetadata> {
        if self.version_count(id, EntityKind::Object)? == 0 {
            return Err(missing_chain(id, EntityKind::Object));
        }
        self.auto_create_object(id, content, attrs)
    }

    fn create_collection(
        &mut self,
        id: &RepoId,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> StoreResult<CollectionMetadata> {
        if self.version_count(id, EntityKind::Collection)? > 0 {
            return Err(already_exists(id, EntityKind::Collection));
        }
        self.auto_create_collection(id, members, attrs)
    }

    fn version_collection(
        &mut self,
        id: &RepoId,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> StoreResult<CollectionMetadata> {
        if self.version_count(id, EntityKind::Collection)? == 0 {
            return Err(missing_chain(id, EntityKind::Collection));
        }
        self.auto_create_collection(id, members, attrs)
    }

    fn delete_object(&mut self, id: &RepoId, selector: &VersionSelector) -> StoreResult<bool> {
        self.delete(id, EntityKind::Object, selector)
    }

    fn delete_collection(&mut self, id: &RepoId, selector: &VersionSelector) -> StoreResult<bool> {
        self.delete(id, EntityKind::Collection, selector)
    }
}

fn already_exists(id: &RepoId, kind: EntityKind) -> StoreError {
    StoreError::AlreadyExists {
        bucket: id.bucket().clone(),
        key: id.key().to_string(),
        kind,
    }
}

fn missing_chain(id: &RepoId, kind: EntityKind) -> StoreError {
    StoreError::NotFound {
        bucket: id.bucket().clone(),
        key: id.key().to_string(),
        kind,
        selector: VersionSelector::Latest,
    }
}

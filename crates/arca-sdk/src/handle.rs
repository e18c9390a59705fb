use std::fmt;

use bytes::Bytes;

use arca_meta::{CollectionMetadata, ObjectMetadata};
use arca_store::{BucketInfo, CollectionAttrs, ListQuery, ObjectAttrs, ObjectRef, VersionedStore};
use arca_types::{BucketName, EntityKind, RepoId, VersionSelector};

use crate::error::SdkResult;

/// Store operations with the bucket already bound.
///
/// Keys are plain strings; content is anything convertible into [`Bytes`].
/// Methods without a selector argument act on the latest live version.
pub struct BucketHandle<'a, S: VersionedStore> {
    store: &'a mut S,
    bucket: BucketName,
}

impl<'a, S: VersionedStore> BucketHandle<'a, S> {
    pub(crate) fn new(store: &'a mut S, bucket: BucketName) -> Self {
        Self { store, bucket }
    }

    pub fn name(&self) -> &BucketName {
        &self.bucket
    }

    pub fn info(&self) -> SdkResult<BucketInfo> {
        Ok(self.store.get_bucket(&self.bucket)?)
    }

    fn id(&self, key: &str) -> SdkResult<RepoId> {
        Ok(RepoId::in_bucket(&self.bucket, key)?)
    }

    // ---- Objects ----

    /// Append a version, starting the chain if `key` is new.
    pub fn put_object(&mut self, key: &str, content: impl Into<Bytes>) -> SdkResult<ObjectMetadata> {
        self.put_object_with(key, content, ObjectAttrs::new())
    }

    pub fn put_object_with(
        &mut self,
        key: &str,
        content: impl Into<Bytes>,
        attrs: ObjectAttrs,
    ) -> SdkResult<ObjectMetadata> {
        let id = self.id(key)?;
        Ok(self.store.auto_create_object(&id, content.into(), attrs)?)
    }

    /// Start a new chain; fails if `key` already has versions.
    pub fn create_object(
        &mut self,
        key: &str,
        content: impl Into<Bytes>,
        attrs: ObjectAttrs,
    ) -> SdkResult<ObjectMetadata> {
        let id = self.id(key)?;
        Ok(self.store.create_object(&id, content.into(), attrs)?)
    }

    /// Append to an existing chain; fails if `key` has no versions.
    pub fn version_object(
        &mut self,
        key: &str,
        content: impl Into<Bytes>,
        attrs: ObjectAttrs,
    ) -> SdkResult<ObjectMetadata> {
        let id = self.id(key)?;
        Ok(self.store.version_object(&id, content.into(), attrs)?)
    }

    pub fn get_object(&self, key: &str) -> SdkResult<ObjectMetadata> {
        self.get_object_at(key, VersionSelector::Latest)
    }

    pub fn get_object_at(
        &self,
        key: &str,
        selector: impl Into<VersionSelector>,
    ) -> SdkResult<ObjectMetadata> {
        Ok(self.store.get_object(&self.id(key)?, &selector.into())?)
    }

    /// Content of the latest live version.
    pub fn read(&self, key: &str) -> SdkResult<Bytes> {
        self.read_at(key, VersionSelector::Latest)
    }

    pub fn read_at(&self, key: &str, selector: impl Into<VersionSelector>) -> SdkResult<Bytes> {
        Ok(self.store.get_content(&self.id(key)?, &selector.into())?)
    }

    /// Soft-delete one object version. `Ok(false)` if it was already deleted.
    pub fn delete_object(
        &mut self,
        key: &str,
        selector: impl Into<VersionSelector>,
    ) -> SdkResult<bool> {
        let id = self.id(key)?;
        Ok(self.store.delete_object(&id, &selector.into())?)
    }

    pub fn list_objects(&self, query: &ListQuery) -> SdkResult<Vec<ObjectMetadata>> {
        Ok(self.store.list_objects(&self.bucket, query)?)
    }

    pub fn list_object_versions(
        &self,
        key: &str,
        query: &ListQuery,
    ) -> SdkResult<Vec<ObjectMetadata>> {
        Ok(self.store.list_object_versions(&self.id(key)?, query)?)
    }

    // ---- Collections ----

    pub fn put_collection(
        &mut self,
        key: &str,
        members: &[ObjectRef],
    ) -> SdkResult<CollectionMetadata> {
        self.put_collection_with(key, members, CollectionAttrs::new())
    }

    pub fn put_collection_with(
        &mut self,
        key: &str,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> SdkResult<CollectionMetadata> {
        let id = self.id(key)?;
        Ok(self.store.auto_create_collection(&id, members, attrs)?)
    }

    pub fn create_collection(
        &mut self,
        key: &str,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> SdkResult<CollectionMetadata> {
        let id = self.id(key)?;
        Ok(self.store.create_collection(&id, members, attrs)?)
    }

    pub fn version_collection(
        &mut self,
        key: &str,
        members: &[ObjectRef],
        attrs: CollectionAttrs,
    ) -> SdkResult<CollectionMetadata> {
        let id = self.id(key)?;
        Ok(self.store.version_collection(&id, members, attrs)?)
    }

    pub fn get_collection(&self, key: &str) -> SdkResult<CollectionMetadata> {
        self.get_collection_at(key, VersionSelector::Latest)
    }

    pub fn get_collection_at(
        &self,
        key: &str,
        selector: impl Into<VersionSelector>,
    ) -> SdkResult<CollectionMetadata> {
        Ok(self.store.get_collection(&self.id(key)?, &selector.into())?)
    }

    pub fn delete_collection(
        &mut self,
        key: &str,
        selector: impl Into<VersionSelector>,
    ) -> SdkResult<bool> {
        let id = self.id(key)?;
        Ok(self.store.delete_collection(&id, &selector.into())?)
    }

    pub fn list_collections(&self, query: &ListQuery) -> SdkResult<Vec<CollectionMetadata>> {
        Ok(self.store.list_collections(&self.bucket, query)?)
    }

    pub fn list_collection_versions(
        &self,
        key: &str,
        query: &ListQuery,
    ) -> SdkResult<Vec<CollectionMetadata>> {
        Ok(self.store.list_collection_versions(&self.id(key)?, query)?)
    }

    /// Number of versions under `key` in the given namespace, deleted included.
    pub fn version_count(&self, key: &str, kind: EntityKind) -> SdkResult<usize> {
        Ok(self.store.version_count(&self.id(key)?, kind)?)
    }
}

impl<S: VersionedStore> fmt::Debug for BucketHandle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketHandle")
            .field("bucket", &self.bucket)
            .finish()
    }
}

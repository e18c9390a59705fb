use tracing::debug;

use arca_store::{BucketInfo, InMemoryStore, StoreConfig, VersionedStore};
use arca_types::BucketName;

use crate::error::SdkResult;
use crate::handle::BucketHandle;

/// High-level Arca API over any [`VersionedStore`].
pub struct Arca<S: VersionedStore = InMemoryStore> {
    store: S,
}

impl Arca<InMemoryStore> {
    /// An in-memory store with the default configuration.
    pub fn in_memory() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    pub fn from_config(config: StoreConfig) -> Self {
        debug!(?config, "opening in-memory store");
        Self::with_store(InMemoryStore::from_config(config))
    }

    /// Load a [`StoreConfig`] from TOML and open an in-memory store with it.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(Self::from_config(StoreConfig::from_toml_str(text)?))
    }
}

impl<S: VersionedStore> Arca<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Operations scoped to an existing bucket.
    pub fn bucket(&mut self, name: &str) -> SdkResult<BucketHandle<'_, S>> {
        let name = BucketName::new(name)?;
        self.store.get_bucket(&name)?;
        Ok(BucketHandle::new(&mut self.store, name))
    }

    /// The bucket that always exists.
    pub fn default_bucket(&mut self) -> BucketHandle<'_, S> {
        let name = self.store.default_bucket().clone();
        BucketHandle::new(&mut self.store, name)
    }

    pub fn create_bucket(&mut self, name: &str) -> SdkResult<BucketInfo> {
        Ok(self.store.create_bucket(&BucketName::new(name)?)?)
    }

    pub fn list_buckets(&self) -> Vec<BucketInfo> {
        self.store.list_buckets()
    }

    /// Discard everything and start over with an empty default bucket.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    // ---- Accessors ----

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl Default for Arca<InMemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

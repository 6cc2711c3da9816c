//! In-memory asset store.
//!
//! Same semantics as the SQLite store, minus durability. Useful for tests and
//! throwaway sessions.

use crate::{AssetMirror, AssetStore, spawn_mirror};
use async_trait::async_trait;
use foads_core::{Asset, AssetId, NewAsset};
use foads_error::StorageError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// In-memory asset store.
///
/// # Example
/// ```no_run
/// use foads_core::{AssetKind, NewAsset};
/// use foads_storage::{AssetStore, InMemoryAssetStore};
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryAssetStore::new();
///     let id = store
///         .add_asset(NewAsset::new(AssetKind::Image, "data:image/png;base64,AAAA", "a red shoe"))
///         .await
///         .unwrap();
///     assert_eq!(store.get_all_assets().await.unwrap()[0].id(), &id);
/// }
/// ```
#[derive(Clone, Default)]
pub struct InMemoryAssetStore {
    inner: Arc<RwLock<Inner>>,
    mirror: Option<Arc<dyn AssetMirror>>,
}

#[derive(Default)]
struct Inner {
    assets: BTreeMap<AssetId, Asset>,
    last_id: i64,
}

impl InMemoryAssetStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a remote mirror that receives every new record.
    pub fn with_mirror(mut self, mirror: Arc<dyn AssetMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.assets.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.assets.is_empty()
    }
}

impl std::fmt::Debug for InMemoryAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAssetStore")
            .field("mirrored", &self.mirror.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    #[instrument(skip(self, asset), fields(kind = %asset.kind()))]
    async fn add_asset(&self, asset: NewAsset) -> Result<AssetId, StorageError> {
        let stored = {
            let mut inner = self.inner.write().await;
            inner.last_id += 1;
            let id = AssetId(inner.last_id);
            let stored = asset.with_id(id);
            inner.assets.insert(id, stored.clone());
            stored
        };

        let id = *stored.id();
        debug!(asset_id = %id, "Asset stored in memory");
        spawn_mirror(self.mirror.as_ref(), stored);
        Ok(id)
    }

    async fn get_all_assets(&self) -> Result<Vec<Asset>, StorageError> {
        let inner = self.inner.read().await;
        let mut assets: Vec<Asset> = inner.assets.values().cloned().collect();
        assets.sort_by(|a, b| {
            b.created_at()
                .cmp(a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        Ok(assets)
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StorageError> {
        Ok(self.inner.read().await.assets.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn delete_asset(&self, id: AssetId) -> Result<(), StorageError> {
        let removed = self.inner.write().await.assets.remove(&id);
        debug!(asset_id = %id, removed = removed.is_some(), "Asset delete");
        Ok(())
    }
}

//! Best-effort replication of local records to the backend.

use crate::AssetStore;
use async_trait::async_trait;
use foads_core::Asset;
use foads_error::{FoadsResult, StorageError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Remote copy of the asset store.
#[async_trait]
pub trait AssetMirror: Send + Sync {
    /// Push one record to the remote side.
    async fn mirror(&self, asset: &Asset) -> FoadsResult<()>;
}

/// Mirror `asset` on a background task.
///
/// Failures are logged and dropped; there is no retry queue.
pub fn spawn_mirror(mirror: Option<&Arc<dyn AssetMirror>>, asset: Asset) {
    let Some(mirror) = mirror.cloned() else {
        return;
    };

    tokio::spawn(async move {
        match mirror.mirror(&asset).await {
            Ok(()) => debug!(asset_id = %asset.id(), "Asset mirrored"),
            Err(e) => warn!(asset_id = %asset.id(), error = %e, "Asset mirror failed"),
        }
    });
}

/// Push every local record to `mirror`, one at a time.
///
/// Returns how many records the mirror accepted. Individual failures are
/// logged and skipped; only a failure to read the local store is an error.
#[instrument(skip_all)]
pub async fn sync_all(
    store: &dyn AssetStore,
    mirror: &dyn AssetMirror,
) -> Result<usize, StorageError> {
    let assets = store.get_all_assets().await?;
    let total = assets.len();
    let mut accepted = 0;

    for asset in &assets {
        match mirror.mirror(asset).await {
            Ok(()) => accepted += 1,
            Err(e) => warn!(asset_id = %asset.id(), error = %e, "Skipping asset during sync"),
        }
    }

    info!(accepted, total, "Asset sync finished");
    Ok(accepted)
}

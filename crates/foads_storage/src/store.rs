//! The asset store trait.

use async_trait::async_trait;
use foads_core::{Asset, AssetId, NewAsset};
use foads_error::StorageError;

/// Durable client-side record of generated media.
///
/// Implementations serialise writes; callers need no locking of their own.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert a record and return the id the store assigned to it.
    ///
    /// Ids increase monotonically and are never reused. When a mirror is
    /// attached, a copy of the record is pushed to it in the background;
    /// the outcome of that push does not affect this call.
    async fn add_asset(&self, asset: NewAsset) -> Result<AssetId, StorageError>;

    /// All records, newest `created_at` first.
    ///
    /// Records sharing a timestamp are ordered by descending id.
    async fn get_all_assets(&self) -> Result<Vec<Asset>, StorageError>;

    /// A single record, if present.
    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StorageError>;

    /// Remove a record. Deleting an absent id is a no-op.
    async fn delete_asset(&self, id: AssetId) -> Result<(), StorageError>;
}

//! Local asset store for the FoadsIA client.
//!
//! Every generated image or video is recorded here as soon as the backend
//! returns it. Records are ordered by creation time, newest first, and are
//! best-effort mirrored to the backend's `/api/assets` endpoint.

mod memory;
mod mirror;
mod sqlite;
mod store;

pub use memory::InMemoryAssetStore;
pub use mirror::{AssetMirror, spawn_mirror, sync_all};
pub use sqlite::SqliteAssetStore;
pub use store::AssetStore;

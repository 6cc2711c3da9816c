//! FoadsIA ad studio client.
//!
//! [`Studio`] ties together the backend [`Gateway`](foads_gateway::Gateway),
//! a local [`AssetStore`](foads_storage::AssetStore) of generated media, and a
//! [`JobTracker`](foads_jobs::JobTracker) for video renders. [`FoadsConfig`]
//! loads settings from defaults, a TOML file and `FOADS_*` variables.

#![warn(missing_docs)]

mod config;
mod studio;

pub use config::{DATABASE_FILE, ENV_PREFIX, FoadsConfig, PollSettings};
pub use studio::{FACE_SWAP_PROMPT, Studio};

pub use foads_core::{
    ApiResult, Asset, AssetId, AssetKind, JobId, JobSnapshot, JobStatus, MultiSceneRequest,
    Scene, SceneBuilder, VideoRenderRequest, VideoRenderRequestBuilder,
};
pub use foads_error::{FoadsError, FoadsErrorKind, FoadsResult};

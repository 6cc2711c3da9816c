//! Core data types for the FoadsIA client.
//!
//! This crate provides the records, request bodies and response shapes shared
//! by the asset store, the backend gateway and the job tracker.

mod api_result;
mod asset;
pub mod demo;
mod generation;
mod job;
mod observability;
mod responses;

pub use api_result::ApiResult;
pub use asset::{Asset, AssetId, AssetKind, NewAsset, now_millis};
pub use generation::{
    AspectRatio, FaceSwapRequest, ImageGenerationConfig, ImageGenerationConfigBuilder,
    ImageRequest, MultiSceneRequest, Scene, SceneBuilder, VideoRenderRequest,
    VideoRenderRequestBuilder,
};
pub use job::{JobId, JobSnapshot, JobStatus, JobUpdate};
pub use observability::init_tracing;
pub use responses::{
    AssetSyncResponse, Avatar, AvatarList, GpuStatus, HealthStatus, JobSubmission,
    LoginResponse, MagicPromptResponse, MediaResponse, ResponseStatus, StyleList, Voice,
    VoiceList,
};

//! The studio: generation calls wired to the asset store and job tracker.

use crate::FoadsConfig;
use foads_core::{
    ApiResult, AspectRatio, Asset, AssetId, AssetKind, FaceSwapRequest, ImageGenerationConfig,
    ImageGenerationConfigBuilder, ImageRequest, JobId, JobSnapshot, JobSubmission, MediaResponse,
    MultiSceneRequest, NewAsset, VideoRenderRequest,
};
use foads_error::{FoadsError, FoadsResult, JobError, JobErrorKind};
use foads_gateway::{Gateway, Session};
use foads_jobs::{JobEventSource, JobPoller, JobTracker, SocketIoEventSource};
use foads_storage::{AssetMirror, AssetStore, SqliteAssetStore, sync_all};
use futures::{StreamExt, stream};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Prompt recorded for face swap results.
pub const FACE_SWAP_PROMPT: &str = "Face Swap Result";

/// One client session against the backend.
///
/// Successful live generations are stored locally. Demo data is never
/// stored, and neither is anything from a failed call.
///
/// # Example
/// ```no_run
/// use foads::{FoadsConfig, Studio};
///
/// #[tokio::main]
/// async fn main() -> Result<(), foads_error::FoadsError> {
///     let studio = Studio::from_config(&FoadsConfig::load()?)?;
///     let asset = studio
///         .generate_image("a red shoe on a marble floor", "1:1", 4, 2.0, "")
///         .await?;
///     println!("stored asset {}", asset.id());
///     Ok(())
/// }
/// ```
pub struct Studio {
    gateway: Gateway,
    store: Arc<dyn AssetStore>,
    events: Arc<dyn JobEventSource>,
    tracker: JobTracker,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("gateway", &self.gateway)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

impl Studio {
    /// Wire the given parts together.
    pub fn new(
        gateway: Gateway,
        store: Arc<dyn AssetStore>,
        events: Arc<dyn JobEventSource>,
    ) -> Self {
        let tracker = JobTracker::new(store.clone());
        Self {
            gateway,
            store,
            events,
            tracker,
        }
    }

    /// Build the production stack: reqwest gateway, SQLite store mirrored
    /// to the backend, and push or polling job updates.
    pub fn from_config(config: &FoadsConfig) -> FoadsResult<Self> {
        let mut gateway = Gateway::new(config.gateway_config()?)?;
        if let Some(token) = config.token() {
            gateway = gateway.with_session(Arc::new(Session::with_token(token.clone())));
        }

        let path = config.database_path()?;
        let mirror: Arc<dyn AssetMirror> = Arc::new(gateway.clone());
        let store = SqliteAssetStore::open(&path)?.with_mirror(mirror);
        info!(path = %path.display(), api_url = %config.api_url(), "Studio ready");

        let events: Arc<dyn JobEventSource> = if *config.use_push_channel() {
            Arc::new(SocketIoEventSource::new(config.api_url()))
        } else {
            Arc::new(JobPoller::new(
                Arc::new(gateway.clone()),
                config.poll_config()?,
            ))
        };

        Ok(Self::new(gateway, Arc::new(store), events))
    }

    /// Backend gateway.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Local asset store.
    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Tracker publishing video job snapshots.
    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    /// Generate an image and store it.
    ///
    /// `aspect_ratio` is one of `1:1`, `16:9`, `9:16`. Out-of-range
    /// parameters are rejected before any request is made.
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        steps: u32,
        guidance: f32,
        negative_prompt: &str,
    ) -> FoadsResult<Asset> {
        let config = ImageGenerationConfigBuilder::default()
            .aspect_ratio(AspectRatio::parse(aspect_ratio)?)
            .steps(steps)
            .guidance(guidance)
            .negative_prompt(negative_prompt)
            .build()?;
        self.generate_image_with(prompt, config).await
    }

    /// Generate an image from a prepared configuration and store it.
    #[instrument(skip(self, config), fields(steps = *config.steps()))]
    pub async fn generate_image_with(
        &self,
        prompt: &str,
        config: ImageGenerationConfig,
    ) -> FoadsResult<Asset> {
        let request = ImageRequest::new(prompt, config)?;
        let response = self.gateway.generate_image(&request).await;
        self.store_media(response, AssetKind::Image, prompt).await
    }

    /// Swap the face from `source_image` onto `target_image`, both data URIs.
    #[instrument(skip_all)]
    pub async fn face_swap(&self, source_image: &str, target_image: &str) -> FoadsResult<Asset> {
        let request = FaceSwapRequest::new(source_image, target_image)?;
        let response = self.gateway.face_swap(&request).await;
        self.store_media(response, AssetKind::Image, FACE_SWAP_PROMPT)
            .await
    }

    /// Ask the backend to expand a short prompt. Nothing is stored.
    pub async fn magic_prompt(&self, prompt: &str) -> FoadsResult<String> {
        let response = self.gateway.magic_prompt(prompt).await.into_result()?;
        response
            .prompt
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                FoadsError::backend(
                    response
                        .message
                        .unwrap_or_else(|| "Prompt optimization failed".to_string()),
                )
            })
    }

    /// Submit a single-avatar video and follow it to the end.
    pub async fn render_video(&self, request: &VideoRenderRequest) -> FoadsResult<JobSnapshot> {
        let job_id = self.submit_video(request).await?;
        self.track_job(job_id, request.script()).await
    }

    /// Submit a single-avatar video without waiting for it.
    #[instrument(skip_all)]
    pub async fn submit_video(&self, request: &VideoRenderRequest) -> FoadsResult<JobId> {
        submitted(self.gateway.render_video(request).await)
    }

    /// Submit a multi-scene video and follow it to the end.
    pub async fn render_multi_scene(
        &self,
        request: &MultiSceneRequest,
    ) -> FoadsResult<JobSnapshot> {
        let job_id = self.submit_multi_scene(request).await?;
        self.track_job(job_id, &scene_prompt(request)).await
    }

    /// Submit a multi-scene video without waiting for it.
    #[instrument(skip_all, fields(scenes = request.scenes().len()))]
    pub async fn submit_multi_scene(&self, request: &MultiSceneRequest) -> FoadsResult<JobId> {
        submitted(self.gateway.render_multi_scene(request).await)
    }

    /// Follow an already submitted job; a completed video is stored with
    /// `prompt`.
    pub async fn track_job(&self, job_id: JobId, prompt: &str) -> FoadsResult<JobSnapshot> {
        self.track_job_via(self.events.as_ref(), job_id, prompt).await
    }

    /// Follow an already submitted job with updates from `source`.
    ///
    /// After subscribing, the job status endpoint is read once and its answer
    /// is applied first, so a job that moved on before the subscription
    /// existed is still seen.
    #[instrument(skip(self, source, prompt), fields(job_id = %job_id))]
    pub async fn track_job_via(
        &self,
        source: &dyn JobEventSource,
        job_id: JobId,
        prompt: &str,
    ) -> FoadsResult<JobSnapshot> {
        let live = source.subscribe(&job_id).await?;
        let current = self.gateway.job_status(&job_id).await;
        let catch_up = match current.data {
            Some(update) => {
                debug!(status = %update.status, "Job status before first push event");
                Some(update)
            }
            None => {
                debug!(error = ?current.error, "No job status to catch up from");
                None
            }
        };
        let events = stream::iter(catch_up.map(Ok)).chain(live).boxed();
        self.tracker.track(job_id, prompt, events).await
    }

    /// Stored assets, newest first.
    pub async fn assets(&self) -> FoadsResult<Vec<Asset>> {
        Ok(self.store.get_all_assets().await?)
    }

    /// Delete a stored asset. Unknown ids are ignored.
    pub async fn delete_asset(&self, id: AssetId) -> FoadsResult<()> {
        Ok(self.store.delete_asset(id).await?)
    }

    /// Push every stored asset to the backend; returns how many it accepted.
    pub async fn sync_assets(&self) -> FoadsResult<usize> {
        Ok(sync_all(self.store.as_ref(), &self.gateway).await?)
    }

    async fn store_media(
        &self,
        response: ApiResult<MediaResponse>,
        kind: AssetKind,
        prompt: &str,
    ) -> FoadsResult<Asset> {
        if response.is_demo {
            warn!("Backend returned demo data; nothing stored");
            return Err(FoadsError::backend("Backend unavailable"));
        }
        let content = response
            .into_result()?
            .into_media()
            .map_err(FoadsError::backend)?;

        let record = NewAsset::new(kind, content, prompt);
        let id = self.store.add_asset(record.clone()).await?;
        debug!(asset_id = %id, %kind, "Stored generated media");
        Ok(record.with_id(id))
    }
}

fn submitted(response: ApiResult<JobSubmission>) -> FoadsResult<JobId> {
    let submission = response.into_result()?;
    match submission.job_id {
        Some(job_id) if !job_id.is_empty() => {
            info!(%job_id, "Render queued");
            Ok(JobId(job_id))
        }
        _ => Err(JobError::new(JobErrorKind::Submission(
            submission
                .message
                .unwrap_or_else(|| "No job id returned".to_string()),
        ))
        .into()),
    }
}

fn scene_prompt(request: &MultiSceneRequest) -> String {
    request
        .scenes()
        .iter()
        .map(|scene| scene.script().as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

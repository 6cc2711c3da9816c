//! Drives a job from submission to a terminal state.

use crate::{JobEvents, JobState, Transition};
use foads_core::{AssetKind, JobId, JobSnapshot, JobStatus, NewAsset};
use foads_error::{FoadsResult, JobError, JobErrorKind};
use foads_storage::AssetStore;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Folds job updates into snapshots and stores finished videos.
///
/// Every accepted snapshot is published on a `watch` channel; subscribers see
/// the latest one. A tracker can follow several jobs one after another.
///
/// # Example
/// ```no_run
/// use foads_core::JobUpdate;
/// use foads_jobs::JobTracker;
/// use foads_storage::InMemoryAssetStore;
/// use futures::StreamExt;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), foads_error::FoadsError> {
///     let tracker = JobTracker::new(Arc::new(InMemoryAssetStore::new()));
///     let mut snapshots = tracker.subscribe();
///     tokio::spawn(async move {
///         while snapshots.changed().await.is_ok() {
///             println!("{:?}", *snapshots.borrow());
///         }
///     });
///
///     let events = futures::stream::iter(vec![
///         Ok(JobUpdate::processing("vid_1", 40)),
///         Ok(JobUpdate::completed("vid_1", "http://cdn/v.mp4")),
///     ])
///     .boxed();
///     let done = tracker.track("vid_1".into(), "spring promo", events).await?;
///     assert_eq!(done.result_url.as_deref(), Some("http://cdn/v.mp4"));
///     Ok(())
/// }
/// ```
pub struct JobTracker {
    store: Arc<dyn AssetStore>,
    snapshots: watch::Sender<Option<JobSnapshot>>,
}

impl std::fmt::Debug for JobTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTracker")
            .field("current", &*self.snapshots.borrow())
            .finish_non_exhaustive()
    }
}

impl JobTracker {
    /// Tracker persisting finished videos into `store`.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        let (snapshots, _) = watch::channel(None);
        Self { store, snapshots }
    }

    /// Receiver of the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<JobSnapshot>> {
        self.snapshots.subscribe()
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Option<JobSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Follow `job_id` until it completes or fails.
    ///
    /// On completion a `video` asset with the result URL as content and
    /// `prompt` as its prompt is added to the store. The event stream is
    /// dropped as soon as the job is terminal.
    ///
    /// # Errors
    ///
    /// Returns a [`JobError`] if the stream yields an error, or ends before
    /// the job is terminal. The last snapshot stays published either way.
    #[instrument(skip(self, prompt, events), fields(job_id = %job_id))]
    pub async fn track(
        &self,
        job_id: JobId,
        prompt: &str,
        mut events: JobEvents,
    ) -> FoadsResult<JobSnapshot> {
        let mut state = JobState::new(job_id.clone());
        self.publish(&state);

        while let Some(event) = events.next().await {
            let update = event?;
            match state.apply(&update) {
                Transition::Applied => {
                    debug!(status = %state.snapshot().status, progress = state.snapshot().progress, "Job updated");
                    self.publish(&state);
                    if state.is_terminal() {
                        break;
                    }
                }
                Transition::Ignored => {}
                Transition::Rejected => warn!(
                    current = %state.snapshot().status,
                    received = %update.status,
                    "Rejected out-of-order job update"
                ),
            }
        }
        drop(events);

        if !state.is_terminal() {
            return Err(JobError::new(JobErrorKind::ChannelClosed(job_id.to_string())).into());
        }
        self.finish(state.snapshot(), prompt).await
    }

    fn publish(&self, state: &JobState) {
        self.snapshots.send_replace(Some(state.snapshot().clone()));
    }

    async fn finish(&self, snapshot: &JobSnapshot, prompt: &str) -> FoadsResult<JobSnapshot> {
        if snapshot.status == JobStatus::Completed {
            let Some(url) = &snapshot.result_url else {
                return Err(JobError::new(JobErrorKind::MissingResult(
                    snapshot.job_id.to_string(),
                ))
                .into());
            };
            let id = self
                .store
                .add_asset(NewAsset::new(AssetKind::Video, url.as_str(), prompt))
                .await?;
            info!(asset_id = %id, url = %url, "Stored rendered video");
        } else {
            info!(error = ?snapshot.error, "Job failed");
        }
        Ok(snapshot.clone())
    }
}

//! Tests for job polling and generic operation polling.

use async_trait::async_trait;
use foads_core::{ApiResult, JobId, JobStatus, JobUpdate};
use foads_error::{FoadsError, FoadsErrorKind, FoadsResult, HttpError, JobErrorKind};
use foads_jobs::{
    JobEventSource, JobPoller, JobStatusSource, JobTracker, Operation, OperationPoller,
    OperationStatus, PollConfig, PollConfigBuilder,
};
use foads_storage::{AssetStore, InMemoryAssetStore};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn fast(max_attempts: usize) -> PollConfig {
    PollConfigBuilder::default()
        .initial_interval(Duration::from_millis(1))
        .multiplier(2.0)
        .max_interval(Duration::from_millis(4))
        .max_attempts(max_attempts)
        .build()
        .unwrap()
}

/// Replays scripted status results; the last one repeats.
struct ScriptedStatus {
    script: Mutex<VecDeque<ApiResult<JobUpdate>>>,
    calls: AtomicUsize,
}

impl ScriptedStatus {
    fn new(script: Vec<ApiResult<JobUpdate>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl JobStatusSource for ScriptedStatus {
    async fn job_status(&self, _job_id: &JobId) -> ApiResult<JobUpdate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

#[tokio::test]
async fn test_poller_feeds_tracker_until_completed() {
    let status = ScriptedStatus::new(vec![
        ApiResult::success(JobUpdate::new("vid_1", JobStatus::Queued)),
        ApiResult::failure("HTTP 502: Bad Gateway"),
        ApiResult::success(JobUpdate::processing("vid_1", 60)),
        ApiResult::success(JobUpdate::completed("vid_1", "http://x/vid_1.mp4")),
    ]);
    let poller = JobPoller::new(status.clone(), fast(10));
    let store = Arc::new(InMemoryAssetStore::new());
    let tracker = JobTracker::new(store.clone());

    let events = poller.subscribe(&"vid_1".into()).await.unwrap();
    let done = tracker.track("vid_1".into(), "promo", events).await.unwrap();

    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(status.calls.load(Ordering::SeqCst), 4);
    assert_eq!(store.get_all_assets().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_poller_times_out() {
    let status = ScriptedStatus::new(vec![ApiResult::success(JobUpdate::processing("vid_1", 10))]);
    let poller = JobPoller::new(status.clone(), fast(3));
    let tracker = JobTracker::new(Arc::new(InMemoryAssetStore::new()));

    let events = poller.subscribe(&"vid_1".into()).await.unwrap();
    let err = tracker.track("vid_1".into(), "promo", events).await.unwrap_err();

    match err.kind() {
        FoadsErrorKind::Job(e) => assert_eq!(
            e.kind,
            JobErrorKind::PollTimeout {
                job_id: "vid_1".to_string(),
                attempts: 3
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(status.calls.load(Ordering::SeqCst), 3);
    assert_eq!(tracker.current().unwrap().progress, 10);
}

#[tokio::test]
async fn test_poller_counts_failures_as_attempts() {
    let status = ScriptedStatus::new(vec![ApiResult::failure("Job not found")]);
    let poller = JobPoller::new(status.clone(), fast(2));
    let tracker = JobTracker::new(Arc::new(InMemoryAssetStore::new()));

    let events = poller.subscribe(&"vid_9".into()).await.unwrap();
    assert!(tracker.track("vid_9".into(), "promo", events).await.is_err());
    assert_eq!(status.calls.load(Ordering::SeqCst), 2);
}

/// Operation that finishes after a fixed number of checks.
struct CountdownOperation {
    remaining: AtomicUsize,
    result: Option<&'static str>,
    fail_first: bool,
}

#[async_trait]
impl Operation for CountdownOperation {
    type Output = &'static str;

    fn name(&self) -> &str {
        "operations/veo-123"
    }

    async fn check(&self) -> FoadsResult<OperationStatus<&'static str>> {
        let before = self.remaining.fetch_sub(1, Ordering::SeqCst);
        if self.fail_first && before == 3 {
            return Err(FoadsError::backend("503 from operations endpoint"));
        }
        if before > 1 {
            return Ok(OperationStatus::pending());
        }
        Ok(OperationStatus {
            done: true,
            result: self.result,
        })
    }
}

#[tokio::test]
async fn test_operation_poller_returns_result() {
    let operation = CountdownOperation {
        remaining: AtomicUsize::new(3),
        result: Some("https://video.example/veo-123.mp4"),
        fail_first: true,
    };
    let result = OperationPoller::new(fast(5)).wait(&operation).await.unwrap();
    assert_eq!(result, "https://video.example/veo-123.mp4");
}

#[tokio::test]
async fn test_operation_done_without_result() {
    let operation = CountdownOperation {
        remaining: AtomicUsize::new(1),
        result: None,
        fail_first: false,
    };
    let err = OperationPoller::new(fast(5)).wait(&operation).await.unwrap_err();
    assert!(err.user_message().contains("operations/veo-123"));
}

#[tokio::test]
async fn test_operation_poller_times_out() {
    let operation = CountdownOperation {
        remaining: AtomicUsize::new(100),
        result: Some("never"),
        fail_first: false,
    };
    let err = OperationPoller::new(fast(4)).wait(&operation).await.unwrap_err();
    match err.kind() {
        FoadsErrorKind::Job(e) => assert!(matches!(
            e.kind,
            JobErrorKind::PollTimeout { attempts: 4, .. }
        )),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(operation.remaining.load(Ordering::SeqCst), 96);
}

/// Operation whose status endpoint rejects the caller.
struct ForbiddenOperation {
    checks: AtomicUsize,
}

#[async_trait]
impl Operation for ForbiddenOperation {
    type Output = ();

    fn name(&self) -> &str {
        "operations/forbidden"
    }

    async fn check(&self) -> FoadsResult<OperationStatus<()>> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Err(HttpError::with_status(403, "Forbidden").into())
    }
}

#[tokio::test]
async fn test_operation_poller_stops_on_permanent_error() {
    let operation = ForbiddenOperation {
        checks: AtomicUsize::new(0),
    };
    let err = OperationPoller::new(fast(5)).wait(&operation).await.unwrap_err();
    assert!(matches!(err.kind(), FoadsErrorKind::Http(_)));
    assert_eq!(operation.checks.load(Ordering::SeqCst), 1);
}

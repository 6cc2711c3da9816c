//! Generation job records exchanged with the backend.

use serde::{Deserialize, Serialize};

/// Opaque job identifier assigned by the backend, e.g. `vid_1718000000`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct JobId(pub String);

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl JobId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle of a server-side generation job.
///
/// Transitions only move forward: `Queued → Processing → {Completed | Failed}`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for a worker
    Queued,
    /// A worker is rendering
    Processing,
    /// Finished with a result URL
    Completed,
    /// Finished with an error
    Failed,
}

impl JobStatus {
    /// True for states with no outgoing transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// True while the job can still change.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// Repeating `Processing` is allowed so progress updates can flow.
    ///
    /// # Examples
    ///
    /// ```
    /// use foads_core::JobStatus;
    ///
    /// assert!(JobStatus::Queued.can_transition_to(JobStatus::Processing));
    /// assert!(JobStatus::Processing.can_transition_to(JobStatus::Processing));
    /// assert!(JobStatus::Queued.can_transition_to(JobStatus::Failed));
    /// assert!(!JobStatus::Failed.can_transition_to(JobStatus::Completed));
    /// assert!(!JobStatus::Processing.can_transition_to(JobStatus::Queued));
    /// ```
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        match self {
            Self::Completed | Self::Failed => false,
            Self::Processing => next != Self::Queued,
            Self::Queued => true,
        }
    }
}

/// A `job_update` push event, also the body of `GET /api/jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobUpdate {
    /// Job this event belongs to
    #[serde(alias = "id")]
    pub job_id: JobId,
    /// Reported status
    pub status: JobStatus,
    /// Progress percentage while processing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    /// Human-readable stage description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Result location once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Failure description once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobUpdate {
    /// A bare status event.
    pub fn new(job_id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            progress: None,
            message: None,
            url: None,
            error: None,
        }
    }

    /// A processing event carrying progress.
    pub fn processing(job_id: impl Into<JobId>, progress: u32) -> Self {
        Self {
            progress: Some(progress),
            ..Self::new(job_id, JobStatus::Processing)
        }
    }

    /// A completion event carrying the result URL.
    pub fn completed(job_id: impl Into<JobId>, url: impl Into<String>) -> Self {
        Self {
            progress: Some(100),
            url: Some(url.into()),
            ..Self::new(job_id, JobStatus::Completed)
        }
    }

    /// A failure event carrying the error message.
    pub fn failed(job_id: impl Into<JobId>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(job_id, JobStatus::Failed)
        }
    }

    /// Attach a stage message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Client-side view of a job, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Job being observed
    pub job_id: JobId,
    /// Current state
    pub status: JobStatus,
    /// Last received progress percentage
    pub progress: u32,
    /// Last received stage message
    pub message: Option<String>,
    /// Present only when completed
    pub result_url: Option<String>,
    /// Present only when failed
    pub error: Option<String>,
}

impl JobSnapshot {
    /// Snapshot of a freshly submitted job.
    pub fn queued(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Queued,
            progress: 0,
            message: None,
            result_url: None,
            error: None,
        }
    }
}

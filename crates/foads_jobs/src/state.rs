//! Client-side job state machine.

use foads_core::{JobId, JobSnapshot, JobStatus, JobUpdate};

/// Failure text used when the backend reports `failed` without a reason.
pub const DEFAULT_FAILURE: &str = "Processing failed";

/// Outcome of feeding one update into a [`JobState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The update changed the snapshot
    Applied,
    /// The update belongs to another job
    Ignored,
    /// The update would leave a terminal state or move backwards
    Rejected,
}

/// Snapshot of one job plus the rules for changing it.
///
/// # Example
/// ```
/// use foads_core::{JobStatus, JobUpdate};
/// use foads_jobs::{JobState, Transition};
///
/// let mut state = JobState::new("vid_1".into());
/// assert_eq!(state.apply(&JobUpdate::failed("vid_1", "GPU lost")), Transition::Applied);
/// assert_eq!(
///     state.apply(&JobUpdate::completed("vid_1", "http://cdn/v.mp4")),
///     Transition::Rejected
/// );
/// assert_eq!(state.snapshot().status, JobStatus::Failed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JobState {
    snapshot: JobSnapshot,
}

impl JobState {
    /// State of a freshly submitted job.
    pub fn new(job_id: JobId) -> Self {
        Self {
            snapshot: JobSnapshot::queued(job_id),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &JobSnapshot {
        &self.snapshot
    }

    /// Whether the job has completed or failed.
    pub fn is_terminal(&self) -> bool {
        self.snapshot.status.is_terminal()
    }

    /// Fold one update into the snapshot.
    ///
    /// Progress is last-received-wins while processing, even when it goes
    /// down. Completion pins progress to 100.
    pub fn apply(&mut self, update: &JobUpdate) -> Transition {
        if update.job_id != self.snapshot.job_id {
            return Transition::Ignored;
        }
        if !self.snapshot.status.can_transition_to(update.status) {
            return Transition::Rejected;
        }

        let snapshot = &mut self.snapshot;
        snapshot.status = update.status;
        if update.message.is_some() {
            snapshot.message = update.message.clone();
        }

        match update.status {
            JobStatus::Queued => {}
            JobStatus::Processing => {
                if let Some(progress) = update.progress {
                    snapshot.progress = progress.min(100);
                }
            }
            JobStatus::Completed => {
                snapshot.progress = 100;
                snapshot.result_url = update.url.clone();
            }
            JobStatus::Failed => {
                snapshot.error = Some(
                    update
                        .error
                        .clone()
                        .or_else(|| update.message.clone())
                        .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
                );
            }
        }
        Transition::Applied
    }
}

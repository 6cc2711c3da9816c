//! Where job updates come from.

use async_trait::async_trait;
use foads_core::{JobId, JobUpdate};
use foads_error::JobError;
use futures::stream::BoxStream;

/// Stream of updates for one job. An `Err` item ends tracking.
pub type JobEvents = BoxStream<'static, Result<JobUpdate, JobError>>;

/// Opens a stream of updates for a job.
///
/// Streams may carry updates for other jobs; filtering is the tracker's job.
/// Dropping the stream releases the underlying connection.
#[async_trait]
pub trait JobEventSource: Send + Sync {
    /// Start receiving updates for `job_id`.
    async fn subscribe(&self, job_id: &JobId) -> Result<JobEvents, JobError>;
}

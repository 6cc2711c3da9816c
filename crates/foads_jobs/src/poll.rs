//! Bounded polling: job status re-requests and generic long-running operations.

use crate::{JobEventSource, JobEvents};
use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use foads_core::{ApiResult, JobId, JobUpdate};
use foads_error::{FoadsError, FoadsResult, JobError, JobErrorKind, RetryableError};
use foads_gateway::Gateway;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Backoff schedule shared by [`JobPoller`] and [`OperationPoller`].
///
/// # Example
/// ```
/// use foads_jobs::PollConfigBuilder;
/// use std::time::Duration;
///
/// let config = PollConfigBuilder::default()
///     .initial_interval(Duration::from_secs(2))
///     .multiplier(2.0)
///     .max_interval(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(config.next_interval(Duration::from_secs(2)), Duration::from_secs(4));
/// assert_eq!(config.next_interval(Duration::from_secs(4)), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct PollConfig {
    /// Wait before the first re-check
    #[builder(default = "Duration::from_secs(5)")]
    initial_interval: Duration,
    /// Growth factor applied after every attempt
    #[builder(default = "1.5")]
    multiplier: f64,
    /// Upper bound on the wait between attempts
    #[builder(default = "Duration::from_secs(30)")]
    max_interval: Duration,
    /// Attempts before giving up with a timeout error
    #[builder(default = "120")]
    max_attempts: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(5),
            multiplier: 1.5,
            max_interval: Duration::from_secs(30),
            max_attempts: 120,
        }
    }
}

impl PollConfig {
    /// Wait that follows `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }
}

/// Anything that can report a job's current status.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    /// Fetch the latest status of `job_id`.
    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobUpdate>;
}

#[async_trait]
impl JobStatusSource for Gateway {
    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobUpdate> {
        Gateway::job_status(self, job_id).await
    }
}

/// Event source that polls the job status endpoint.
///
/// Yields every successfully fetched status and stops after a terminal one.
/// Failed polls count as attempts. Once `max_attempts` is used up the stream
/// ends with a [`JobErrorKind::PollTimeout`].
#[derive(Clone)]
pub struct JobPoller {
    source: Arc<dyn JobStatusSource>,
    config: PollConfig,
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JobPoller {
    /// Poll `source` on the given schedule.
    pub fn new(source: Arc<dyn JobStatusSource>, config: PollConfig) -> Self {
        Self { source, config }
    }

    /// Schedule in use.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }
}

#[async_trait]
impl JobEventSource for JobPoller {
    async fn subscribe(&self, job_id: &JobId) -> Result<JobEvents, JobError> {
        let source = self.source.clone();
        let config = self.config.clone();
        let job_id = job_id.clone();

        let events = async_stream::stream! {
            let max_attempts = *config.max_attempts();
            let mut delay = *config.initial_interval();
            let mut attempt = 0;
            let mut finished = false;

            while !finished && attempt < max_attempts {
                attempt += 1;
                let result = source.job_status(&job_id).await;
                match result.data {
                    Some(update) => {
                        debug!(job_id = %job_id, attempt, status = %update.status, "Polled job");
                        finished = update.job_id == job_id && update.status.is_terminal();
                        yield Ok(update);
                    }
                    None => {
                        warn!(job_id = %job_id, attempt, error = ?result.error, "Job poll failed");
                    }
                }

                if !finished && attempt < max_attempts {
                    tokio::time::sleep(delay).await;
                    delay = config.next_interval(delay);
                }
            }

            if !finished {
                yield Err(JobError::new(JobErrorKind::PollTimeout {
                    job_id: job_id.to_string(),
                    attempts: max_attempts,
                }));
            }
        };

        Ok(events.boxed())
    }
}

/// Progress report of a long-running operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationStatus<T> {
    /// Whether the operation has finished
    pub done: bool,
    /// Result, present once finished successfully
    pub result: Option<T>,
}

impl<T> OperationStatus<T> {
    /// Still running.
    pub fn pending() -> Self {
        Self {
            done: false,
            result: None,
        }
    }

    /// Finished with `result`.
    pub fn finished(result: T) -> Self {
        Self {
            done: true,
            result: Some(result),
        }
    }
}

/// A remote operation checked by re-requesting its status.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Value produced when the operation finishes.
    type Output: Send;

    /// Identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Ask the remote side how far along the operation is.
    async fn check(&self) -> FoadsResult<OperationStatus<Self::Output>>;
}

/// Waits for an [`Operation`] to report `done`.
#[derive(Debug, Clone, Default)]
pub struct OperationPoller {
    config: PollConfig,
}

impl OperationPoller {
    /// Poller with the given schedule.
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Sleep, check, repeat until `operation` is done or attempts run out.
    ///
    /// Transient check failures are logged and count as attempts; a
    /// permanent one (see [`RetryableError`]) is returned immediately.
    #[instrument(skip_all, fields(operation = %operation.name()))]
    pub async fn wait<O>(&self, operation: &O) -> FoadsResult<O::Output>
    where
        O: Operation + ?Sized,
    {
        let max_attempts = *self.config.max_attempts();
        let mut delay = *self.config.initial_interval();

        for attempt in 1..=max_attempts {
            tokio::time::sleep(delay).await;
            match operation.check().await {
                Ok(OperationStatus {
                    done: true,
                    result: Some(result),
                }) => {
                    debug!(attempt, "Operation finished");
                    return Ok(result);
                }
                Ok(OperationStatus { done: true, .. }) => {
                    return Err(FoadsError::from(JobError::new(JobErrorKind::MissingResult(
                        operation.name().to_string(),
                    ))));
                }
                Ok(_) => debug!(attempt, "Operation still running"),
                Err(e) if !e.is_retryable() => {
                    warn!(attempt, error = %e, "Operation check failed permanently");
                    return Err(e);
                }
                Err(e) => warn!(attempt, error = %e, "Operation check failed"),
            }
            delay = self.config.next_interval(delay);
        }

        Err(JobError::new(JobErrorKind::PollTimeout {
            job_id: operation.name().to_string(),
            attempts: max_attempts,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let config = PollConfig::default();
        assert_eq!(*config.initial_interval(), Duration::from_secs(5));
        assert_eq!(
            config.next_interval(Duration::from_secs(5)),
            Duration::from_millis(7500)
        );
        assert_eq!(
            config.next_interval(Duration::from_secs(29)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_builder_defaults_match_default() {
        assert_eq!(PollConfigBuilder::default().build().unwrap(), PollConfig::default());
    }
}

//! Job tracking error types.

/// Job tracking error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JobErrorKind {
    /// Backend refused the submission or returned no job id
    #[display("Job submission rejected: {}", _0)]
    Submission(String),
    /// Push channel could not be opened
    #[display("Push channel connection failed: {}", _0)]
    ChannelConnect(String),
    /// Push channel sent a frame we could not decode
    #[display("Invalid push frame: {}", _0)]
    InvalidFrame(String),
    /// Push channel closed before the job reached a terminal state
    #[display("Push channel closed before job {} finished", _0)]
    ChannelClosed(String),
    /// Polling gave up after the configured number of attempts
    #[display("Job {} did not finish after {} polls", job_id, attempts)]
    PollTimeout {
        /// Job being polled
        job_id: String,
        /// Attempts made before giving up
        attempts: usize,
    },
    /// A single poll request failed
    #[display("Poll request failed: {}", _0)]
    PollRequest(String),
    /// Operation finished without a result
    #[display("Operation finished without a result: {}", _0)]
    MissingResult(String),
}

/// Job error with source location tracking.
///
/// # Examples
///
/// ```
/// use foads_error::{JobError, JobErrorKind};
///
/// let err = JobError::new(JobErrorKind::ChannelClosed("vid_1".to_string()));
/// assert!(format!("{}", err).contains("vid_1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Job Error: {} at line {} in {}", kind, line, file)]
pub struct JobError {
    /// The kind of error that occurred
    pub kind: JobErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl JobError {
    /// Create a new JobError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: JobErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

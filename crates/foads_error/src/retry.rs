//! Retry classification shared by the gateway and the job pollers.

use crate::{FoadsError, FoadsErrorKind, HttpError, JobError, JobErrorKind};

/// Trait for errors that may succeed when the operation is repeated.
///
/// # Examples
///
/// ```
/// use foads_error::{HttpError, RetryableError};
///
/// assert!(HttpError::with_status(503, "Service unavailable").is_retryable());
/// assert!(!HttpError::with_status(400, "Prompt vacío").is_retryable());
/// assert!(HttpError::new("connection reset").is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503, 429 or dropped connections return true.
    /// Permanent errors like 400 or 404 return false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        match self.status {
            Some(code) => matches!(code, 408 | 429 | 500 | 502 | 503 | 504),
            None => true,
        }
    }
}

impl RetryableError for JobError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            JobErrorKind::PollRequest(_) | JobErrorKind::ChannelConnect(_)
        )
    }
}

impl RetryableError for FoadsError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            FoadsErrorKind::Http(e) => e.is_retryable(),
            FoadsErrorKind::Job(e) => e.is_retryable(),
            // Gateway failures arrive flattened to a message.
            FoadsErrorKind::Backend(_) => true,
            FoadsErrorKind::Auth(_)
            | FoadsErrorKind::Storage(_)
            | FoadsErrorKind::Config(_)
            | FoadsErrorKind::Validation(_) => false,
        }
    }
}

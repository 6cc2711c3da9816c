//! Uniform result envelope returned by every gateway call.

use foads_error::FoadsError;
use serde::{Deserialize, Serialize};

/// Outcome of a backend call, with failures converted to values.
///
/// Exactly one of three shapes is produced:
/// - real data: `data: Some, error: None, is_demo: false`
/// - fallback data: `data: Some, error: None, is_demo: true`
/// - failure: `data: None, error: Some, is_demo: false`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// Payload, when there is one
    pub data: Option<T>,
    /// Human-readable failure message
    pub error: Option<String>,
    /// True when `data` is static fallback content
    pub is_demo: bool,
}

impl<T> ApiResult<T> {
    /// Real data from the backend.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_demo: false,
        }
    }

    /// Substitute content used because the backend could not be reached.
    pub fn demo(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_demo: true,
        }
    }

    /// A failure with no fallback available.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            is_demo: false,
        }
    }

    /// True when the backend answered with real data.
    pub fn is_live(&self) -> bool {
        self.data.is_some() && !self.is_demo
    }

    /// Map the payload, keeping the error and demo flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        ApiResult {
            data: self.data.map(f),
            error: self.error,
            is_demo: self.is_demo,
        }
    }

    /// Convert into a `Result`, treating demo data as data.
    pub fn into_result(self) -> Result<T, FoadsError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(message)) => Err(FoadsError::backend(message)),
            (None, None) => Err(FoadsError::backend("Empty response")),
        }
    }
}

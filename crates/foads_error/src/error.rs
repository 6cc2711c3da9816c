//! Crate-level error type.

use crate::{
    AuthError, ConfigError, HttpError, JobError, StorageError, ValidationError,
};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum FoadsErrorKind {
    /// HTTP error
    Http(HttpError),
    /// Authentication error
    Auth(AuthError),
    /// Local asset store error
    Storage(StorageError),
    /// Job tracking error
    Job(JobError),
    /// Configuration error
    Config(ConfigError),
    /// Generation parameter rejected
    Validation(ValidationError),
    /// Business error reported by the backend, e.g. "No face detected"
    #[from(skip)]
    Backend(String),
}

impl std::fmt::Display for FoadsErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FoadsErrorKind::Http(e) => write!(f, "{}", e),
            FoadsErrorKind::Auth(e) => write!(f, "{}", e),
            FoadsErrorKind::Storage(e) => write!(f, "{}", e),
            FoadsErrorKind::Job(e) => write!(f, "{}", e),
            FoadsErrorKind::Config(e) => write!(f, "{}", e),
            FoadsErrorKind::Validation(e) => write!(f, "{}", e),
            FoadsErrorKind::Backend(msg) => write!(f, "{}", msg),
        }
    }
}

/// FoadsIA error with kind discrimination.
///
/// # Examples
///
/// ```
/// use foads_error::{FoadsError, FoadsErrorKind};
///
/// let err = FoadsError::backend("No face detected in source image");
/// assert_eq!(err.user_message(), "No face detected in source image");
/// assert!(matches!(err.kind(), FoadsErrorKind::Backend(_)));
/// ```
#[derive(Debug)]
pub struct FoadsError(Box<FoadsErrorKind>);

impl FoadsError {
    /// Create a new error from a kind.
    pub fn new(kind: FoadsErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Create an error carrying a message reported by the backend.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(FoadsErrorKind::Backend(message.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FoadsErrorKind {
        &self.0
    }

    /// Message suitable for an inline error or toast, without location noise.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FoadsErrorKind::Backend(msg) => msg.clone(),
            FoadsErrorKind::Http(e) => e.message.clone(),
            FoadsErrorKind::Auth(e) => e.message.clone(),
            FoadsErrorKind::Config(e) => e.message.clone(),
            FoadsErrorKind::Validation(e) => format!("{} {}", e.field, e.reason),
            FoadsErrorKind::Storage(e) => e.kind.to_string(),
            FoadsErrorKind::Job(e) => e.kind.to_string(),
        }
    }
}

impl std::fmt::Display for FoadsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Foads Error: {}", self.0)
    }
}

impl std::error::Error for FoadsError {}

impl<T> From<T> for FoadsError
where
    T: Into<FoadsErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for FoadsIA operations.
pub type FoadsResult<T> = std::result::Result<T, FoadsError>;

//! Error types for the FoadsIA client.
//!
//! Every error records the file and line where it was constructed so that a
//! log line is enough to find the failing call site.

mod auth;
mod config;
mod error;
mod http;
mod job;
mod retry;
mod storage;
mod validation;

pub use auth::AuthError;
pub use config::ConfigError;
pub use error::{FoadsError, FoadsErrorKind, FoadsResult};
pub use http::HttpError;
pub use job::{JobError, JobErrorKind};
pub use retry::RetryableError;
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;

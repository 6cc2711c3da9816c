//! Storage error types.

/// Kinds of local storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Could not open or create the store
    #[display("Failed to open store: {}", _0)]
    Open(String),
    /// A read or write transaction failed
    #[display("Transaction failed: {}", _0)]
    Transaction(String),
    /// A stored row could not be decoded into an asset
    #[display("Corrupt record: {}", _0)]
    Corrupt(String),
    /// The blocking storage task did not complete
    #[display("Storage task failed: {}", _0)]
    Task(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use foads_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Open("/tmp/assets.db".to_string()));
/// assert!(format!("{}", err).contains("Failed to open store"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Validation errors for generation parameters.

/// A generation parameter was rejected before any request was sent.
///
/// # Examples
///
/// ```
/// use foads_error::ValidationError;
///
/// let err = ValidationError::new("steps", "must be between 1 and 50");
/// assert_eq!(err.field, "steps");
/// assert!(format!("{}", err).contains("must be between"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} {} at line {} in {}", field, reason, line, file)]
pub struct ValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// Why the value was rejected
    pub reason: String,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            field,
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

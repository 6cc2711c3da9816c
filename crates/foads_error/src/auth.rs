//! Authentication error types.

/// Anonymous login failed, or the backend kept rejecting a fresh token.
#[derive(Debug, Clone)]
pub struct AuthError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl AuthError {
    /// Create a new AuthError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use foads_error::AuthError;
    ///
    /// let err = AuthError::new("Token has expired");
    /// assert!(format!("{}", err).contains("Auth Error"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Auth Error: {} at line {} in {}",
            self.message, self.line, self.file
        )
    }
}

impl std::error::Error for AuthError {}

use thiserror::Error;

/// Default process exit code for validation failures.
pub const VALIDATION_EXIT_CODE: i32 = 1;

/// A value was provided but did not pass type or filter validation.
///
/// Validation failures describe bad data rather than a malformed
/// invocation, so they are not classified as client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    exit_code: i32,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: VALIDATION_EXIT_CODE,
        }
    }

    /// Override the exit code reported for this error.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

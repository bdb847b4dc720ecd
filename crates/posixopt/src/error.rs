use thiserror::Error;

pub use posixopt_types::{VALIDATION_EXIT_CODE, ValidationError};

/// Default process exit code for usage errors.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Conventional exit code for a process interrupted by SIGINT.
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// The command line itself is malformed: unknown option, missing value,
/// conflicting commands, missing required option and so on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UsageError {
    message: String,
    exit_code: i32,
}

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: USAGE_EXIT_CODE,
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

/// Any failure of the parsing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(UsageError::new(message))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Usage(e) => e.message(),
            Self::Validation(e) => e.message(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(e) => e.exit_code(),
            Self::Validation(e) => e.exit_code(),
        }
    }

    /// Whether the caller's invocation (rather than the supplied data) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    pub fn with_exit_code(self, exit_code: i32) -> Self {
        match self {
            Self::Usage(e) => Self::Usage(e.with_exit_code(exit_code)),
            Self::Validation(e) => Self::Validation(e.with_exit_code(exit_code)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Mistakes made while declaring options, types or usage definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("option must have at least one name")]
    NoNames,

    #[error("invalid option name '{0}'")]
    InvalidName(String),

    #[error("option name '{name}' is already registered for '{existing}'")]
    DuplicateName { name: String, existing: String },

    #[error("usage definition references unknown command '{0}'")]
    UnknownCommand(String),

    #[error("usage definition for '{command}' references unknown option '{option}'")]
    UnknownOption { command: String, option: String },

    #[error("invalid default for '{name}': {message}")]
    InvalidDefault { name: String, message: String },
}

// ================================================================
// File: tabstatus-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    /// The status (or a value such as a max length) failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The acting principal lacks a required capability.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Reading or rewriting the persisted status document failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Uuid error: {0}")]
    Uuid(#[from] uuid::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Errors that are answered to the acting principal rather than logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::ValidationError(_) | Error::PermissionDenied(_)
        )
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

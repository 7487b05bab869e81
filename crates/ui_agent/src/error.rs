/// Error types for UI dump decoding, searching and device operations
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdbError {
    #[error("Malformed UI dump: {0}")]
    MalformedDocument(String),

    #[error("Bad bounds format: {0:?}")]
    MalformedBounds(String),

    #[error("Not found")]
    NotFound,

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdbError {
    /// Wrap any decoder-side failure as `MalformedDocument`
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        AdbError::MalformedDocument(err.to_string())
    }

    /// Whether this error only means that nothing matched
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdbError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, AdbError>;

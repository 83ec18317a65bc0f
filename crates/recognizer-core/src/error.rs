use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Backend(BackendError),

    #[error("Error parsing the response body: {0}")]
    Decode(String),

    #[error("Category not found for pattern: {0}")]
    NotFound(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// True when the backend reported that the target index does not exist.
    pub fn is_index_not_found(&self) -> bool {
        matches!(self, Error::Backend(e) if e.kind == "index_not_found_exception")
    }
}

impl From<BackendError> for Error {
    fn from(e: BackendError) -> Self { Error::Backend(e) }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A failure reported by the search backend.
///
/// Rendered as `[status] type: reason`. Root causes are kept for callers
/// that want to dig deeper but are not part of the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    pub status: u16,
    pub kind: String,
    pub reason: String,
    pub root_causes: Vec<BackendError>,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.kind, self.reason)
    }
}

impl std::error::Error for BackendError {}

//! Client errors.

use patient_roster_core::{ValidationError, ViewError};
use thiserror::Error;

/// Errors surfaced by remote-mode operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `message` is the backend's `error` text when it
    /// sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the backend answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

//! Errors from talking to the content API

use thiserror::Error;

/// Why a fetch produced no data
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No URL to fetch")]
    NoUrls,
}

impl FetchError {
    /// HTTP status for status errors
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

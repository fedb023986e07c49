//! Fetch failure types
//!
//! `AttemptFailure` describes why one attempt failed; it is logged and
//! retried. `FetchError` is what a caller sees once the attempt budget is
//! spent.

use thiserror::Error;

use super::browser::BrowserError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("captured document too short ({length} < {minimum} characters)")]
    ShortCapture { length: usize, minimum: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("All {attempts} fetch attempts failed for {url}: {last_error}")]
    AttemptsExhausted {
        url: String,
        attempts: u32,
        last_error: AttemptFailure,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::AttemptsExhausted { url, .. } | FetchError::InvalidUrl { url, .. } => url,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

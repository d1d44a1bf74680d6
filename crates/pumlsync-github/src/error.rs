//! Error types for GitHub integration.

use std::path::PathBuf;

/// Error from GitHub API operations.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Push payload lacks data needed to locate the repository or its commits.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PayloadError {
    /// Payload has no `repository` object.
    #[error("Unable to get \"repository\" from payload")]
    MissingRepository,

    /// Repository object has no owner login or name.
    #[error("Unable to get \"repository.{0}\" from payload")]
    MissingField(&'static str),

    /// Payload lists no commits to use as the parent of a new commit.
    #[error("payload contains no commits")]
    NoCommits,

    /// Event file could not be read.
    #[error("failed to read event payload {}: {source}", .path.display())]
    Read {
        /// Path of the event file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Payload is not valid JSON or has the wrong shape.
    #[error("invalid event payload: {0}")]
    Json(#[from] serde_json::Error),
}

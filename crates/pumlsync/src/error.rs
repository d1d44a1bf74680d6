//! CLI error types.

use pumlsync_config::ConfigError;
use pumlsync_github::{GitHubError, PayloadError};
use pumlsync_sync::SyncError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Payload(#[from] PayloadError),

    #[error("{0}")]
    GitHub(#[from] GitHubError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Validation(String),
}

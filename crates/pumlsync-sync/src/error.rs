//! Synchronization error type.

use pumlsync_diagrams::{RenderError, RetrieveError};
use pumlsync_github::{GitHubError, PayloadError};

/// Error during diagram synchronization.
///
/// Any error aborts the run. Blobs or trees created before the failure are
/// left unreferenced.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SyncError {
    /// Push payload is incomplete.
    #[error("{0}")]
    Payload(#[from] PayloadError),

    /// GitHub API call failed.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] GitHubError),

    /// Changed file could not be read from the workspace.
    #[error("{0}")]
    Retrieve(#[from] RetrieveError),

    /// Diagram could not be rendered.
    #[error("failed to render {path}: {source}")]
    Render {
        /// Output path of the diagram.
        path: String,
        /// Underlying render error.
        source: RenderError,
    },
}

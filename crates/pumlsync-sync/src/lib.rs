//! Diagram synchronization for pumlsync.
//!
//! This crate provides the [`TreeSynchronizer`] that turns a push into at most
//! one generated commit:
//!
//! 1. Resolve the files changed by the pushed commits
//! 2. Extract `PlantUML` diagrams from them
//! 3. Render each diagram to SVG
//! 4. Keep the SVGs whose content differs from the stored file
//! 5. Commit them on top of the last pushed commit and move the branch
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pumlsync_diagrams::PlantUmlRenderer;
//! use pumlsync_github::{GitHubClient, PushPayload};
//! use pumlsync_sync::{SyncConfig, SyncOutcome, TreeSynchronizer};
//!
//! let client = GitHubClient::new("https://api.github.com", &token);
//! let renderer = PlantUmlRenderer::new();
//! let sync = TreeSynchronizer::new(&client, &renderer, SyncConfig::default());
//!
//! let payload = PushPayload::from_file(Path::new("event.json"))?;
//! match sync.run(&payload)? {
//!     SyncOutcome::NoChanges => {}
//!     SyncOutcome::Committed(result) => println!("{}", result.sha),
//! }
//!
//! // Or dry-run to preview changes
//! let plan = sync.plan(&payload)?;
//! ```

mod error;
mod path;
mod result;
mod synchronizer;

use std::path::PathBuf;

pub use error::SyncError;
pub use path::output_path;
pub use result::{CommitResult, SyncOutcome, SyncPlan};
pub use synchronizer::TreeSynchronizer;

/// Default message of generated commits.
pub const DEFAULT_MESSAGE: &str = "Generate SVG files for PlantUML diagrams";

/// Configuration for a synchronization run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory for generated SVGs. `None` or `.` writes next to each source.
    pub output_dir: Option<String>,
    /// Message of the generated commit.
    pub message: String,
    /// Force-update the branch ref.
    pub force: bool,
    /// Checkout the changed files are read from.
    pub workspace: PathBuf,
    /// Files to process instead of those changed by the push.
    pub files: Option<Vec<String>>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            message: DEFAULT_MESSAGE.to_owned(),
            force: false,
            workspace: PathBuf::from("."),
            files: None,
        }
    }
}

//! GitHub integration for pumlsync.
//!
//! This crate reads a push event, resolves the pushed commits through the
//! GitHub REST API, and writes generated files back as a single commit using
//! the git database API (blobs, trees, commits, refs).
//!
//! # Architecture
//!
//! - [`GitHost`] trait with the repository operations the synchronizer needs
//! - [`GitHubClient`] implementation over the REST API
//! - [`resolve_commits`], [`updated_files`] and [`baseline`] for change-set resolution
//! - [`MockGitHost`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pumlsync_github::{GitHubClient, PushPayload, resolve_commits, updated_files};
//!
//! let payload = PushPayload::from_file(Path::new("event.json"))?;
//! let client = GitHubClient::new("https://api.github.com", &token);
//! let commits = resolve_commits(&client, &payload.repo()?, &payload.commits)?;
//! for path in updated_files(&commits) {
//!     println!("{path}");
//! }
//! ```

mod client;
mod error;
mod hash;
mod host;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod resolver;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use error::{GitHubError, PayloadError};
pub use hash::git_blob_sha;
pub use host::GitHost;
#[cfg(any(test, feature = "mock"))]
pub use mock::{CreatedCommit, CreatedTree, MockGitHost, RefUpdateCall};
pub use resolver::{baseline, branch_payload, resolve_commits, updated_files};
pub use types::{
    ChangedFile, CommitData, CommitDetail, CommitStub, CommitSummary, FileStatus, ObjectRef,
    Owner, PayloadRepository, PushPayload, RepoRef, TreeEntry, TreeEntryKind,
};

//! Git hosting service abstraction.
//!
//! [`GitHost`] lists exactly the repository operations the synchronizer needs,
//! so it can run against [`GitHubClient`](crate::GitHubClient) or an in-memory
//! host in tests.

use crate::error::GitHubError;
use crate::types::{CommitDetail, CommitSummary, RepoRef, TreeEntry};

/// Repository operations on a git hosting service.
///
/// Implementations must be shareable across threads: commit details are
/// fetched in parallel.
pub trait GitHost: Send + Sync {
    /// Fetch a commit with its changed files.
    fn get_commit(&self, repo: &RepoRef, sha: &str) -> Result<CommitDetail, GitHubError>;

    /// Name of the repository's default branch.
    fn get_default_branch(&self, repo: &RepoRef) -> Result<String, GitHubError>;

    /// Commits reachable from `branch`, newest first.
    fn list_commits(&self, repo: &RepoRef, branch: &str)
    -> Result<Vec<CommitSummary>, GitHubError>;

    /// Blob sha stored at `path` on `git_ref`.
    ///
    /// Returns `Ok(None)` when nothing exists at the path.
    fn get_content_sha(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<String>, GitHubError>;

    /// Store `content` as a blob and return its sha.
    fn create_blob(&self, repo: &RepoRef, content: &[u8]) -> Result<String, GitHubError>;

    /// Create a tree of `entries` layered on `base_tree` and return its sha.
    fn create_tree(
        &self,
        repo: &RepoRef,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GitHubError>;

    /// Create a commit and return its sha.
    fn create_commit(
        &self,
        repo: &RepoRef,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, GitHubError>;

    /// Point `git_ref` (without the `refs/` prefix) at `sha`.
    fn update_ref(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), GitHubError>;
}

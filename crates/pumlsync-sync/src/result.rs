//! Synchronization results.

/// Outcome of a synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every rendered diagram matched the stored file; nothing was written.
    NoChanges,
    /// A commit with the changed diagrams was created and the ref updated.
    Committed(CommitResult),
}

/// Commit created by a synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// Sha of the new commit.
    pub sha: String,
    /// Updated ref without the `refs/` prefix (e.g., `heads/main`).
    pub git_ref: String,
    /// Output paths written by the commit.
    pub paths: Vec<String>,
}

/// Result of a dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Output paths whose content would change.
    pub changed: Vec<String>,
    /// Output paths already up to date.
    pub unchanged: Vec<String>,
}

impl SyncPlan {
    /// Whether a run would create a commit.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

//! Commit types returned by the commits API.

use serde::{Deserialize, Serialize};

/// Reference to a git object by sha.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObjectRef {
    /// Object sha.
    pub sha: String,
}

/// Full commit detail (`GET /repos/{owner}/{repo}/commits/{ref}`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommitDetail {
    /// Commit sha.
    pub sha: String,
    /// Git commit data.
    pub commit: CommitData,
    /// Files changed by this commit.
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

impl CommitDetail {
    /// Sha of the commit's root tree.
    #[must_use]
    pub fn tree_sha(&self) -> &str {
        &self.commit.tree.sha
    }
}

/// Git-level commit data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommitData {
    /// Root tree of the commit.
    pub tree: ObjectRef,
    /// Commit message.
    #[serde(default)]
    pub message: String,
}

/// File changed by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChangedFile {
    /// Repository-relative path.
    pub filename: String,
    /// Change status.
    pub status: FileStatus,
}

/// Change status of a file in a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// Entry of the commit list (`GET /repos/{owner}/{repo}/commits`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommitSummary {
    /// Commit sha.
    pub sha: String,
}

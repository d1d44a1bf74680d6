//! Git database types (blobs, trees, commits, refs).

use serde::{Deserialize, Serialize};

/// Entry of a tree to create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeEntry {
    /// Repository-relative path.
    pub path: String,
    /// File mode (`100644` for regular files).
    pub mode: String,
    /// Object type.
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
    /// Sha of the referenced object.
    pub sha: String,
}

impl TreeEntry {
    /// Regular, non-executable file entry pointing at a blob.
    #[must_use]
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: "100644".to_owned(),
            kind: TreeEntryKind::Blob,
            sha: sha.into(),
        }
    }
}

/// Object type of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    Commit,
}

/// Repository metadata (`GET /repos/{owner}/{repo}`).
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryInfo {
    pub default_branch: String,
}

/// File metadata from the contents API.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentEntry {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewBlob<'a> {
    pub content: &'a str,
    pub encoding: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewTree<'a> {
    pub base_tree: &'a str,
    pub tree: &'a [TreeEntry],
}

#[derive(Debug, Serialize)]
pub(crate) struct NewCommit<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct RefUpdate<'a> {
    pub sha: &'a str,
    pub force: bool,
}

//! In-memory git host for testing.
//!
//! Provides [`MockGitHost`] for unit testing without network access. Blob shas
//! are real git blob ids of the stored content, so unchanged content compares
//! equal the same way it does on GitHub. Every write is recorded for
//! assertions.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::GitHubError;
use crate::hash::git_blob_sha;
use crate::host::GitHost;
use crate::types::{
    ChangedFile, CommitData, CommitDetail, CommitSummary, FileStatus, ObjectRef, RepoRef,
    TreeEntry,
};

/// Tree recorded by [`MockGitHost::create_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTree {
    /// Base tree sha.
    pub base_tree: String,
    /// Tree entries.
    pub entries: Vec<TreeEntry>,
}

/// Commit recorded by [`MockGitHost::create_commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCommit {
    /// Commit message.
    pub message: String,
    /// Tree sha.
    pub tree: String,
    /// Parent shas.
    pub parents: Vec<String>,
}

/// Ref update recorded by [`MockGitHost::update_ref`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdateCall {
    /// Ref without `refs/` prefix.
    pub git_ref: String,
    /// New target sha.
    pub sha: String,
    /// Whether the update was forced.
    pub force: bool,
}

#[derive(Debug, Default)]
struct Recorded {
    blobs: Vec<Vec<u8>>,
    content_lookups: Vec<(String, String)>,
    trees: Vec<CreatedTree>,
    commits: Vec<CreatedCommit>,
    ref_updates: Vec<RefUpdateCall>,
}

/// Mock git host for testing.
///
/// # Example
///
/// ```ignore
/// use pumlsync_github::{FileStatus, MockGitHost};
///
/// let host = MockGitHost::new()
///     .with_commit("c1", "tree1", &[("docs/a.puml", FileStatus::Added)])
///     .with_content("docs/a.svg", b"<svg/>");
/// ```
#[derive(Debug, Default)]
pub struct MockGitHost {
    commits: HashMap<String, CommitDetail>,
    contents: HashMap<String, String>,
    default_branch: Option<String>,
    branches: HashMap<String, Vec<String>>,
    recorded: Mutex<Recorded>,
}

impl MockGitHost {
    /// Create an empty mock host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with its tree sha and changed files.
    #[must_use]
    pub fn with_commit(mut self, sha: &str, tree: &str, files: &[(&str, FileStatus)]) -> Self {
        let detail = CommitDetail {
            sha: sha.to_owned(),
            commit: CommitData {
                tree: ObjectRef {
                    sha: tree.to_owned(),
                },
                message: String::new(),
            },
            files: files
                .iter()
                .map(|(filename, status)| ChangedFile {
                    filename: (*filename).to_owned(),
                    status: *status,
                })
                .collect(),
        };
        self.commits.insert(sha.to_owned(), detail);
        self
    }

    /// Store content at a path; lookups return its git blob sha.
    #[must_use]
    pub fn with_content(mut self, path: &str, content: &[u8]) -> Self {
        self.contents.insert(path.to_owned(), git_blob_sha(content));
        self
    }

    /// Set the repository's default branch.
    #[must_use]
    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = Some(branch.to_owned());
        self
    }

    /// Set a branch's commit list, newest first.
    #[must_use]
    pub fn with_branch_commits(mut self, branch: &str, shas: &[&str]) -> Self {
        self.branches.insert(
            branch.to_owned(),
            shas.iter().map(|s| (*s).to_owned()).collect(),
        );
        self
    }

    /// Contents of created blobs, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn blobs(&self) -> Vec<Vec<u8>> {
        self.recorded.lock().unwrap().blobs.clone()
    }

    /// `(path, ref)` pairs passed to content lookups, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn content_lookups(&self) -> Vec<(String, String)> {
        self.recorded.lock().unwrap().content_lookups.clone()
    }

    /// Created trees, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn trees(&self) -> Vec<CreatedTree> {
        self.recorded.lock().unwrap().trees.clone()
    }

    /// Created commits, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn created_commits(&self) -> Vec<CreatedCommit> {
        self.recorded.lock().unwrap().commits.clone()
    }

    /// Ref updates, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn ref_updates(&self) -> Vec<RefUpdateCall> {
        self.recorded.lock().unwrap().ref_updates.clone()
    }
}

fn not_found(what: &str) -> GitHubError {
    GitHubError::HttpResponse {
        status: 422,
        body: format!("No commit found for {what}"),
    }
}

impl GitHost for MockGitHost {
    fn get_commit(&self, _repo: &RepoRef, sha: &str) -> Result<CommitDetail, GitHubError> {
        self.commits.get(sha).cloned().ok_or_else(|| not_found(sha))
    }

    fn get_default_branch(&self, _repo: &RepoRef) -> Result<String, GitHubError> {
        Ok(self
            .default_branch
            .clone()
            .unwrap_or_else(|| "main".to_owned()))
    }

    fn list_commits(
        &self,
        _repo: &RepoRef,
        branch: &str,
    ) -> Result<Vec<CommitSummary>, GitHubError> {
        let shas = self.branches.get(branch).ok_or_else(|| not_found(branch))?;
        Ok(shas
            .iter()
            .map(|sha| CommitSummary { sha: sha.clone() })
            .collect())
    }

    fn get_content_sha(
        &self,
        _repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<String>, GitHubError> {
        self.recorded
            .lock()
            .unwrap()
            .content_lookups
            .push((path.to_owned(), git_ref.to_owned()));
        Ok(self.contents.get(path).cloned())
    }

    fn create_blob(&self, _repo: &RepoRef, content: &[u8]) -> Result<String, GitHubError> {
        self.recorded.lock().unwrap().blobs.push(content.to_vec());
        Ok(git_blob_sha(content))
    }

    fn create_tree(
        &self,
        _repo: &RepoRef,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GitHubError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.trees.push(CreatedTree {
            base_tree: base_tree.to_owned(),
            entries: entries.to_vec(),
        });
        Ok(format!("tree-{}", recorded.trees.len()))
    }

    fn create_commit(
        &self,
        _repo: &RepoRef,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, GitHubError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.commits.push(CreatedCommit {
            message: message.to_owned(),
            tree: tree.to_owned(),
            parents: parents.to_vec(),
        });
        Ok(format!("commit-{}", recorded.commits.len()))
    }

    fn update_ref(
        &self,
        _repo: &RepoRef,
        git_ref: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), GitHubError> {
        self.recorded.lock().unwrap().ref_updates.push(RefUpdateCall {
            git_ref: git_ref.to_owned(),
            sha: sha.to_owned(),
            force,
        });
        Ok(())
    }
}

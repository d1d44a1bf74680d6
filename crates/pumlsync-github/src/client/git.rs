//! Git database writes (blobs, trees, commits, refs).

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde::Deserialize;
use tracing::info;

use super::{GitHubClient, encode_path};
use crate::error::GitHubError;
use crate::types::{NewBlob, NewCommit, NewTree, ObjectRef, RefUpdate, RepoRef, TreeEntry};

/// Ref returned by the refs API.
#[derive(Debug, Deserialize)]
struct RefObject {
    object: ObjectRef,
}

impl GitHubClient {
    /// Store `content` as a base64 blob and return its sha.
    pub fn create_blob(&self, repo: &RepoRef, content: &[u8]) -> Result<String, GitHubError> {
        let url = format!("{}/git/blobs", self.repo_url(repo));
        let encoded = BASE64_STANDARD.encode(content);

        info!("Creating blob ({} bytes) in {}", content.len(), repo);

        let blob: ObjectRef = Self::send_json(
            self.post(&url),
            &NewBlob {
                content: &encoded,
                encoding: "base64",
            },
        )?;
        Ok(blob.sha)
    }

    /// Create a tree of `entries` on top of `base_tree` and return its sha.
    pub fn create_tree(
        &self,
        repo: &RepoRef,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GitHubError> {
        let url = format!("{}/git/trees", self.repo_url(repo));

        info!(
            "Creating tree with {} entries on {} in {}",
            entries.len(),
            base_tree,
            repo
        );

        let tree: ObjectRef = Self::send_json(
            self.post(&url),
            &NewTree {
                base_tree,
                tree: entries,
            },
        )?;
        Ok(tree.sha)
    }

    /// Create a commit and return its sha.
    pub fn create_commit(
        &self,
        repo: &RepoRef,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, GitHubError> {
        let url = format!("{}/git/commits", self.repo_url(repo));

        info!("Creating commit for tree {} in {}", tree, repo);

        let commit: ObjectRef = Self::send_json(
            self.post(&url),
            &NewCommit {
                message,
                tree,
                parents,
            },
        )?;
        Ok(commit.sha)
    }

    /// Point `git_ref` (e.g., `heads/main`) at `sha`.
    pub fn update_ref(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), GitHubError> {
        let url = format!("{}/git/refs/{}", self.repo_url(repo), encode_path(git_ref));

        info!("Updating {} to {} (force={})", git_ref, sha, force);

        let updated: RefObject = Self::send_json(self.patch(&url), &RefUpdate { sha, force })?;
        if updated.object.sha != sha {
            tracing::warn!(
                "Ref {} points at {} after update, expected {}",
                git_ref,
                updated.object.sha,
                sha
            );
        }
        Ok(())
    }
}

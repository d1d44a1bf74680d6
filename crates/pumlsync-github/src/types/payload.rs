//! Push event payload.
//!
//! Only the fields needed to locate the repository and its pushed commits are
//! modelled. Optional parts are checked when the repository is resolved so
//! that a malformed payload fails with a [`PayloadError`] naming the field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

/// Push webhook payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PushPayload {
    /// Full ref that was pushed (e.g., `refs/heads/main`).
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Repository the push belongs to.
    #[serde(default)]
    pub repository: Option<PayloadRepository>,
    /// Pushed commits in payload order.
    #[serde(default)]
    pub commits: Vec<CommitStub>,
}

/// Repository section of the payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PayloadRepository {
    /// Repository owner.
    #[serde(default)]
    pub owner: Option<Owner>,
    /// Repository name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Repository owner.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Owner {
    /// Owner login (user or organization).
    #[serde(default)]
    pub login: Option<String>,
}

/// Commit listed in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitStub {
    /// Commit sha.
    pub id: String,
}

/// Owner and name identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` slug (as in `GITHUB_REPOSITORY`).
    #[must_use]
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, name) = slug.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl PushPayload {
    /// Build a payload for a branch and its commits (newest last).
    #[must_use]
    pub fn for_branch(repo: &RepoRef, branch: &str, commits: Vec<CommitStub>) -> Self {
        Self {
            git_ref: format!("refs/heads/{branch}"),
            repository: Some(PayloadRepository {
                owner: Some(Owner {
                    login: Some(repo.owner.clone()),
                }),
                name: Some(repo.name.clone()),
            }),
            commits,
        }
    }

    /// Parse a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Json`] if the text is not a push payload.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a payload from an event file (as in `GITHUB_EVENT_PATH`).
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Read`] if the file cannot be read and
    /// [`PayloadError::Json`] if it is not a push payload.
    pub fn from_file(path: &Path) -> Result<Self, PayloadError> {
        let json = std::fs::read_to_string(path).map_err(|source| PayloadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Resolve the repository the push belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository, its owner login, or its name is missing.
    pub fn repo(&self) -> Result<RepoRef, PayloadError> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(PayloadError::MissingRepository)?;
        let owner = repository
            .owner
            .as_ref()
            .and_then(|o| o.login.as_deref())
            .filter(|l| !l.is_empty())
            .ok_or(PayloadError::MissingField("owner.login"))?;
        let name = repository
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(PayloadError::MissingField("name"))?;
        Ok(RepoRef::new(owner, name))
    }

    /// Ref to update through the git refs API (`refs/` prefix removed).
    #[must_use]
    pub fn update_ref(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/")
            .unwrap_or(&self.git_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PUSH: &str = r#"{
        "ref": "refs/heads/main",
        "before": "0000",
        "repository": {
            "name": "docs",
            "full_name": "octo/docs",
            "owner": { "login": "octo", "name": "octo" }
        },
        "commits": [
            { "id": "aaa", "message": "first" },
            { "id": "bbb", "message": "second" }
        ]
    }"#;

    #[test]
    fn test_parse_push_payload() {
        let payload = PushPayload::from_json(PUSH).unwrap();

        assert_eq!(payload.git_ref, "refs/heads/main");
        assert_eq!(payload.repo().unwrap(), RepoRef::new("octo", "docs"));
        assert_eq!(
            payload.commits,
            vec![
                CommitStub {
                    id: "aaa".to_owned()
                },
                CommitStub {
                    id: "bbb".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_update_ref_strips_prefix() {
        let payload = PushPayload::from_json(PUSH).unwrap();
        assert_eq!(payload.update_ref(), "heads/main");

        let tag = PushPayload::from_json(r#"{"ref": "heads/dev"}"#).unwrap();
        assert_eq!(tag.update_ref(), "heads/dev");
    }

    #[test]
    fn test_missing_repository() {
        let payload = PushPayload::from_json(r#"{"ref": "refs/heads/main", "commits": []}"#).unwrap();

        assert!(matches!(
            payload.repo(),
            Err(PayloadError::MissingRepository)
        ));
    }

    #[test]
    fn test_missing_owner_login() {
        let payload = PushPayload::from_json(
            r#"{"ref": "refs/heads/main", "repository": {"name": "docs", "owner": {}}}"#,
        )
        .unwrap();

        let err = payload.repo().unwrap_err();

        assert!(matches!(err, PayloadError::MissingField("owner.login")));
        assert!(err.to_string().contains("repository.owner.login"));
    }

    #[test]
    fn test_missing_name() {
        let payload = PushPayload::from_json(
            r#"{"ref": "refs/heads/main", "repository": {"owner": {"login": "octo"}}}"#,
        )
        .unwrap();

        assert!(matches!(
            payload.repo(),
            Err(PayloadError::MissingField("name"))
        ));
    }

    #[test]
    fn test_missing_ref_is_json_error() {
        let err = PushPayload::from_json(r#"{"commits": []}"#).unwrap_err();

        assert!(matches!(err, PayloadError::Json(_)));
    }

    #[test]
    fn test_for_branch_round_trips_repo() {
        let repo = RepoRef::new("octo", "docs");
        let payload = PushPayload::for_branch(&repo, "main", Vec::new());

        assert_eq!(payload.git_ref, "refs/heads/main");
        assert_eq!(payload.repo().unwrap(), repo);
    }

    #[test]
    fn test_parse_repo_slug() {
        assert_eq!(RepoRef::parse("octo/docs"), Some(RepoRef::new("octo", "docs")));
        assert_eq!(RepoRef::parse("octo"), None);
        assert_eq!(RepoRef::parse("/docs"), None);
        assert_eq!(RepoRef::parse("a/b/c"), None);
    }
}

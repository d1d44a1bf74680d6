//! Commit and repository reads.

use tracing::info;

use super::{GitHubClient, encode_segment, read_json};
use crate::error::GitHubError;
use crate::types::{CommitDetail, CommitSummary, RepoRef, RepositoryInfo};

impl GitHubClient {
    /// Fetch a commit with its changed files.
    pub fn get_commit(&self, repo: &RepoRef, sha: &str) -> Result<CommitDetail, GitHubError> {
        let url = format!("{}/commits/{}", self.repo_url(repo), encode_segment(sha));

        info!("Getting commit {} of {}", sha, repo);

        let response = self.get(&url).call()?;
        read_json(response)
    }

    /// Name of the repository's default branch.
    pub fn get_default_branch(&self, repo: &RepoRef) -> Result<String, GitHubError> {
        info!("Getting default branch of {}", repo);

        let response = self.get(&self.repo_url(repo)).call()?;
        let info: RepositoryInfo = read_json(response)?;
        Ok(info.default_branch)
    }

    /// First page of commits reachable from `branch`, newest first.
    pub fn list_commits(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Vec<CommitSummary>, GitHubError> {
        let url = format!("{}/commits", self.repo_url(repo));

        info!("Listing commits of {} on {}", repo, branch);

        let response = self.get(&url).query("sha", branch).call()?;
        read_json(response)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::FileStatus;

    fn repo() -> RepoRef {
        RepoRef::new("octo", "docs")
    }

    #[test]
    fn test_get_commit() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/octo/docs/commits/abc")
            .match_header("authorization", "Bearer t0ken")
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_body(
                r#"{
                    "sha": "abc",
                    "commit": {"message": "docs", "tree": {"sha": "tree1"}},
                    "files": [
                        {"filename": "docs/a.puml", "status": "added", "additions": 3},
                        {"filename": "old.md", "status": "removed"}
                    ]
                }"#,
            )
            .create();

        let client = GitHubClient::new(&server.url(), "t0ken");
        let commit = client.get_commit(&repo(), "abc").unwrap();

        mock.assert();
        assert_eq!(commit.sha, "abc");
        assert_eq!(commit.tree_sha(), "tree1");
        assert_eq!(commit.files.len(), 2);
        assert_eq!(commit.files[0].filename, "docs/a.puml");
        assert_eq!(commit.files[1].status, FileStatus::Removed);
    }

    #[test]
    fn test_get_commit_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/octo/docs/commits/missing")
            .with_status(422)
            .with_body(r#"{"message": "No commit found for SHA: missing"}"#)
            .create();

        let client = GitHubClient::new(&server.url(), "t0ken");
        let err = client.get_commit(&repo(), "missing").unwrap_err();

        match err {
            GitHubError::HttpResponse { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("No commit found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_branch_and_commit_list() {
        let mut server = mockito::Server::new();
        let _repo_mock = server
            .mock("GET", "/repos/octo/docs")
            .with_status(200)
            .with_body(r#"{"name": "docs", "default_branch": "trunk"}"#)
            .create();
        let _list_mock = server
            .mock("GET", "/repos/octo/docs/commits")
            .match_query(Matcher::UrlEncoded("sha".into(), "trunk".into()))
            .with_status(200)
            .with_body(r#"[{"sha": "new"}, {"sha": "old"}]"#)
            .create();

        let client = GitHubClient::new(&server.url(), "t0ken");
        let branch = client.get_default_branch(&repo()).unwrap();
        let commits = client.list_commits(&repo(), &branch).unwrap();

        assert_eq!(branch, "trunk");
        let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["new", "old"]);
    }
}

//! GitHub REST API client.
//!
//! Provides a sync HTTP client for the subset of the GitHub REST API used to
//! read pushed commits and write generated files back (git database API).

mod commits;
mod contents;
mod git;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::error::GitHubError;
use crate::host::GitHost;
use crate::types::{CommitDetail, CommitSummary, RepoRef, TreeEntry};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version requested from GitHub.
const API_VERSION: &str = "2022-11-28";

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// GitHub REST API client.
pub struct GitHubClient {
    agent: Agent,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for `api_url` authenticating with `token`.
    ///
    /// # Arguments
    /// * `api_url` - API base URL (e.g., `https://api.github.com`)
    /// * `token` - installation or personal access token
    #[must_use]
    pub fn new(api_url: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }

    /// Get the repository API base URL.
    fn repo_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url,
            encode_segment(&repo.owner),
            encode_segment(&repo.name)
        )
    }

    /// Attach authentication and API headers.
    fn with_headers<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", concat!("pumlsync/", env!("CARGO_PKG_VERSION")))
    }

    fn get(&self, url: &str) -> RequestBuilder<WithoutBody> {
        self.with_headers(self.agent.get(url))
    }

    fn post(&self, url: &str) -> RequestBuilder<WithBody> {
        self.with_headers(self.agent.post(url))
    }

    fn patch(&self, url: &str) -> RequestBuilder<WithBody> {
        self.with_headers(self.agent.patch(url))
    }

    /// Send a JSON body and decode the JSON response.
    fn send_json<T: DeserializeOwned>(
        request: RequestBuilder<WithBody>,
        body: &impl Serialize,
    ) -> Result<T, GitHubError> {
        let response = request.send_json(body)?;
        read_json(response)
    }
}

impl GitHost for GitHubClient {
    fn get_commit(&self, repo: &RepoRef, sha: &str) -> Result<CommitDetail, GitHubError> {
        Self::get_commit(self, repo, sha)
    }

    fn get_default_branch(&self, repo: &RepoRef) -> Result<String, GitHubError> {
        Self::get_default_branch(self, repo)
    }

    fn list_commits(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Vec<CommitSummary>, GitHubError> {
        Self::list_commits(self, repo, branch)
    }

    fn get_content_sha(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<String>, GitHubError> {
        Self::get_content_sha(self, repo, path, git_ref)
    }

    fn create_blob(&self, repo: &RepoRef, content: &[u8]) -> Result<String, GitHubError> {
        Self::create_blob(self, repo, content)
    }

    fn create_tree(
        &self,
        repo: &RepoRef,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, GitHubError> {
        Self::create_tree(self, repo, base_tree, entries)
    }

    fn create_commit(
        &self,
        repo: &RepoRef,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, GitHubError> {
        Self::create_commit(self, repo, message, tree, parents)
    }

    fn update_ref(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), GitHubError> {
        Self::update_ref(self, repo, git_ref, sha, force)
    }
}

/// Decode a JSON response, turning error statuses into [`GitHubError::HttpResponse`].
fn read_json<T: DeserializeOwned>(response: ureq::http::Response<Body>) -> Result<T, GitHubError> {
    let status = response.status();
    let mut body = response.into_body();

    if !status.is_success() {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(GitHubError::HttpResponse {
            status: status.as_u16(),
            body: error_body,
        });
    }

    Ok(body.read_json()?)
}

/// Percent-encode one path segment.
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Percent-encode a repository path, keeping `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

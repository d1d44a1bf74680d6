//! Contents API lookups.

use tracing::{debug, info};

use super::{GitHubClient, encode_path, read_json};
use crate::error::GitHubError;
use crate::types::{ContentEntry, RepoRef};

impl GitHubClient {
    /// Blob sha stored at `path` on `git_ref`.
    ///
    /// A 404 means nothing is stored there yet and yields `Ok(None)`.
    pub fn get_content_sha(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<String>, GitHubError> {
        let url = format!("{}/contents/{}", self.repo_url(repo), encode_path(path));

        info!("Getting content sha of {} at {}", path, git_ref);

        let response = self.get(&url).query("ref", git_ref).call()?;
        if response.status().as_u16() == 404 {
            debug!("No content at {}", path);
            return Ok(None);
        }

        let entry: ContentEntry = read_json(response)?;
        Ok(Some(entry.sha))
    }
}

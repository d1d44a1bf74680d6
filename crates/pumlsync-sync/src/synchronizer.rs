//! Tree synchronizer implementation.

use pumlsync_diagrams::{DiagramSource, Render, retrieve_codes};
use pumlsync_github::{
    CommitDetail, GitHost, PayloadError, PushPayload, RepoRef, TreeEntry, baseline,
    git_blob_sha, resolve_commits, updated_files,
};
use tracing::{debug, info, warn};

use super::SyncConfig;
use super::error::SyncError;
use super::path::output_path;
use super::result::{CommitResult, SyncOutcome, SyncPlan};

/// Renders the diagrams touched by a push and commits the SVGs that changed.
pub struct TreeSynchronizer<'a> {
    host: &'a dyn GitHost,
    renderer: &'a dyn Render,
    config: SyncConfig,
}

/// Files touched by the push and the commit the generated commit builds on.
///
/// The baseline is absent for pushes without commits (tags, deleted branches).
struct ChangeSet {
    baseline: Option<CommitDetail>,
    files: Vec<String>,
}

impl<'a> TreeSynchronizer<'a> {
    /// Create a new synchronizer.
    #[must_use]
    pub fn new(host: &'a dyn GitHost, renderer: &'a dyn Render, config: SyncConfig) -> Self {
        Self {
            host,
            renderer,
            config,
        }
    }

    /// Render changed diagrams and commit the ones that differ.
    ///
    /// This method:
    /// 1. Resolves the files changed by the pushed commits
    /// 2. Extracts diagram sources from them
    /// 3. Renders each diagram and uploads it as a blob
    /// 4. Compares the blob with the file stored at its output path
    /// 5. Commits the changed files on top of the last pushed commit
    ///
    /// Every diagram is rendered and compared, including diagrams that share
    /// an output path. Nothing is written beyond blobs when every diagram is
    /// up to date, or when the push carries no commits.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the payload has no repository
    /// - a changed file cannot be read
    /// - a diagram fails to render
    /// - a GitHub API call fails
    pub fn run(&self, payload: &PushPayload) -> Result<SyncOutcome, SyncError> {
        let repo = payload.repo()?;
        let changes = self.change_set(&repo, payload)?;
        let sources = retrieve_codes(&self.config.workspace, &changes.files)?;

        let mut entries: Vec<TreeEntry> = Vec::new();
        for source in &sources {
            let path = output_path(source, self.config.output_dir.as_deref());
            let svg = self.render(&path, source)?;
            let sha = self.host.create_blob(&repo, svg.as_bytes())?;
            let current = self.host.get_content_sha(&repo, &path, &payload.git_ref)?;

            if current.as_deref() == Some(sha.as_str()) {
                debug!(path = %path, "Diagram is up to date");
                continue;
            }
            info!(path = %path, "Diagram changed");
            merge_entry(&mut entries, TreeEntry::blob(path, sha));
        }

        if entries.is_empty() {
            info!("No diagrams changed");
            return Ok(SyncOutcome::NoChanges);
        }

        let baseline = changes.baseline.ok_or(PayloadError::NoCommits)?;
        let tree = self
            .host
            .create_tree(&repo, baseline.tree_sha(), &entries)?;
        let commit = self.host.create_commit(
            &repo,
            &self.config.message,
            &tree,
            std::slice::from_ref(&baseline.sha),
        )?;
        let git_ref = payload.update_ref();
        self.host
            .update_ref(&repo, git_ref, &commit, self.config.force)?;

        Ok(SyncOutcome::Committed(CommitResult {
            sha: commit,
            git_ref: git_ref.to_owned(),
            paths: entries.into_iter().map(|entry| entry.path).collect(),
        }))
    }

    /// Report which output files a run would change, without writing.
    ///
    /// Rendered SVGs are hashed locally as git blobs instead of being
    /// uploaded.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`run`](Self::run) up to the comparison step.
    pub fn plan(&self, payload: &PushPayload) -> Result<SyncPlan, SyncError> {
        let repo = payload.repo()?;
        let changes = self.change_set(&repo, payload)?;
        let sources = retrieve_codes(&self.config.workspace, &changes.files)?;

        let mut plan = SyncPlan::default();
        for source in &sources {
            let path = output_path(source, self.config.output_dir.as_deref());
            let svg = self.render(&path, source)?;
            let sha = git_blob_sha(svg.as_bytes());
            let current = self.host.get_content_sha(&repo, &path, &payload.git_ref)?;

            if current.as_deref() == Some(sha.as_str()) {
                if !plan.changed.contains(&path) && !plan.unchanged.contains(&path) {
                    plan.unchanged.push(path);
                }
            } else {
                plan.unchanged.retain(|p| *p != path);
                if !plan.changed.contains(&path) {
                    plan.changed.push(path);
                }
            }
        }
        if plan.has_changes() && changes.baseline.is_none() {
            return Err(PayloadError::NoCommits.into());
        }
        Ok(plan)
    }

    /// Resolve the baseline commit and the files to process.
    ///
    /// An explicit file list skips change detection, so only the baseline
    /// commit is fetched.
    fn change_set(&self, repo: &RepoRef, payload: &PushPayload) -> Result<ChangeSet, SyncError> {
        if let Some(files) = &self.config.files {
            let stubs = payload.commits.last().map(std::slice::from_ref).unwrap_or_default();
            let commits = resolve_commits(self.host, repo, stubs)?;
            let baseline = baseline(&commits).ok().cloned();
            return Ok(ChangeSet {
                baseline,
                files: files.clone(),
            });
        }

        let commits = resolve_commits(self.host, repo, &payload.commits)?;
        let files = updated_files(&commits);
        let baseline = baseline(&commits).ok().cloned();
        debug!(count = files.len(), "Resolved changed files");

        Ok(ChangeSet { baseline, files })
    }

    fn render(&self, path: &str, source: &DiagramSource) -> Result<String, SyncError> {
        self.renderer
            .render(&source.code)
            .map_err(|err| SyncError::Render {
                path: path.to_owned(),
                source: err,
            })
    }
}

/// Add a changed file to the tree, replacing an earlier entry for the same path.
///
/// The replacement keeps the position of the first entry.
fn merge_entry(entries: &mut Vec<TreeEntry>, entry: TreeEntry) {
    match entries.iter_mut().find(|e| e.path == entry.path) {
        Some(existing) => {
            warn!(
                path = %entry.path,
                "Multiple diagrams changed the same output, keeping the last"
            );
            *existing = entry;
        }
        None => entries.push(entry),
    }
}

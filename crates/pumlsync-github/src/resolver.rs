//! Change-set resolution for a push.
//!
//! The resolved commit list keeps payload order, and its **last** element is
//! the baseline for generated commits: its tree is the base tree and its sha
//! the parent. Callers building payloads by hand must therefore put the
//! newest commit last (see [`branch_payload`]).

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::info;

use crate::error::{GitHubError, PayloadError};
use crate::host::GitHost;
use crate::types::{CommitDetail, CommitStub, FileStatus, PushPayload, RepoRef};

/// Fetch full details of every pushed commit.
///
/// Commits are fetched in parallel and returned in payload order. Any failed
/// fetch fails the whole resolution.
pub fn resolve_commits<H: GitHost + ?Sized>(
    host: &H,
    repo: &RepoRef,
    commits: &[CommitStub],
) -> Result<Vec<CommitDetail>, GitHubError> {
    info!("Resolving {} commits of {}", commits.len(), repo);

    commits
        .par_iter()
        .map(|commit| host.get_commit(repo, &commit.id))
        .collect()
}

/// Paths touched by the commits, excluding removed files.
///
/// Each path appears once, at the position of its first occurrence.
#[must_use]
pub fn updated_files(commits: &[CommitDetail]) -> Vec<String> {
    let mut seen = HashSet::new();
    commits
        .iter()
        .flat_map(|commit| &commit.files)
        .filter(|file| file.status != FileStatus::Removed)
        .filter(|file| seen.insert(file.filename.as_str()))
        .map(|file| file.filename.clone())
        .collect()
}

/// Commit the generated commit builds on: the last resolved commit.
///
/// # Errors
///
/// Returns [`PayloadError::NoCommits`] for an empty list.
pub fn baseline(commits: &[CommitDetail]) -> Result<&CommitDetail, PayloadError> {
    commits.last().ok_or(PayloadError::NoCommits)
}

/// Build a payload for the head of a branch without a push event.
///
/// Uses the repository's default branch when `branch` is `None`. GitHub lists
/// commits newest first; they are reversed so the branch head comes last.
pub fn branch_payload<H: GitHost + ?Sized>(
    host: &H,
    repo: &RepoRef,
    branch: Option<&str>,
) -> Result<PushPayload, GitHubError> {
    let branch = match branch {
        Some(branch) => branch.to_owned(),
        None => host.get_default_branch(repo)?,
    };

    let commits: Vec<CommitStub> = host
        .list_commits(repo, &branch)?
        .into_iter()
        .rev()
        .map(|c| CommitStub { id: c.sha })
        .collect();

    info!("Using {} commits of {} on {}", commits.len(), repo, branch);

    Ok(PushPayload::for_branch(repo, &branch, commits))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockGitHost;

    fn repo() -> RepoRef {
        RepoRef::new("octo", "docs")
    }

    fn stubs(ids: &[&str]) -> Vec<CommitStub> {
        ids.iter()
            .map(|id| CommitStub {
                id: (*id).to_owned(),
            })
            .collect()
    }

    #[test]
    fn test_resolve_keeps_payload_order() {
        let host = MockGitHost::new()
            .with_commit("c1", "t1", &[("a.puml", FileStatus::Added)])
            .with_commit("c2", "t2", &[("b.puml", FileStatus::Added)])
            .with_commit("c3", "t3", &[("c.puml", FileStatus::Added)]);

        let commits = resolve_commits(&host, &repo(), &stubs(&["c3", "c1", "c2"])).unwrap();
        let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();

        assert_eq!(shas, vec!["c3", "c1", "c2"]);
        assert_eq!(baseline(&commits).unwrap().sha, "c2");
    }

    #[test]
    fn test_resolve_fails_on_any_commit() {
        let host = MockGitHost::new()
            .with_commit("c1", "t1", &[])
            .with_commit("c2", "t2", &[]);

        let err = resolve_commits(&host, &repo(), &stubs(&["c1", "gone", "c2"])).unwrap_err();

        assert!(matches!(err, GitHubError::HttpResponse { status: 422, .. }));
    }

    #[test]
    fn test_updated_files_dedups_and_skips_removed() {
        let host = MockGitHost::new()
            .with_commit(
                "c1",
                "t1",
                &[
                    ("docs/a.puml", FileStatus::Added),
                    ("README.md", FileStatus::Modified),
                    ("old.puml", FileStatus::Removed),
                ],
            )
            .with_commit(
                "c2",
                "t2",
                &[
                    ("README.md", FileStatus::Modified),
                    ("docs/b.md", FileStatus::Renamed),
                ],
            );
        let commits = resolve_commits(&host, &repo(), &stubs(&["c1", "c2"])).unwrap();

        assert_eq!(
            updated_files(&commits),
            vec!["docs/a.puml", "README.md", "docs/b.md"]
        );
    }

    #[test]
    fn test_removed_then_readded_file_is_kept() {
        let host = MockGitHost::new()
            .with_commit("c1", "t1", &[("a.puml", FileStatus::Removed)])
            .with_commit("c2", "t2", &[("a.puml", FileStatus::Added)]);
        let commits = resolve_commits(&host, &repo(), &stubs(&["c1", "c2"])).unwrap();

        assert_eq!(updated_files(&commits), vec!["a.puml"]);
    }

    #[test]
    fn test_baseline_of_empty_list() {
        assert!(matches!(baseline(&[]), Err(PayloadError::NoCommits)));
    }

    #[test]
    fn test_branch_payload_uses_default_branch_newest_last() {
        let host = MockGitHost::new()
            .with_default_branch("trunk")
            .with_branch_commits("trunk", &["new", "mid", "old"]);

        let payload = branch_payload(&host, &repo(), None).unwrap();

        assert_eq!(payload.git_ref, "refs/heads/trunk");
        assert_eq!(payload.repo().unwrap(), repo());
        assert_eq!(payload.commits, stubs(&["old", "mid", "new"]));
    }

    #[test]
    fn test_branch_payload_explicit_branch() {
        let host = MockGitHost::new().with_branch_commits("feature", &["f1"]);

        let payload = branch_payload(&host, &repo(), Some("feature")).unwrap();

        assert_eq!(payload.update_ref(), "heads/feature");
        assert_eq!(payload.commits, stubs(&["f1"]));
    }
}

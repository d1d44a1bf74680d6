//! GitHub API and webhook payload types.

mod commit;
mod git;
mod payload;

pub use commit::{ChangedFile, CommitData, CommitDetail, CommitSummary, FileStatus, ObjectRef};
pub use git::{TreeEntry, TreeEntryKind};
pub(crate) use git::{ContentEntry, NewBlob, NewCommit, NewTree, RefUpdate, RepositoryInfo};
pub use payload::{CommitStub, Owner, PayloadRepository, PushPayload, RepoRef};

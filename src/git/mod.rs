mod command;
pub mod repo;

pub use command::run_git;
pub use repo::GitRepo;

use crate::error::Result;
use crate::model::CommitRef;

/// Read access to a branch's history.
pub trait CommitSource {
    /// Resolve a revision to a full commit hash.
    fn resolve(&self, rev: &str) -> Result<String>;

    /// Every commit reachable from `reference`, newest first.
    fn commits(&self, reference: &str) -> Result<Vec<CommitRef>>;
}

/// Exclusive control over the working tree.
pub trait Worktree {
    /// Make index and working tree match `commit_id`, discarding local changes.
    fn checkout(&self, commit_id: &str) -> Result<()>;
}

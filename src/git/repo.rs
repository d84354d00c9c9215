use crate::error::{CensusError, Result};
use crate::git::{run_git, CommitSource, Worktree};
use crate::model::CommitRef;
use chrono::DateTime;
use gix::revision::walk::Sorting;
use gix::traverse::commit::simple::CommitTimeOrder;
use gix::{ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    show_progress: bool,
}

impl GitRepo {
    /// Open the clone at `path`. Bare repositories are rejected since they have no tree to search.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = gix::open(path.as_ref())?;
        let path = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                CensusError::GitRepo(format!(
                    "{} has no working tree",
                    path.as_ref().display()
                ))
            })?;

        Ok(Self {
            repo,
            path,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Update remote-tracking references from `remote`.
    pub fn fetch(&self, remote: &str) -> Result<()> {
        info!(remote, repo = %self.path.display(), "fetching");
        run_git(&self.path, &["fetch", "--quiet", remote])?;
        Ok(())
    }

    fn resolve_id(&self, rev: &str) -> Result<ObjectId> {
        let id = self
            .repo
            .rev_parse_single(rev)
            .map_err(|e| CensusError::Parse(format!("Invalid revision '{rev}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| CensusError::Parse(format!("Not a commit: {rev}")))?;
        Ok(commit.id)
    }
}

fn spinner(show: bool) -> ProgressBar {
    let pb = if show {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {pos}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

impl CommitSource for GitRepo {
    fn resolve(&self, rev: &str) -> Result<String> {
        Ok(self.resolve_id(rev)?.to_string())
    }

    /// Newest committer time first across the whole DAG.
    fn commits(&self, reference: &str) -> Result<Vec<CommitRef>> {
        let tip = self.resolve_id(reference)?;
        let walk = self
            .repo
            .rev_walk([tip])
            .sorting(Sorting::ByCommitTime(CommitTimeOrder::NewestFirst))
            .all()
            .map_err(|e| CensusError::GitRepo(format!("Failed to start revision walk: {e}")))?;

        let pb = spinner(self.show_progress);
        pb.set_message("Listing commits...");

        let mut commits = Vec::new();
        for entry in walk {
            let info =
                entry.map_err(|e| CensusError::GitRepo(format!("Revision walk failed: {e}")))?;
            let secs = match info.commit_time {
                Some(secs) => secs,
                None => self.repo.find_commit(info.id)?.time()?.seconds,
            };
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| CensusError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
            commits.push(CommitRef::new(info.id.to_string(), timestamp));
            pb.inc(1);
        }

        pb.finish_and_clear();
        debug!(reference, count = commits.len(), "history listed");
        Ok(commits)
    }
}

impl Worktree for GitRepo {
    fn checkout(&self, commit_id: &str) -> Result<()> {
        run_git(
            &self.path,
            &[
                "-c",
                "advice.detachedHead=false",
                "checkout",
                "--quiet",
                "--force",
                "--detach",
                commit_id,
            ],
        )?;
        Ok(())
    }
}

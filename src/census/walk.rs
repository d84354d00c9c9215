use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info};

use super::sampler::WeeklySampler;
use crate::config::{Pattern, Project};
use crate::error::Result;
use crate::git::{CommitSource, Worktree};
use crate::model::Sample;
use crate::search::{self, TextSearch};

/// Everything one project walk touches. The working tree at `root` is owned
/// exclusively by the walk until it returns.
pub struct Walk<'a, R, S: ?Sized> {
    pub repo: &'a R,
    pub search: &'a S,
    pub root: &'a Path,
    pub patterns: &'a [Pattern],
    pub show_progress: bool,
}

impl<'a, R, S> Walk<'a, R, S>
where
    R: CommitSource + Worktree,
    S: TextSearch + ?Sized,
{
    /// Sample `project`'s branch newest to oldest, checking out and counting every selected commit.
    pub fn run(&self, project: &Project, cutoff: DateTime<Utc>) -> Result<Vec<Sample>> {
        let initial = self.repo.resolve(&project.initial_commit)?;
        let commits = self.repo.commits(&project.branch)?;
        info!(
            project = %project.name,
            commits = commits.len(),
            cutoff = %cutoff,
            "walking history"
        );

        let pb = if self.show_progress {
            ProgressBar::new(commits.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut sampler = WeeklySampler::new(cutoff, initial);
        let mut samples = Vec::new();

        for commit in &commits {
            pb.inc(1);
            if !sampler.admit(commit) {
                continue;
            }
            pb.set_message(format!("{} ({} samples)", commit.short_id(), samples.len() + 1));

            self.repo.checkout(&commit.id)?;

            let mut results = Vec::with_capacity(self.patterns.len());
            for pattern in self.patterns {
                results.push(search::count(self.search, self.root, pattern, &project.search_paths)?);
            }

            let sample = Sample::new(commit, results);
            debug!(
                commit = %commit.short_id(),
                timestamp = %sample.timestamp,
                totals = ?sample.results.iter().map(|r| r.total).collect::<Vec<_>>(),
                "sampled"
            );
            samples.push(sample);
        }

        pb.finish_and_clear();
        info!(project = %project.name, samples = samples.len(), "walk finished");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CensusError;
    use crate::model::{CommitRef, SearchHit};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// In-memory repository whose "tree" is a map from commit to file hits.
    struct FakeRepo {
        history: Vec<CommitRef>,
        checked_out: RefCell<Vec<String>>,
        fail_on: Option<String>,
    }

    impl CommitSource for FakeRepo {
        fn resolve(&self, rev: &str) -> Result<String> {
            self.history
                .iter()
                .find(|c| c.id.starts_with(rev))
                .map(|c| c.id.clone())
                .ok_or_else(|| CensusError::Parse(format!("unknown {rev}")))
        }

        fn commits(&self, _reference: &str) -> Result<Vec<CommitRef>> {
            Ok(self.history.clone())
        }
    }

    impl Worktree for FakeRepo {
        fn checkout(&self, commit_id: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(commit_id) {
                return Err(CensusError::GitRepo("index.lock exists".to_string()));
            }
            self.checked_out.borrow_mut().push(commit_id.to_string());
            Ok(())
        }
    }

    /// Answers with the hits registered for whatever commit was checked out last.
    struct FakeSearch<'a> {
        repo: &'a FakeRepo,
        hits: HashMap<(String, String), Vec<&'static str>>,
    }

    impl TextSearch for FakeSearch<'_> {
        fn search(&self, _: &Path, pattern: &Pattern, _: &[String]) -> Result<Vec<SearchHit>> {
            let head = self.repo.checked_out.borrow().last().cloned().unwrap_or_default();
            Ok(self
                .hits
                .get(&(head, pattern.name.clone()))
                .map(|paths| {
                    paths
                        .iter()
                        .map(|p| SearchHit {
                            path: p.to_string(),
                            line: String::new(),
                        })
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn project() -> Project {
        Project {
            name: "demo".to_string(),
            path: None,
            remote: None,
            branch: "main".to_string(),
            initial_commit: "aaa".to_string(),
            search_paths: vec!["src".to_string()],
        }
    }

    /// Working tree with the `src` search root present.
    fn tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        dir
    }

    fn history() -> Vec<CommitRef> {
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap();
        vec![
            CommitRef::new("ddd111", day(20)),
            CommitRef::new("ccc111", day(19)),
            CommitRef::new("bbb111", day(18)),
            CommitRef::new("aaa111", day(2)),
        ]
    }

    #[test]
    fn samples_checkout_and_count_in_walk_order() {
        let repo = FakeRepo {
            history: history(),
            checked_out: RefCell::new(Vec::new()),
            fail_on: None,
        };
        let mut hits = HashMap::new();
        hits.insert(("ddd111".to_string(), "async".to_string()), vec!["src/a/x.py", "src/b.py"]);
        hits.insert(("aaa111".to_string(), "legacy".to_string()), vec!["src/a/x.py"]);
        let search = FakeSearch { repo: &repo, hits };
        let patterns = vec![Pattern::new("legacy", "x"), Pattern::new("async", "y")];
        let tree = tree();

        let walk = Walk {
            repo: &repo,
            search: &search,
            root: tree.path(),
            patterns: &patterns,
            show_progress: false,
        };

        let samples = walk
            .run(&project(), Utc.with_ymd_and_hms(2024, 1, 22, 0, 0, 0).unwrap())
            .unwrap();

        let ids: Vec<&str> = samples.iter().map(|s| s.commit_id.as_str()).collect();
        // ddd: tip, ccc: first below Jan 22, bbb skipped (cutoff Jan 15), aaa: initial
        assert_eq!(ids, vec!["ddd111", "ccc111", "aaa111"]);
        assert_eq!(*repo.checked_out.borrow(), vec!["ddd111", "ccc111", "aaa111"]);

        assert_eq!(samples[0].results.len(), 2);
        assert_eq!(samples[0].results[0].total, 0);
        assert_eq!(samples[0].results[1].total, 2);
        assert_eq!(samples[2].results[0].by_module.get("src/a"), Some(&1));
    }

    #[test]
    fn checkout_failure_aborts_walk() {
        let repo = FakeRepo {
            history: history(),
            checked_out: RefCell::new(Vec::new()),
            fail_on: Some("ccc111".to_string()),
        };
        let search = FakeSearch {
            repo: &repo,
            hits: HashMap::new(),
        };
        let patterns = vec![Pattern::new("legacy", "x")];
        let tree = tree();
        let walk = Walk {
            repo: &repo,
            search: &search,
            root: tree.path(),
            patterns: &patterns,
            show_progress: false,
        };

        let err = walk
            .run(&project(), Utc.with_ymd_and_hms(2024, 1, 22, 0, 0, 0).unwrap())
            .unwrap_err();
        assert!(matches!(err, CensusError::GitRepo(_)));
        assert_eq!(*repo.checked_out.borrow(), vec!["ddd111"]);
    }

    #[test]
    fn unknown_initial_commit_is_fatal() {
        let repo = FakeRepo {
            history: history(),
            checked_out: RefCell::new(Vec::new()),
            fail_on: None,
        };
        let search = FakeSearch {
            repo: &repo,
            hits: HashMap::new(),
        };
        let tree = tree();
        let walk = Walk {
            repo: &repo,
            search: &search,
            root: tree.path(),
            patterns: &[],
            show_progress: false,
        };
        let mut project = project();
        project.initial_commit = "fff".to_string();

        assert!(walk.run(&project, Utc::now()).is_err());
        assert!(repo.checked_out.borrow().is_empty());
    }
}

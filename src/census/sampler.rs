use chrono::{DateTime, Duration, Utc};

use crate::model::CommitRef;

/// Step between consecutive cutoffs.
pub fn week() -> Duration {
    Duration::days(7)
}

/// Weekly include/skip decision over a newest-first commit stream.
///
/// The first commit seen (the tip) is always taken without moving the cutoff.
/// After that a commit is taken if it is the initial commit or the first one
/// older than the cutoff, and every such take moves the cutoff back one week.
#[derive(Debug, Clone)]
pub struct WeeklySampler {
    cutoff: DateTime<Utc>,
    initial_commit: String,
    seen_tip: bool,
}

impl WeeklySampler {
    pub fn new(cutoff: DateTime<Utc>, initial_commit: impl Into<String>) -> Self {
        Self {
            cutoff,
            initial_commit: initial_commit.into(),
            seen_tip: false,
        }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn admit(&mut self, commit: &CommitRef) -> bool {
        if !self.seen_tip {
            self.seen_tip = true;
            return true;
        }

        if commit.id == self.initial_commit || commit.timestamp < self.cutoff {
            self.cutoff -= week();
            return true;
        }
        false
    }
}

/// Run the sampler over a whole history.
pub fn select<'a>(
    commits: &'a [CommitRef],
    cutoff: DateTime<Utc>,
    initial_commit: &str,
) -> Vec<&'a CommitRef> {
    let mut sampler = WeeklySampler::new(cutoff, initial_commit);
    commits.iter().filter(|c| sampler.admit(c)).collect()
}

//! Pattern counting over a materialized working tree.

pub mod grep;
pub mod native;

pub use grep::GrepSearch;
pub use native::NativeSearch;

use clap::ValueEnum;
use std::path::Path;
use tracing::debug;

use crate::config::Pattern;
use crate::error::Result;
use crate::model::{SearchHit, SearchResult};

/// Recursive line search under a set of repository-relative roots.
pub trait TextSearch {
    /// Every matching line under `roots`. Hit paths start with the root they were found under.
    fn search(&self, repo_root: &Path, pattern: &Pattern, roots: &[String]) -> Result<Vec<SearchHit>>;
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// External `grep -rE`
    #[default]
    Grep,
    /// In-process walk with the regex crate
    Native,
}

impl Backend {
    pub fn build(self) -> Box<dyn TextSearch> {
        match self {
            Backend::Grep => Box::new(GrepSearch::default()),
            Backend::Native => Box::new(NativeSearch),
        }
    }
}

/// Count matches of `pattern` per module. Roots missing at this commit are skipped.
pub fn count<S: TextSearch + ?Sized>(
    search: &S,
    repo_root: &Path,
    pattern: &Pattern,
    roots: &[String],
) -> Result<SearchResult> {
    let present: Vec<String> = roots
        .iter()
        .filter(|root| repo_root.join(root.as_str()).exists())
        .cloned()
        .collect();
    if present.is_empty() {
        debug!(pattern = %pattern.name, "no search roots present");
        return Ok(SearchResult::new());
    }

    let hits = search.search(repo_root, pattern, &present)?;
    Ok(SearchResult::from_hits(&hits))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchHit;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct Recording {
        roots: RefCell<Vec<String>>,
    }

    impl TextSearch for Recording {
        fn search(&self, _: &Path, _: &Pattern, roots: &[String]) -> Result<Vec<SearchHit>> {
            self.roots.borrow_mut().extend(roots.iter().cloned());
            Ok(vec![SearchHit {
                path: "synapse/a.py".to_string(),
                line: "x".to_string(),
            }])
        }
    }

    #[test]
    fn count_skips_missing_roots() {
        let dir = tempdir().unwrap();
        fixture::write(dir.path(), "synapse/a.py", "x\n");
        let search = Recording {
            roots: RefCell::new(Vec::new()),
        };
        let pattern = Pattern::new("x", "x");

        let result = count(
            &search,
            dir.path(),
            &pattern,
            &["synapse".to_string(), "gone".to_string()],
        )
        .unwrap();

        assert_eq!(search.roots.borrow().as_slice(), ["synapse".to_string()]);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn count_without_roots_is_empty() {
        let dir = tempdir().unwrap();
        let search = Recording {
            roots: RefCell::new(Vec::new()),
        };
        let result = count(&search, dir.path(), &Pattern::new("x", "x"), &["gone".to_string()]).unwrap();

        assert_eq!(result, SearchResult::new());
        assert!(search.roots.borrow().is_empty());
    }
}

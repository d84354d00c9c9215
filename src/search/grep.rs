use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::TextSearch;
use crate::config::Pattern;
use crate::error::{CensusError, Result};
use crate::model::SearchHit;

/// Shells out to `grep -rHIE` from the repository root.
#[derive(Debug, Clone)]
pub struct GrepSearch {
    program: String,
}

impl Default for GrepSearch {
    fn default() -> Self {
        Self {
            program: "grep".to_string(),
        }
    }
}

impl GrepSearch {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TextSearch for GrepSearch {
    fn search(&self, repo_root: &Path, pattern: &Pattern, roots: &[String]) -> Result<Vec<SearchHit>> {
        let mut args: Vec<&str> = vec!["-r", "-H", "-I", "-E", "-e", pattern.expr.as_str(), "--"];
        args.extend(roots.iter().map(String::as_str));

        debug!(pattern = %pattern.name, "{} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(repo_root)
            .env("LC_ALL", "C")
            .output()?;

        // grep exits 1 when nothing matched
        match output.status.code() {
            Some(0) => parse_output(String::from_utf8(output.stdout)?.as_str()),
            Some(1) => Ok(Vec::new()),
            _ => Err(CensusError::command(&self.program, &args, &output)),
        }
    }
}

/// Split `path:line` records.
pub fn parse_output(stdout: &str) -> Result<Vec<SearchHit>> {
    stdout
        .lines()
        .map(|record| {
            let (path, line) = record
                .split_once(':')
                .ok_or_else(|| CensusError::SearchOutput(record.to_string()))?;
            Ok(SearchHit {
                path: path.to_string(),
                line: line.to_string(),
            })
        })
        .collect()
}

//! Run configuration: which repositories to walk and which patterns to count.
//!
//! The built-in configuration tracks the callback-to-async migration of
//! Synapse. A JSON file with the same shape can replace it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{CensusError, Result};

pub const DEFAULT_OUTPUT: &str = "results.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Clone location. Defaults to `<workdir>/<name>`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Remote fetched before walking. `None` never touches the network.
    #[serde(default)]
    pub remote: Option<String>,
    pub branch: String,
    pub initial_commit: String,
    pub search_paths: Vec<String>,
}

impl Project {
    pub fn location(&self, workdir: &Path) -> PathBuf {
        match &self.path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => workdir.join(p),
            None => workdir.join(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    /// Extended regular expression, understood by both `grep -E` and the `regex` crate.
    pub expr: String,
}

impl Pattern {
    pub fn new(name: &str, expr: &str) -> Self {
        Self {
            name: name.to_string(),
            expr: expr.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub projects: Vec<Project>,
    pub patterns: Vec<Pattern>,
}

impl Config {
    pub fn builtin() -> Self {
        Self {
            projects: vec![Project {
                name: "synapse".to_string(),
                path: None,
                remote: Some("origin".to_string()),
                branch: "origin/develop".to_string(),
                initial_commit: "4f475c7697722e946e39e42f38f3dd03a95d8765".to_string(),
                search_paths: vec!["synapse".to_string()],
            }],
            patterns: vec![
                Pattern::new("inline_callbacks", r"\binlineCallbacks\b"),
                Pattern::new("async_def", r"\basync def\b"),
                // Trailing `\(` is literal; the group stays unanchored on the right.
                Pattern::new(
                    "deferred_api",
                    r"\b(defer\.)?(maybeDeferred|succeed|fail|failure)\(",
                ),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.projects.is_empty() {
            return Err(CensusError::Config("no projects configured".to_string()));
        }
        if self.patterns.is_empty() {
            return Err(CensusError::Config("no patterns configured".to_string()));
        }

        let mut names = HashSet::new();
        for project in &self.projects {
            if !names.insert(project.name.as_str()) {
                return Err(CensusError::Config(format!(
                    "duplicate project '{}'",
                    project.name
                )));
            }
            if project.search_paths.is_empty() {
                return Err(CensusError::Config(format!(
                    "project '{}' has no search paths",
                    project.name
                )));
            }
            if project.initial_commit.trim().is_empty() {
                return Err(CensusError::Config(format!(
                    "project '{}' has no initial commit",
                    project.name
                )));
            }
        }

        let mut names = HashSet::new();
        for pattern in &self.patterns {
            if !names.insert(pattern.name.as_str()) {
                return Err(CensusError::Config(format!(
                    "duplicate pattern '{}'",
                    pattern.name
                )));
            }
            Regex::new(&pattern.expr)?;
        }
        Ok(())
    }

    /// Keep only the named projects, in configuration order.
    pub fn select(mut self, only: &[String]) -> Result<Self> {
        if only.is_empty() {
            return Ok(self);
        }
        for name in only {
            if !self.projects.iter().any(|p| &p.name == name) {
                return Err(CensusError::Config(format!("unknown project '{name}'")));
            }
        }
        self.projects.retain(|p| only.contains(&p.name));
        Ok(self)
    }
}

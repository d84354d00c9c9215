use chrono::{DateTime, Local, Utc};
use serde::ser::{SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::util::module_key;

/// Format used for sample timestamps in the output document.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

impl CommitRef {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { id: id.into(), timestamp }
    }

    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(8)]
    }
}

/// One matching line as reported by a search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    pub line: String,
}

/// Match count for one pattern at one commit, broken down by module.
///
/// `total` always equals the sum of `by_module`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub total: u64,
    pub by_module: BTreeMap<String, u64>,
}

impl SearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &str) {
        self.total += 1;
        *self.by_module.entry(module_key(path)).or_insert(0) += 1;
    }

    pub fn from_hits<'a, I>(hits: I) -> Self
    where
        I: IntoIterator<Item = &'a SearchHit>,
    {
        let mut result = Self::new();
        for hit in hits {
            result.record(&hit.path);
        }
        result
    }
}

// Serialized as `[total, {module: count}]`.
impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.total)?;
        tup.serialize_element(&self.by_module)?;
        tup.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub commit_id: String,
    pub timestamp: String,
    pub results: Vec<SearchResult>,
}

impl Sample {
    pub fn new(commit: &CommitRef, results: Vec<SearchResult>) -> Self {
        Self {
            commit_id: commit.id.clone(),
            timestamp: commit
                .timestamp
                .with_timezone(&Local)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            results,
        }
    }
}

// Serialized as `[hash, timestamp, result, result, ...]`.
impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2 + self.results.len()))?;
        seq.serialize_element(&self.commit_id)?;
        seq.serialize_element(&self.timestamp)?;
        for result in &self.results {
            seq.serialize_element(result)?;
        }
        seq.end()
    }
}

/// Project name to samples, newest first.
pub type CensusOutput = BTreeMap<String, Vec<Sample>>;

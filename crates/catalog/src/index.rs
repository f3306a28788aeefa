use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persisted mapping from object name to the annotation files containing
/// that name.
///
/// Names are case-sensitive exact strings. Every entry holds at least one
/// file; file lists are sorted and duplicate-free, so serialization is
/// deterministic for a given dataset snapshot. The index is read-only once
/// built; a rebuild replaces the persisted file atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl ObjectIndex {
    pub(crate) fn from_entries(entries: BTreeMap<String, BTreeSet<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(name, files)| (name, files.into_iter().collect()))
            .collect();
        Self { entries }
    }

    /// Annotation files containing `name`, in sorted order. A miss returns
    /// an empty slice, not an error; the caller decides whether that is
    /// fatal.
    pub fn lookup(&self, name: &str) -> &[String] {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every indexed object name, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Writes the index through a temporary sibling file and a rename, so a
    /// concurrent reader never observes a partially written index.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, self.to_json()?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

//! Bounded most-recent-first list of searched city names, persisted as JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::Config;

pub const MAX_RECENT_SEARCHES: usize = 5;

/// Up to five distinct city names, compared case-insensitively, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecentSearches {
    entries: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, city: &str) -> bool {
        let key = city.trim().to_lowercase();
        self.entries.iter().any(|e| e.to_lowercase() == key)
    }

    /// Move `city` to the front, dropping any case variant of it and the oldest overflow.
    ///
    /// Returns `false` (and changes nothing) for blank input.
    pub fn record(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() {
            return false;
        }

        let key = city.to_lowercase();
        self.entries.retain(|e| e.to_lowercase() != key);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<String>> for RecentSearches {
    /// Rebuild from a stored list, oldest last, restoring the invariants.
    fn from(stored: Vec<String>) -> Self {
        let mut recent = RecentSearches::new();
        for city in stored.iter().rev() {
            recent.record(city);
        }
        recent
    }
}

impl From<RecentSearches> for Vec<String> {
    fn from(recent: RecentSearches) -> Self {
        recent.entries
    }
}

/// File-backed home of [`RecentSearches`]: read once, rewritten after each change.
#[derive(Debug, Clone)]
pub struct RecentSearchStore {
    path: PathBuf,
}

impl RecentSearchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Config::recent_searches_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RecentSearches> {
        if !self.path.exists() {
            return Ok(RecentSearches::new());
        }

        let contents = fs::read_to_string(&self.path).with_context(|| {
            format!("Failed to read recent searches: {}", self.path.display())
        })?;

        let recent: RecentSearches = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse recent searches: {}", self.path.display())
        })?;

        Ok(recent)
    }

    pub fn save(&self, recent: &RecentSearches) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(recent.entries())
            .context("Failed to serialize recent searches")?;

        fs::write(&self.path, json).with_context(|| {
            format!("Failed to write recent searches: {}", self.path.display())
        })?;

        Ok(())
    }

    /// Load, record `city`, save. Returns the updated list.
    pub fn record(&self, city: &str) -> Result<RecentSearches> {
        let mut recent = self.load()?;
        if recent.record(city) {
            self.save(&recent)?;
        }
        Ok(recent)
    }
}

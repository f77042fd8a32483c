//! Persisted record of processed recipe URLs.
//!
//! Each sensor has two plain-text files in the cache directory, one for URLs
//! that were saved and one for URLs that failed. Files hold one URL per
//! line, sorted and newline-terminated. A cache is read once before a batch
//! and written once after it.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::sensor::Sensor;

/// Outcome partition of a cached URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCategory {
    Succeeded,
    Failed,
}

impl CacheCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheCategory::Succeeded => "succeeded",
            CacheCategory::Failed => "failed",
        }
    }
}

/// Path of the cache file for a sensor and outcome.
pub fn cache_file(dir: &Path, sensor: Sensor, category: CacheCategory) -> PathBuf {
    dir.join(format!("{}-{}.txt", sensor.as_str(), category.as_str()))
}

/// Reads a URL list; a missing file is an empty list.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Writes a URL list, one per line, creating parent directories.
pub fn write_url_list(path: &Path, urls: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut content = String::with_capacity(urls.iter().map(|url| url.len() + 1).sum());
    for url in urls {
        content.push_str(url);
        content.push('\n');
    }

    fs::write(path, content)?;
    Ok(())
}

/// In-memory view of one sensor's cache files.
#[derive(Debug, Clone)]
pub struct UrlCache {
    dir: PathBuf,
    sensor: Sensor,
    succeeded: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl UrlCache {
    /// An empty cache that will be written under `dir`.
    pub fn new(dir: impl Into<PathBuf>, sensor: Sensor) -> Self {
        Self { dir: dir.into(), sensor, succeeded: BTreeSet::new(), failed: BTreeSet::new() }
    }

    /// Loads both partitions for `sensor` from `dir`.
    pub fn load(dir: impl Into<PathBuf>, sensor: Sensor) -> Result<Self> {
        let mut cache = Self::new(dir, sensor);
        cache.succeeded = read_url_list(&cache.path(CacheCategory::Succeeded))?.into_iter().collect();
        cache.failed = read_url_list(&cache.path(CacheCategory::Failed))?.into_iter().collect();
        Ok(cache)
    }

    pub fn path(&self, category: CacheCategory) -> PathBuf {
        cache_file(&self.dir, self.sensor, category)
    }

    /// Whether `url` was saved by an earlier run.
    pub fn is_done(&self, url: &str) -> bool {
        self.succeeded.contains(url)
    }

    pub fn record_success(&mut self, url: &str) {
        self.failed.remove(url);
        self.succeeded.insert(url.to_string());
    }

    pub fn record_failure(&mut self, url: &str) {
        if !self.succeeded.contains(url) {
            self.failed.insert(url.to_string());
        }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.succeeded.iter().map(String::as_str)
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(String::as_str)
    }

    /// Writes both partitions, sorted.
    pub fn persist(&self) -> Result<()> {
        let succeeded: Vec<String> = self.succeeded.iter().cloned().collect();
        let failed: Vec<String> = self.failed.iter().cloned().collect();

        write_url_list(&self.path(CacheCategory::Succeeded), &succeeded)?;
        write_url_list(&self.path(CacheCategory::Failed), &failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_url_list_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("urls.txt");
        let urls = vec![
            "https://site.com/2024/01/01/a-recipe/".to_string(),
            "https://site.com/2024/02/02/b-recipe/".to_string(),
        ];

        write_url_list(&path, &urls).unwrap();

        assert_eq!(read_url_list(&path).unwrap(), urls);
        assert!(fs::read_to_string(&path).unwrap().ends_with("b-recipe/\n"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_url_list(&tmp.path().join("absent.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_cache_persist_and_load() {
        let tmp = TempDir::new().unwrap();
        let mut cache = UrlCache::new(tmp.path(), Sensor::XTransV);
        cache.record_failure("https://site.com/2024/05/05/z-recipe/");
        cache.record_success("https://site.com/2024/05/05/b-recipe/");
        cache.record_success("https://site.com/2024/05/05/a-recipe/");
        cache.persist().unwrap();

        let loaded = UrlCache::load(tmp.path(), Sensor::XTransV).unwrap();
        let succeeded: Vec<&str> = loaded.succeeded().collect();
        assert_eq!(
            succeeded,
            vec!["https://site.com/2024/05/05/a-recipe/", "https://site.com/2024/05/05/b-recipe/"]
        );
        assert_eq!(loaded.failed().count(), 1);
        assert!(loaded.is_done("https://site.com/2024/05/05/a-recipe/"));
        assert!(!loaded.is_done("https://site.com/2024/05/05/z-recipe/"));
        assert!(tmp.path().join("X-Trans-V-succeeded.txt").exists());
    }

    #[test]
    fn test_success_clears_failure() {
        let mut cache = UrlCache::new("unused", Sensor::Gfx);
        cache.record_failure("https://site.com/2024/05/05/a-recipe/");
        cache.record_success("https://site.com/2024/05/05/a-recipe/");
        cache.record_failure("https://site.com/2024/05/05/a-recipe/");

        assert_eq!(cache.failed().count(), 0);
        assert_eq!(cache.succeeded().count(), 1);
    }
}

//! Batch configuration.
//!
//! # Example
//!
//! ```rust
//! use simrecipe_core::ScrapeConfig;
//!
//! let config = ScrapeConfig::builder()
//!     .output_dir("profiles")
//!     .concurrency(8)
//!     .timeout(20)
//!     .build();
//!
//! assert_eq!(config.extension, "FP1");
//! assert_eq!(config.fetch.timeout, 20);
//! ```

use std::path::PathBuf;

use crate::fetch::{FetchConfig, fetch_file};
use crate::render::DEFAULT_TEMPLATE;
use crate::Result;

/// Default output root for rendered profiles.
pub const DEFAULT_OUTPUT_DIR: &str = "fuji_profiles";

/// Default extension of rendered profiles.
pub const DEFAULT_EXTENSION: &str = "FP1";

/// Settings of one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Root under which `<sensor>/<name>.<extension>` files are written (default: `fuji_profiles`).
    pub output_dir: PathBuf,

    /// Directory of the per-sensor URL cache files.
    pub cache_dir: PathBuf,

    /// Output file extension, without the dot (default: `FP1`).
    pub extension: String,

    /// Recipes processed at the same time (default: 4).
    pub concurrency: usize,

    /// FP1 skeleton the profiles are rendered into.
    pub template: String,

    pub fetch: FetchConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            cache_dir: default_cache_dir(),
            extension: DEFAULT_EXTENSION.to_string(),
            concurrency: 4,
            template: DEFAULT_TEMPLATE.to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new()
    }
}

/// `<user cache dir>/simrecipe`, or `.simrecipe-cache` when the platform has none.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("simrecipe"))
        .unwrap_or_else(|| PathBuf::from(".simrecipe-cache"))
}

/// Builder for ScrapeConfig.
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ScrapeConfig::default() }
    }

    pub fn output_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.output_dir = value.into();
        self
    }

    pub fn cache_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = value.into();
        self
    }

    pub fn extension(mut self, value: impl Into<String>) -> Self {
        self.config.extension = value.into();
        self
    }

    /// Sets the number of recipes in flight; zero is treated as one.
    pub fn concurrency(mut self, value: usize) -> Self {
        self.config.concurrency = value.max(1);
        self
    }

    pub fn template(mut self, value: impl Into<String>) -> Self {
        self.config.template = value.into();
        self
    }

    /// Reads the template from a file.
    pub fn template_file(self, path: &str) -> Result<Self> {
        let template = fetch_file(path)?;
        Ok(self.template(template))
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("fuji_profiles"));
        assert_eq!(config.extension, "FP1");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.fetch.timeout, 10);
        assert!(config.cache_dir.ends_with("simrecipe") || config.cache_dir.ends_with(".simrecipe-cache"));
        assert!(config.template.contains("<FilmSimulation>"));
    }

    #[test]
    fn test_builder() {
        let config = ScrapeConfig::builder()
            .cache_dir("/tmp/cache")
            .extension("xml")
            .concurrency(0)
            .user_agent("test-agent")
            .template("<FilmSimulation/>")
            .build();

        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.extension, "xml");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.fetch.user_agent, "test-agent");
        assert_eq!(config.template, "<FilmSimulation/>");
    }

    #[test]
    fn test_template_file_not_found() {
        let result = ScrapeConfig::builder().template_file("/nonexistent/template.xml");
        assert!(result.is_err());
    }
}

//! Batch driver: discover, fetch, parse, render and save recipes.
//!
//! Sensors are processed one after another. Within a sensor, recipes run
//! concurrently up to [`ScrapeConfig::concurrency`]. The URL cache is read
//! once before the recipes of a sensor start and written once after all of
//! them have finished. A failing recipe never stops the batch.

use std::fs;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::UrlCache;
use crate::config::ScrapeConfig;
use crate::discover::discover_recipes;
use crate::fetch::PageFetcher;
use crate::normalize::{NormalizerRegistry, standard_registry};
use crate::parse::Document;
use crate::parser::ProfileParser;
use crate::profile::SimulationProfile;
use crate::recipe::{Recipe, RecipeState};
use crate::render::render_profile;
use crate::sensor::Sensor;
use crate::{ErrorCategory, RecipeError, Result};

/// Final state of one recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeOutcome {
    pub recipe: Recipe,
    pub state: RecipeState,
    pub path: Option<PathBuf>,
    pub error: Option<String>,
    pub category: Option<ErrorCategory>,
}

impl RecipeOutcome {
    pub fn is_saved(&self) -> bool {
        self.state == RecipeState::Saved
    }
}

/// A recipe that ended in [`RecipeState::Failed`].
#[derive(Debug, Clone, Serialize)]
pub struct FailedRecipe {
    pub name: String,
    pub url: String,
    pub error: String,
    pub category: Option<ErrorCategory>,
}

/// Result of one sensor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SensorReport {
    pub sensor: Option<Sensor>,
    /// Recipes found on the index page.
    pub discovered: usize,
    /// Recipes skipped because an earlier run saved them.
    pub skipped: usize,
    pub saved: Vec<PathBuf>,
    pub failed: Vec<FailedRecipe>,
    /// Set when the sensor could not be processed at all.
    pub error: Option<String>,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub sensors: Vec<SensorReport>,
}

impl BatchReport {
    pub fn saved(&self) -> usize {
        self.sensors.iter().map(|report| report.saved.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.sensors.iter().map(|report| report.failed.len()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.sensors.iter().map(|report| report.skipped).sum()
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| RecipeError::RenderError(e.to_string()))
    }
}

/// Drives recipes through fetch, parse, render and save.
pub struct Scraper<'r, F> {
    config: ScrapeConfig,
    fetcher: F,
    registry: &'r NormalizerRegistry,
}

impl<F: PageFetcher> Scraper<'static, F> {
    /// A scraper using the standard normalizers.
    pub fn new(config: ScrapeConfig, fetcher: F) -> Self {
        Self::with_registry(config, fetcher, standard_registry())
    }
}

impl<'r, F: PageFetcher> Scraper<'r, F> {
    pub fn with_registry(config: ScrapeConfig, fetcher: F, registry: &'r NormalizerRegistry) -> Self {
        Self { config, fetcher, registry }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Processes every sensor in order.
    pub async fn run(&self, sensors: &[Sensor]) -> BatchReport {
        let mut report = BatchReport::default();

        for &sensor in sensors {
            let sensor_report = match self.run_sensor(sensor).await {
                Ok(sensor_report) => sensor_report,
                Err(e) => {
                    warn!(sensor = %sensor, error = %e, "Sensor failed");
                    SensorReport { sensor: Some(sensor), error: Some(e.to_string()), ..Default::default() }
                }
            };
            report.sensors.push(sensor_report);
        }

        info!(saved = report.saved(), failed = report.failed(), skipped = report.skipped(), "Batch finished");
        report
    }

    /// Discovers and processes the recipes of one sensor.
    ///
    /// Fails only when the index page cannot be fetched or the cache
    /// cannot be read or written.
    pub async fn run_sensor(&self, sensor: Sensor) -> Result<SensorReport> {
        info!(sensor = %sensor, url = sensor.index_url(), "Processing sensor");

        let index = self.fetcher.fetch(sensor.index_url()).await?;
        let recipes = {
            let doc = Document::parse(&index)?;
            discover_recipes(sensor, &doc)?
        };

        let mut cache = UrlCache::load(&self.config.cache_dir, sensor)?;
        let discovered = recipes.len();
        let pending: Vec<Recipe> = recipes.into_iter().filter(|recipe| !cache.is_done(recipe.link.url())).collect();
        let skipped = discovered - pending.len();
        debug!(sensor = %sensor, discovered, skipped, "Skipping cached recipes");

        let outcomes: Vec<RecipeOutcome> = stream::iter(pending)
            .map(|recipe| self.process_recipe(recipe))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut report = SensorReport { sensor: Some(sensor), discovered, skipped, ..Default::default() };
        for outcome in outcomes {
            let url = outcome.recipe.link.url();
            match (outcome.path, outcome.error) {
                (Some(path), None) => {
                    cache.record_success(url);
                    report.saved.push(path);
                }
                (_, error) => {
                    cache.record_failure(url);
                    report.failed.push(FailedRecipe {
                        name: outcome.recipe.link.name().to_string(),
                        url: url.to_string(),
                        error: error.unwrap_or_default(),
                        category: outcome.category,
                    });
                }
            }
        }

        cache.persist()?;
        Ok(report)
    }

    /// Runs one recipe to a terminal state.
    pub async fn process_recipe(&self, recipe: Recipe) -> RecipeOutcome {
        let mut state = RecipeState::Pending;

        match self.pipeline(&recipe, &mut state).await {
            Ok(path) => RecipeOutcome { recipe, state, path: Some(path), error: None, category: None },
            Err(e) => {
                let category = e.category();
                warn!(url = recipe.link.url(), stage = ?state, ?category, error = %e, "Recipe failed");
                advance(&recipe, &mut state, RecipeState::Failed);
                RecipeOutcome { recipe, state, path: None, error: Some(e.to_string()), category: Some(category) }
            }
        }
    }

    async fn pipeline(&self, recipe: &Recipe, state: &mut RecipeState) -> Result<PathBuf> {
        let html = self.fetcher.fetch(recipe.link.url()).await?;
        advance(recipe, state, RecipeState::Fetched);

        let profile = self.parse_page(recipe, &html)?;
        advance(recipe, state, RecipeState::Parsed);

        let xml = render_profile(&profile, &recipe.link, &self.config.template)?;
        advance(recipe, state, RecipeState::Rendered);

        let path = recipe.output_path(&self.config.output_dir, &self.config.extension);
        save(&path, &xml)?;
        advance(recipe, state, RecipeState::Saved);

        info!(name = recipe.link.name(), path = %path.display(), "Saved recipe");
        Ok(path)
    }

    /// Builds the profile of a fetched recipe page.
    pub fn parse_page(&self, recipe: &Recipe, html: &str) -> Result<SimulationProfile> {
        let doc = Document::parse(html)?;
        let tags = doc.strong_tags()?;

        if tags.is_empty() {
            return Err(RecipeError::NoProfile(recipe.link.url().to_string()));
        }

        ProfileParser::new(self.registry).parse_tags(&tags)
    }
}

fn advance(recipe: &Recipe, state: &mut RecipeState, next: RecipeState) {
    debug_assert!(state.can_transition_to(next), "{state:?} -> {next:?}");
    debug!(url = recipe.link.url(), from = ?state, to = ?next, "Recipe state");
    *state = next;
}

/// Writes the whole document with a single call.
fn save(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeLink;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct StaticFetcher(HashMap<String, String>);

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.0.get(url).cloned().ok_or_else(|| RecipeError::InvalidUrl(url.to_string()))
        }
    }

    fn recipe(url: &str) -> Recipe {
        Recipe::new(Sensor::XTransIV, RecipeLink::new("Test Recipe", url))
    }

    fn scraper(tmp: &TempDir, pages: &[(&str, &str)]) -> Scraper<'static, StaticFetcher> {
        let config = ScrapeConfig::builder()
            .output_dir(tmp.path().join("out"))
            .cache_dir(tmp.path().join("cache"))
            .build();
        let pages = pages.iter().map(|(url, html)| (url.to_string(), html.to_string())).collect();
        Scraper::new(config, StaticFetcher(pages))
    }

    #[tokio::test]
    async fn test_recipe_is_saved() {
        let tmp = TempDir::new().unwrap();
        let url = "https://site.com/2024/01/01/test-recipe/";
        let scraper = scraper(&tmp, &[(url, "<strong>Film Simulation: Velvia<br>Shadow: +1</strong>")]);

        let outcome = scraper.process_recipe(recipe(url)).await;

        assert!(outcome.is_saved(), "{outcome:?}");
        let path = outcome.path.unwrap();
        assert_eq!(path, tmp.path().join("out").join("X-Trans-IV").join("Test Recipe.FP1"));
        let xml = fs::read_to_string(path).unwrap();
        assert!(xml.contains("<FilmSimulation>Velvia</FilmSimulation>"));
        assert!(xml.contains("<ShadowTone>1</ShadowTone>"));
    }

    #[tokio::test]
    async fn test_page_without_bold_text_fails() {
        let tmp = TempDir::new().unwrap();
        let url = "https://site.com/2024/01/01/plain-recipe/";
        let scraper = scraper(&tmp, &[(url, "<p>Film Simulation: Velvia</p>")]);

        let outcome = scraper.process_recipe(recipe(url)).await;

        assert_eq!(outcome.state, RecipeState::Failed);
        assert_eq!(outcome.category, Some(ErrorCategory::ProfileConstruction));
        assert!(outcome.error.unwrap().contains("No recipe settings"));
        assert!(!tmp.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_recipe() {
        let tmp = TempDir::new().unwrap();
        let scraper = scraper(&tmp, &[]);

        let outcome = scraper.process_recipe(recipe("https://site.com/2024/01/01/gone-recipe/")).await;

        assert_eq!(outcome.state, RecipeState::Failed);
        assert_eq!(outcome.category, Some(ErrorCategory::Fetch));
        assert!(outcome.path.is_none());
    }

    #[tokio::test]
    async fn test_missing_index_is_reported() {
        let tmp = TempDir::new().unwrap();
        let scraper = scraper(&tmp, &[]);

        let report = scraper.run(&[Sensor::Gfx]).await;

        assert_eq!(report.sensors.len(), 1);
        assert!(report.sensors[0].error.is_some());
        assert_eq!(report.saved(), 0);
    }
}

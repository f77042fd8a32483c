//! Recipe links, recipes and the per-recipe pipeline state.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::sensor::Sensor;

/// Dated recipe post: `scheme://host/YYYY/MM/DD/.../...recipe/`.
pub const RECIPE_URL_PATTERN: &str = r"^https?://[^/]+/\d{4}/\d{2}/\d{2}/.*recipe/$";

static RECIPE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RECIPE_URL_PATTERN).expect("Failed to compile recipe URL regex"));

/// Whether `url` points at a dated recipe post.
pub fn is_recipe_url(url: &str) -> bool {
    RECIPE_URL_RE.is_match(url)
}

/// Display name and source URL of one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecipeLink {
    name: String,
    url: String,
}

impl RecipeLink {
    /// Creates a link; the name is reduced to a file-name safe ASCII form.
    pub fn new(name: &str, url: impl Into<String>) -> Self {
        Self { name: Self::clean_name(name), url: url.into() }
    }

    /// Keeps printable ASCII only, drops path separators and trims.
    pub fn clean_name(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .filter(|c| !matches!(c, '/' | '\\'))
            .collect();
        cleaned.trim().to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_valid(&self) -> bool {
        is_recipe_url(&self.url)
    }
}

/// A recipe link bucketed under a sensor family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Recipe {
    pub sensor: Sensor,
    pub link: RecipeLink,
}

impl Recipe {
    pub fn new(sensor: Sensor, link: RecipeLink) -> Self {
        Self { sensor, link }
    }

    /// `<root>/<sensor>/<name>.<extension>`
    pub fn output_path(&self, root: &Path, extension: &str) -> PathBuf {
        root.join(self.sensor.as_str()).join(format!("{}.{}", self.link.name(), extension))
    }
}

/// Pipeline state of one recipe.
///
/// `Pending → Fetched → Parsed → Rendered → Saved`, with `Failed` reachable
/// from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecipeState {
    Pending,
    Fetched,
    Parsed,
    Rendered,
    Saved,
    Failed,
}

impl RecipeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RecipeState::Saved | RecipeState::Failed)
    }

    pub fn can_transition_to(self, next: RecipeState) -> bool {
        use RecipeState::*;

        matches!(
            (self, next),
            (Pending, Fetched) | (Fetched, Parsed) | (Parsed, Rendered) | (Rendered, Saved)
        ) || (next == Failed && !self.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_url_validity() {
        assert!(RecipeLink::new("Sample", "https://site.com/2024/07/15/sample-recipe/").is_valid());
        assert!(!RecipeLink::new("Sample", "https://site.com/sample-recipe/").is_valid());
        assert!(!RecipeLink::new("Sample", "https://site.com/2024/07/15/sample-review/").is_valid());
        assert!(!RecipeLink::new("Sample", "https://site.com/2024/07/15/sample-recipe").is_valid());
        assert!(
            RecipeLink::new(
                "Easy Reala Ace",
                "https://fujixweekly.com/2024/06/20/easy-reala-ace-fujifilm-x100vi-x-trans-v-film-simulation-recipe/"
            )
            .is_valid()
        );
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(RecipeLink::clean_name("Kodachrome 64 ★"), "Kodachrome 64");
        assert_eq!(RecipeLink::clean_name("Café Noir"), "Caf Noir");
        assert_eq!(RecipeLink::clean_name("Ektar/Portra"), "EktarPortra");
    }

    #[test]
    fn test_output_path() {
        let recipe = Recipe::new(
            Sensor::XTransIV,
            RecipeLink::new("Kentmere Pan 400", "https://site.com/2024/03/15/kentmere-recipe/"),
        );
        assert_eq!(
            recipe.output_path(Path::new("fuji_profiles"), "FP1"),
            PathBuf::from("fuji_profiles/X-Trans-IV/Kentmere Pan 400.FP1")
        );
    }

    #[test]
    fn test_state_transitions() {
        use RecipeState::*;

        assert!(Pending.can_transition_to(Fetched));
        assert!(Fetched.can_transition_to(Failed));
        assert!(Rendered.can_transition_to(Saved));
        assert!(!Pending.can_transition_to(Parsed));
        assert!(!Saved.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Pending));
        assert!(Saved.is_terminal() && Failed.is_terminal());
    }
}

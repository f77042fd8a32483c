//! Finds recipe links on a sensor index page.
//!
//! Index pages list recipes between the skip-to-content anchor and the
//! social-media footer. Links are collected only inside that window and only
//! if they point at a dated recipe post.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::Result;
use crate::parse::Document;
use crate::recipe::{Recipe, RecipeLink, is_recipe_url};
use crate::sensor::Sensor;

/// Link that opens the collection window.
pub const START_MARKER: &str = "#content";

/// Substring of the link that closes the collection window.
pub const STOP_MARKER: &str = "twitter";

/// Recipes listed on a sensor index page, in page order, without duplicate URLs.
///
/// When the same URL appears more than once, the first link with a usable
/// name wins. URLs that never get a name (image-only links) are dropped.
pub fn discover_recipes(sensor: Sensor, doc: &Document) -> Result<Vec<Recipe>> {
    let mut recipes: Vec<Recipe> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut collecting = false;
    let mut discarded = 0usize;

    for link in doc.links()? {
        let Some(href) = link.attr("href") else { continue };

        if href == START_MARKER {
            collecting = true;
            continue;
        }
        if href.contains(STOP_MARKER) {
            break;
        }
        if !collecting {
            continue;
        }

        let recipe_link = RecipeLink::new(&link.text(), href);
        if !recipe_link.is_valid() {
            discarded += 1;
            continue;
        }
        if let Some(&index) = seen.get(href) {
            let kept = &mut recipes[index];
            if kept.link.name().is_empty() && !recipe_link.name().is_empty() {
                kept.link = recipe_link;
            } else {
                warn!(name = recipe_link.name(), url = href, "Recipe already collected");
            }
            continue;
        }

        seen.insert(href.to_string(), recipes.len());
        recipes.push(Recipe::new(sensor, recipe_link));
    }

    recipes.retain(|recipe| {
        let named = !recipe.link.name().is_empty();
        if !named {
            warn!(url = recipe.link.url(), "Recipe link has no name");
            discarded += 1;
        }
        named
    });

    let expected = count_recipe_links(doc)?;
    if recipes.len() > expected {
        warn!(
            sensor = %sensor,
            collected = recipes.len(),
            expected,
            "More recipes collected than recipe links on the page"
        );
    }
    debug!(sensor = %sensor, collected = recipes.len(), discarded, "Discovered recipes");

    Ok(recipes)
}

/// Number of distinct recipe URLs anywhere on the page.
pub fn count_recipe_links(doc: &Document) -> Result<usize> {
    let urls: HashSet<String> = doc
        .links()?
        .iter()
        .filter_map(|link| link.attr("href"))
        .filter(|href| is_recipe_url(href))
        .map(str::to_string)
        .collect();

    Ok(urls.len())
}

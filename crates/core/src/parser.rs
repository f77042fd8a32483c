//! Builds a [`SimulationProfile`] from logical lines.
//!
//! Each line is split on its first `": "`, the key is canonicalized and the
//! value dispatched to the [`NormalizerRegistry`]. Lines without a key are
//! kept only if they name a film simulation. Field-level failures drop the
//! offending line and never abort the profile.
//!
//! # Example
//!
//! ```rust
//! use simrecipe_core::{FilmSimulation, ProfileParser};
//!
//! let lines = ["Film Simulation: Eterna Bleach Bypass", "Dynamic Range: DR400", "Highlight: -2"];
//! let profile = ProfileParser::default().parse_lines(lines).unwrap();
//!
//! assert_eq!(profile.film_simulation, FilmSimulation::EternaBleachBypass);
//! assert_eq!(profile.highlight, -2);
//! ```

use tracing::{debug, warn};

use crate::Result;
use crate::flatten::{RawTag, flatten_and_process_tags};
use crate::model::{FieldKey, FilmSimulation};
use crate::normalize::{NormalizerRegistry, clean_film_simulation_name, standard_registry};
use crate::profile::{ProfileMap, SimulationProfile};

/// Key spellings that differ from the canonical field names.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("color_chrome_effect_blue", "color_chrome_fx_blue"),
    ("color_chrome_fx_blue_effect", "color_chrome_fx_blue"),
    ("grain", "grain_effect"),
    ("noise_reduction", "high_iso_nr"),
    ("sharpening", "sharpness"),
    ("highlights", "highlight"),
    ("shadows", "shadow"),
    ("monochromatic_colour", "monochromatic_color"),
];

/// Canonicalizes a raw key: lowercase, underscores, `&` spelled out, aliases applied.
pub fn canonical_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase().replace(' ', "_").replace('&', "and");

    match KEY_ALIASES.iter().find(|(alias, _)| *alias == key) {
        Some((_, canonical)) => canonical.to_string(),
        None => key,
    }
}

/// Splits a logical line into a raw key and value.
///
/// A line without `": "` that names a film simulation becomes a
/// `film_simulation` entry; any other keyless line yields `None`.
pub fn split_line(line: &str) -> Option<(String, String)> {
    if let Some((key, value)) = line.split_once(": ") {
        return Some((key.to_string(), value.to_string()));
    }

    let candidate = clean_film_simulation_name(line);
    FilmSimulation::from_name(&candidate).map(|_| (FieldKey::FilmSimulation.as_str().to_string(), candidate))
}

/// Turns logical lines into a field map and a profile.
#[derive(Debug, Clone, Copy)]
pub struct ProfileParser<'r> {
    registry: &'r NormalizerRegistry,
}

impl<'r> ProfileParser<'r> {
    pub fn new(registry: &'r NormalizerRegistry) -> Self {
        Self { registry }
    }

    /// Collects canonical key to normalized value. Later lines overwrite
    /// earlier ones.
    pub fn profile_map<I, S>(&self, lines: I) -> ProfileMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = ProfileMap::new();

        for line in lines {
            let line = line.as_ref();
            let Some((raw_key, raw_value)) = split_line(line) else {
                debug!(line, "Skipping line without a setting");
                continue;
            };

            let key = canonical_key(&raw_key);
            match self.registry.normalize(&key, &raw_value) {
                Ok(value) => {
                    map.insert(key, value);
                }
                Err(e) => warn!(field = %key, value = %raw_value, error = %e, "Dropping unparseable field"),
            }
        }

        map
    }

    /// Parses logical lines into a profile.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<SimulationProfile>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SimulationProfile::from_map(&self.profile_map(lines))
    }

    /// Flattens bold tags and parses them into a profile.
    pub fn parse_tags(&self, tags: &[RawTag]) -> Result<SimulationProfile> {
        self.parse_lines(flatten_and_process_tags(tags))
    }
}

impl Default for ProfileParser<'static> {
    fn default() -> Self {
        Self::new(standard_registry())
    }
}

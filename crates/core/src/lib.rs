//! Film simulation recipe scraping.
//!
//! Turns the bold settings text of recipe blog posts into typed
//! [`SimulationProfile`]s and renders them as FP1 camera profiles.
//!
//! # Example
//!
//! ```rust
//! use simrecipe_core::{Document, FilmSimulation, ProfileParser};
//!
//! let html = "<p><strong>Film Simulation: Eterna Bleach Bypass<br>Dynamic Range: DR400<br>Highlight: -2</strong></p>";
//! let doc = Document::parse(html).unwrap();
//! let profile = ProfileParser::default().parse_tags(&doc.strong_tags().unwrap()).unwrap();
//!
//! assert_eq!(profile.film_simulation, FilmSimulation::EternaBleachBypass);
//! assert_eq!(profile.highlight, -2);
//! ```

pub mod batch;
pub mod cache;
pub mod config;
pub mod discover;
pub mod error;
pub mod fetch;
pub mod flatten;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod parser;
pub mod profile;
pub mod recipe;
pub mod render;
pub mod sensor;

pub use batch::{BatchReport, FailedRecipe, RecipeOutcome, Scraper, SensorReport};
pub use cache::UrlCache;
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use discover::discover_recipes;
pub use error::{ErrorCategory, RecipeError, Result};
pub use fetch::{FetchConfig, PageFetcher, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{HttpFetcher, fetch_url};
pub use flatten::{RawTag, flatten_and_process_tags};
pub use model::{
    DynamicRange, FieldKey, FieldValue, FilmSimulation, FujiEffect, GrainEffect, GrainEffectSize, MonochromaticColor,
    WhiteBalance, WhiteBalanceSetting,
};
pub use normalize::{NormalizerRegistry, standard_registry};
pub use parse::{Document, Element};
pub use parser::ProfileParser;
pub use profile::{ATTRIBUTE_TO_XML_MAPPING, FlatProfile, ProfileMap, SimulationProfile};
pub use recipe::{Recipe, RecipeLink, RecipeState};
pub use render::{DEFAULT_TEMPLATE, RenderedProfile, fill_xml_template, render_profile};
pub use sensor::{DEFAULT_SENSORS, Sensor};

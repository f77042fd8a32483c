//! FP1 document rendering.
//!
//! Rendering happens in two passes over a template skeleton. The header pass
//! fills the `{{ name }}` and `{{ url }}` placeholders from the recipe link.
//! The value pass replaces the text of each mapped tag with the value of
//! the matching flat profile field.

use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};
use tracing::{debug, warn};

use crate::model::FieldKey;
use crate::profile::{FlatProfile, SimulationProfile, xml_tag_for};
use crate::recipe::RecipeLink;
use crate::{RecipeError, Result};

/// Bundled FP1 skeleton with a default for every mapped tag.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/fp1.xml");

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(name|url)\s*\}\}").expect("Failed to compile placeholder regex"));

/// Filled template plus the flat fields that could not be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedProfile {
    pub xml: String,
    pub gaps: Vec<String>,
}

/// Replaces the header placeholders with the escaped recipe name and URL.
pub fn fill_header(template: &str, link: &RecipeLink) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "name" => xml_escape(link.name()),
            _ => xml_escape(link.url()),
        })
        .into_owned()
}

/// Replaces the text of every `<tag>...</tag>` element.
///
/// Returns `None` when the template has no such element.
pub fn replace_xml_value(template: &str, tag: &str, value: &str) -> Option<String> {
    let escaped = regex::escape(tag);
    let pattern = Regex::new(&format!("<{escaped}>(.*?)</{escaped}>")).ok()?;

    if !pattern.is_match(template) {
        return None;
    }

    let replacement = format!("<{tag}>{}</{tag}>", xml_escape(value));
    Some(pattern.replace_all(template, NoExpand(&replacement)).into_owned())
}

/// Writes every present flat field into its mapped tag.
///
/// Absent values are skipped. Fields without a mapping and mapped tags
/// missing from the template are logged and reported as gaps. Fails only
/// when the film simulation could not be written.
pub fn fill_xml_template(flat: &FlatProfile, template: &str) -> Result<RenderedProfile> {
    let mut xml = template.to_string();
    let mut gaps = Vec::new();
    let mut film_simulation_written = false;

    for (field, value) in flat {
        let Some(value) = value else {
            debug!(field = %field, "Skipping absent value");
            continue;
        };

        let Some(tag) = xml_tag_for(field) else {
            warn!(field = %field, "No XML tag mapping for field");
            gaps.push(field.clone());
            continue;
        };

        match replace_xml_value(&xml, tag, value) {
            Some(filled) => {
                xml = filled;
                if field == FieldKey::FilmSimulation.as_str() {
                    film_simulation_written = true;
                }
            }
            None => {
                warn!(field = %field, tag, "Template has no element for tag");
                gaps.push(field.clone());
            }
        }
    }

    if !film_simulation_written {
        return Err(RecipeError::RenderError("film simulation could not be written to the template".to_string()));
    }

    Ok(RenderedProfile { xml, gaps })
}

/// Renders a profile into a complete FP1 document ending in one newline.
pub fn render_profile(profile: &SimulationProfile, link: &RecipeLink, template: &str) -> Result<String> {
    let header = fill_header(template, link);
    let rendered = fill_xml_template(&profile.to_flat_dict(), &header)?;

    let mut xml = rendered.xml.trim_end_matches(['\n', '\r']).to_string();
    xml.push('\n');
    Ok(xml)
}

fn xml_escape(s: &str) -> String {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return s.to_string();
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DynamicRange, FilmSimulation, FujiEffect, GrainEffect, GrainEffectSize};

    fn link() -> RecipeLink {
        RecipeLink::new("Kodak Tri-X 400", "https://site.com/2024/01/02/tri-x-recipe/")
    }

    fn flat(entries: &[(&str, Option<&str>)]) -> FlatProfile {
        entries.iter().map(|(k, v)| (k.to_string(), v.map(str::to_string))).collect()
    }

    #[test]
    fn test_replace_xml_value() {
        let xml = "<A><HighlightTone>0</HighlightTone></A>";
        assert_eq!(
            replace_xml_value(xml, "HighlightTone", "-2").as_deref(),
            Some("<A><HighlightTone>-2</HighlightTone></A>")
        );
        assert_eq!(replace_xml_value(xml, "ShadowTone", "1"), None);
    }

    #[test]
    fn test_replacement_is_literal() {
        let xml = "<Label>x</Label>";
        assert_eq!(replace_xml_value(xml, "Label", "$1 & more").as_deref(), Some("<Label>$1 &amp; more</Label>"));
    }

    #[test]
    fn test_fill_header() {
        let filled = fill_header("<P label=\"{{ name }}\"/><!-- {{url}} -->", &RecipeLink::new("A & B", "https://x/"));
        assert_eq!(filled, "<P label=\"A &amp; B\"/><!-- https://x/ -->");
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let template = "<FilmSimulation>Provia</FilmSimulation><WideDRange>AUTO</WideDRange>";
        let rendered =
            fill_xml_template(&flat(&[("film_simulation", Some("Eterna")), ("dynamic_range", None)]), template).unwrap();

        assert_eq!(rendered.xml, "<FilmSimulation>Eterna</FilmSimulation><WideDRange>AUTO</WideDRange>");
        assert!(rendered.gaps.is_empty());
    }

    #[test]
    fn test_gaps_are_reported() {
        let template = "<FilmSimulation>Provia</FilmSimulation>";
        let rendered = fill_xml_template(
            &flat(&[("film_simulation", Some("Velvia")), ("iso", Some("AUTO")), ("shadow", Some("1"))]),
            template,
        )
        .unwrap();

        assert_eq!(rendered.gaps, vec!["iso".to_string(), "shadow".to_string()]);
    }

    #[test]
    fn test_missing_film_simulation_tag_fails() {
        let result = fill_xml_template(&flat(&[("film_simulation", Some("Velvia"))]), "<Root/>");
        assert!(matches!(result, Err(RecipeError::RenderError(_))));
    }

    #[test]
    fn test_render_profile_with_default_template() {
        let mut profile = SimulationProfile::new(FilmSimulation::EternaBleachBypass);
        profile.dynamic_range = Some(DynamicRange::Dr400);
        profile.highlight = -2;
        profile.grain_effect = Some(GrainEffect::new(FujiEffect::Strong, Some(GrainEffectSize::Large)));

        let xml = render_profile(&profile, &link(), DEFAULT_TEMPLATE).unwrap();

        assert!(xml.contains("<FilmSimulation>BleachBypass</FilmSimulation>"));
        assert!(xml.contains("<WideDRange>400</WideDRange>"));
        assert!(xml.contains("<HighlightTone>-2</HighlightTone>"));
        assert!(xml.contains("<GrainEffect>STRONG</GrainEffect>"));
        assert!(xml.contains("<GrainEffectSize>LARGE</GrainEffectSize>"));
        assert!(xml.contains("label=\"Kodak Tri-X 400\""));
        assert!(!xml.contains("{{"));
        assert!(xml.ends_with("</ConversionProfile>\n"));
        assert!(!xml.ends_with("\n\n"));
    }

    #[test]
    fn test_default_template_has_every_mapped_tag() {
        for (_, tag) in crate::profile::ATTRIBUTE_TO_XML_MAPPING {
            assert!(DEFAULT_TEMPLATE.contains(&format!("<{tag}>")), "missing {tag}");
        }
    }
}

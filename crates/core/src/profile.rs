//! The typed simulation profile and its flat, renderable form.
//!
//! [`SimulationProfile::from_map`] assembles a profile from the field map
//! built by the [`ProfileParser`](crate::ProfileParser). [`SimulationProfile::to_flat_dict`]
//! expands composite fields into `parent_child` entries, which
//! [`ATTRIBUTE_TO_XML_MAPPING`] ties to FP1 tag names.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::model::{
    DynamicRange, FieldKey, FieldValue, FilmSimulation, FujiEffect, GrainEffect, MonochromaticColor, WhiteBalance,
};
use crate::{RecipeError, Result};

/// Canonical key to normalized value, as collected from one page.
pub type ProfileMap = BTreeMap<String, FieldValue>;

/// Flat field name to rendered scalar; `None` marks an absent value.
pub type FlatProfile = Vec<(String, Option<String>)>;

/// Flat field name to FP1 tag name. The only source of truth for rendering.
pub const ATTRIBUTE_TO_XML_MAPPING: &[(&str, &str)] = &[
    ("clarity", "Clarity"),
    ("color", "Color"),
    ("color_chrome_effect", "ChromeEffect"),
    ("color_chrome_fx_blue", "ColorChromeBlue"),
    ("dynamic_range", "WideDRange"),
    ("exposure_compensation", "ExposureBias"),
    ("film_simulation", "FilmSimulation"),
    ("grain_effect_grain_effect", "GrainEffect"),
    ("grain_effect_grain_effect_size", "GrainEffectSize"),
    ("high_iso_nr", "NoisReduction"),
    ("highlight", "HighlightTone"),
    ("monochromatic_color_magenta_green", "MonochromaticColor_MG"),
    ("monochromatic_color_warm_cool", "MonochromaticColor_WC"),
    ("shadow", "ShadowTone"),
    ("sharpness", "Sharpness"),
    ("white_balance_setting", "WhiteBalance"),
    ("white_balance_red", "WBShiftR"),
    ("white_balance_blue", "WBShiftB"),
    ("white_balance_color_temp", "WBColorTemp"),
];

/// Looks up the FP1 tag for a flat field name.
pub fn xml_tag_for(field: &str) -> Option<&'static str> {
    ATTRIBUTE_TO_XML_MAPPING
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, tag)| *tag)
}

/// Settings of one recipe.
///
/// Only the film simulation is required. Numeric tone settings default to
/// zero; the remaining optional settings stay absent and leave the template
/// value in place when rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationProfile {
    pub film_simulation: FilmSimulation,
    pub white_balance: Option<WhiteBalance>,
    pub dynamic_range: Option<DynamicRange>,
    pub sharpness: i32,
    pub high_iso_nr: i32,
    pub iso: Option<String>,
    pub exposure_compensation: f64,
    pub clarity: i32,
    pub color: i32,
    pub color_chrome_effect: Option<FujiEffect>,
    pub color_chrome_fx_blue: Option<FujiEffect>,
    pub grain_effect: Option<GrainEffect>,
    pub highlight: i32,
    pub monochromatic_color: Option<MonochromaticColor>,
    pub shadow: i32,
}

impl SimulationProfile {
    /// A profile with the given film simulation and every other field defaulted.
    pub fn new(film_simulation: FilmSimulation) -> Self {
        Self {
            film_simulation,
            white_balance: None,
            dynamic_range: None,
            sharpness: 0,
            high_iso_nr: 0,
            iso: None,
            exposure_compensation: 0.0,
            clarity: 0,
            color: 0,
            color_chrome_effect: None,
            color_chrome_fx_blue: None,
            grain_effect: None,
            highlight: 0,
            monochromatic_color: None,
            shadow: 0,
        }
    }

    /// Builds a profile from a field map.
    ///
    /// Unrecognized keys and values of the wrong type are logged and
    /// ignored. A missing film simulation is an error.
    pub fn from_map(map: &ProfileMap) -> Result<Self> {
        let film_simulation = match map.get(FieldKey::FilmSimulation.as_str()) {
            Some(FieldValue::FilmSimulation(simulation)) => *simulation,
            _ => return Err(RecipeError::MissingField(FieldKey::FilmSimulation.as_str())),
        };

        let mut profile = Self::new(film_simulation);

        for (name, value) in map {
            let Some(key) = FieldKey::from_name(name) else {
                warn!(field = %name, "Ignoring unrecognized profile field");
                continue;
            };

            if !profile.set(key, value) {
                warn!(field = %key, kind = value.type_name(), "Ignoring value of unexpected type");
            }
        }

        Ok(profile)
    }

    /// Stores `value` under `key`; returns false on a type mismatch.
    fn set(&mut self, key: FieldKey, value: &FieldValue) -> bool {
        match (key, value) {
            (FieldKey::FilmSimulation, FieldValue::FilmSimulation(v)) => self.film_simulation = *v,
            (FieldKey::WhiteBalance, FieldValue::WhiteBalance(v)) => self.white_balance = Some(v.clone()),
            (FieldKey::DynamicRange, FieldValue::DynamicRange(v)) => self.dynamic_range = Some(*v),
            (FieldKey::Iso, FieldValue::Text(v)) => self.iso = Some(v.clone()),
            (FieldKey::ExposureCompensation, FieldValue::Float(v)) => self.exposure_compensation = *v,
            (FieldKey::ColorChromeEffect, FieldValue::Effect(v)) => self.color_chrome_effect = Some(*v),
            (FieldKey::ColorChromeFxBlue, FieldValue::Effect(v)) => self.color_chrome_fx_blue = Some(*v),
            (FieldKey::GrainEffect, FieldValue::GrainEffect(v)) => self.grain_effect = Some(*v),
            (FieldKey::MonochromaticColor, FieldValue::MonochromaticColor(v)) => {
                self.monochromatic_color = Some(*v)
            }
            (FieldKey::Sharpness, FieldValue::Integer(v)) => self.sharpness = *v,
            (FieldKey::HighIsoNr, FieldValue::Integer(v)) => self.high_iso_nr = *v,
            (FieldKey::Clarity, FieldValue::Integer(v)) => self.clarity = *v,
            (FieldKey::Color, FieldValue::Integer(v)) => self.color = *v,
            (FieldKey::Highlight, FieldValue::Integer(v)) => self.highlight = *v,
            (FieldKey::Shadow, FieldValue::Integer(v)) => self.shadow = *v,
            _ => return false,
        }
        true
    }

    /// Expands the profile into flat `parent_child` fields with scalar values.
    ///
    /// An absent optional field appears once under its own name with `None`.
    pub fn to_flat_dict(&self) -> FlatProfile {
        let mut flat = FlatProfile::new();

        push(&mut flat, FieldKey::FilmSimulation, Some(self.film_simulation.as_str().to_string()));
        match &self.white_balance {
            Some(wb) => flatten_white_balance(&mut flat, wb),
            None => push(&mut flat, FieldKey::WhiteBalance, None),
        }
        push(&mut flat, FieldKey::DynamicRange, self.dynamic_range.map(|v| v.as_str().to_string()));
        push(&mut flat, FieldKey::Sharpness, Some(self.sharpness.to_string()));
        push(&mut flat, FieldKey::HighIsoNr, Some(self.high_iso_nr.to_string()));
        push(&mut flat, FieldKey::Iso, self.iso.clone());
        push(&mut flat, FieldKey::ExposureCompensation, Some(format_float(self.exposure_compensation)));
        push(&mut flat, FieldKey::Clarity, Some(self.clarity.to_string()));
        push(&mut flat, FieldKey::Color, Some(self.color.to_string()));
        push(&mut flat, FieldKey::ColorChromeEffect, self.color_chrome_effect.map(|v| v.as_str().to_string()));
        push(&mut flat, FieldKey::ColorChromeFxBlue, self.color_chrome_fx_blue.map(|v| v.as_str().to_string()));
        match &self.grain_effect {
            Some(grain) => flatten_grain_effect(&mut flat, grain),
            None => push(&mut flat, FieldKey::GrainEffect, None),
        }
        push(&mut flat, FieldKey::Highlight, Some(self.highlight.to_string()));
        match &self.monochromatic_color {
            Some(mono) => flatten_monochromatic_color(&mut flat, mono),
            None => push(&mut flat, FieldKey::MonochromaticColor, None),
        }
        push(&mut flat, FieldKey::Shadow, Some(self.shadow.to_string()));

        flat
    }

    /// The profile as a JSON object with FP1 values for enum fields.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| RecipeError::RenderError(e.to_string()))
    }
}

fn push(flat: &mut FlatProfile, key: FieldKey, value: Option<String>) {
    flat.push((key.as_str().to_string(), value));
}

fn push_child(flat: &mut FlatProfile, parent: FieldKey, child: &str, value: Option<String>) {
    flat.push((format!("{}_{}", parent.as_str(), child), value));
}

fn flatten_white_balance(flat: &mut FlatProfile, wb: &WhiteBalance) {
    let parent = FieldKey::WhiteBalance;
    push_child(flat, parent, "setting", Some(wb.setting.as_str().to_string()));
    push_child(flat, parent, "red", Some(wb.red.to_string()));
    push_child(flat, parent, "blue", Some(wb.blue.to_string()));
    push_child(flat, parent, "color_temp", Some(wb.color_temp.clone()));
}

fn flatten_grain_effect(flat: &mut FlatProfile, grain: &GrainEffect) {
    let parent = FieldKey::GrainEffect;
    push_child(flat, parent, "grain_effect", Some(grain.grain_effect().as_str().to_string()));
    push_child(
        flat,
        parent,
        "grain_effect_size",
        grain.grain_effect_size().map(|size| size.as_str().to_string()),
    );
}

fn flatten_monochromatic_color(flat: &mut FlatProfile, mono: &MonochromaticColor) {
    let parent = FieldKey::MonochromaticColor;
    push_child(flat, parent, "warm_cool", Some(mono.warm_cool.to_string()));
    push_child(flat, parent, "magenta_green", Some(mono.magenta_green.to_string()));
}

/// Formats a float with at least one decimal place: `1.0`, `0.33`, `-0.67`.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.1}") } else { value.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GrainEffectSize, WhiteBalanceSetting};

    fn map(entries: Vec<(&str, FieldValue)>) -> ProfileMap {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn flat_value<'a>(flat: &'a FlatProfile, name: &str) -> Option<&'a Option<String>> {
        flat.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    #[test]
    fn test_missing_film_simulation() {
        let result = SimulationProfile::from_map(&map(vec![("highlight", FieldValue::Integer(-2))]));
        assert!(matches!(result, Err(RecipeError::MissingField("film_simulation"))));
    }

    #[test]
    fn test_film_simulation_of_wrong_type_is_missing() {
        let result = SimulationProfile::from_map(&map(vec![(
            "film_simulation",
            FieldValue::Text("KODACHROME".to_string()),
        )]));
        assert!(matches!(result, Err(RecipeError::MissingField(_))));
    }

    #[test]
    fn test_ignores_unknown_and_mismatched_fields() {
        let profile = SimulationProfile::from_map(&map(vec![
            ("film_simulation", FieldValue::FilmSimulation(FilmSimulation::Astia)),
            ("toning", FieldValue::Text("WARM".to_string())),
            ("highlight", FieldValue::Text("SOFT".to_string())),
            ("shadow", FieldValue::Integer(2)),
        ]))
        .unwrap();

        assert_eq!(profile.film_simulation, FilmSimulation::Astia);
        assert_eq!(profile.highlight, 0);
        assert_eq!(profile.shadow, 2);
    }

    #[test]
    fn test_flat_dict_expands_composites() {
        let mut profile = SimulationProfile::new(FilmSimulation::ClassicChrome);
        profile.white_balance = Some(WhiteBalance {
            setting: WhiteBalanceSetting::Temperature,
            red: 2,
            blue: -5,
            color_temp: "5200K".to_string(),
        });
        profile.grain_effect = Some(GrainEffect::new(FujiEffect::Weak, Some(GrainEffectSize::Small)));
        profile.exposure_compensation = 0.33;

        let flat = profile.to_flat_dict();

        assert_eq!(flat_value(&flat, "film_simulation"), Some(&Some("Classic".to_string())));
        assert_eq!(flat_value(&flat, "white_balance_setting"), Some(&Some("Temperature".to_string())));
        assert_eq!(flat_value(&flat, "white_balance_blue"), Some(&Some("-5".to_string())));
        assert_eq!(flat_value(&flat, "white_balance_color_temp"), Some(&Some("5200K".to_string())));
        assert_eq!(flat_value(&flat, "grain_effect_grain_effect_size"), Some(&Some("SMALL".to_string())));
        assert_eq!(flat_value(&flat, "exposure_compensation"), Some(&Some("0.33".to_string())));
        assert_eq!(flat_value(&flat, "white_balance"), None);
        assert_eq!(flat_value(&flat, "monochromatic_color"), Some(&None));
        assert_eq!(flat_value(&flat, "dynamic_range"), Some(&None));
    }

    #[test]
    fn test_grain_off_flattens_without_size() {
        let mut profile = SimulationProfile::new(FilmSimulation::ClassicChrome);
        profile.grain_effect = Some(GrainEffect::new(FujiEffect::Off, Some(GrainEffectSize::Large)));

        let flat = profile.to_flat_dict();

        assert_eq!(flat_value(&flat, "grain_effect_grain_effect"), Some(&Some("OFF".to_string())));
        assert_eq!(flat_value(&flat, "grain_effect_grain_effect_size"), Some(&None));
    }

    #[test]
    fn test_every_composite_child_has_a_tag() {
        let mut profile = SimulationProfile::new(FilmSimulation::Acros);
        profile.white_balance = Some(WhiteBalance::default());
        profile.grain_effect = Some(GrainEffect::new(FujiEffect::Strong, Some(GrainEffectSize::Large)));
        profile.monochromatic_color = Some(MonochromaticColor { warm_cool: 1, magenta_green: -1 });
        profile.dynamic_range = Some(DynamicRange::Dr200);
        profile.color_chrome_effect = Some(FujiEffect::Weak);
        profile.color_chrome_fx_blue = Some(FujiEffect::Off);

        for (field, _) in profile.to_flat_dict() {
            if field != "iso" {
                assert!(xml_tag_for(&field).is_some(), "no tag for {field}");
            }
        }
    }

    #[test]
    fn test_to_json() {
        let mut profile = SimulationProfile::new(FilmSimulation::ClassicNeg);
        profile.dynamic_range = Some(DynamicRange::Auto);
        let json = profile.to_json().unwrap();

        assert_eq!(json["film_simulation"], "ClassicNEGA");
        assert_eq!(json["dynamic_range"], "AUTO");
        assert!(json["white_balance"].is_null());
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.67), "-0.67");
        assert_eq!(format_float(0.0), "0.0");
    }
}

//! Per-field value normalizers.
//!
//! Each normalizer receives a value that has already been through
//! [`clean_value`] (trimmed, spaces turned into underscores, commas removed,
//! uppercased) and turns it into a typed [`FieldValue`].
//!
//! Three outcomes are possible, and each normalizer documents which it uses:
//!
//! - the value parses,
//! - the value is unusable and a documented default is returned with a
//!   `warn!` line,
//! - the value is unusable and an error is returned; the caller drops the
//!   line.
//!
//! The [`NormalizerRegistry`] maps [`FieldKey`]s to these functions. It is an
//! immutable value; [`standard_registry`] holds the shared default instance.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::model::{
    DynamicRange, FieldKey, FieldValue, FilmSimulation, FujiEffect, GrainEffect, GrainEffectSize, MonochromaticColor,
    WhiteBalance, WhiteBalanceSetting,
};
use crate::{RecipeError, Result};

/// A pure function from a cleaned value to a typed field value.
pub type Normalizer = fn(&str) -> Result<FieldValue>;

static EXPOSURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+(?:/\d+)?").expect("Failed to compile exposure regex"));
static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+-]?\d+").expect("Failed to compile integer regex"));
static KELVIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)K").expect("Failed to compile kelvin regex"));
static FLUORESCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FLUORESCENT_([123])").expect("Failed to compile fluorescent regex"));
static RED_SHIFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-]?\d+)_RED").expect("Failed to compile red shift regex"));
static BLUE_SHIFT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-]?\d+)_BLUE").expect("Failed to compile blue shift regex"));
static MONOCHROMATIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-]?\d+)_WC_&_([+-]?\d+)_MG").expect("Failed to compile monochromatic color regex")
});

/// Alternate spellings seen in recipes, keyed by cleaned name.
const FILM_SIMULATION_ALIASES: &[(&str, &str)] = &[
    ("CLASSIC_NEGATIVE", "CLASSIC_NEG"),
    ("NOSTALGIC_NEGATIVE", "NOSTALGIC_NEG"),
    ("ACROS+R", "ACROS_R"),
    ("ACROS+G", "ACROS_G"),
    ("ACROS+Y", "ACROS_Y"),
    ("ACROS+YE", "ACROS_Y"),
    ("MONOCHROME+R", "MONOCHROME_R"),
    ("MONOCHROME+G", "MONOCHROME_G"),
    ("MONOCHROME+Y", "MONOCHROME_Y"),
    ("MONOCHROME+YE", "MONOCHROME_Y"),
];

const DYNAMIC_RANGE_ALIASES: &[(&str, &str)] = &[
    ("DRANGE_PRIORITY_(DRP)_AUTO", "DRAUTO"),
    ("DR_AUTO", "DRAUTO"),
    ("AUTO", "DRAUTO"),
];

/// Cleans a raw value before it is handed to a normalizer.
///
/// Signs are preserved; see [`generic_cleanup`] for the variant used on
/// fields without a normalizer.
pub fn clean_value(raw: &str) -> String {
    raw.trim().replace(' ', "_").replace(',', "").to_uppercase()
}

/// Cleanup applied to values of fields that have no normalizer.
pub fn generic_cleanup(raw: &str) -> String {
    clean_value(raw).replace('-', "")
}

/// Normalizes a film simulation display name into its member name.
///
/// `"Classic Chrome"` and `"CLASSIC_CHROME"` both yield `"CLASSIC_CHROME"`;
/// the function is idempotent.
pub fn clean_film_simulation_name(name: &str) -> String {
    let cleaned = name.trim().replace(' ', "_").replace('.', "");
    let cleaned = cleaned.split('/').next().unwrap_or_default().to_uppercase();

    match FILM_SIMULATION_ALIASES.iter().find(|(alias, _)| *alias == cleaned) {
        Some((_, canonical)) => canonical.to_string(),
        None => cleaned,
    }
}

/// Resolves a film simulation name. Unknown names are an error.
pub fn film_simulation(value: &str) -> Result<FieldValue> {
    let name = clean_film_simulation_name(value);
    FilmSimulation::from_name(&name)
        .map(FieldValue::FilmSimulation)
        .ok_or_else(|| RecipeError::unknown(FilmSimulation::KIND, name))
}

/// Resolves an effect strength. Unknown strengths are an error.
pub fn effect(value: &str) -> Result<FieldValue> {
    FujiEffect::from_name(value)
        .map(FieldValue::Effect)
        .ok_or_else(|| RecipeError::unknown(FujiEffect::KIND, value))
}

/// Resolves a dynamic range, defaulting to AUTO with a warning.
pub fn dynamic_range(value: &str) -> Result<FieldValue> {
    let range = known_dynamic_range(value).unwrap_or_else(|| {
        warn!(value, "Could not parse dynamic range, setting to AUTO");
        DynamicRange::Auto
    });

    Ok(FieldValue::DynamicRange(range))
}

/// Direct or aliased dynamic range; hyphens are ignored (`D-RANGE` is `DRANGE`).
fn known_dynamic_range(value: &str) -> Option<DynamicRange> {
    let value = value.replace('-', "");
    let name = DYNAMIC_RANGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == value)
        .map_or(value.as_str(), |(_, canonical)| *canonical);

    DynamicRange::from_name(name)
}

/// Takes the first signed integer or fraction, rounded to two decimals.
///
/// `"+1/3_TO_+1_(TYPICALLY)"` yields `0.33`. A value without any number is
/// an error.
pub fn exposure_compensation(value: &str) -> Result<FieldValue> {
    let token = EXPOSURE_RE
        .find(value)
        .ok_or_else(|| RecipeError::field(FieldKey::ExposureCompensation.as_str(), format!("no number in {value}")))?
        .as_str();

    let amount = match token.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = parse_f64(numerator)?;
            let denominator = parse_f64(denominator)?;
            if denominator == 0.0 {
                return Err(RecipeError::field(
                    FieldKey::ExposureCompensation.as_str(),
                    format!("zero denominator in {token}"),
                ));
            }
            numerator / denominator
        }
        None => parse_f64(token)?,
    };

    Ok(FieldValue::Float(round_to_hundredths(amount)))
}

fn parse_f64(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| RecipeError::field(FieldKey::ExposureCompensation.as_str(), format!("{token}: {e}")))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Takes the first signed integer, defaulting to 0 with a warning.
pub fn numeric(value: &str) -> Result<FieldValue> {
    let number = INTEGER_RE.find(value).and_then(|m| m.as_str().parse::<i32>().ok());

    Ok(FieldValue::Integer(number.unwrap_or_else(|| {
        warn!(value, "Could not convert to int, setting to 0");
        0
    })))
}

/// Parses `STRENGTH[_SIZE]`; malformed input becomes grain OFF with a warning.
pub fn grain_effect(value: &str) -> Result<FieldValue> {
    let mut tokens = value.split('_').map(str::trim).filter(|token| !token.is_empty());

    let strength = tokens.next().and_then(FujiEffect::from_name);
    let size = match tokens.next() {
        Some(token) => GrainEffectSize::from_name(token).map(Some),
        None => Some(None),
    };

    let grain = match (strength, size) {
        (Some(FujiEffect::Off), _) => GrainEffect::off(),
        (Some(strength), Some(size)) => GrainEffect::new(strength, size),
        _ => {
            warn!(value, "Could not parse grain effect, setting to OFF");
            GrainEffect::off()
        }
    };

    Ok(FieldValue::GrainEffect(grain))
}

/// Parses setting, red/blue shift and color temperature.
///
/// Never fails: every part has a default.
pub fn white_balance(value: &str) -> Result<FieldValue> {
    let kelvin = KELVIN_RE.captures(value).and_then(|caps| caps[1].parse::<u32>().ok());

    let setting = match kelvin {
        Some(_) => WhiteBalanceSetting::Temperature,
        None => white_balance_setting(value),
    };
    let color_temp = match kelvin {
        Some(k) if k > 0 => format!("{k}K"),
        _ => "0K".to_string(),
    };

    Ok(FieldValue::WhiteBalance(WhiteBalance {
        setting,
        red: shift(&RED_SHIFT_RE, value),
        blue: shift(&BLUE_SHIFT_RE, value),
        color_temp,
    }))
}

fn white_balance_setting(value: &str) -> WhiteBalanceSetting {
    if value.starts_with("AUTO_WHITE") {
        return WhiteBalanceSetting::AutoWhite;
    }
    if value.starts_with("AUTO_AMBIENCE") {
        return WhiteBalanceSetting::AutoAmbience;
    }
    if value.contains("AWB") || value == "AUTO" || value.starts_with("AUTO_") {
        return WhiteBalanceSetting::Auto;
    }

    if let Some(caps) = FLUORESCENT_RE.captures(value) {
        match &caps[1] {
            "1" => return WhiteBalanceSetting::FLight1,
            "2" => return WhiteBalanceSetting::FLight2,
            _ => return WhiteBalanceSetting::FLight3,
        }
    }

    let leading = value.split('_').next().unwrap_or_default();
    WhiteBalanceSetting::from_name(leading).unwrap_or_else(|| {
        warn!(value, "Could not parse white balance setting, setting to Auto");
        WhiteBalanceSetting::Auto
    })
}

fn shift(pattern: &Regex, value: &str) -> i32 {
    pattern
        .captures(value)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .unwrap_or(0)
}

/// Parses `<int>_WC_&_<int>_MG`, defaulting both parts to 0 with a warning.
pub fn monochromatic_color(value: &str) -> Result<FieldValue> {
    let parsed = MONOCHROMATIC_RE.captures(value).and_then(|caps| {
        let warm_cool = caps[1].parse::<i32>().ok()?;
        let magenta_green = caps[2].parse::<i32>().ok()?;
        Some(MonochromaticColor { warm_cool, magenta_green })
    });

    Ok(FieldValue::MonochromaticColor(parsed.unwrap_or_else(|| {
        warn!(value, "Could not convert to monochromatic color, setting to 0");
        MonochromaticColor::default()
    })))
}

/// Immutable table from field key to normalizer.
#[derive(Debug, Clone)]
pub struct NormalizerRegistry {
    normalizers: HashMap<FieldKey, Normalizer>,
}

impl NormalizerRegistry {
    /// A registry without any normalizer; every value gets [`generic_cleanup`].
    pub fn empty() -> Self {
        Self { normalizers: HashMap::new() }
    }

    /// The registry used for recipe pages.
    pub fn standard() -> Self {
        Self::empty()
            .with(FieldKey::FilmSimulation, film_simulation)
            .with(FieldKey::ColorChromeEffect, effect)
            .with(FieldKey::ColorChromeFxBlue, effect)
            .with(FieldKey::DynamicRange, dynamic_range)
            .with(FieldKey::ExposureCompensation, exposure_compensation)
            .with(FieldKey::GrainEffect, grain_effect)
            .with(FieldKey::WhiteBalance, white_balance)
            .with(FieldKey::MonochromaticColor, monochromatic_color)
            .with(FieldKey::Highlight, numeric)
            .with(FieldKey::Shadow, numeric)
            .with(FieldKey::Color, numeric)
            .with(FieldKey::Sharpness, numeric)
            .with(FieldKey::HighIsoNr, numeric)
            .with(FieldKey::Clarity, numeric)
    }

    /// Returns a copy of this registry with `normalizer` registered for `key`.
    pub fn with(mut self, key: FieldKey, normalizer: Normalizer) -> Self {
        self.normalizers.insert(key, normalizer);
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<Normalizer> {
        self.normalizers.get(&key).copied()
    }

    /// Normalizes `raw` for the canonical key `key`.
    ///
    /// Keys that are not a [`FieldKey`], or have no registered normalizer,
    /// get [`generic_cleanup`] and are stored as text.
    pub fn normalize(&self, key: &str, raw: &str) -> Result<FieldValue> {
        match FieldKey::from_name(key).and_then(|key| self.get(key)) {
            Some(normalizer) => normalizer(&clean_value(raw)),
            None => Ok(FieldValue::Text(generic_cleanup(raw))),
        }
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

static STANDARD_REGISTRY: LazyLock<NormalizerRegistry> = LazyLock::new(NormalizerRegistry::standard);

/// Shared instance of [`NormalizerRegistry::standard`].
pub fn standard_registry() -> &'static NormalizerRegistry {
    &STANDARD_REGISTRY
}

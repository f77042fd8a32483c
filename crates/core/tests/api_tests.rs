//! Library API integration tests
use simrecipe_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

fn recipe_profile() -> SimulationProfile {
    let doc = Document::parse(&read_fixture("recipe_page.html")).unwrap();
    ProfileParser::default().parse_tags(&doc.strong_tags().unwrap()).expect("should parse")
}

#[test]
fn test_parse_recipe_page() {
    let profile = recipe_profile();

    assert_eq!(profile.film_simulation, FilmSimulation::EternaBleachBypass);
    assert_eq!(profile.dynamic_range, Some(DynamicRange::Dr400));
    assert_eq!(
        profile.grain_effect,
        Some(GrainEffect::new(FujiEffect::Strong, Some(GrainEffectSize::Large)))
    );
    assert_eq!(profile.color_chrome_effect, Some(FujiEffect::Strong));
    assert_eq!(profile.color_chrome_fx_blue, Some(FujiEffect::Off));
    assert_eq!(profile.highlight, -2);
    assert_eq!(profile.shadow, 1);
    assert_eq!(profile.color, -3);
    assert_eq!(profile.sharpness, -2);
    assert_eq!(profile.high_iso_nr, -4);
    assert_eq!(profile.clarity, -2);
    assert_eq!(profile.exposure_compensation, 0.33);
    assert_eq!(profile.iso.as_deref(), Some("AUTO_UP_TO_ISO_6400"));
}

#[test]
fn test_parse_white_balance_from_page() {
    let wb = recipe_profile().white_balance.expect("white balance");

    assert_eq!(wb.setting, WhiteBalanceSetting::Temperature);
    assert_eq!(wb.red, 2);
    assert_eq!(wb.blue, -5);
    assert_eq!(wb.color_temp, "5200K");
}

#[test]
fn test_logical_lines_of_page() {
    let doc = Document::parse(&read_fixture("recipe_page.html")).unwrap();
    let tags = doc.strong_tags().unwrap();
    let lines: Vec<String> = flatten_and_process_tags(&tags).collect();

    assert_eq!(lines[0], "Film Simulation: Eterna Bleach Bypass");
    assert!(lines.contains(&"Clarity: -2".to_string()));
    assert!(lines.contains(&"Shadow: +1".to_string()));
    assert!(lines.iter().all(|line| !line.contains('\u{a0}')));
}

#[test]
fn test_page_without_film_simulation() {
    let html = "<p><strong>Dynamic Range: DR200<br>Highlight: +1</strong></p>";
    let doc = Document::parse(html).unwrap();
    let result = ProfileParser::default().parse_tags(&doc.strong_tags().unwrap());

    let err = result.unwrap_err();
    assert!(matches!(err, RecipeError::MissingField("film_simulation")));
    assert_eq!(err.category(), ErrorCategory::ProfileConstruction);
}

#[test]
fn test_page_without_bold_text() {
    let doc = Document::parse(&read_fixture("no_settings.html")).unwrap();
    assert!(doc.strong_tags().unwrap().is_empty());
}

#[test]
fn test_render_recipe_page() {
    let link = RecipeLink::new(
        "Eterna Bleach Bypass",
        "https://fujixweekly.com/2020/07/02/eterna-bleach-bypass-fujifilm-x-trans-iv-film-simulation-recipe/",
    );
    let xml = render_profile(&recipe_profile(), &link, DEFAULT_TEMPLATE).unwrap();

    for expected in [
        "<FilmSimulation>BleachBypass</FilmSimulation>",
        "<WideDRange>400</WideDRange>",
        "<HighlightTone>-2</HighlightTone>",
        "<ShadowTone>1</ShadowTone>",
        "<WhiteBalance>Temperature</WhiteBalance>",
        "<WBShiftR>2</WBShiftR>",
        "<WBShiftB>-5</WBShiftB>",
        "<WBColorTemp>5200K</WBColorTemp>",
        "<ExposureBias>0.33</ExposureBias>",
        "<NoisReduction>-4</NoisReduction>",
        "<ColorChromeBlue>OFF</ColorChromeBlue>",
        "label=\"Eterna Bleach Bypass\"",
    ] {
        assert!(xml.contains(expected), "missing {expected}");
    }
    assert!(xml.ends_with('\n') && !xml.ends_with("\n\n"));
}

#[test]
fn test_flat_profile_reports_iso_gap() {
    let rendered = fill_xml_template(&recipe_profile().to_flat_dict(), DEFAULT_TEMPLATE).unwrap();
    assert_eq!(rendered.gaps, vec!["iso".to_string()]);
}

#[test]
fn test_discover_sensor_index() {
    let doc = Document::parse(&read_fixture("sensor_index.html")).unwrap();
    let recipes = discover_recipes(Sensor::XTransIV, &doc).unwrap();

    let names: Vec<&str> = recipes.iter().map(|recipe| recipe.link.name()).collect();
    assert_eq!(names, vec!["Eterna Bleach Bypass", "Kodak Portra 400 v2", "Kodachrome 64"]);
    assert!(recipes.iter().all(|recipe| recipe.link.is_valid()));
    assert_eq!(discover::count_recipe_links(&doc).unwrap(), 5);
}

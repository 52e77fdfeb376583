use super::*;

#[test]
fn layout_without_font_is_an_asset_error() {
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .layout_line("Asha", 48.0, TextBrushRgba8::default())
        .err()
        .expect("layout without a font must fail");
    assert!(matches!(err, TricolorError::AssetLoad(_)));
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.load_font(b"not a font".to_vec()).is_err());
    assert!(engine.font().is_none());
}

#[test]
fn configured_font_wins_and_missing_one_falls_back() {
    let dir = PathBuf::from("target").join("unit_font_discovery");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("nested/Serif.ttf"), b"x").unwrap();
    fs::write(dir.join("DejaVuSans-Bold.ttf"), b"x").unwrap();
    fs::write(dir.join("notes.txt"), b"x").unwrap();

    let search = vec![dir.clone()];
    assert_eq!(
        discover_font(Some(&dir.join("nested/Serif.ttf")), &search),
        Some(dir.join("nested/Serif.ttf"))
    );
    assert_eq!(
        discover_font(Some(&dir.join("missing.ttf")), &search),
        Some(dir.join("DejaVuSans-Bold.ttf"))
    );
    assert_eq!(discover_font(None, &[dir.join("nowhere")]), None);
}

#[test]
fn system_font_lays_out_with_positive_extent() {
    let Some(path) = discover_font(None, &system_font_dirs()) else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    if engine.load_font_file(&path).is_err() {
        eprintln!("skipping: {} is not loadable", path.display());
        return;
    }
    let layout = engine
        .layout_line("Jai Hind", 32.0, Color::WHITE.into())
        .unwrap();
    assert!(layout.width() > 0.0);
    assert!(layout.height() > 0.0);
}

#[test]
fn family_discovery_prefers_bold_faces() {
    let dir = PathBuf::from("target").join("unit_family_discovery");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    for name in [
        "Merriweather-Regular.ttf",
        "Merriweather-BoldItalic.ttf",
        "Merriweather-Bold.ttf",
        "Poppins-Regular.otf",
        "Arial.ttf",
    ] {
        fs::write(dir.join(name), b"x").unwrap();
    }

    let search = vec![dir.clone()];
    assert_eq!(
        discover_family("merriweather", &search),
        Some(dir.join("Merriweather-Bold.ttf"))
    );
    assert_eq!(
        discover_family("Poppins", &search),
        Some(dir.join("Poppins-Regular.otf"))
    );
    assert_eq!(discover_family("Arial", &search), Some(dir.join("Arial.ttf")));
    assert_eq!(discover_family("Comic Sans", &search), None);
    assert_eq!(discover_family("  ", &search), None);
}

#[test]
fn resolve_without_fonts_is_none() {
    let engine = TextLayoutEngine::new();
    assert!(engine.resolve(None).is_none());
    assert!(engine.resolve(Some("Poppins")).is_none());
}

#[test]
fn resolve_matches_family_case_insensitively() {
    let Some(path) = discover_font(None, &system_font_dirs()) else {
        eprintln!("skipping: no system font found");
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let Ok(loaded) = engine.load_font_file(&path) else {
        eprintln!("skipping: {} is not loadable", path.display());
        return;
    };
    let family = loaded.family.clone();

    let upper = family.to_ascii_uppercase();
    assert_eq!(engine.resolve(Some(&upper)).unwrap().family, family);
    assert_eq!(engine.resolve(Some("No Such Family")).unwrap().family, family);
    assert!(engine.layout_line_in(Some("No Such Family"), "Asha", 24.0, Color::WHITE.into()).is_ok());
}

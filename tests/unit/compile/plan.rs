use super::*;
use crate::scene::model::{PhotoGeometry, TextGeometry};

fn example_scene() -> Scene {
    Scene {
        background: Some(BackgroundRef::Image {
            source: "backgrounds/independence-1.png".to_string(),
        }),
        photo: Some("photo.png".to_string()),
        photo_geometry: PhotoGeometry {
            x: 20.0,
            y: 20.0,
            size: 120.0,
        },
        name: "Asha".to_string(),
        text_geometry: TextGeometry { x: 50.0, y: 80.0 },
        ..Scene::default()
    }
}

#[test]
fn no_background_compiles_to_nothing() {
    let scene = Scene {
        name: "Asha".to_string(),
        ..Scene::default()
    };
    assert_eq!(compile_scene(&scene, Canvas::canonical(), 2025).unwrap(), None);
}

#[test]
fn bitmap_scene_layers_in_paint_order() {
    let plan = compile_scene(&example_scene(), Canvas::canonical(), 2025)
        .unwrap()
        .unwrap();
    let kinds: Vec<_> = plan.layers.iter().map(Layer::kind).collect();
    assert_eq!(
        kinds,
        vec![
            LayerKind::Background,
            LayerKind::Overlay,
            LayerKind::Photo,
            LayerKind::Text
        ]
    );
    assert_eq!(
        plan.layers[1],
        Layer::Overlay {
            color: Color::rgba(0, 0, 0, OVERLAY_ALPHA)
        }
    );
}

#[test]
fn example_geometry_on_canonical_surface() {
    let plan = compile_scene(&example_scene(), Canvas::canonical(), 2025)
        .unwrap()
        .unwrap();
    let Layer::Photo(photo) = &plan.layers[2] else {
        panic!("expected photo layer");
    };
    assert_eq!(photo.center, Point::new(160.0, 120.0));
    assert_eq!(photo.radius, 60.0);
    assert_eq!(photo.ring_width, 4.0);
    assert_eq!(photo.ring_color, Color::WHITE);

    let Layer::Text(text) = &plan.layers[3] else {
        panic!("expected text layer");
    };
    let roles: Vec<_> = text.lines.iter().map(|l| l.role).collect();
    assert_eq!(roles, vec![TextRole::Caption, TextRole::Name, TextRole::Tagline]);
    assert_eq!(text.lines[1].center, Point::new(400.0, 480.0));
    assert_eq!(text.lines[1].font_size, 48.0);
    assert_eq!(text.lines[0].text, "Happy Independence Day 2025");
    assert!((text.lines[0].center.y - (480.0 - 52.8)).abs() < 1e-9);
    assert!((text.lines[2].center.y - (480.0 + 52.8)).abs() < 1e-9);
    assert_eq!(text.lines[0].font_size, 24.0);
    assert_eq!(text.lines[2].text, TAGLINE);
    assert_eq!(text.shadow.color, Color::rgba(0, 0, 0, 128));
}

#[test]
fn empty_name_has_no_text_layer() {
    let mut scene = example_scene();
    scene.name = "  ".to_string();
    let plan = compile_scene(&scene, Canvas::canonical(), 2025)
        .unwrap()
        .unwrap();
    assert!(plan.layers.iter().all(|l| l.kind() != LayerKind::Text));
    assert!(plan.layers.iter().any(|l| l.kind() == LayerKind::Photo));
}

#[test]
fn geometry_scales_with_surface() {
    let small = Canvas::new(400, 300).unwrap();
    let plan = compile_scene(&example_scene(), small, 2025).unwrap().unwrap();
    let Layer::Photo(photo) = &plan.layers[2] else {
        panic!("expected photo layer");
    };
    assert_eq!(photo.center, Point::new(80.0, 60.0));
    assert_eq!(photo.radius, 30.0);
    let Layer::Text(text) = &plan.layers[3] else {
        panic!("expected text layer");
    };
    assert_eq!(text.lines[1].center, Point::new(200.0, 240.0));
    assert_eq!(text.lines[1].font_size, 24.0);
}

#[test]
fn template_background_has_no_overlay_and_chakra_only_where_asked() {
    let scene = Scene::on_template("ashoka-chakra").unwrap();
    let plan = compile_scene(&scene, Canvas::canonical(), 2025)
        .unwrap()
        .unwrap();
    assert_eq!(plan.layers.len(), 1);
    let Layer::Background(BackgroundLayer::Gradient { chakra, end, .. }) = &plan.layers[0] else {
        panic!("expected gradient");
    };
    let chakra = chakra.expect("chakra template draws the wheel");
    assert_eq!(chakra.center, Point::new(400.0, 300.0));
    assert_eq!(chakra.spokes, 24);
    assert_eq!(*end, Point::new(800.0, 600.0));

    let plain = Scene::on_template("flag-wave").unwrap();
    let plan = compile_scene(&plain, Canvas::canonical(), 2025)
        .unwrap()
        .unwrap();
    assert!(matches!(
        &plan.layers[0],
        Layer::Background(BackgroundLayer::Gradient { chakra: None, .. })
    ));
}

#[test]
fn invalid_scene_is_rejected() {
    let mut scene = example_scene();
    scene.font_size = 1000.0;
    assert!(compile_scene(&scene, Canvas::canonical(), 2025).is_err());
}

#[test]
fn font_family_reaches_the_text_layer() {
    let mut scene = example_scene();
    scene.font_family = Some(" Merriweather ".to_string());
    let plan = compile_scene(&scene, Canvas::canonical(), 2025)
        .unwrap()
        .unwrap();
    let Some(Layer::Text(text)) = plan.layers.last() else {
        panic!("expected text layer last");
    };
    assert_eq!(text.font_family.as_deref(), Some("Merriweather"));
}

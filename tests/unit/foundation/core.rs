use super::*;

#[test]
fn canvas_rejects_degenerate_sizes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(800, 600).unwrap(), Canvas::canonical());
}

#[test]
fn percent_positions_resolve_against_each_side() {
    let c = Canvas::canonical();
    assert_eq!(c.resolve(Percent2::new(20.0, 20.0)), Point::new(160.0, 120.0));
    assert_eq!(c.resolve(Percent2::new(50.0, 80.0)), Point::new(400.0, 480.0));

    let half = Canvas::new(400, 300).unwrap();
    assert_eq!(half.resolve(Percent2::new(50.0, 80.0)), Point::new(200.0, 240.0));
    assert!((half.scale_factor() - 0.5).abs() < 1e-12);
}

#[test]
fn percent_validation_bounds() {
    assert!(Percent2::new(0.0, 100.0).validate("pos").is_ok());
    assert!(Percent2::new(-1.0, 50.0).validate("pos").is_err());
    assert!(Percent2::new(50.0, f64::NAN).validate("pos").is_err());
}

#[test]
fn premultiply_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}

use super::*;
use crate::foundation::core::Canvas;

#[test]
fn filename_pattern() {
    assert_eq!(
        export_filename(2025, "Asha", "png").unwrap(),
        "IndependenceDay2025_Asha.png"
    );
    assert_eq!(
        export_filename(2025, " Asha  Rani\tDevi ", "jpg").unwrap(),
        "IndependenceDay2025_Asha_Rani_Devi.jpg"
    );
    assert_eq!(
        export_filename(2026, "a/b", "png").unwrap(),
        "IndependenceDay2026_a_b.png"
    );
}

#[test]
fn empty_name_is_rejected() {
    for name in ["", "   "] {
        assert!(matches!(
            export_filename(2025, name, "png"),
            Err(TricolorError::Validation(_))
        ));
    }
}

#[test]
fn png_round_trips_straight_alpha() {
    let surface =
        RasterSurface::from_premul_rgba8(2, 1, vec![255, 0, 0, 255, 64, 0, 0, 128]).unwrap();
    let bytes = encode_surface(&surface, ExportFormat::Png).unwrap();
    let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 1));
    assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(back.get_pixel(1, 0).0, [128, 0, 0, 128]);
}

#[test]
fn jpeg_export_has_canvas_size() {
    let surface = RasterSurface::new(Canvas::canonical());
    let img = to_file(&surface, "card.jpg", ExportFormat::Jpeg).unwrap();
    assert_eq!(img.mime, "image/jpeg");
    let back = image::load_from_memory(&img.bytes).unwrap();
    assert_eq!((back.width(), back.height()), (800, 600));
}

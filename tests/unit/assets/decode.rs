use std::io::Cursor;

use super::*;

fn png_1x1(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_premultiplies() {
    let decoded = decode_image(&png_1x1([100, 50, 200, 128])).unwrap();
    assert_eq!((decoded.width, decoded.height), (1, 1));
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn garbage_is_an_asset_load_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, TricolorError::AssetLoad(_)));
}

#[test]
fn unpremultiply_restores_opaque_and_clear_pixels() {
    let mut px = vec![10, 20, 30, 255, 0, 0, 0, 0, 64, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..8], &[10, 20, 30, 255, 0, 0, 0, 0]);
    assert_eq!(&px[8..], &[128, 64, 0, 128]);
}

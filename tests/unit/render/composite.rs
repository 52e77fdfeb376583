use super::*;

#[test]
fn transparent_source_keeps_destination() {
    assert_eq!(over([10, 20, 30, 40], [255, 255, 255, 0]), [10, 20, 30, 40]);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn half_black_over_white_darkens() {
    let out = over([255, 255, 255, 255], [0, 0, 0, 128]);
    assert_eq!(out, [127, 127, 127, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    over_in_place(&mut dst, &[1, 2, 3, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255, 0, 0, 0, 0]);
}

#[test]
fn overlay_fill_dims_every_pixel() {
    let mut px = vec![255u8, 255, 255, 255, 0, 0, 0, 0];
    fill_over(&mut px, Color::BLACK.with_alpha(89));
    assert_eq!(&px[..4], &[166, 166, 166, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 89]);
}

#[test]
fn tint_and_translate_build_a_shadow() {
    // 2x1: opaque white then clear
    let src = vec![255u8, 255, 255, 255, 0, 0, 0, 0];
    let shadow = tint_alpha(&src, Color::BLACK.with_alpha(128));
    assert_eq!(shadow, vec![0, 0, 0, 128, 0, 0, 0, 0]);
    let moved = translate(&shadow, 2, 1, 1, 0);
    assert_eq!(moved, vec![0, 0, 0, 0, 0, 0, 0, 128]);
    assert_eq!(translate(&shadow, 2, 1, 0, 5), vec![0u8; 8]);
}

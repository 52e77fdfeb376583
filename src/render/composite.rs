use crate::foundation::{
    color::Color,
    error::{TricolorError, TricolorResult},
};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite `src` over `dst`, both premultiplied RGBA8 of the same size.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> TricolorResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TricolorError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Fill every pixel of `dst` with `color`, composited over what is there.
pub fn fill_over(dst: &mut [u8], color: Color) {
    let src = color.to_premul().to_array();
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], src);
        d.copy_from_slice(&out);
    }
}

/// Silhouette of `src` in `color`: each pixel takes `color` scaled by the source coverage.
pub fn tint_alpha(src: &[u8], color: Color) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for (o, s) in out.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = mul_div255(u16::from(s[3]), u16::from(color.a));
        o.copy_from_slice(&color.with_alpha(a).to_premul().to_array());
    }
    out
}

/// Move the image by whole pixels; uncovered pixels become transparent.
pub fn translate(src: &[u8], width: u32, height: u32, dx: i32, dy: i32) -> Vec<u8> {
    let (w, h) = (width as i64, height as i64);
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        let sy = y - i64::from(dy);
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - i64::from(dx);
            if sx < 0 || sx >= w {
                continue;
            }
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

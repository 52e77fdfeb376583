use crate::foundation::error::{TricolorError, TricolorResult};

/// Separable gaussian blur of a premultiplied RGBA8 buffer, edges clamped.
///
/// `sigma` defaults to half the radius when not positive.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> TricolorResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| TricolorError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(TricolorError::validation(
            "blur expects a buffer of width*height*4 bytes",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let sigma = if sigma.is_finite() && sigma > 0.0 {
        sigma
    } else {
        (radius as f32 / 2.0).max(0.5)
    };
    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    pass(src, &mut tmp, width, height, &kernel, Axis::X);
    pass(&tmp, &mut out, width, height, &kernel, Axis::Y);
    Ok(out)
}

/// Weights in 16.16 fixed point, summing to exactly 1.0.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| (-f64::from(i * i) / denom).exp())
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;
    weights
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i64 - radius;
                let (sx, sy) = match axis {
                    Axis::X => ((x + d).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = ((a + 32768) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;

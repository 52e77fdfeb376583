use crate::foundation::error::{TricolorError, TricolorResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Width of the canonical card surface; pixel sizes in a [`crate::Scene`] are expressed
/// against it.
pub const CANONICAL_WIDTH: u32 = 800;
/// Height of the canonical card surface.
pub const CANONICAL_HEIGHT: u32 = 600;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Raster surface dimensions in pixels.
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Canvas {
    /// Validated constructor; both sides must be non-zero and fit the CPU rasterizer (`u16`).
    pub fn new(width: u32, height: u32) -> TricolorResult<Self> {
        if width == 0 || height == 0 {
            return Err(TricolorError::validation("canvas sides must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(TricolorError::validation("canvas sides must fit in u16"));
        }
        Ok(Self { width, height })
    }

    /// The 800×600 card.
    pub fn canonical() -> Self {
        Self {
            width: CANONICAL_WIDTH,
            height: CANONICAL_HEIGHT,
        }
    }

    /// Ratio applied to pixel sizes authored against the canonical width.
    pub fn scale_factor(self) -> f64 {
        f64::from(self.width) / f64::from(CANONICAL_WIDTH)
    }

    /// Map a percentage position onto this canvas.
    pub fn resolve(self, p: Percent2) -> Point {
        Point::new(
            f64::from(self.width) * p.x / 100.0,
            f64::from(self.height) * p.y / 100.0,
        )
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Position expressed as percentages of the surface width/height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Percent2 {
    /// Horizontal position, 0..=100.
    pub x: f64,
    /// Vertical position, 0..=100.
    pub y: f64,
}

impl Percent2 {
    /// Construct without validation.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn validate(self, what: &str) -> TricolorResult<()> {
        for v in [self.x, self.y] {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(TricolorError::validation(format!(
                    "{what} must be within 0..=100 percent (got {}, {})",
                    self.x, self.y
                )));
            }
        }
        Ok(())
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

use crate::foundation::{
    core::Canvas,
    error::{TricolorError, TricolorResult},
};

/// Premultiplied RGBA8 pixel buffer the compositor paints into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterSurface {
    /// Fully transparent surface.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.byte_len()],
        }
    }

    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> TricolorResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.byte_len() {
            return Err(TricolorError::validation(format!(
                "surface data is {} bytes, expected {}",
                data.len(),
                canvas.byte_len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Premultiplied pixel at (`x`, `y`); `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// `true` when no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

use std::io::Cursor;

use anyhow::Context;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    foundation::error::{TricolorError, TricolorResult},
    render::surface::RasterSurface,
};

/// Raster formats the exporter writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Encoded card ready to be saved or shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// `IndependenceDay<year>_<name>.<ext>`, whitespace runs in the name collapsed to `_`.
///
/// Path separators and other characters file systems reject are replaced as well. An empty
/// name is a validation error.
pub fn export_filename(year: u32, name: &str, ext: &str) -> TricolorResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TricolorError::validation("Please enter your name first"));
    }

    let mut cleaned = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                cleaned.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => cleaned.push('_'),
            c if c.is_control() => {}
            c => cleaned.push(c),
        }
    }
    Ok(format!("IndependenceDay{year}_{cleaned}.{ext}"))
}

/// Encode the surface with straight alpha (PNG) or flattened to RGB (JPEG).
pub fn encode_surface(surface: &RasterSurface, format: ExportFormat) -> TricolorResult<Vec<u8>> {
    let mut rgba = surface.data().to_vec();
    unpremultiply_rgba8_in_place(&mut rgba);
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), rgba)
        .ok_or_else(|| TricolorError::validation("surface buffer does not match its size"))?;

    let mut out = Vec::new();
    match format {
        ExportFormat::Png => image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .context("encode png")?,
        ExportFormat::Jpeg => image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
            .context("encode jpeg")?,
    }
    Ok(out)
}

/// Encode `surface` under `filename`.
pub fn to_file(
    surface: &RasterSurface,
    filename: &str,
    format: ExportFormat,
) -> TricolorResult<ExportedImage> {
    if filename.trim().is_empty() {
        return Err(TricolorError::validation("export filename must be non-empty"));
    }
    Ok(ExportedImage {
        filename: filename.to_string(),
        mime: format.mime(),
        bytes: encode_surface(surface, format)?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;

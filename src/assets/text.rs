use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use tracing::{debug, warn};

use crate::foundation::{
    color::Color,
    error::{TricolorError, TricolorResult},
};

/// RGBA8 brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Font bytes together with the family name Parley registered them under.
#[derive(Clone)]
pub struct LoadedFont {
    pub bytes: Arc<Vec<u8>>,
    pub family: String,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("bytes_len", &self.bytes.len())
            .field("family", &self.family)
            .finish()
    }
}

/// Shapes single-line card text.
///
/// Any number of fonts can be registered; one of them is the default used when a layout names
/// no family or a family that was never registered.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: Vec<LoadedFont>,
    default: Option<usize>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: Vec::new(),
            default: None,
        }
    }

    /// Register `bytes` and make it the default font.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> TricolorResult<&LoadedFont> {
        let idx = self.register(bytes)?;
        self.default = Some(idx);
        Ok(&self.fonts[idx])
    }

    /// Register `bytes` as an extra family. It only becomes the default when none is set.
    pub fn add_font(&mut self, bytes: Vec<u8>) -> TricolorResult<&LoadedFont> {
        let idx = self.register(bytes)?;
        self.default.get_or_insert(idx);
        Ok(&self.fonts[idx])
    }

    fn register(&mut self, bytes: Vec<u8>) -> TricolorResult<usize> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TricolorError::asset_load("no font families found in font data"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TricolorError::asset_load("registered font family has no name"))?
            .to_string();
        debug!(family = %family, "font registered");

        let loaded = LoadedFont {
            bytes: Arc::new(bytes),
            family,
        };
        match self
            .fonts
            .iter()
            .position(|f| f.family.eq_ignore_ascii_case(&loaded.family))
        {
            Some(idx) => {
                self.fonts[idx] = loaded;
                Ok(idx)
            }
            None => {
                self.fonts.push(loaded);
                Ok(self.fonts.len() - 1)
            }
        }
    }

    pub fn load_font_file(&mut self, path: &Path) -> TricolorResult<&LoadedFont> {
        let bytes = fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.load_font(bytes)
    }

    /// The default font.
    pub fn font(&self) -> Option<&LoadedFont> {
        self.default.map(|idx| &self.fonts[idx])
    }

    pub fn fonts(&self) -> &[LoadedFont] {
        &self.fonts
    }

    /// The registered font whose family matches `family` (ASCII case-insensitive), else the
    /// default.
    pub fn resolve(&self, family: Option<&str>) -> Option<&LoadedFont> {
        let wanted = family.map(str::trim).filter(|f| !f.is_empty());
        if let Some(wanted) = wanted {
            if let Some(font) = self.fonts.iter().find(|f| f.family.eq_ignore_ascii_case(wanted)) {
                return Some(font);
            }
            debug!(family = wanted, "font family not registered; using default");
        }
        self.font()
    }

    /// Lay out `text` on one line in the default font.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TricolorResult<parley::Layout<TextBrushRgba8>> {
        self.layout_line_in(None, text, size_px, brush)
    }

    /// Lay out `text` on one line in the font [`Self::resolve`] picks for `family`.
    pub fn layout_line_in(
        &mut self,
        family: Option<&str>,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TricolorResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TricolorError::validation("font size must be finite and > 0"));
        }
        let family = self
            .resolve(family)
            .map(|f| f.family.clone())
            .ok_or_else(|| TricolorError::asset_load("no font loaded"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Directories searched when no font is configured.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }
    dirs
}

/// The configured font when it exists, else the best TTF/OTF found in `search_dirs`.
///
/// Candidates are sorted by path so the choice is stable; a bold sans face is preferred
/// because card text is drawn bold.
pub fn discover_font(configured: Option<&Path>, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    if let Some(p) = configured {
        if p.is_file() {
            return Some(p.to_path_buf());
        }
        warn!(path = %p.display(), "configured font not found; searching system fonts");
    }

    let mut found = Vec::new();
    for dir in search_dirs {
        collect_fonts(dir, 0, &mut found);
    }
    found.sort();

    let score = |p: &PathBuf| {
        let name = p
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match (name.contains("sans"), name.contains("bold")) {
            (true, true) if !name.contains("oblique") && !name.contains("italic") => 0,
            (true, false) => 1,
            _ => 2,
        }
    };
    found.into_iter().min_by_key(score)
}

/// Best font file in `search_dirs` whose name mentions `family`, bold faces first.
///
/// Matching ignores case, spaces, `-` and `_`, so "Merriweather" finds
/// `Merriweather-Bold.ttf`.
pub fn discover_family(family: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let squash = |s: &str| {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    let wanted = squash(family);
    if wanted.is_empty() {
        return None;
    }

    let mut found = Vec::new();
    for dir in search_dirs {
        collect_fonts(dir, 0, &mut found);
    }
    found.sort();
    found
        .into_iter()
        .filter_map(|p| {
            let stem = squash(p.file_stem()?.to_str()?);
            stem.starts_with(&wanted).then_some((stem, p))
        })
        .min_by_key(|(stem, _)| {
            let rest = &stem[wanted.len()..];
            match rest {
                "bold" => 0,
                _ if rest.contains("bold") && !rest.contains("italic") => 1,
                "" | "regular" => 2,
                _ => 3,
            }
        })
        .map(|(_, p)| p)
}

fn collect_fonts(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > 4 {
        return;
    }
    let Ok(rd) = fs::read_dir(dir) else {
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fonts(&path, depth + 1, out);
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext == "ttf" || ext == "otf" {
            out.push(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;

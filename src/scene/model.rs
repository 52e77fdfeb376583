use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        color::Color,
        core::Percent2,
        error::{TricolorError, TricolorResult},
    },
    scene::templates::{Template, template_by_id},
};

pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 200.0;

/// What fills the surface before anything else is painted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundRef {
    /// One of the built-in gradient templates.
    Template { id: String },
    /// A bitmap resolved through an [`AssetSource`](crate::AssetSource).
    Image { source: String },
}

/// Circular photo placement: centre as percentages, diameter in canonical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoGeometry {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Default for PhotoGeometry {
    fn default() -> Self {
        Self {
            x: 20.0,
            y: 20.0,
            size: 120.0,
        }
    }
}

impl PhotoGeometry {
    pub fn center(&self) -> Percent2 {
        Percent2::new(self.x, self.y)
    }
}

/// Text anchor as percentages of the surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextGeometry {
    pub x: f64,
    pub y: f64,
}

impl Default for TextGeometry {
    fn default() -> Self {
        Self { x: 50.0, y: 80.0 }
    }
}

impl TextGeometry {
    pub fn anchor(&self) -> Percent2 {
        Percent2::new(self.x, self.y)
    }
}

/// Declarative description of one card render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// `None` means nothing was picked yet; rendering is then a no-op.
    pub background: Option<BackgroundRef>,
    pub photo: Option<String>,
    pub photo_geometry: PhotoGeometry,
    pub name: String,
    pub text_geometry: TextGeometry,
    /// Primary font size in canonical pixels.
    pub font_size: f64,
    /// Preferred font family for the card text; the renderer's default font when unset or
    /// unavailable.
    pub font_family: Option<String>,
    pub color_hex: String,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: None,
            photo: None,
            photo_geometry: PhotoGeometry::default(),
            name: String::new(),
            text_geometry: TextGeometry::default(),
            font_size: 48.0,
            font_family: None,
            color_hex: "#FFFFFF".to_string(),
        }
    }
}

impl Scene {
    pub fn from_json_str(text: &str) -> TricolorResult<Self> {
        serde_json::from_str(text).map_err(|e| TricolorError::serde(format!("scene: {e}")))
    }

    /// Scene on a built-in template, with the template's default text position.
    pub fn on_template(id: &str) -> TricolorResult<Self> {
        let mut scene = Self {
            background: Some(BackgroundRef::Template { id: id.to_string() }),
            ..Self::default()
        };
        scene.with_template_defaults()?;
        Ok(scene)
    }

    /// Move the text anchor to the selected template's default. No-op for bitmap backgrounds.
    pub fn with_template_defaults(&mut self) -> TricolorResult<&mut Self> {
        if let Some(t) = self.template()? {
            self.text_geometry = TextGeometry {
                x: t.text_position.x,
                y: t.text_position.y,
            };
        }
        Ok(self)
    }

    /// The selected template, if the background is one.
    pub fn template(&self) -> TricolorResult<Option<&'static Template>> {
        match &self.background {
            Some(BackgroundRef::Template { id }) => template_by_id(id)
                .map(Some)
                .ok_or_else(|| TricolorError::validation(format!("unknown template \"{id}\""))),
            _ => Ok(None),
        }
    }

    /// The trimmed name; empty means no text layer.
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    pub fn text_color(&self) -> TricolorResult<Color> {
        Color::parse_hex(&self.color_hex)
    }

    pub fn validate(&self) -> TricolorResult<()> {
        self.template()?;
        if let Some(BackgroundRef::Image { source }) = &self.background
            && source.trim().is_empty()
        {
            return Err(TricolorError::validation("background image source is empty"));
        }
        if self.photo.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(TricolorError::validation("photo reference is empty"));
        }
        self.photo_geometry.center().validate("photo position")?;
        let size = self.photo_geometry.size;
        if !size.is_finite() || size <= 0.0 {
            return Err(TricolorError::validation(format!(
                "photo size must be > 0 (got {size})"
            )));
        }
        self.text_geometry.anchor().validate("text position")?;
        if !self.font_size.is_finite() || !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size)
        {
            return Err(TricolorError::validation(format!(
                "font size must be within {MIN_FONT_SIZE}..={MAX_FONT_SIZE} (got {})",
                self.font_size
            )));
        }
        if self.font_family.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(TricolorError::validation("font family is empty"));
        }
        self.text_color()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

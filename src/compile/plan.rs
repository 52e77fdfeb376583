use crate::{
    foundation::{
        color::Color,
        core::{Canvas, Point, Vec2},
        error::TricolorResult,
    },
    scene::{
        model::{BackgroundRef, Scene},
        templates::{CHAKRA, Palette},
    },
};

/// Alpha of the dark wash laid over bitmap backgrounds (0.35).
pub const OVERLAY_ALPHA: u8 = 89;
/// Ring stroke around the photo, in canonical pixels.
pub const RING_WIDTH: f64 = 4.0;
/// Caption and tagline sit this many primary font sizes away from the name.
pub const CAPTION_OFFSET_RATIO: f64 = 1.1;
/// Caption and tagline font size relative to the primary font size.
pub const CAPTION_SIZE_RATIO: f64 = 0.5;
pub const TAGLINE: &str = "Jai Hind! Proud to be Indian";

#[derive(Clone, Debug, PartialEq)]
/// Backend-agnostic description of one card render, in surface pixels.
///
/// Layers are listed in paint order; executing them out of order is a bug.
pub struct RenderPlan {
    pub canvas: Canvas,
    pub layers: Vec<Layer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Background,
    Overlay,
    Photo,
    Text,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Background(BackgroundLayer),
    /// Flat colour over the whole surface.
    Overlay { color: Color },
    Photo(PhotoLayer),
    Text(TextLayer),
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Background(_) => LayerKind::Background,
            Self::Overlay { .. } => LayerKind::Overlay,
            Self::Photo(_) => LayerKind::Photo,
            Self::Text(_) => LayerKind::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundLayer {
    /// Linear gradient from `start` to `end`, plus the chakra for templates that draw one.
    Gradient {
        palette: Palette,
        start: Point,
        end: Point,
        chakra: Option<ChakraLayer>,
    },
    /// Bitmap scaled to cover the surface.
    Image { source: String },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChakraLayer {
    pub center: Point,
    pub radius: f64,
    pub stroke_width: f64,
    pub spokes: u32,
    pub hub_radius: f64,
    pub spoke_inner: f64,
    pub spoke_outer: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    pub offset: Vec2,
    pub blur_radius: u32,
    pub color: Color,
}

impl DropShadow {
    /// Black at alpha 0.5, offset (2, 2), blur 4, scaled with the surface.
    pub fn soft(scale: f64) -> Self {
        Self {
            offset: Vec2::new(2.0 * scale, 2.0 * scale),
            blur_radius: (4.0 * scale).round().max(1.0) as u32,
            color: Color::BLACK.with_alpha(128),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoLayer {
    pub source: String,
    pub center: Point,
    pub radius: f64,
    pub ring_width: f64,
    pub ring_color: Color,
    pub shadow: DropShadow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Caption,
    Name,
    Tagline,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub role: TextRole,
    pub text: String,
    /// Centre of the line's bounding box.
    pub center: Point,
    pub font_size: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    pub lines: Vec<TextLine>,
    /// Requested family; `None` uses the default font.
    pub font_family: Option<String>,
    pub color: Color,
    pub shadow: DropShadow,
}

/// Caption drawn above the name.
pub fn caption_for_year(year: u32) -> String {
    format!("Happy Independence Day {year}")
}

/// Turn `scene` into pixel geometry for `canvas`. `None` when no background is selected.
///
/// Positions are percentages of the surface; the photo diameter and font sizes are authored
/// against the canonical width and scale with the surface width.
pub fn compile_scene(scene: &Scene, canvas: Canvas, year: u32) -> TricolorResult<Option<RenderPlan>> {
    let Some(background) = &scene.background else {
        return Ok(None);
    };
    scene.validate()?;

    let scale = canvas.scale_factor();
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let mut layers = Vec::with_capacity(4);

    match background {
        BackgroundRef::Template { .. } => {
            let Some(template) = scene.template()? else {
                return Ok(None);
            };
            let chakra = template.draws_chakra().then(|| ChakraLayer {
                center: Point::new(w / 2.0, h / 2.0),
                radius: CHAKRA.radius * scale,
                stroke_width: CHAKRA.stroke_width * scale,
                spokes: CHAKRA.spokes,
                hub_radius: CHAKRA.radius * CHAKRA.hub_ratio * scale,
                spoke_inner: CHAKRA.radius * CHAKRA.spoke_inner_ratio * scale,
                spoke_outer: CHAKRA.radius * CHAKRA.spoke_outer_ratio * scale,
                color: CHAKRA.color,
            });
            layers.push(Layer::Background(BackgroundLayer::Gradient {
                palette: template.palette(),
                start: Point::ORIGIN,
                end: Point::new(w, h),
                chakra,
            }));
        }
        BackgroundRef::Image { source } => {
            layers.push(Layer::Background(BackgroundLayer::Image {
                source: source.clone(),
            }));
            layers.push(Layer::Overlay {
                color: Color::BLACK.with_alpha(OVERLAY_ALPHA),
            });
        }
    }

    if let Some(source) = &scene.photo {
        layers.push(Layer::Photo(PhotoLayer {
            source: source.clone(),
            center: canvas.resolve(scene.photo_geometry.center()),
            radius: scene.photo_geometry.size * scale / 2.0,
            ring_width: RING_WIDTH * scale,
            ring_color: Color::WHITE,
            shadow: DropShadow::soft(scale),
        }));
    }

    let name = scene.display_name();
    if !name.is_empty() {
        let anchor = canvas.resolve(scene.text_geometry.anchor());
        let size = scene.font_size * scale;
        let offset = size * CAPTION_OFFSET_RATIO;
        let small = size * CAPTION_SIZE_RATIO;
        layers.push(Layer::Text(TextLayer {
            lines: vec![
                TextLine {
                    role: TextRole::Caption,
                    text: caption_for_year(year),
                    center: Point::new(anchor.x, anchor.y - offset),
                    font_size: small,
                },
                TextLine {
                    role: TextRole::Name,
                    text: name.to_string(),
                    center: anchor,
                    font_size: size,
                },
                TextLine {
                    role: TextRole::Tagline,
                    text: TAGLINE.to_string(),
                    center: Point::new(anchor.x, anchor.y + offset),
                    font_size: small,
                },
            ],
            font_family: scene.font_family.as_deref().map(|f| f.trim().to_string()),
            color: scene.text_color()?,
            shadow: DropShadow::soft(scale),
        }));
    }

    Ok(Some(RenderPlan { canvas, layers }))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;

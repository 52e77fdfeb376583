use std::{collections::BTreeMap, f64::consts::TAU, path::Path, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    assets::{
        decode::{DecodedImage, decode_image},
        source::AssetSource,
        text::{TextBrushRgba8, TextLayoutEngine},
    },
    compile::plan::{
        BackgroundLayer, ChakraLayer, DropShadow, Layer, LayerKind, PhotoLayer, TextLayer,
        compile_scene,
    },
    foundation::{
        color::Color,
        core::{Canvas, Point},
        error::{TricolorError, TricolorResult},
    },
    render::{
        blur::blur_rgba8_premul,
        composite::{fill_over, over_in_place, tint_alpha, translate},
        surface::RasterSurface,
    },
    scene::{model::Scene, templates::Palette},
};

const CIRCLE_SEGMENTS: usize = 256;

/// What happened to one layer of a render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerOutcome {
    Painted(LayerKind),
    /// The layer left the surface untouched; later layers still ran.
    Skipped { layer: LayerKind, reason: String },
}

impl LayerOutcome {
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Painted(k) => *k,
            Self::Skipped { layer, .. } => *layer,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// `false` when the scene had no background and the surface was left as it was.
    pub rendered: bool,
    pub layers: Vec<LayerOutcome>,
}

impl RenderReport {
    pub fn painted(&self, kind: LayerKind) -> bool {
        self.layers
            .iter()
            .any(|o| matches!(o, LayerOutcome::Painted(k) if *k == kind))
    }

    pub fn skipped(&self) -> impl Iterator<Item = (LayerKind, &str)> {
        self.layers.iter().filter_map(|o| match o {
            LayerOutcome::Skipped { layer, reason } => Some((*layer, reason.as_str())),
            LayerOutcome::Painted(_) => None,
        })
    }
}

/// CPU compositor for greeting cards.
///
/// Owns the surface across renders. Layers run one after another in plan order; each loads its
/// own asset, paints into a scratch buffer, and only then is composited, so a failing layer is
/// skipped without disturbing what earlier layers painted or stopping later ones.
pub struct Compositor<A> {
    assets: A,
    canvas: Canvas,
    year: u32,
    text: TextLayoutEngine,
    /// Glyph sources keyed by the family name the layout engine registered.
    fonts: BTreeMap<String, vello_cpu::peniko::FontData>,
    surface: RasterSurface,
}

impl<A: AssetSource> Compositor<A> {
    pub fn new(assets: A, canvas: Canvas, year: u32) -> Self {
        Self {
            assets,
            canvas,
            year,
            text: TextLayoutEngine::new(),
            fonts: BTreeMap::new(),
            surface: RasterSurface::new(canvas),
        }
    }

    /// Use `bytes` for card text that names no family (or one that is not loaded).
    pub fn load_font(&mut self, bytes: Vec<u8>) -> TricolorResult<()> {
        let loaded = self.text.load_font(bytes)?.clone();
        self.insert_glyph_source(loaded.family, &loaded.bytes);
        Ok(())
    }

    /// Make an extra family available to scenes that ask for it by name; returns the family.
    pub fn add_font(&mut self, bytes: Vec<u8>) -> TricolorResult<String> {
        let loaded = self.text.add_font(bytes)?.clone();
        self.insert_glyph_source(loaded.family.clone(), &loaded.bytes);
        Ok(loaded.family)
    }

    pub fn load_font_file(&mut self, path: &Path) -> TricolorResult<()> {
        self.load_font(read_font(path)?)?;
        info!(path = %path.display(), "card font loaded");
        Ok(())
    }

    pub fn add_font_file(&mut self, path: &Path) -> TricolorResult<String> {
        let family = self.add_font(read_font(path)?)?;
        info!(path = %path.display(), family = %family, "extra card font loaded");
        Ok(family)
    }

    fn insert_glyph_source(&mut self, family: String, bytes: &[u8]) {
        let blob = vello_cpu::peniko::Blob::from(bytes.to_vec());
        self.fonts
            .insert(family, vello_cpu::peniko::FontData::new(blob, 0));
    }

    pub fn has_font(&self) -> bool {
        self.text.font().is_some()
    }

    /// Family names usable in [`Scene::font_family`].
    pub fn font_families(&self) -> Vec<&str> {
        self.text.fonts().iter().map(|f| f.family.as_str()).collect()
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Result of the most recent render (blank before the first).
    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Render `scene` onto the owned surface.
    ///
    /// Only an invalid scene is an error. A scene without a background leaves the surface
    /// exactly as the previous render left it.
    #[tracing::instrument(skip_all, fields(name = %scene.display_name()))]
    pub fn render(&mut self, scene: &Scene) -> TricolorResult<RenderReport> {
        let Some(plan) = compile_scene(scene, self.canvas, self.year)? else {
            debug!("no background selected; surface left as is");
            return Ok(RenderReport::default());
        };

        self.surface.clear();
        let mut report = RenderReport {
            rendered: true,
            layers: Vec::with_capacity(plan.layers.len()),
        };
        let mut background_painted = false;

        for layer in &plan.layers {
            let kind = layer.kind();
            if kind == LayerKind::Overlay && !background_painted {
                report.layers.push(LayerOutcome::Skipped {
                    layer: kind,
                    reason: "background was not painted".to_string(),
                });
                continue;
            }
            match self.run_layer(layer) {
                Ok(()) => {
                    background_painted |= kind == LayerKind::Background;
                    report.layers.push(LayerOutcome::Painted(kind));
                }
                Err(e) => {
                    warn!(layer = ?kind, error = %e, "layer skipped");
                    report.layers.push(LayerOutcome::Skipped {
                        layer: kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            layers = report.layers.len(),
            skipped = report.skipped().count(),
            "card rendered"
        );
        Ok(report)
    }

    fn run_layer(&mut self, layer: &Layer) -> TricolorResult<()> {
        let canvas = self.canvas;
        let buf = match layer {
            Layer::Background(BackgroundLayer::Gradient {
                palette,
                start,
                end,
                chakra,
            }) => {
                let mut buf = gradient_buffer(canvas, palette, *start, *end);
                if let Some(c) = chakra {
                    let wheel = rasterize(canvas, |ctx| {
                        draw_chakra(ctx, c);
                        Ok(())
                    })?;
                    over_in_place(&mut buf, &wheel)?;
                }
                buf
            }
            Layer::Background(BackgroundLayer::Image { source }) => {
                let image = self.load_image(source)?;
                rasterize(canvas, |ctx| {
                    paint_cover(ctx, &image, canvas);
                    Ok(())
                })?
            }
            Layer::Overlay { color } => {
                fill_over(self.surface.data_mut(), *color);
                return Ok(());
            }
            Layer::Photo(photo) => {
                let image = self.load_image(&photo.source)?;
                let buf = rasterize(canvas, |ctx| {
                    draw_photo(ctx, &image, photo);
                    Ok(())
                })?;
                with_shadow(canvas, buf, photo.shadow)?
            }
            Layer::Text(text) => {
                let buf = self.text_buffer(text)?;
                with_shadow(canvas, buf, text.shadow)?
            }
        };
        over_in_place(self.surface.data_mut(), &buf)
    }

    fn load_image(&self, source: &str) -> TricolorResult<vello_cpu::Image> {
        let bytes = self.assets.load(source)?;
        let decoded = decode_image(&bytes)?;
        image_paint(&decoded)
    }

    fn text_buffer(&mut self, layer: &TextLayer) -> TricolorResult<Vec<u8>> {
        let family = self
            .text
            .resolve(layer.font_family.as_deref())
            .map(|f| f.family.clone())
            .ok_or_else(|| TricolorError::asset_load("no font loaded for card text"))?;
        if let Some(wanted) = &layer.font_family
            && !wanted.eq_ignore_ascii_case(&family)
        {
            debug!(wanted = %wanted, used = %family, "requested font family not loaded");
        }
        let font = self
            .fonts
            .get(&family)
            .cloned()
            .ok_or_else(|| TricolorError::asset_load(format!("no glyph source for '{family}'")))?;
        let brush = TextBrushRgba8::from(layer.color);

        let mut placed = Vec::with_capacity(layer.lines.len());
        for line in &layer.lines {
            let layout = self.text.layout_line_in(
                Some(&family),
                &line.text,
                line.font_size as f32,
                brush,
            )?;
            let origin = Point::new(
                line.center.x - f64::from(layout.width()) / 2.0,
                line.center.y - f64::from(layout.height()) / 2.0,
            );
            placed.push((origin, layout));
        }

        rasterize(self.canvas, |ctx| {
            for (origin, layout) in &placed {
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                draw_layout(ctx, &font, layout);
            }
            Ok(())
        })
    }
}

fn read_font(path: &Path) -> TricolorResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| TricolorError::asset_load(format!("font '{}': {e}", path.display())))
}

/// Paint into a fresh transparent pixmap the size of `canvas`, returning its premultiplied bytes.
fn rasterize(
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext) -> TricolorResult<()>,
) -> TricolorResult<Vec<u8>> {
    let (w, h) = canvas_u16(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    draw(&mut ctx)?;
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn canvas_u16(canvas: Canvas) -> TricolorResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TricolorError::validation("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TricolorError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Layer buffer preceded by its blurred, offset silhouette.
fn with_shadow(canvas: Canvas, buf: Vec<u8>, shadow: DropShadow) -> TricolorResult<Vec<u8>> {
    let silhouette = tint_alpha(&buf, shadow.color);
    let moved = translate(
        &silhouette,
        canvas.width,
        canvas.height,
        shadow.offset.x.round() as i32,
        shadow.offset.y.round() as i32,
    );
    let mut out = blur_rgba8_premul(&moved, canvas.width, canvas.height, shadow.blur_radius, 0.0)?;
    over_in_place(&mut out, &buf)?;
    Ok(out)
}

/// Linear gradient along `start → end`, colours looked up from a 1024-entry table.
fn gradient_buffer(canvas: Canvas, palette: &Palette, start: Point, end: Point) -> Vec<u8> {
    const STEPS: usize = 1024;
    let lut: Vec<[u8; 4]> = (0..STEPS)
        .map(|i| {
            palette
                .sample(i as f64 / (STEPS - 1) as f64)
                .to_premul()
                .to_array()
        })
        .collect();

    let axis = end - start;
    let len2 = axis.hypot2().max(f64::EPSILON);
    let mut out = vec![0u8; canvas.byte_len()];
    for (i, px) in out.chunks_exact_mut(4).enumerate() {
        let x = (i % canvas.width as usize) as f64 + 0.5;
        let y = (i / canvas.width as usize) as f64 + 0.5;
        let t = ((x - start.x) * axis.x + (y - start.y) * axis.y) / len2;
        let idx = (t.clamp(0.0, 1.0) * (STEPS - 1) as f64).round() as usize;
        px.copy_from_slice(&lut[idx]);
    }
    out
}

fn image_paint(image: &DecodedImage) -> TricolorResult<vello_cpu::Image> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| TricolorError::asset_load("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| TricolorError::asset_load("image height exceeds u16"))?;

    let mut may_have_opacities = false;
    let pixels: Vec<_> = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_size(image: &vello_cpu::Image) -> (f64, f64) {
    match &image.image {
        vello_cpu::ImageSource::Pixmap(p) => (f64::from(p.width()), f64::from(p.height())),
        vello_cpu::ImageSource::OpaqueId(_) => (1.0, 1.0),
    }
}

/// Scale uniformly so the image covers the whole surface, centred; overflow is cropped.
fn paint_cover(ctx: &mut vello_cpu::RenderContext, image: &vello_cpu::Image, canvas: Canvas) {
    let (iw, ih) = image_size(image);
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let s = (w / iw).max(h / ih);
    let (tx, ty) = ((w - iw * s) / 2.0, (h - ih * s) / 2.0);

    ctx.set_transform(
        vello_cpu::kurbo::Affine::translate((tx, ty)) * vello_cpu::kurbo::Affine::scale(s),
    );
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(image.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
}

fn draw_photo(ctx: &mut vello_cpu::RenderContext, image: &vello_cpu::Image, photo: &PhotoLayer) {
    let (iw, ih) = image_size(image);
    let d = photo.radius * 2.0;
    let s = (d / iw).max(d / ih);
    let c = photo.center;

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(
        vello_cpu::kurbo::Affine::translate((c.x - iw * s / 2.0, c.y - ih * s / 2.0))
            * vello_cpu::kurbo::Affine::scale(s),
    );
    ctx.set_paint(image.clone());
    ctx.fill_path(&disc_path(c, photo.radius));

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(cpu_color(photo.ring_color));
    let half = photo.ring_width / 2.0;
    ctx.fill_path(&ring_path(c, (photo.radius - half).max(0.0), photo.radius + half));
}

fn draw_chakra(ctx: &mut vello_cpu::RenderContext, chakra: &ChakraLayer) {
    let c = chakra.center;
    let half = chakra.stroke_width / 2.0;
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(cpu_color(chakra.color));

    ctx.fill_path(&ring_path(c, chakra.radius - half, chakra.radius + half));
    ctx.fill_path(&disc_path(c, chakra.hub_radius));
    for i in 0..chakra.spokes {
        let angle = f64::from(i) * TAU / f64::from(chakra.spokes);
        let (sin, cos) = angle.sin_cos();
        let from = Point::new(c.x + cos * chakra.spoke_inner, c.y + sin * chakra.spoke_inner);
        let to = Point::new(c.x + cos * chakra.spoke_outer, c.y + sin * chakra.spoke_outer);
        ctx.fill_path(&segment_path(from, to, chakra.stroke_width));
    }
}

fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let mut x = run.offset();
            let y = run.baseline();
            let glyphs = run.glyphs().map(|g| {
                let glyph = vello_cpu::Glyph {
                    id: g.id,
                    x: x + g.x,
                    y: y - g.y,
                };
                x += g.advance;
                glyph
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn cpu_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn circle_points(center: Point, r: f64, reverse: bool) -> impl Iterator<Item = Point> {
    (0..CIRCLE_SEGMENTS).map(move |i| {
        let i = if reverse { CIRCLE_SEGMENTS - i } else { i };
        let a = i as f64 * TAU / CIRCLE_SEGMENTS as f64;
        Point::new(center.x + r * a.cos(), center.y + r * a.sin())
    })
}

fn push_polygon(path: &mut vello_cpu::kurbo::BezPath, points: impl Iterator<Item = Point>) {
    let mut first = true;
    for p in points {
        if first {
            path.move_to(cpu_point(p));
            first = false;
        } else {
            path.line_to(cpu_point(p));
        }
    }
    path.close_path();
}

fn disc_path(center: Point, r: f64) -> vello_cpu::kurbo::BezPath {
    let mut path = vello_cpu::kurbo::BezPath::new();
    push_polygon(&mut path, circle_points(center, r, false));
    path
}

/// Annulus between `inner` and `outer`; the hole winds the opposite way (non-zero fill).
fn ring_path(center: Point, inner: f64, outer: f64) -> vello_cpu::kurbo::BezPath {
    let mut path = vello_cpu::kurbo::BezPath::new();
    push_polygon(&mut path, circle_points(center, outer, false));
    if inner > 0.0 {
        push_polygon(&mut path, circle_points(center, inner, true));
    }
    path
}

/// Line segment of the given width as a quad.
fn segment_path(from: Point, to: Point, width: f64) -> vello_cpu::kurbo::BezPath {
    let d = to - from;
    let len = d.hypot().max(f64::EPSILON);
    let n = crate::foundation::core::Vec2::new(-d.y / len, d.x / len) * (width / 2.0);
    let mut path = vello_cpu::kurbo::BezPath::new();
    push_polygon(
        &mut path,
        [from + n, to + n, to - n, from - n].into_iter(),
    );
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

use crate::foundation::{
    color::{Color, hex_colors_in},
    core::Percent2,
};

/// A built-in card background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub preview: &'static str,
    /// CSS background the palette is derived from.
    pub css: &'static str,
    /// Where the name goes unless the user moved it.
    pub text_position: Percent2,
}

/// Colour stops of a background fill along the surface diagonal, offsets in `0..=1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub stops: Vec<(f64, Color)>,
}

impl Palette {
    /// Colour at `t` along the gradient axis.
    pub fn sample(&self, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let Some(&(first_t, first)) = self.stops.first() else {
            return Color::BLACK;
        };
        if t <= first_t {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                return if span <= f64::EPSILON {
                    c1
                } else {
                    c0.lerp(c1, (t - t0) / span)
                };
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }
}

/// Geometry of the wheel drawn on the `ashoka-chakra` template, in canonical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChakraSpec {
    pub radius: f64,
    pub stroke_width: f64,
    pub spokes: u32,
    pub hub_ratio: f64,
    pub spoke_inner_ratio: f64,
    pub spoke_outer_ratio: f64,
    pub color: Color,
}

pub const CHAKRA: ChakraSpec = ChakraSpec {
    radius: 100.0,
    stroke_width: 3.0,
    spokes: 24,
    hub_ratio: 0.1,
    spoke_inner_ratio: 0.15,
    spoke_outer_ratio: 0.9,
    color: Color::NAVY,
};

static TEMPLATES: [Template; 8] = [
    Template {
        id: "flag-wave",
        name: "Flag Wave",
        preview: "🇮🇳 Tricolor Background",
        css: "linear-gradient(45deg, #FF9933 0%, #FFFFFF 50%, #138808 100%)",
        text_position: Percent2::new(50.0, 20.0),
    },
    Template {
        id: "independence-day",
        name: "Independence Day",
        preview: "🗽 Freedom Theme",
        css: "linear-gradient(135deg, #FF9933 0%, #0B4DA2 50%, #138808 100%)",
        text_position: Percent2::new(50.0, 15.0),
    },
    Template {
        id: "ashoka-chakra",
        name: "Ashoka Chakra",
        preview: "☸️ Chakra Design",
        css: "radial-gradient(circle, #0B4DA2 0%, #FFFFFF 40%, #FF9933 100%)",
        text_position: Percent2::new(50.0, 85.0),
    },
    Template {
        id: "patriotic-stripes",
        name: "Patriotic Stripes",
        preview: "📏 Horizontal Stripes",
        css: "linear-gradient(0deg, #FF9933 0%, #FF9933 33%, #FFFFFF 33%, #FFFFFF 66%, #138808 66%, #138808 100%)",
        text_position: Percent2::new(50.0, 50.0),
    },
    Template {
        id: "freedom-gradient",
        name: "Freedom Gradient",
        preview: "🌅 Sunset Colors",
        css: "linear-gradient(180deg, #FF9933 0%, #FFD700 25%, #FFFFFF 50%, #87CEEB 75%, #138808 100%)",
        text_position: Percent2::new(50.0, 30.0),
    },
    Template {
        id: "unity-circle",
        name: "Unity Circle",
        preview: "⭕ Circular Design",
        css: "conic-gradient(from 0deg, #FF9933, #FFFFFF, #138808, #0B4DA2, #FF9933)",
        text_position: Percent2::new(50.0, 50.0),
    },
    Template {
        id: "vintage-india",
        name: "Vintage India",
        preview: "📜 Vintage Look",
        css: "linear-gradient(45deg, #8B4513 0%, #FF9933 25%, #FFFFFF 50%, #138808 75%, #2F4F4F 100%)",
        text_position: Percent2::new(50.0, 25.0),
    },
    Template {
        id: "modern-tricolor",
        name: "Modern Tricolor",
        preview: "🔲 Modern Design",
        css: "linear-gradient(135deg, rgba(255,153,51,0.8) 0%, rgba(255,255,255,0.9) 33%, rgba(255,255,255,0.9) 66%, rgba(19,136,8,0.8) 100%)",
        text_position: Percent2::new(50.0, 40.0),
    },
];

pub fn templates() -> &'static [Template] {
    &TEMPLATES
}

pub fn template_by_id(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

impl Template {
    /// Background fill for this template.
    ///
    /// Only the exact tricolor stops get a three-stop gradient; every other CSS background
    /// becomes a two-point gradient between its first and last hex colour, and one without
    /// any hex colour falls back to saffron → green.
    pub fn palette(&self) -> Palette {
        palette_for_css(self.css)
    }

    pub fn draws_chakra(&self) -> bool {
        self.id == "ashoka-chakra"
    }
}

pub(crate) fn palette_for_css(css: &str) -> Palette {
    let colors = hex_colors_in(css);
    let has = |c: Color| colors.contains(&c);
    if has(Color::SAFFRON) && has(Color::WHITE) && has(Color::GREEN) {
        return Palette {
            stops: vec![
                (0.0, Color::SAFFRON),
                (0.5, Color::WHITE),
                (1.0, Color::GREEN),
            ],
        };
    }
    let (first, last) = match (colors.first(), colors.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => (Color::SAFFRON, Color::GREEN),
    };
    Palette {
        stops: vec![(0.0, first), (1.0, last)],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/templates.rs"]
mod tests;

//! Text rendering: placeholder substitution, font resolution, glyph drawing.
//!
//! Fonts come from well-known system paths, probed once when the
//! [`FontLibrary`] is built. A missing bold face falls back to the regular
//! face; if no face loads at all, text elements are skipped with a warning
//! instead of failing the composite: a booth with no fonts still prints
//! photos.

use std::collections::BTreeMap;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::warn;

use crate::config::BoothConfig;
use crate::template::{FontWeight, TextElement};

/// Runtime key/value set used to resolve `{placeholder}` variables in
/// template text. Unknown placeholders pass through literally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarContext(BTreeMap<String, String>);

impl VarContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The standard booth context: school name, event name, event date.
    pub fn from_config(config: &BoothConfig) -> Self {
        let mut ctx = Self::new();
        ctx.set("school_name", &config.school_name);
        ctx.set("event_name", &config.event_name);
        ctx.set("event_date", &config.event_date);
        ctx
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replace every `{key}` whose key exists in the context. Placeholders
/// without a context entry are left verbatim.
pub fn substitute(text: &str, ctx: &VarContext) -> String {
    let mut out = text.to_string();
    for (key, value) in ctx.iter() {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Font paths probed in order for the regular face.
const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font paths probed in order for the bold face.
const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Regular and bold faces, loaded once and shared by every compose call.
pub struct FontLibrary {
    regular: Option<FontArc>,
    bold: Option<FontArc>,
}

impl FontLibrary {
    /// Probe system font paths for a regular and a bold face.
    pub fn load_system() -> Self {
        let regular = load_first(REGULAR_CANDIDATES);
        let bold = load_first(BOLD_CANDIDATES);
        if regular.is_none() && bold.is_none() {
            warn!("no usable system font found; text elements will be skipped");
        }
        Self { regular, bold }
    }

    /// Build from explicit faces (tests, embedded fonts).
    pub fn from_fonts(regular: Option<FontArc>, bold: Option<FontArc>) -> Self {
        Self { regular, bold }
    }

    /// Resolve a face for the requested weight, falling back to whatever
    /// face is available rather than failing.
    pub fn resolve(&self, weight: FontWeight) -> Option<&FontArc> {
        match weight {
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
            FontWeight::Normal => self.regular.as_ref().or(self.bold.as_ref()),
        }
    }

    pub fn has_any(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }
}

fn load_first(candidates: &[&str]) -> Option<FontArc> {
    for candidate in candidates {
        let path = Path::new(candidate);
        if !path.is_file() {
            continue;
        }
        match std::fs::read(path) {
            Ok(bytes) => match FontArc::try_from_vec(bytes) {
                Ok(font) => return Some(font),
                Err(err) => warn!(path = %path.display(), %err, "failed to parse font"),
            },
            Err(err) => warn!(path = %path.display(), %err, "failed to read font"),
        }
    }
    None
}

/// Draw all text elements onto the canvas in declared order.
///
/// Each element is substituted against the context, then drawn at its
/// anchor with its declared size, color, and weight. A font that cannot
/// be resolved skips the element, never the composite.
pub fn draw_text_elements(
    canvas: &mut RgbImage,
    elements: &[TextElement],
    ctx: &VarContext,
    fonts: &FontLibrary,
) {
    for element in elements {
        let text = substitute(&element.text, ctx);
        let Some(font) = fonts.resolve(element.font_weight) else {
            warn!(text = %text, "skipping text element: no usable font");
            continue;
        };
        draw_text_mut(
            canvas,
            Rgb(element.color),
            element.position[0],
            element.position[1],
            PxScale::from(element.font_size as f32),
            font,
            &text,
        );
    }
}

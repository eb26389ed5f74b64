//! Template data model.
//!
//! Two representations exist:
//!
//! - [`TemplateDoc`]: the wire format, one JSON document per template on
//!   disk. Field names match the documents the booth has always written
//!   (`image_position` for legacy single-slot templates, `image_positions`
//!   plus `dual_photo` for front/side templates).
//! - [`Template`]: the typed form the compositor works with. The two slot
//!   declaration styles collapse into the [`SlotLayout`] sum type, so the
//!   rest of the code never string-checks document keys.
//!
//! Decorative elements are an internally tagged sum type with an `Unknown`
//! catch-all: stock documents contain element types this renderer does not
//! draw (`school_logo`, `party_border`) and they must load, not fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template '{0}' declares no photo slot")]
    MissingSlots(String),
    #[error("template '{0}' has a zero-sized final_size")]
    InvalidSize(String),
}

/// A rectangle in canvas coordinates where a photo is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Canvas background: solid color, optionally overridden by an image file
/// (relative to the template directory). The image wins if it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default = "default_background_color")]
    pub color: [u8; 3],
    #[serde(default)]
    pub image: Option<String>,
}

fn default_background_color() -> [u8; 3] {
    [240, 240, 240]
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: default_background_color(),
            image: None,
        }
    }
}

/// A named photo slot in a multi-slot template.
///
/// `mirror` flips whatever photo the slot receives horizontally. The slot
/// named `side_view` additionally receives the mirrored/second photo in the
/// dual entry points (see [`crate::compose::Compositor`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSlot {
    pub name: String,
    pub rect: SlotRect,
    pub mirror: bool,
}

/// Where the photo(s) go: one implicit slot (legacy documents) or an
/// ordered list of named slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotLayout {
    Single(SlotRect),
    Multi(Vec<PhotoSlot>),
}

/// Text weight; anything the font library cannot satisfy falls back to
/// the regular face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// A text element: template string (may contain `{variable}` placeholders),
/// anchor point, size, color, weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    /// Free-form label carried by the stock documents ("title", "charge", ...).
    /// Not interpreted; kept so documents round-trip.
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    pub text: String,
    pub position: [i32; 2],
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub color: [u8; 3],
    #[serde(default)]
    pub font_weight: FontWeight,
}

fn default_font_size() -> u32 {
    20
}

/// Decorative overlay elements, drawn after all text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecorativeElement {
    /// Height-ruler ticks every 50 px with a simplified numeric label
    /// every 100 px.
    HeightChart { position: [i32; 2], height: u32 },
    /// Full-perimeter stroke.
    Border {
        #[serde(default = "default_border_width")]
        width: u32,
        #[serde(default)]
        color: [u8; 3],
    },
    /// Straight line between two points.
    DividerLine {
        #[serde(default)]
        start: [i32; 2],
        #[serde(default = "default_divider_end")]
        end: [i32; 2],
        #[serde(default = "default_divider_width")]
        width: u32,
        #[serde(default = "default_divider_color")]
        color: [u8; 3],
    },
    /// Any element type this renderer does not draw. Skipped with a log
    /// line at render time.
    #[serde(other)]
    Unknown,
}

fn default_border_width() -> u32 {
    5
}

fn default_divider_end() -> [i32; 2] {
    [100, 100]
}

fn default_divider_width() -> u32 {
    2
}

fn default_divider_color() -> [u8; 3] {
    [150, 150, 150]
}

/// The typed template the compositor consumes. Immutable during a capture
/// session; built from a [`TemplateDoc`] via `TryFrom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub description: String,
    /// Output canvas size as (width, height).
    pub final_size: (u32, u32),
    pub background: Background,
    pub layout: SlotLayout,
    pub text_elements: Vec<TextElement>,
    pub decorative_elements: Vec<DecorativeElement>,
}

impl Template {
    /// True for templates with named multi-slot layouts (front/side).
    pub fn is_dual(&self) -> bool {
        matches!(self.layout, SlotLayout::Multi(_))
    }
}

/// Wire-format photo slot: `name` and `mirror` next to the flattened rect,
/// exactly as the documents store them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSlotDoc {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub rect: SlotRect,
    #[serde(default, skip_serializing_if = "is_false")]
    pub mirror: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One persisted template document. See the module docs for the mapping to
/// [`Template`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDoc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub final_size: [u32; 2],
    #[serde(default)]
    pub background: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_position: Option<SlotRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_positions: Option<Vec<PhotoSlotDoc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dual_photo: bool,
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
    #[serde(default)]
    pub decorative_elements: Vec<DecorativeElement>,
}

impl TryFrom<TemplateDoc> for Template {
    type Error = TemplateError;

    fn try_from(doc: TemplateDoc) -> Result<Self, Self::Error> {
        let [w, h] = doc.final_size;
        if w == 0 || h == 0 {
            return Err(TemplateError::InvalidSize(doc.name));
        }

        // A multi-slot layout requires the dual_photo flag, matching how the
        // booth has always selected between the two document styles.
        let layout = match (doc.dual_photo, doc.image_positions, doc.image_position) {
            (true, Some(slots), _) => SlotLayout::Multi(
                slots
                    .into_iter()
                    .map(|s| PhotoSlot {
                        name: s.name,
                        rect: s.rect,
                        mirror: s.mirror,
                    })
                    .collect(),
            ),
            (_, _, Some(rect)) => SlotLayout::Single(rect),
            _ => return Err(TemplateError::MissingSlots(doc.name)),
        };

        Ok(Template {
            name: doc.name,
            description: doc.description,
            final_size: (w, h),
            background: doc.background,
            layout,
            text_elements: doc.text_elements,
            decorative_elements: doc.decorative_elements,
        })
    }
}

impl From<&Template> for TemplateDoc {
    fn from(template: &Template) -> Self {
        let (image_position, image_positions, dual_photo) = match &template.layout {
            SlotLayout::Single(rect) => (Some(*rect), None, false),
            SlotLayout::Multi(slots) => (
                None,
                Some(
                    slots
                        .iter()
                        .map(|s| PhotoSlotDoc {
                            name: s.name.clone(),
                            rect: s.rect,
                            mirror: s.mirror,
                        })
                        .collect(),
                ),
                true,
            ),
        };

        TemplateDoc {
            name: template.name.clone(),
            description: template.description.clone(),
            final_size: [template.final_size.0, template.final_size.1],
            background: template.background.clone(),
            image_position,
            image_positions,
            dual_photo,
            text_elements: template.text_elements.clone(),
            decorative_elements: template.decorative_elements.clone(),
        }
    }
}

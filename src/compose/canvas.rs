//! Canvas compositor: builds the output canvas and orchestrates photo
//! placement, text, and decorations in a fixed draw order.
//!
//! Draw order is part of the output contract and must not change:
//! background → photo slot(s) → text elements → decorative elements.
//! Later draws overwrite earlier pixels (painter's algorithm, no blending).
//!
//! A slot whose rectangle would write outside the canvas is skipped with a
//! warning and the background stays visible there; a bad template degrades
//! the print instead of aborting the session.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use thiserror::Error;
use tracing::warn;

use crate::compose::decor;
use crate::compose::fit;
use crate::compose::text::{self, FontLibrary, VarContext};
use crate::store::TemplateStore;
use crate::template::{PhotoSlot, SlotLayout, SlotRect, Template};

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("template '{0}' is not a dual photo template")]
    NotDualPhoto(String),
}

/// Composites captured photos into template canvases.
///
/// Borrows the template store and font library; every compose call is a
/// pure function of its inputs plus the store's current state and returns
/// a freshly allocated canvas. Safe to call back-to-back as long as the
/// store is not mutated concurrently (single writer, many readers; the
/// caller's job).
pub struct Compositor<'a> {
    store: &'a TemplateStore,
    fonts: &'a FontLibrary,
}

impl<'a> Compositor<'a> {
    pub fn new(store: &'a TemplateStore, fonts: &'a FontLibrary) -> Self {
        Self { store, fonts }
    }

    /// Compose a single photo with the named template.
    ///
    /// Legacy single-slot templates place the photo in their one slot. A
    /// multi-slot template gets the mirrored-single treatment: the
    /// `side_view` slot receives a horizontally flipped copy.
    pub fn compose_single(
        &self,
        photo: &RgbImage,
        template_name: &str,
        ctx: &VarContext,
    ) -> Result<RgbImage, ComposeError> {
        let template = self.lookup(template_name)?;
        match &template.layout {
            SlotLayout::Single(rect) => Ok(self.render_single(template, *rect, photo, ctx)),
            SlotLayout::Multi(slots) => Ok(self.render_mirrored(template, slots, photo, ctx)),
        }
    }

    /// Compose two photos with a multi-slot template. The slot named
    /// `side_view` receives `side`; every other slot receives `front`.
    pub fn compose_dual(
        &self,
        front: &RgbImage,
        side: &RgbImage,
        template_name: &str,
        ctx: &VarContext,
    ) -> Result<RgbImage, ComposeError> {
        let template = self.lookup(template_name)?;
        match &template.layout {
            SlotLayout::Multi(slots) => Ok(self.render_multi(template, slots, front, side, ctx)),
            SlotLayout::Single(_) => Err(ComposeError::NotDualPhoto(template_name.to_string())),
        }
    }

    /// Compose one photo into a multi-slot template, simulating the second
    /// view: the `side_view` slot receives a horizontally mirrored copy.
    pub fn compose_mirrored_single(
        &self,
        photo: &RgbImage,
        template_name: &str,
        ctx: &VarContext,
    ) -> Result<RgbImage, ComposeError> {
        let template = self.lookup(template_name)?;
        match &template.layout {
            SlotLayout::Multi(slots) => Ok(self.render_mirrored(template, slots, photo, ctx)),
            SlotLayout::Single(rect) => Ok(self.render_single(template, *rect, photo, ctx)),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Template, ComposeError> {
        self.store
            .get(name)
            .ok_or_else(|| ComposeError::UnknownTemplate(name.to_string()))
    }

    fn render_single(
        &self,
        template: &Template,
        rect: SlotRect,
        photo: &RgbImage,
        ctx: &VarContext,
    ) -> RgbImage {
        let mut canvas = self.base_canvas(template);
        let fitted = fit::fill_and_crop(photo, rect.width, rect.height);
        place_photo(&mut canvas, &fitted, rect.x, rect.y);
        self.finish(&mut canvas, template, ctx);
        canvas
    }

    fn render_mirrored(
        &self,
        template: &Template,
        slots: &[PhotoSlot],
        photo: &RgbImage,
        ctx: &VarContext,
    ) -> RgbImage {
        let mirrored = imageops::flip_horizontal(photo);
        self.render_multi(template, slots, photo, &mirrored, ctx)
    }

    fn render_multi(
        &self,
        template: &Template,
        slots: &[PhotoSlot],
        front: &RgbImage,
        side: &RgbImage,
        ctx: &VarContext,
    ) -> RgbImage {
        let mut canvas = self.base_canvas(template);

        for slot in slots {
            let source = if slot.name == "side_view" { side } else { front };
            let fitted = if slot.mirror {
                fit::fill_and_crop(
                    &imageops::flip_horizontal(source),
                    slot.rect.width,
                    slot.rect.height,
                )
            } else {
                fit::fill_and_crop(source, slot.rect.width, slot.rect.height)
            };
            place_photo(&mut canvas, &fitted, slot.rect.x, slot.rect.y);
        }

        self.finish(&mut canvas, template, ctx);
        canvas
    }

    /// Text, then decorations, always in that order, after all photos.
    fn finish(&self, canvas: &mut RgbImage, template: &Template, ctx: &VarContext) {
        text::draw_text_elements(canvas, &template.text_elements, ctx, self.fonts);
        decor::draw_decorative_elements(canvas, &template.decorative_elements, self.fonts);
    }

    /// Base canvas: solid background color, or the background image
    /// (resized to exactly `final_size`) when one is declared and loads.
    fn base_canvas(&self, template: &Template) -> RgbImage {
        let (w, h) = template.final_size;

        if let Some(file) = &template.background.image {
            let path = self.store.dir().join(file);
            match image::open(&path) {
                Ok(bg) => {
                    return imageops::resize(&bg.to_rgb8(), w, h, FilterType::Lanczos3);
                }
                Err(err) => {
                    warn!(path = %path.display(), %err,
                        "failed to load background image, using solid color");
                }
            }
        }

        RgbImage::from_pixel(w, h, Rgb(template.background.color))
    }
}

/// Copy a fitted photo onto the canvas, or skip it entirely when the slot
/// would write outside the canvas.
fn place_photo(canvas: &mut RgbImage, photo: &RgbImage, x: u32, y: u32) {
    let fits = u64::from(x) + u64::from(photo.width()) <= u64::from(canvas.width())
        && u64::from(y) + u64::from(photo.height()) <= u64::from(canvas.height());
    if !fits {
        warn!(
            x,
            y,
            width = photo.width(),
            height = photo.height(),
            "photo slot exceeds canvas bounds, skipping placement"
        );
        return;
    }
    imageops::replace(canvas, photo, i64::from(x), i64::from(y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Background;

    #[test]
    fn place_photo_copies_within_bounds() {
        let mut canvas = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let photo = RgbImage::from_pixel(20, 20, Rgb([255, 0, 0]));
        place_photo(&mut canvas, &photo, 10, 10);

        assert_eq!(canvas.get_pixel(10, 10), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(29, 29), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(30, 30), &Rgb([0, 0, 0]));
    }

    #[test]
    fn place_photo_skips_when_partly_outside() {
        let mut canvas = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let photo = RgbImage::from_pixel(20, 20, Rgb([255, 0, 0]));
        place_photo(&mut canvas, &photo, 90, 90);

        // Nothing written, not even the in-bounds corner.
        assert!(canvas.pixels().all(|p| p == &Rgb([0, 0, 0])));
    }

    #[test]
    fn place_photo_allows_exact_edge_fit() {
        let mut canvas = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let photo = RgbImage::from_pixel(20, 20, Rgb([255, 0, 0]));
        place_photo(&mut canvas, &photo, 80, 80);

        assert_eq!(canvas.get_pixel(99, 99), &Rgb([255, 0, 0]));
    }

    #[test]
    fn base_canvas_uses_solid_color_without_image() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = TemplateStore::load(tmp.path().join("templates")).unwrap();
        let fonts = FontLibrary::from_fonts(None, None);
        let compositor = Compositor::new(&store, &fonts);

        let template = Template {
            name: "t".into(),
            description: String::new(),
            final_size: (40, 30),
            background: Background {
                color: [12, 34, 56],
                image: None,
            },
            layout: SlotLayout::Single(SlotRect {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            }),
            text_elements: vec![],
            decorative_elements: vec![],
        };

        let canvas = compositor.base_canvas(&template);
        assert_eq!(canvas.dimensions(), (40, 30));
        assert!(canvas.pixels().all(|p| p == &Rgb([12, 34, 56])));
    }

    #[test]
    fn base_canvas_falls_back_when_image_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = TemplateStore::load(tmp.path().join("templates")).unwrap();
        let fonts = FontLibrary::from_fonts(None, None);
        let compositor = Compositor::new(&store, &fonts);

        let template = Template {
            name: "t".into(),
            description: String::new(),
            final_size: (20, 20),
            background: Background {
                color: [200, 100, 50],
                image: Some("does_not_exist.png".into()),
            },
            layout: SlotLayout::Single(SlotRect {
                x: 0,
                y: 0,
                width: 5,
                height: 5,
            }),
            text_elements: vec![],
            decorative_elements: vec![],
        };

        let canvas = compositor.base_canvas(&template);
        assert!(canvas.pixels().all(|p| p == &Rgb([200, 100, 50])));
    }
}

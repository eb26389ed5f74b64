//! # Mugbooth
//!
//! The compositing engine behind a kiosk photo booth that prints novelty
//! mugshot cards. Captured photos are fitted into template-defined slots,
//! stamped with event text and decorations, and saved as print-ready
//! composites.
//!
//! # Architecture: Template-Driven Compositing
//!
//! Everything flows from a template document:
//!
//! ```text
//! 1. Store     templates/*.json  →  Template        (parse + validate)
//! 2. Compose   photos + template →  RgbImage        (fit, place, text, decor)
//! 3. Output    canvas            →  output/*.jpg    (encode + save)
//! ```
//!
//! The compositor itself is pure: given the same photos, template, and
//! variable context, it produces pixel-identical output. All I/O lives at
//! the edges (store loading, optional background-image reads, saving),
//! which keeps the core testable against synthetic in-memory images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`template`] | Template data model: slots, backgrounds, text and decorative elements, JSON wire format |
//! | [`store`] | Template directory loading, built-in default seeding, custom template persistence |
//! | [`compose`] | The compositing engine: fit math, canvas orchestration, text, decorations |
//! | [`config`] | `booth.toml` loading and validation with full defaults |
//! | [`capture`] | Camera seam: the [`capture::CaptureSource`] trait plus a file-backed source |
//! | [`output`] | Saving composites (JPEG with quality, PNG) and thumbnail generation |
//!
//! # Design Decisions
//!
//! ## Two Fitting Strategies, One Contract
//!
//! Photo slots use fill-and-crop (scale up to cover, center-crop the
//! overflow) so faces fill their frames edge to edge. Thumbnails use
//! fit-and-letterbox (scale down to fit, pad with black) so nothing is
//! ever cropped from a preview. Both live in [`compose::fit`] as pure
//! dimension math plus a thin pixel-moving wrapper, so the arithmetic is
//! testable without allocating a single image.
//!
//! ## Templates Are Data, Not Code
//!
//! Layouts live in JSON documents that operators can edit without
//! rebuilding the binary. Unknown decorative element types parse
//! successfully and are skipped at draw time, so a template written for a
//! newer booth still renders everything an older booth understands.
//!
//! ## Pure-Rust Imaging
//!
//! All pixel work uses the `image` and `imageproc` crates with `ab_glyph`
//! for text. No system ImageMagick, no native codecs: the booth binary is
//! self-contained and runs on a bare kiosk image.

pub mod capture;
pub mod compose;
pub mod config;
pub mod output;
pub mod store;
pub mod template;

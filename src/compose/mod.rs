//! The compositing engine.
//!
//! | Submodule | Role |
//! |---|---|
//! | [`fit`] | Pure fit/crop dimension math + the two fitting strategies |
//! | [`canvas`] | The [`Compositor`]: draw-order orchestration, slot placement |
//! | [`text`] | Placeholder substitution, font resolution, glyph drawing |
//! | [`decor`] | Height chart, border, divider line rendering |
//!
//! The compositor is synchronous and single-threaded: each compose call is
//! a pure function of its inputs plus the template store's state, performs
//! no I/O beyond an optional background-image read, and returns a fresh
//! canvas that never aliases the caller's buffers.

pub mod canvas;
pub mod decor;
pub mod fit;
pub mod text;

pub use canvas::{ComposeError, Compositor};
pub use fit::{contain_dimensions, cover_dimensions, fill_and_crop, fit_letterbox};
pub use text::{FontLibrary, VarContext, substitute};

//! Geometric fit engine.
//!
//! Pure dimension math plus the two fitting strategies used to place
//! arbitrary-sized photos into fixed-size areas:
//!
//! - **fit-and-letterbox** ([`fit_letterbox`]): scale to fit inside the
//!   target, center, pad the rest with black.
//! - **fill-and-crop** ([`fill_and_crop`]): scale to cover the target,
//!   center-crop the overflow. Every pixel of the target ends up covered
//!   by photo content, which the compositor relies on.
//!
//! The math intentionally truncates scaled dimensions to integers and uses
//! floor division for centering offsets, the exact arithmetic the booth
//! has always used, so existing templates keep producing identical crops.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Scaled dimensions that fit entirely inside `target` (min-scale),
/// preserving aspect ratio.
pub fn contain_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1), source.1.max(1));
    let scale = f64::min(
        target.0 as f64 / src_w as f64,
        target.1 as f64 / src_h as f64,
    );
    ((src_w as f64 * scale) as u32, (src_h as f64 * scale) as u32)
}

/// Scaled dimensions that completely cover `target` (max-scale),
/// preserving aspect ratio. At least one dimension matches the target;
/// the other may exceed it.
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1), source.1.max(1));
    let scale = f64::max(
        target.0 as f64 / src_w as f64,
        target.1 as f64 / src_h as f64,
    );
    ((src_w as f64 * scale) as u32, (src_h as f64 * scale) as u32)
}

/// Centered placement of a `scaled` image on a `target` canvas.
///
/// Covers both directions: if the scaled image is larger than the target
/// on an axis, the plan crops it (`src_*` window); if smaller, the plan
/// offsets it (`dst_*`). Produced by [`center_crop_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    /// Top-left of the source window to copy from the scaled image.
    pub src_x: u32,
    pub src_y: u32,
    /// Top-left on the target canvas to copy to.
    pub dst_x: u32,
    pub dst_y: u32,
    /// Size of the copied window.
    pub width: u32,
    pub height: u32,
}

/// Compute the centered copy window between a scaled image and a target
/// canvas. Floor division keeps odd overflows split the same way on every
/// call (one extra pixel cropped from the bottom/right).
pub fn center_crop_plan(scaled: (u32, u32), target: (u32, u32)) -> CropPlan {
    let (plan_x, width) = center_axis(scaled.0, target.0);
    let (plan_y, height) = center_axis(scaled.1, target.1);
    CropPlan {
        src_x: plan_x.0,
        src_y: plan_y.0,
        dst_x: plan_x.1,
        dst_y: plan_y.1,
        width,
        height,
    }
}

/// One axis of [`center_crop_plan`]: returns ((src, dst), copy_len).
fn center_axis(scaled: u32, target: u32) -> ((u32, u32), u32) {
    let offset = (target as i64 - scaled as i64).div_euclid(2);
    let src = (-offset).max(0) as u32;
    let dst = offset.max(0) as u32;
    let end = (scaled as i64).min(src as i64 + target as i64) as u32;
    ((src, dst), end - src)
}

/// Scale-to-fit-and-letterbox: center the contain-scaled image on a black
/// canvas of exactly `target_w x target_h`.
///
/// An image already at the target size is returned unchanged (no resample).
pub fn fit_letterbox(photo: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    if photo.dimensions() == (target_w, target_h) {
        return photo.clone();
    }

    let (new_w, new_h) = contain_dimensions(photo.dimensions(), (target_w, target_h));
    let scaled = imageops::resize(photo, new_w.max(1), new_h.max(1), FilterType::Lanczos3);

    let plan = center_crop_plan(scaled.dimensions(), (target_w, target_h));
    let mut canvas = RgbImage::new(target_w, target_h);
    imageops::replace(&mut canvas, &scaled, plan.dst_x as i64, plan.dst_y as i64);
    canvas
}

/// Scale-to-fill-and-crop: cover the target entirely, center-crop the
/// overflow. Residual pixels from integer rounding are white.
///
/// A photo already at the target size is returned unchanged (no resample).
pub fn fill_and_crop(photo: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    if photo.dimensions() == (target_w, target_h) {
        return photo.clone();
    }

    let (new_w, new_h) = cover_dimensions(photo.dimensions(), (target_w, target_h));
    let scaled = imageops::resize(photo, new_w.max(1), new_h.max(1), FilterType::Lanczos3);

    let plan = center_crop_plan(scaled.dimensions(), (target_w, target_h));
    let window =
        imageops::crop_imm(&scaled, plan.src_x, plan.src_y, plan.width, plan.height).to_image();

    let mut canvas = RgbImage::from_pixel(target_w, target_h, Rgb([255, 255, 255]));
    imageops::replace(&mut canvas, &window, plan.dst_x as i64, plan.dst_y as i64);
    canvas
}

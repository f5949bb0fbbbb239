use anyhow::Context;
use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::foundation::core::PixelRect;
use crate::foundation::error::{PosterError, PosterResult};

/// Decode encoded image bytes (any format the `image` crate recognises) into RGB8.
pub fn decode_rgb(bytes: &[u8]) -> PosterResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgb = dyn_img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(PosterError::render("decoded image has no pixels"));
    }
    Ok(rgb)
}

/// Cover-fit scale: the smallest uniform scale at which `src` fills the target on both axes.
pub fn cover_scale(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> f64 {
    (f64::from(target_w) / f64::from(src_w)).max(f64::from(target_h) / f64::from(src_h))
}

/// Source window, centered, that maps onto a `target_w x target_h` cell at cover scale.
pub fn cover_window(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> PixelRect {
    let scale = cover_scale(src_w, src_h, target_w, target_h);
    let w = ((f64::from(target_w) / scale).ceil() as u32).clamp(1, src_w);
    let h = ((f64::from(target_h) / scale).ceil() as u32).clamp(1, src_h);
    PixelRect::new((src_w - w) / 2, (src_h - h) / 2, w, h)
}

/// Crop the centered cover-fit window of `src` and resample it to exactly `target_w x target_h`.
///
/// Only the window is resampled, so the working buffer never exceeds the source or the target.
pub fn cover_fit(src: &RgbImage, target_w: u32, target_h: u32) -> PosterResult<RgbImage> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 || target_w == 0 || target_h == 0 {
        return Err(PosterError::render("cover_fit expects non-empty source and target"));
    }

    let window = cover_window(src_w, src_h, target_w, target_h);
    let cropped =
        imageops::crop_imm(src, window.x, window.y, window.width, window.height).to_image();
    if cropped.dimensions() == (target_w, target_h) {
        return Ok(cropped);
    }
    Ok(imageops::resize(&cropped, target_w, target_h, FilterType::Lanczos3))
}

/// Decode one photograph and render it as a `cell_w x cell_h` grid cell.
pub fn render_cell(bytes: &[u8], cell_w: u32, cell_h: u32) -> PosterResult<RgbImage> {
    let src = decode_rgb(bytes)?;
    cover_fit(&src, cell_w, cell_h)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

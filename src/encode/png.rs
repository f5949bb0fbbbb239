use std::io::Cursor;

use image::{ImageEncoder as _, RgbImage, RgbaImage};

use crate::foundation::error::{PosterError, PosterResult};

/// Drop the alpha channel of an opaque poster.
pub fn flatten_rgb(poster: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(poster.width(), poster.height(), |x, y| {
        let [r, g, b, _] = poster.get_pixel(x, y).0;
        image::Rgb([r, g, b])
    })
}

/// Encode the finished poster as an 8-bit RGB PNG.
pub fn encode_png(poster: &RgbaImage) -> PosterResult<Vec<u8>> {
    let rgb = flatten_rgb(poster);
    let mut out = Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PosterError::encode(format!("png: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;

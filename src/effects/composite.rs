use image::RgbaImage;

use crate::foundation::core::PixelRect;
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied RGBA8 pixels, rows tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PremulLayer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PremulLayer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> PosterResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| PosterError::render("layer size overflow"))?;
        if data.len() != expected {
            return Err(PosterError::render(format!(
                "layer buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_empty(&self) -> bool {
        self.data.chunks_exact(4).all(|p| p[3] == 0)
    }
}

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `layer` over `dst` with the layer's top-left at `(x, y)`.
///
/// `dst` is treated as premultiplied; for the opaque posters this crate produces that is the
/// same as straight alpha. The layer must lie entirely inside `dst`.
pub fn over_at(dst: &mut RgbaImage, layer: &PremulLayer, x: u32, y: u32) -> PosterResult<()> {
    let rect = PixelRect::new(x, y, layer.width, layer.height);
    if !rect.fits_within(dst.width(), dst.height()) {
        return Err(PosterError::render(format!(
            "layer {rect:?} exceeds {}x{} destination",
            dst.width(),
            dst.height()
        )));
    }
    for ly in 0..layer.height {
        for lx in 0..layer.width {
            let src = layer.pixel(lx, ly);
            if src[3] == 0 {
                continue;
            }
            let p = dst.get_pixel_mut(x + lx, y + ly);
            p.0 = over(p.0, src, 1.0);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;

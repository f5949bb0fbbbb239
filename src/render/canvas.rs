use std::sync::Arc;

use image::{RgbImage, RgbaImage};

use crate::foundation::core::{Affine, BezPath, PixelRect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};

/// Oversized render target.
///
/// The final poster height is unknown until the text has been laid out, so drawing happens
/// on a canvas of `working_height` rows and [`WorkingCanvas::trim`] cuts it down afterwards.
pub struct WorkingCanvas {
    ctx: vello_cpu::RenderContext,
    width: u32,
    height: u32,
}

impl WorkingCanvas {
    /// Allocate a canvas filled with an opaque `background`.
    pub fn new(width: u32, height: u32, background: Rgba8) -> PosterResult<Self> {
        if background.a != 255 {
            return Err(PosterError::render("working canvas background must be opaque"));
        }
        let (w, h) = surface_dims(width, height)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(background.to_cpu_color());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
        Ok(Self { ctx, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn ctx(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Paint an opaque image with its top-left corner at `at`; the image must match `at`'s size.
    pub fn draw_image(&mut self, at: PixelRect, img: &RgbImage) -> PosterResult<()> {
        if img.dimensions() != (at.width, at.height) {
            return Err(PosterError::render(format!(
                "image is {}x{}, target cell is {}x{}",
                img.width(),
                img.height(),
                at.width,
                at.height
            )));
        }
        let paint = image_paint(img)?;
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate((f64::from(at.x), f64::from(at.y)))));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(at.width),
            f64::from(at.height),
        ));
        Ok(())
    }

    /// Rasterize and crop to `content_height + bottom_margin` rows (capped at the working height).
    pub fn trim(mut self, content_height: u32, bottom_margin: u32) -> PosterResult<RgbaImage> {
        let final_height = trimmed_height(content_height, bottom_margin, self.height);
        let mut data = render_to_premul(&mut self.ctx, self.width, self.height)?;
        // Rows are tightly packed, so the top `final_height` rows are a prefix.
        data.truncate((self.width as usize) * (final_height as usize) * 4);
        // The background is opaque, so premultiplied bytes equal straight bytes.
        RgbaImage::from_raw(self.width, final_height, data)
            .ok_or_else(|| PosterError::render("trimmed canvas buffer size mismatch"))
    }
}

/// Final poster height for a given cursor position.
pub fn trimmed_height(content_height: u32, bottom_margin: u32, working_height: u32) -> u32 {
    content_height
        .saturating_add(bottom_margin)
        .min(working_height)
        .max(1)
}

pub(crate) fn surface_dims(width: u32, height: u32) -> PosterResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(PosterError::render("surface dimensions must be non-zero"));
    }
    Ok((w, h))
}

/// Flush recorded drawing and read back premultiplied RGBA8 bytes.
pub(crate) fn render_to_premul(
    ctx: &mut vello_cpu::RenderContext,
    width: u32,
    height: u32,
) -> PosterResult<Vec<u8>> {
    let (w, h) = surface_dims(width, height)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_paint(img: &RgbImage) -> PosterResult<vello_cpu::Image> {
    let (w, h) = surface_dims(img.width(), img.height())?;
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = img
        .pixels()
        .map(|p| vello_cpu::peniko::color::PremulRgba8::from_u8_array([p[0], p[1], p[2], 255]))
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, false);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;

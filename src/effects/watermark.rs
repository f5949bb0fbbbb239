//! Rotated brand watermark.
//!
//! The brand is drawn once into its own transparent layer, rotated about the layer center. The
//! layer is sized from the rotated bounding box plus an edge border so no corner of the
//! rotated glyphs is clipped. The layer is then composited at each anchor, an anchor being a
//! fraction of the final poster height.

use image::RgbaImage;
use tracing::{debug, warn};

use crate::config::WatermarkSpec;
use crate::effects::composite::{PremulLayer, over_at};
use crate::fonts::resolver::GlyphSource;
use crate::fonts::typesetter::Typesetter;
use crate::foundation::core::{Affine, PixelRect};
use crate::foundation::error::PosterResult;
use crate::foundation::math::ceil_px;
use crate::render::canvas::render_to_premul;

const MAX_SHRINK_ATTEMPTS: usize = 6;

/// Watermark glyphs are never shrunk below this size.
const MIN_FONT_PX: f32 = 6.0;

/// One watermark stamped onto the poster.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WatermarkPlacement {
    pub anchor: f32,
    pub rect: PixelRect,
}

/// The rendered brand layer and the unrotated text box it was drawn from.
#[derive(Clone, Debug)]
pub struct WatermarkLayer {
    pub layer: PremulLayer,
    pub text_width: f64,
    pub text_height: f64,
    pub font_size: f32,
}

/// Axis-aligned size of a `width` x `height` box rotated by `radians`.
pub fn rotated_bounds(width: f64, height: f64, radians: f64) -> (f64, f64) {
    let (s, c) = radians.sin_cos();
    let (s, c) = (s.abs(), c.abs());
    (width * c + height * s, width * s + height * c)
}

/// Layer dimensions for a text box: the larger of the unrotated and rotated extents on each
/// axis, plus `edge` on every side.
pub fn layer_size(text_width: f64, text_height: f64, radians: f64, edge: u32) -> (u32, u32) {
    let (rw, rh) = rotated_bounds(text_width, text_height, radians);
    let pad = edge.saturating_mul(2);
    (
        ceil_px(text_width.max(rw)).saturating_add(pad).max(1),
        ceil_px(text_height.max(rh)).saturating_add(pad).max(1),
    )
}

/// Render `spec.brand` at `glyph`'s size into a transparent layer.
pub fn render_layer(
    typesetter: &mut Typesetter,
    glyph: &GlyphSource,
    spec: &WatermarkSpec,
) -> PosterResult<WatermarkLayer> {
    let text_width = f64::from(typesetter.measure(glyph, &spec.brand));
    let text_height = f64::from(typesetter.line_box_height(glyph));
    let radians = f64::from(spec.rotation_degrees).to_radians();
    let (width, height) = layer_size(text_width, text_height, radians, spec.edge_padding);

    let (w, h) = crate::render::canvas::surface_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let transform = Affine::translate((f64::from(width) / 2.0, f64::from(height) / 2.0))
        * Affine::rotate(-radians)
        * Affine::translate((-text_width / 2.0, -text_height / 2.0));
    typesetter.draw(&mut ctx, glyph, &spec.brand, spec.color, transform);
    let data = render_to_premul(&mut ctx, width, height)?;

    Ok(WatermarkLayer {
        layer: PremulLayer::new(width, height, data)?,
        text_width,
        text_height,
        font_size: glyph.size_px(),
    })
}

/// Smallest poster height at which every anchor's placement fits vertically.
pub fn min_height_for(spec: &WatermarkSpec, layer_height: u32) -> u32 {
    spec.anchors
        .iter()
        .map(|&f| {
            let room = f64::from(f.min(1.0 - f));
            if room > 0.0 {
                ceil_px(f64::from(layer_height) / (2.0 * room))
            } else {
                u32::MAX
            }
        })
        .fold(spec.min_canvas_height, u32::max)
}

/// Centered placements for every anchor that fits inside a `width` x `height` poster.
///
/// Posters shorter than `spec.min_canvas_height` get none; any individual placement that would
/// cross the poster edge is skipped rather than clipped.
pub fn plan_placements(
    spec: &WatermarkSpec,
    layer_width: u32,
    layer_height: u32,
    width: u32,
    height: u32,
) -> Vec<WatermarkPlacement> {
    if height < spec.min_canvas_height || layer_width > width || layer_height > height {
        return Vec::new();
    }
    let x = (width - layer_width) / 2;
    spec.anchors
        .iter()
        .filter_map(|&anchor| {
            let top = (f64::from(anchor) * f64::from(height) - f64::from(layer_height) / 2.0)
                .floor();
            if top < 0.0 {
                return None;
            }
            let rect = PixelRect::new(x, top as u32, layer_width, layer_height);
            rect.fits_within(width, height)
                .then_some(WatermarkPlacement { anchor, rect })
        })
        .collect()
}

/// Font scale that brings `layer` within the poster width and under the height at which every
/// anchor fits; `None` when it already fits.
fn shrink_factor(
    spec: &WatermarkSpec,
    layer: &PremulLayer,
    width: u32,
    height: u32,
) -> Option<f64> {
    let needed = min_height_for(spec, layer.height);
    if layer.width <= width && needed <= height {
        return None;
    }
    let by_width = f64::from(width) / f64::from(layer.width);
    let by_height = f64::from(height) / f64::from(needed);
    Some(by_width.min(by_height).min(1.0) * 0.98)
}

/// Stamp the watermark onto `poster` and return where it landed.
#[tracing::instrument(skip_all, fields(width = poster.width(), height = poster.height()))]
pub fn apply_watermark(
    poster: &mut RgbaImage,
    typesetter: &mut Typesetter,
    glyph: &GlyphSource,
    spec: &WatermarkSpec,
) -> PosterResult<Vec<WatermarkPlacement>> {
    if !spec.enabled {
        return Ok(Vec::new());
    }
    if poster.height() < spec.min_canvas_height {
        debug!(min = spec.min_canvas_height, "poster below watermark threshold");
        return Ok(Vec::new());
    }

    let mut glyph = glyph.clone();
    let mut rendered = render_layer(typesetter, &glyph, spec)?;
    for _ in 0..MAX_SHRINK_ATTEMPTS {
        let Some(factor) = shrink_factor(spec, &rendered.layer, poster.width(), poster.height())
        else {
            break;
        };
        let size = (f64::from(glyph.size_px()) * factor) as f32;
        if size < MIN_FONT_PX {
            break;
        }
        glyph = glyph.with_size(size);
        debug!(size, "shrinking watermark to fit the poster");
        rendered = render_layer(typesetter, &glyph, spec)?;
    }
    if rendered.layer.width > poster.width() {
        warn!(
            layer_width = rendered.layer.width,
            "watermark wider than poster; skipped"
        );
        return Ok(Vec::new());
    }

    let placements = plan_placements(
        spec,
        rendered.layer.width,
        rendered.layer.height,
        poster.width(),
        poster.height(),
    );
    if placements.len() < spec.anchors.len() {
        warn!(
            placed = placements.len(),
            anchors = spec.anchors.len(),
            needed = min_height_for(spec, rendered.layer.height),
            "poster too short for every watermark anchor"
        );
    }
    for p in &placements {
        over_at(poster, &rendered.layer, p.rect.x, p.rect.y)?;
    }
    debug!(count = placements.len(), font_size = rendered.font_size, "watermark applied");
    Ok(placements)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/watermark.rs"]
mod tests;

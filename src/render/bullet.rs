use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::render::canvas::{affine_to_cpu, bezpath_to_cpu};

/// Three-point check mark inside the `size`-sized box whose top-left corner is `anchor`.
pub fn checkmark_path(anchor: Point, size: f64) -> BezPath {
    let at = |fx: f64, fy: f64| Point::new(anchor.x + fx * size, anchor.y + fy * size);
    let mut path = BezPath::new();
    path.move_to(at(0.08, 0.55));
    path.line_to(at(0.38, 0.85));
    path.line_to(at(0.92, 0.18));
    path
}

/// Stroke width used for a check mark of the given box size.
pub fn checkmark_stroke_width(size: f64) -> f64 {
    (size * 0.14).max(1.5)
}

/// Stroke a check mark directly as vector geometry.
pub fn draw_checkmark(ctx: &mut vello_cpu::RenderContext, anchor: Point, size: f64, color: Rgba8) {
    if !(size.is_finite() && size > 0.0) {
        return;
    }
    let stroke = vello_cpu::kurbo::Stroke::new(checkmark_stroke_width(size))
        .with_caps(vello_cpu::kurbo::Cap::Round)
        .with_join(vello_cpu::kurbo::Join::Round);
    ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
    ctx.set_paint(color.to_cpu_color());
    ctx.set_stroke(stroke);
    ctx.stroke_path(&bezpath_to_cpu(&checkmark_path(anchor, size)));
}

#[cfg(test)]
#[path = "../../tests/unit/render/bullet.rs"]
mod tests;

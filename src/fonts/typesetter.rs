use std::sync::Arc;

use tracing::warn;

use crate::fonts::builtin;
use crate::fonts::resolver::{FontFace, GlyphSource, OutlineFace};
use crate::foundation::core::{Affine, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::canvas::affine_to_cpu;

/// Measures and draws single-line text for one face.
///
/// Outline faces are shaped with Parley and drawn as glyph runs; the built-in face is drawn
/// as dot rectangles. One typesetter is created per composition call, since the Parley
/// contexts are mutable scratch state.
pub struct Typesetter {
    face: Arc<FontFace>,
    outline: Option<OutlineText>,
}

impl Typesetter {
    pub fn new(face: Arc<FontFace>) -> Self {
        let outline = match face.as_ref() {
            FontFace::Outline(o) => match OutlineText::new(o) {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(origin = %o.origin(), error = %e, "outline face unusable for layout; using built-in glyphs");
                    None
                }
            },
            FontFace::Builtin => None,
        };
        Self { face, outline }
    }

    pub fn for_source(glyph: &GlyphSource) -> Self {
        Self::new(glyph.face().clone())
    }

    pub fn face(&self) -> &Arc<FontFace> {
        &self.face
    }

    /// `true` when drawing falls back to the built-in face.
    pub fn is_builtin(&self) -> bool {
        self.outline.is_none()
    }

    /// Rendered advance width of `text` in pixels, trailing whitespace excluded.
    pub fn measure(&mut self, glyph: &GlyphSource, text: &str) -> f32 {
        let text = text.trim_end();
        if text.is_empty() {
            return 0.0;
        }
        match self.outline.as_mut() {
            Some(o) => o.layout(text, glyph.size_px(), Rgba8::default()).width(),
            None => builtin::measure(text, glyph.size_px()),
        }
    }

    /// Height of one line box at the glyph source's size.
    pub fn line_box_height(&mut self, glyph: &GlyphSource) -> f32 {
        match self.outline.as_mut() {
            Some(o) => o.layout("Ag", glyph.size_px(), Rgba8::default()).height(),
            None => builtin::line_box_height(glyph.size_px()),
        }
    }

    /// Draw `text` with the top-left of its line box mapped through `transform`.
    pub fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        glyph: &GlyphSource,
        text: &str,
        color: Rgba8,
        transform: Affine,
    ) {
        if text.trim().is_empty() {
            return;
        }
        ctx.set_paint(color.to_cpu_color());
        match self.outline.as_mut() {
            Some(o) => o.draw(ctx, text, glyph.size_px(), color, transform),
            None => builtin::draw(ctx, text, glyph.size_px(), transform),
        }
    }
}

struct OutlineText {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl OutlineText {
    fn new(face: &OutlineFace) -> PosterResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(face.shared_bytes()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PosterError::validation("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::validation("registered font family has no name"))?
            .to_string();

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(face.shared_bytes()), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
        })
    }

    fn layout(&mut self, text: &str, size_px: f32, brush: Rgba8) -> parley::Layout<Rgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f32,
        color: Rgba8,
        transform: Affine,
    ) {
        let layout = self.layout(text, size_px, color);
        ctx.set_transform(affine_to_cpu(transform));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/typesetter.rs"]
mod tests;

use tracing::{debug, warn};

use crate::config::TextConfig;
use crate::fonts::resolver::GlyphSource;
use crate::fonts::typesetter::Typesetter;
use crate::foundation::core::{Affine, Point, Rgba8};
use crate::render::bullet::draw_checkmark;
use crate::render::canvas::WorkingCanvas;
use crate::render::cursor::RenderCursor;
use crate::text::reflow::TextLine;

/// What [`TextBlock::draw`] managed to put on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TextBlockReport {
    /// Logical lines (title included) with at least one segment drawn.
    pub lines_drawn: usize,
    pub segments_drawn: usize,
    /// Drawing stopped early because the working canvas ran out of rows.
    pub truncated: bool,
}

/// Draws the title and body lines below the grid.
///
/// Every segment takes exactly one line advance, empty segments included. The first segment of
/// a bulleted line gets a check mark in the indent gutter; continuation segments keep the
/// hanging indent.
pub struct TextBlock<'a> {
    pub cfg: &'a TextConfig,
    pub body: &'a GlyphSource,
    pub title: &'a GlyphSource,
    /// Rows kept free at the bottom of the working canvas.
    pub bottom_margin: u32,
}

struct LineStyle<'a> {
    glyph: &'a GlyphSource,
    color: Rgba8,
    advance: u32,
}

impl TextBlock<'_> {
    pub fn draw(
        &self,
        canvas: &mut WorkingCanvas,
        typesetter: &mut Typesetter,
        title: Option<&TextLine>,
        lines: &[TextLine],
        cursor: &mut RenderCursor,
    ) -> TextBlockReport {
        let limit = canvas.height().saturating_sub(self.bottom_margin);
        let mut report = TextBlockReport::default();

        let title_style = LineStyle {
            glyph: self.title,
            color: self.cfg.title_color,
            advance: self.cfg.title_line_height,
        };
        let body_style = LineStyle {
            glyph: self.body,
            color: self.cfg.text_color,
            advance: self.cfg.line_height,
        };

        let styled = title
            .into_iter()
            .map(|l| (l, &title_style))
            .chain(lines.iter().map(|l| (l, &body_style)));

        for (line, style) in styled {
            let drawn = self.draw_line(canvas, typesetter, line, style, cursor, limit);
            if drawn > 0 {
                report.lines_drawn += 1;
                report.segments_drawn += drawn;
            }
            if drawn < line.segments.len() {
                warn!(
                    cursor = cursor.y(),
                    working_height = canvas.height(),
                    "working canvas full; remaining text not drawn"
                );
                report.truncated = true;
                break;
            }
        }
        debug!(?report, cursor = cursor.y(), "text block drawn");
        report
    }

    /// Draw the segments of one line; returns how many fit.
    fn draw_line(
        &self,
        canvas: &mut WorkingCanvas,
        typesetter: &mut Typesetter,
        line: &TextLine,
        style: &LineStyle<'_>,
        cursor: &mut RenderCursor,
        limit: u32,
    ) -> usize {
        let x = f64::from(self.cfg.text_x(line.is_bulleted));
        let box_height = f64::from(typesetter.line_box_height(style.glyph));
        let pad = ((f64::from(style.advance) - box_height) / 2.0).max(0.0);

        let mut drawn = 0usize;
        for (i, segment) in line.segments().enumerate() {
            if !cursor.fits(style.advance, limit) {
                break;
            }
            let top = f64::from(cursor.y());
            if i == 0 && line.is_bulleted {
                let size = f64::from(self.cfg.bullet_size);
                let bullet_top = top + ((f64::from(style.advance) - size) / 2.0).max(0.0);
                draw_checkmark(
                    canvas.ctx(),
                    Point::new(f64::from(self.cfg.margin_x), bullet_top),
                    size,
                    self.cfg.bullet_color,
                );
            }
            typesetter.draw(
                canvas.ctx(),
                style.glyph,
                segment,
                style.color,
                Affine::translate((x, top + pad)),
            );
            cursor.advance(style.advance);
            drawn += 1;
        }
        drawn
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text_block.rs"]
mod tests;

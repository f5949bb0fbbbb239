//! Poster composition.
//!
//! [`PosterEngine`] owns the validated configuration and the glyph sources resolved at
//! construction. [`PosterEngine::compose`] takes `&self`: every call builds its own working
//! canvas, cursor and typesetter, so one engine can serve concurrent callers.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::assets::render_cell;
use crate::config::PosterConfig;
use crate::effects::watermark::{WatermarkPlacement, apply_watermark};
use crate::encode::encode_png;
use crate::fonts::resolver::{FontFace, FontResolver, GlyphSource};
use crate::fonts::typesetter::Typesetter;
use crate::foundation::core::PixelRect;
use crate::foundation::error::{PosterError, PosterResult};
use crate::layout::grid::GridLayout;
use crate::render::canvas::WorkingCanvas;
use crate::render::cursor::RenderCursor;
use crate::render::text_block::{TextBlock, TextBlockReport};
use crate::text::reflow::{TextLine, WrapWidths, reflow, wrap_segments};

/// Photographs plus already-summarized text.
#[derive(Clone, Debug, Default)]
pub struct PosterRequest {
    /// Encoded image blobs, in grid order.
    pub images: Vec<Vec<u8>>,
    pub text: String,
}

impl PosterRequest {
    pub fn new(images: Vec<Vec<u8>>, text: impl Into<String>) -> Self {
        Self {
            images,
            text: text.into(),
        }
    }

    /// A request needs at least one image and non-blank text.
    pub fn validate(&self) -> PosterResult<()> {
        if self.images.is_empty() {
            return Err(PosterError::invalid_request("no images supplied"));
        }
        if self.text.trim().is_empty() {
            return Err(PosterError::invalid_request("no text supplied"));
        }
        Ok(())
    }
}

/// What one composition did, for callers and tests.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct ComposeReport {
    /// Grid slots of the images that were considered (after the cap), in input order.
    pub cells: Vec<PixelRect>,
    /// Indices of images that failed to decode; their slots are left blank.
    pub skipped_images: Vec<usize>,
    /// Images beyond the configured cap.
    pub ignored_images: usize,
    /// Offset just below the grid block.
    pub grid_bottom: u32,
    pub title: Option<TextLine>,
    pub lines: Vec<TextLine>,
    pub text: TextBlockReport,
    /// Final cursor position before trimming.
    pub content_height: u32,
    pub watermarks: Vec<WatermarkPlacement>,
}

/// The encoded poster.
#[derive(Clone, Debug)]
pub struct PosterOutput {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Suggested download file name.
    pub file_name: String,
    pub report: ComposeReport,
}

pub struct PosterEngine {
    config: PosterConfig,
    grid: GridLayout,
    body: GlyphSource,
    title: GlyphSource,
    watermark: GlyphSource,
}

impl PosterEngine {
    /// Validate `config` and resolve glyph sources from its font candidates.
    ///
    /// The chosen face must also cover the configured title and watermark brand.
    pub fn new(config: PosterConfig) -> PosterResult<Self> {
        let mut resolver = FontResolver::new(config.fonts.clone())
            .require(config.text.title.as_deref().unwrap_or_default());
        if config.watermark.enabled {
            resolver = resolver.require(&config.watermark.brand);
        }
        Self::with_resolver(config, &mut resolver)
    }

    /// Like [`PosterEngine::new`] but resolving through a caller-owned resolver, so one loaded
    /// face can back several engines.
    pub fn with_resolver(config: PosterConfig, resolver: &mut FontResolver) -> PosterResult<Self> {
        config.validate()?;
        let grid = GridLayout::from_config(&config.grid);
        let grid_floor = u64::from(grid.bottom(config.grid.max_images))
            + u64::from(config.text.top_margin)
            + u64::from(config.canvas.bottom_margin);
        if grid_floor >= u64::from(config.canvas.working_height) {
            return Err(PosterError::validation(format!(
                "canvas.working_height {} cannot hold a full grid of {} images",
                config.canvas.working_height, config.grid.max_images
            )));
        }

        let body = resolver.resolve(config.text.font_size);
        let title = resolver.resolve(config.text.title_font_size);
        let watermark = resolver.resolve(config.watermark.font_size);
        debug!(face = ?body.face(), "poster engine ready");
        Ok(Self {
            config,
            grid,
            body,
            title,
            watermark,
        })
    }

    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    /// Face shared by all glyph sources of this engine.
    pub fn face(&self) -> &Arc<FontFace> {
        self.body.face()
    }

    /// Compose and PNG-encode one poster.
    #[tracing::instrument(skip_all, fields(images = request.images.len(), text_len = request.text.len()))]
    pub fn compose(&self, request: &PosterRequest) -> PosterResult<PosterOutput> {
        let (poster, report) = self.render(request)?;
        let png = encode_png(&poster)?;
        info!(
            width = poster.width(),
            height = poster.height(),
            bytes = png.len(),
            "poster composed"
        );
        Ok(PosterOutput {
            png,
            width: poster.width(),
            height: poster.height(),
            file_name: self.config.output.file_name.clone(),
            report,
        })
    }

    /// Compose one poster without encoding it.
    pub fn render(&self, request: &PosterRequest) -> PosterResult<(RgbaImage, ComposeReport)> {
        request.validate()?;
        let cfg = &self.config;
        let width = cfg.grid.canvas_width;

        let considered = request.images.len().min(cfg.grid.max_images);
        let ignored_images = request.images.len() - considered;
        if ignored_images > 0 {
            debug!(ignored_images, cap = cfg.grid.max_images, "images beyond cap ignored");
        }

        let mut canvas =
            WorkingCanvas::new(width, cfg.canvas.working_height, cfg.canvas.background)?;

        let cells = self.grid.place(considered);
        let mut skipped_images = Vec::new();
        for (index, (bytes, rect)) in request.images.iter().zip(&cells).enumerate() {
            match render_cell(bytes, rect.width, rect.height) {
                Ok(cell) => canvas.draw_image(*rect, &cell)?,
                Err(e) => {
                    warn!(index, error = %e, "image skipped; grid slot left blank");
                    skipped_images.push(index);
                }
            }
        }

        let grid_bottom = self.grid.bottom(considered);
        let mut cursor = RenderCursor::new(grid_bottom);
        cursor.advance(cfg.text.top_margin);

        let mut typesetter = Typesetter::for_source(&self.body);
        let widths = WrapWidths {
            plain: cfg.text.max_text_width(width, false),
            bulleted: cfg.text.max_text_width(width, true),
        };

        let title = cfg
            .text
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| TextLine {
                raw: t.to_owned(),
                is_bulleted: false,
                content: t.to_owned(),
                segments: wrap_segments(t, widths.plain, |s| typesetter.measure(&self.title, s)),
            });
        let lines = reflow(
            &request.text,
            &cfg.text.suppressed_keywords,
            widths,
            |s| typesetter.measure(&self.body, s),
        );
        if lines.is_empty() {
            debug!("no text lines left after filtering");
        }

        let block = TextBlock {
            cfg: &cfg.text,
            body: &self.body,
            title: &self.title,
            bottom_margin: cfg.canvas.bottom_margin,
        };
        let text = block.draw(&mut canvas, &mut typesetter, title.as_ref(), &lines, &mut cursor);

        let content_height = cursor.y();
        let mut poster = canvas.trim(content_height, cfg.canvas.bottom_margin)?;
        let watermarks =
            apply_watermark(&mut poster, &mut typesetter, &self.watermark, &cfg.watermark)?;

        let report = ComposeReport {
            cells,
            skipped_images,
            ignored_images,
            grid_bottom,
            title,
            lines,
            text,
            content_height,
            watermarks,
        };
        Ok((poster, report))
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine/engine.rs"]
mod tests;

//! Engine configuration.
//!
//! Every knob the composition engine reads lives here and is handed to
//! [`crate::PosterEngine::new`] as one value. All sections default sensibly, so a JSON file
//! only needs to name the fields it overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};

/// Grids always have two columns.
pub const GRID_COLUMNS: u32 = 2;

/// Largest surface edge the rasterizer accepts.
pub const MAX_SURFACE_EDGE: u32 = u16::MAX as u32;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosterConfig {
    /// Photo grid geometry and image cap.
    pub grid: GridConfig,
    /// Text block styling and filtering.
    pub text: TextConfig,
    /// Working canvas allocation and trim margin.
    pub canvas: CanvasConfig,
    /// Brand watermark.
    pub watermark: WatermarkSpec,
    /// Glyph source candidates.
    pub fonts: FontConfig,
    /// Summarization fallback.
    pub summary: SummaryConfig,
    /// Output naming.
    pub output: OutputConfig,
}

impl PosterConfig {
    /// Parse a JSON configuration string and validate it.
    pub fn from_json_str(s: &str) -> PosterResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PosterError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> PosterResult<()> {
        self.grid.validate()?;
        self.text.validate()?;
        self.canvas.validate()?;
        self.watermark.validate()?;
        self.fonts.validate()?;

        let text_room = u64::from(self.text.margin_x) * 2 + u64::from(self.text.bullet_indent);
        if text_room >= u64::from(self.grid.canvas_width) {
            return Err(PosterError::validation(
                "text margins and bullet indent leave no room for text",
            ));
        }
        if self.canvas.working_height <= self.canvas.bottom_margin {
            return Err(PosterError::validation(
                "canvas.working_height must exceed canvas.bottom_margin",
            ));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(PosterError::validation("output.file_name must be non-empty"));
        }
        Ok(())
    }
}

/// Two-column photo grid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Poster width in pixels.
    pub canvas_width: u32,
    /// Height of every grid cell.
    pub cell_height: u32,
    /// Gap around and between cells.
    pub gap: u32,
    /// Policy cap on rendered photographs; extra photographs are ignored.
    pub max_images: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1080,
            cell_height: 380,
            gap: 20,
            max_images: 6,
        }
    }
}

impl GridConfig {
    /// Cell width derived from canvas width and gaps: `(canvas_width - 3 * gap) / 2`.
    pub fn cell_width(&self) -> u32 {
        self.canvas_width.saturating_sub(self.gap.saturating_mul(3)) / GRID_COLUMNS
    }

    fn validate(&self) -> PosterResult<()> {
        if self.canvas_width == 0 || self.canvas_width > MAX_SURFACE_EDGE {
            return Err(PosterError::validation(format!(
                "grid.canvas_width must be in 1..={MAX_SURFACE_EDGE}"
            )));
        }
        if self.cell_height == 0 {
            return Err(PosterError::validation("grid.cell_height must be > 0"));
        }
        if self.cell_width() == 0 {
            return Err(PosterError::validation(
                "grid.gap leaves no room for cells at this canvas width",
            ));
        }
        if self.max_images == 0 {
            return Err(PosterError::validation("grid.max_images must be >= 1"));
        }
        Ok(())
    }
}

/// Text block below the grid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Body glyph size in pixels.
    pub font_size: f32,
    /// Vertical advance per wrapped segment.
    pub line_height: u32,
    /// Left and right text margin.
    pub margin_x: u32,
    /// Space between the grid and the first text line.
    pub top_margin: u32,
    /// Extra indent applied to bulleted lines (check glyph sits in this gutter).
    pub bullet_indent: u32,
    /// Edge length of the check glyph box.
    pub bullet_size: u32,
    pub text_color: Rgba8,
    pub bullet_color: Rgba8,
    /// Lines containing any of these substrings are dropped (case-sensitive).
    pub suppressed_keywords: Vec<String>,
    /// Optional headline drawn above the body text.
    pub title: Option<String>,
    pub title_font_size: f32,
    pub title_line_height: u32,
    pub title_color: Rgba8,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 28.0,
            line_height: 44,
            margin_x: 40,
            top_margin: 24,
            bullet_indent: 44,
            bullet_size: 22,
            text_color: Rgba8::new(60, 60, 60, 255),
            bullet_color: Rgba8::new(34, 139, 34, 255),
            suppressed_keywords: vec![
                "deposit".to_owned(),
                "Deposit".to_owned(),
                "minimum tenancy".to_owned(),
                "Minimum tenancy".to_owned(),
                "押金".to_owned(),
                "最短租期".to_owned(),
            ],
            title: Some("Featured Listing".to_owned()),
            title_font_size: 38.0,
            title_line_height: 60,
            title_color: Rgba8::new(50, 50, 50, 255),
        }
    }
}

impl TextConfig {
    /// Left edge of segment text for plain or bulleted lines.
    pub fn text_x(&self, bulleted: bool) -> u32 {
        if bulleted {
            self.margin_x + self.bullet_indent
        } else {
            self.margin_x
        }
    }

    /// Pixel budget for one wrapped segment.
    pub fn max_text_width(&self, canvas_width: u32, bulleted: bool) -> f32 {
        canvas_width
            .saturating_sub(self.text_x(bulleted))
            .saturating_sub(self.margin_x) as f32
    }

    fn validate(&self) -> PosterResult<()> {
        for (name, v) in [
            ("text.font_size", self.font_size),
            ("text.title_font_size", self.title_font_size),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PosterError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if (self.line_height as f32) < self.font_size {
            return Err(PosterError::validation(
                "text.line_height must be >= text.font_size",
            ));
        }
        if (self.title_line_height as f32) < self.title_font_size {
            return Err(PosterError::validation(
                "text.title_line_height must be >= text.title_font_size",
            ));
        }
        if self.bullet_size == 0 || self.bullet_size > self.bullet_indent {
            return Err(PosterError::validation(
                "text.bullet_size must be in 1..=text.bullet_indent",
            ));
        }
        if self.suppressed_keywords.iter().any(|k| k.is_empty()) {
            return Err(PosterError::validation(
                "text.suppressed_keywords must not contain empty strings",
            ));
        }
        Ok(())
    }
}

/// Oversized working canvas and the trim margin.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Height allocated before rendering; content beyond it is not drawn.
    pub working_height: u32,
    /// Blank space kept below the last drawn content.
    pub bottom_margin: u32,
    pub background: Rgba8,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            working_height: 12_000,
            bottom_margin: 40,
            background: Rgba8::WHITE,
        }
    }
}

impl CanvasConfig {
    fn validate(&self) -> PosterResult<()> {
        if self.working_height == 0 || self.working_height > MAX_SURFACE_EDGE {
            return Err(PosterError::validation(format!(
                "canvas.working_height must be in 1..={MAX_SURFACE_EDGE}"
            )));
        }
        if self.background.a != 255 {
            return Err(PosterError::validation("canvas.background must be opaque"));
        }
        Ok(())
    }
}

/// Rotated, semi-transparent brand text stamped over the finished poster.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkSpec {
    pub enabled: bool,
    pub brand: String,
    pub font_size: f32,
    pub color: Rgba8,
    /// Counter-clockwise rotation of the brand text.
    pub rotation_degrees: f32,
    /// Vertical centers of each placement as fractions of the final poster height.
    pub anchors: Vec<f32>,
    /// Posters shorter than this are not watermarked.
    pub min_canvas_height: u32,
    /// Transparent border kept around the rotated text inside its layer.
    pub edge_padding: u32,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            brand: "LISTING POSTER".to_owned(),
            font_size: 64.0,
            color: Rgba8::new(128, 128, 128, 64),
            rotation_degrees: 30.0,
            anchors: vec![0.25, 0.75],
            min_canvas_height: 400,
            edge_padding: 8,
        }
    }
}

impl WatermarkSpec {
    fn validate(&self) -> PosterResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.brand.trim().is_empty() {
            return Err(PosterError::validation("watermark.brand must be non-empty"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(PosterError::validation(
                "watermark.font_size must be finite and > 0",
            ));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(PosterError::validation(
                "watermark.rotation_degrees must be finite",
            ));
        }
        if self.anchors.is_empty() {
            return Err(PosterError::validation(
                "watermark.anchors must name at least one placement",
            ));
        }
        if self.anchors.iter().any(|f| !(*f > 0.0 && *f < 1.0)) {
            return Err(PosterError::validation(
                "watermark.anchors must be fractions strictly between 0 and 1",
            ));
        }
        if self.color.a == 0 {
            return Err(PosterError::validation(
                "watermark.color alpha must be > 0",
            ));
        }
        Ok(())
    }
}

/// One place a glyph source may be loaded from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum FontCandidate {
    /// A font file on disk.
    File { path: PathBuf },
    /// A font fetched over HTTP(S), optionally cached on disk after the first fetch.
    Url {
        url: String,
        #[serde(default)]
        cache_path: Option<PathBuf>,
    },
}

/// Ordered glyph source candidates.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub candidates: Vec<FontCandidate>,
    /// Timeout for one network fetch attempt.
    pub fetch_timeout_ms: u64,
    /// Characters a candidate face must cover to be accepted.
    pub coverage_probe: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        let mut candidates = vec![FontCandidate::File {
            path: PathBuf::from("assets/fonts/NotoSansSC-Regular.ttf"),
        }];
        candidates.extend(
            platform_font_paths()
                .into_iter()
                .map(|path| FontCandidate::File { path }),
        );
        candidates.push(FontCandidate::Url {
            url: "https://github.com/google/fonts/raw/main/ofl/notosanssc/NotoSansSC%5Bwght%5D.ttf"
                .to_owned(),
            cache_path: Some(std::env::temp_dir().join("listing-poster/NotoSansSC.ttf")),
        });
        Self {
            candidates,
            fetch_timeout_ms: 4_000,
            coverage_probe: "Aa0£押金房".to_owned(),
        }
    }
}

impl FontConfig {
    /// No candidates at all: the resolver goes straight to the built-in face.
    pub fn builtin_only() -> Self {
        Self {
            candidates: Vec::new(),
            ..Self::default()
        }
    }

    fn validate(&self) -> PosterResult<()> {
        if self.fetch_timeout_ms == 0 {
            return Err(PosterError::validation("fonts.fetch_timeout_ms must be > 0"));
        }
        for c in &self.candidates {
            if let FontCandidate::Url { url, .. } = c
                && !(url.starts_with("https://") || url.starts_with("http://"))
            {
                return Err(PosterError::validation(format!(
                    "font url must be http(s): {url}"
                )));
            }
        }
        Ok(())
    }
}

/// Well-known font files for the current platform, most script coverage first.
pub fn platform_font_paths() -> Vec<PathBuf> {
    let mut out = Vec::new();

    #[cfg(target_os = "linux")]
    {
        for p in [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ] {
            out.push(PathBuf::from(p));
        }
    }

    #[cfg(target_os = "macos")]
    {
        for p in [
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/STHeiti Light.ttc",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/Library/Fonts/Arial Unicode.ttf",
        ] {
            out.push(PathBuf::from(p));
        }
    }

    #[cfg(target_os = "windows")]
    {
        let fonts = std::env::var("WINDIR")
            .map(|w| PathBuf::from(w).join("Fonts"))
            .unwrap_or_else(|_| PathBuf::from(r"C:\Windows\Fonts"));
        for f in ["msyh.ttc", "simhei.ttf", "arial.ttf"] {
            out.push(fonts.join(f));
        }
    }

    out
}

/// Summarization collaborator fallback.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    /// Substituted when the summarizer fails or returns nothing.
    pub placeholder: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            placeholder: "Summary unavailable, please edit manually.".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Suggested download file name.
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "listing-poster.png".to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;

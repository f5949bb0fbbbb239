//! Glyph source resolution.
//!
//! Candidates from [`FontConfig`] are tried in order and the first face that parses and covers
//! the required characters wins. When every candidate fails the built-in dot-matrix
//! face is used, so resolution itself never fails.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, bail};
use tracing::{debug, info, warn};

use crate::config::{FontCandidate, FontConfig};

/// A loaded face, shared by every glyph source resolved from it.
#[derive(Clone)]
pub enum FontFace {
    /// Outline font data (TrueType/OpenType, collection index 0).
    Outline(OutlineFace),
    /// Built-in 5x7 dot-matrix face.
    Builtin,
}

#[derive(Clone)]
pub struct OutlineFace {
    data: Arc<Vec<u8>>,
    origin: String,
}

impl OutlineFace {
    /// The face bytes behind a shared handle, for wrapping in font blobs without copying.
    pub fn shared_bytes(&self) -> Arc<dyn AsRef<[u8]> + Send + Sync> {
        self.data.clone()
    }

    /// Where the bytes came from (path or URL).
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline(o) => f
                .debug_struct("Outline")
                .field("origin", &o.origin)
                .field("bytes", &o.data.len())
                .finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

impl FontFace {
    /// Validate raw font bytes and wrap them as an outline face.
    pub fn from_bytes(
        data: Vec<u8>,
        origin: impl Into<String>,
        required: &str,
    ) -> anyhow::Result<Self> {
        check_face(&data, required)?;
        Ok(Self::Outline(OutlineFace {
            data: Arc::new(data),
            origin: origin.into(),
        }))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }
}

/// A face at one pixel size.
#[derive(Clone, Debug)]
pub struct GlyphSource {
    face: Arc<FontFace>,
    size_px: f32,
}

impl GlyphSource {
    pub fn new(face: Arc<FontFace>, size_px: f32) -> Self {
        let size_px = if size_px.is_finite() && size_px > 0.0 {
            size_px
        } else {
            1.0
        };
        Self { face, size_px }
    }

    pub fn builtin(size_px: f32) -> Self {
        Self::new(Arc::new(FontFace::Builtin), size_px)
    }

    pub fn face(&self) -> &Arc<FontFace> {
        &self.face
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Same face at another size.
    pub fn with_size(&self, size_px: f32) -> Self {
        Self::new(self.face.clone(), size_px)
    }
}

/// Memoizing resolver: the face is loaded at most once and one [`GlyphSource`] is kept per
/// requested size for the resolver's lifetime.
pub struct FontResolver {
    config: FontConfig,
    required: String,
    face: Option<Arc<FontFace>>,
    sources: HashMap<u32, GlyphSource>,
}

impl FontResolver {
    pub fn new(config: FontConfig) -> Self {
        let mut required = String::new();
        push_unique(&mut required, &config.coverage_probe);
        Self {
            config,
            required,
            face: None,
            sources: HashMap::new(),
        }
    }

    /// Also require glyphs for every non-whitespace character of `text` when picking a face.
    pub fn require(mut self, text: &str) -> Self {
        push_unique(&mut self.required, text);
        self
    }

    /// Characters a candidate face must cover.
    pub fn required_chars(&self) -> &str {
        &self.required
    }

    /// Return the glyph source for `size_px`, loading the face on first use.
    pub fn resolve(&mut self, size_px: f32) -> GlyphSource {
        let key = size_px.to_bits();
        if let Some(src) = self.sources.get(&key) {
            return src.clone();
        }
        let src = GlyphSource::new(self.face(), size_px);
        self.sources.insert(key, src.clone());
        src
    }

    /// The resolved face (loaded on first call).
    pub fn face(&mut self) -> Arc<FontFace> {
        if let Some(face) = &self.face {
            return face.clone();
        }
        let face = Arc::new(self.load_first());
        self.face = Some(face.clone());
        face
    }

    /// Number of memoized sizes.
    pub fn cached_sizes(&self) -> usize {
        self.sources.len()
    }

    #[tracing::instrument(skip(self), fields(candidates = self.config.candidates.len()))]
    fn load_first(&self) -> FontFace {
        for candidate in &self.config.candidates {
            match self.load_candidate(candidate) {
                Ok(face) => {
                    if let FontFace::Outline(o) = &face {
                        info!(origin = %o.origin(), "resolved glyph source");
                    }
                    return face;
                }
                Err(e) => debug!(?candidate, error = %e, "font candidate rejected"),
            }
        }
        warn!("no font candidate usable; falling back to built-in glyphs");
        FontFace::Builtin
    }

    fn load_candidate(&self, candidate: &FontCandidate) -> anyhow::Result<FontFace> {
        let required = self.required.as_str();
        match candidate {
            FontCandidate::File { path } => load_file(path, required),
            FontCandidate::Url { url, cache_path } => {
                if let Some(cache) = cache_path
                    && cache.is_file()
                {
                    match load_file(cache, required) {
                        Ok(face) => return Ok(face),
                        Err(e) => debug!(cache = %cache.display(), error = %e, "font cache unusable"),
                    }
                }

                let timeout = Duration::from_millis(self.config.fetch_timeout_ms);
                let bytes = fetch_font(url, timeout)?;
                check_face(&bytes, required)?;
                if let Some(cache) = cache_path
                    && let Err(e) = write_cache(cache, &bytes)
                {
                    warn!(cache = %cache.display(), error = %e, "failed to cache fetched font");
                }
                FontFace::from_bytes(bytes, url.clone(), required)
            }
        }
    }
}

fn push_unique(into: &mut String, text: &str) {
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if !into.contains(c) {
            into.push(c);
        }
    }
}

fn load_file(path: &Path, required: &str) -> anyhow::Result<FontFace> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    FontFace::from_bytes(bytes, path.display().to_string(), required)
}

/// Parse the face and require a glyph for every non-whitespace character of `required`.
fn check_face(data: &[u8], required: &str) -> anyhow::Result<()> {
    let face = ttf_parser::Face::parse(data, 0).context("parse font face")?;
    if let Some(missing) = required
        .chars()
        .filter(|c| !c.is_whitespace())
        .find(|c| face.glyph_index(*c).is_none())
    {
        bail!("font has no glyph for {missing:?}");
    }
    Ok(())
}

fn write_cache(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create font cache dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write font cache '{}'", path.display()))
}

#[cfg(feature = "net-fonts")]
fn fetch_font(url: &str, timeout: Duration) -> anyhow::Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .context("build http client")?;
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("fetch font '{url}'"))?
        .error_for_status()
        .with_context(|| format!("fetch font '{url}'"))?;
    let bytes = resp.bytes().context("read font response body")?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "net-fonts"))]
fn fetch_font(url: &str, _timeout: Duration) -> anyhow::Result<Vec<u8>> {
    bail!("network font fetch disabled at build time ({url})")
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/resolver.rs"]
mod tests;

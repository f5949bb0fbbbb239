#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod effects;
pub mod encode;
pub mod engine;
pub mod fonts;
pub mod foundation;
pub mod layout;
pub mod render;
pub mod summarize;
pub mod text;

pub use config::{
    CanvasConfig, FontCandidate, FontConfig, GridConfig, OutputConfig, PosterConfig,
    SummaryConfig, TextConfig, WatermarkSpec,
};
pub use effects::{WatermarkPlacement, apply_watermark};
pub use engine::{ComposeReport, PosterEngine, PosterOutput, PosterRequest};
pub use fonts::{FontFace, FontResolver, GlyphSource, Typesetter};
pub use foundation::core::{PixelRect, Rgba8};
pub use foundation::error::{PosterError, PosterResult};
pub use layout::GridLayout;
pub use render::{RenderCursor, WorkingCanvas};
pub use summarize::{Summarizer, Verbatim, summarize_or_placeholder};
pub use text::{TextLine, reflow};

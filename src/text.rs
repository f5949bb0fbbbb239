pub mod reflow;
pub mod sanitize;

pub use reflow::{BULLET_MARKERS, TextLine, WrapWidths, reflow, split_lines, wrap_segments};
pub use sanitize::{is_allowed, retain_allowed};

//! Photograph decoding and cover-fit cell rendering.

pub mod decode;

pub use decode::{cover_fit, cover_scale, cover_window, decode_rgb, render_cell};

pub mod png;

pub use png::{encode_png, flatten_rgb};

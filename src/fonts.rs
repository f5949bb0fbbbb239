pub(crate) mod builtin;
pub mod resolver;
pub mod typesetter;

pub use resolver::{FontFace, FontResolver, GlyphSource, OutlineFace};
pub use typesetter::Typesetter;

pub mod bullet;
pub mod canvas;
pub mod cursor;
pub mod text_block;

pub use bullet::{checkmark_path, draw_checkmark};
pub use canvas::{WorkingCanvas, trimmed_height};
pub use cursor::RenderCursor;
pub use text_block::{TextBlock, TextBlockReport};

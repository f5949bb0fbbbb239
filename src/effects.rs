pub mod composite;
pub mod watermark;

pub use composite::{PremulLayer, over, over_at};
pub use watermark::{WatermarkLayer, WatermarkPlacement, apply_watermark};

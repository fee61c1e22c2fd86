// Preview layout: turns a résumé into wrapped blocks of text measured in points.
// The HTML preview and the export rasterizer both consume the same `PreviewDocument`.

pub mod font_metrics;
pub mod preview;

pub use font_metrics::FontFamily;
pub use preview::{build_preview, BlockKind, PreviewDocument};

// PDF export: preview → canvas → encoded page images → PDF.
// The pipeline is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod encode;
pub mod error;
pub mod exporter;
pub mod guard;
pub mod handlers;
pub mod options;
pub mod output;
pub mod pdf;
pub mod raster;

pub use error::ExportError;
pub use exporter::{PdfExporter, RasterPdfExporter};
pub use guard::ExportGuard;
pub use options::{ExportOptions, QualityTier};

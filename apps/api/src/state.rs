use std::sync::Arc;

use crate::config::Config;
use crate::export::{ExportGuard, PdfExporter};
use crate::llm_client::LlmClient;
use crate::storage::ObjectStorage;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub documents: DocumentStore,
    /// Pluggable export backend. Default: RasterPdfExporter.
    pub exporter: Arc<dyn PdfExporter>,
    pub export_guard: ExportGuard,
    /// Present only when S3_BUCKET is configured.
    pub storage: Option<Arc<dyn ObjectStorage>>,
    /// Present only when ANTHROPIC_API_KEY is configured.
    pub llm: Option<LlmClient>,
    pub config: Config,
}

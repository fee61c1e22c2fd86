mod assist;
mod config;
mod errors;
mod export;
mod form;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod storage;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{ExportGuard, RasterPdfExporter};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{ObjectStorage, S3Storage};
use crate::store::DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    let storage: Option<Arc<dyn ObjectStorage>> = match &config.storage {
        Some(storage_config) => {
            let s3 = S3Storage::connect(storage_config).await;
            info!("S3 storage initialized (bucket: {})", storage_config.bucket);
            Some(Arc::new(s3))
        }
        None => {
            warn!("S3_BUCKET not set; snapshots and uploads are disabled");
            None
        }
    };

    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("Writing assistant initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; writing assistant disabled");
            None
        }
    };

    info!(
        "Default export tier: {} (output dir {})",
        config.export_quality,
        config.export_dir.display()
    );

    let state = AppState {
        documents: DocumentStore::new(),
        exporter: Arc::new(RasterPdfExporter),
        export_guard: ExportGuard::new(),
        storage,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor is served from a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

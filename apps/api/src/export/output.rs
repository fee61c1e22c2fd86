//! Delivery of exported bytes in the shape `OutputType` asks for.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use crate::export::error::ExportError;
use crate::export::options::OutputType;

#[derive(Debug)]
pub enum ExportArtifact {
    Bytes { filename: String, bytes: Vec<u8> },
    DataUri { filename: String, data_uri: String },
    Saved { filename: String, path: PathBuf },
}

/// Reduces a caller-supplied filename to a bare `*.pdf` name with no path parts.
pub fn safe_filename(requested: &str) -> String {
    let base = requested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect::<String>();
    let base = base.trim().trim_start_matches('.');
    let base = if base.is_empty() { "resume" } else { base };
    if base.to_ascii_lowercase().ends_with(".pdf") {
        base.to_string()
    } else {
        format!("{base}.pdf")
    }
}

pub fn to_data_uri(bytes: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(bytes))
}

pub async fn deliver(
    bytes: Vec<u8>,
    filename: &str,
    output: OutputType,
    export_dir: &Path,
) -> Result<ExportArtifact, ExportError> {
    let filename = safe_filename(filename);
    match output {
        OutputType::Bytes => Ok(ExportArtifact::Bytes { filename, bytes }),
        OutputType::DataUri => Ok(ExportArtifact::DataUri {
            data_uri: to_data_uri(&bytes),
            filename,
        }),
        OutputType::Save => {
            tokio::fs::create_dir_all(export_dir).await?;
            let path = export_dir.join(&filename);
            tokio::fs::write(&path, &bytes).await?;
            info!("Saved export to {}", path.display());
            Ok(ExportArtifact::Saved { filename, path })
        }
    }
}

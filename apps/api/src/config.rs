use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::export::QualityTier;

/// Application configuration loaded from environment variables.
/// Storage and the writing assistant are optional; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Tier used when an export request does not name one.
    pub export_quality: QualityTier,
    /// Directory that `OutputType::Save` exports are written into.
    pub export_dir: PathBuf,
    pub storage: Option<StorageConfig>,
    pub anthropic_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let export_quality = match optional_env("EXPORT_QUALITY") {
            Some(raw) => raw
                .parse::<QualityTier>()
                .map_err(anyhow::Error::msg)
                .context("EXPORT_QUALITY must be 'standard' or 'improved'")?,
            None => QualityTier::Improved,
        };

        let storage = optional_env("S3_BUCKET").map(|bucket| StorageConfig {
            bucket,
            endpoint: optional_env("S3_ENDPOINT"),
            region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
        });

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            export_quality,
            export_dir: optional_env("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("exports")),
            storage,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
        })
    }
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Local-only configuration: no storage, no assistant.
    pub fn for_tests(export_dir: PathBuf) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            export_quality: QualityTier::Improved,
            export_dir,
            storage: None,
            anthropic_api_key: None,
        }
    }
}

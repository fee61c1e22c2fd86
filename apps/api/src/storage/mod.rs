//! Optional object storage for exported PDFs and document snapshots.
//!
//! Calls are opaque puts and gets; there is no listing, versioning or retry.

pub mod handlers;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::models::CvDocument;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage request failed: {0}")]
    Request(String),

    #[error("snapshot is not a valid document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

pub fn export_key(document_id: Uuid, filename: &str) -> String {
    format!("exports/{document_id}/{filename}")
}

pub fn snapshot_key(document_id: Uuid) -> String {
    format!("documents/{document_id}.json")
}

/// Stores the document as pretty JSON and returns the key it was written to.
pub async fn save_snapshot(
    storage: &dyn ObjectStorage,
    doc: &CvDocument,
) -> Result<String, StorageError> {
    let key = snapshot_key(doc.id);
    let body = serde_json::to_vec_pretty(doc)?;
    storage.put_object(&key, body, "application/json").await?;
    info!("Saved snapshot of document {} to {key}", doc.id);
    Ok(key)
}

pub async fn load_snapshot(
    storage: &dyn ObjectStorage,
    document_id: Uuid,
) -> Result<CvDocument, StorageError> {
    let bytes = storage.get_object(&snapshot_key(document_id)).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO backend
// ────────────────────────────────────────────────────────────────────────────

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    /// Builds a client for AWS, or for MinIO when an endpoint is configured.
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "folio-static",
            ));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("S3 upload failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                if e.is_no_such_key() {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Request(format!("S3 download failed: {e}"))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Request(format!("S3 body read failed: {e}")))?;
        Ok(data.into_bytes().to_vec())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend for tests
// ────────────────────────────────────────────────────────────────────────────

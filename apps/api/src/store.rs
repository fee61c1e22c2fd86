use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CvDocument;

/// In-memory document table. Documents live for the lifetime of the process
/// unless snapshotted to storage.
#[derive(Clone, Default)]
pub struct DocumentStore {
    inner: Arc<RwLock<HashMap<Uuid, CvDocument>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the document under its own id.
    pub async fn insert(&self, doc: CvDocument) {
        self.inner.write().await.insert(doc.id, doc);
    }

    pub async fn get(&self, id: Uuid) -> Result<CvDocument, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
    }

    /// Applies `f` under the write lock and returns its result.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut CvDocument) -> T,
    ) -> Result<T, AppError> {
        let mut docs = self.inner.write().await;
        let doc = docs
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
        Ok(f(doc))
    }
}

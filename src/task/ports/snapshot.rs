//! Persistence port storing the whole task collection at once.

use crate::task::domain::Task;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot store operations.
pub type SnapshotStoreResult<T> = Result<T, SnapshotStoreError>;

/// Key-value style persistence collaborator.
///
/// Only whole-collection replace is required; there is no partial update or
/// multi-process transaction contract.
#[async_trait]
pub trait TaskSnapshotStore: Send + Sync {
    /// Loads every stored task in order.
    async fn load_all(&self) -> SnapshotStoreResult<Vec<Task>>;

    /// Replaces the stored collection with `tasks`.
    async fn save_all(&self, tasks: &[Task]) -> SnapshotStoreResult<()>;
}

/// Errors returned by snapshot store adapters.
#[derive(Debug, Clone, Error)]
pub enum SnapshotStoreError {
    /// The stored collection could not be decoded.
    #[error("stored tasks are unreadable: {0}")]
    Corrupt(Arc<serde_json::Error>),

    /// Underlying storage failure.
    #[error("snapshot storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl SnapshotStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

impl From<serde_json::Error> for SnapshotStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Corrupt(Arc::new(err))
    }
}

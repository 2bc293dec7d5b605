//! In-memory snapshot store standing in for a local key-value store.

use crate::task::{
    domain::Task,
    ports::{SnapshotStoreError, SnapshotStoreResult, TaskSnapshotStore},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Snapshot store keeping the collection in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    fail_saves: Arc<AtomicBool>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent saves fail until reset.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Returns the currently saved collection.
    #[must_use]
    pub fn saved(&self) -> Vec<Task> {
        self.tasks
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

fn lock_error(err: impl std::fmt::Display) -> SnapshotStoreError {
    SnapshotStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskSnapshotStore for InMemorySnapshotStore {
    async fn load_all(&self) -> SnapshotStoreResult<Vec<Task>> {
        Ok(self.tasks.read().map_err(lock_error)?.clone())
    }

    async fn save_all(&self, tasks: &[Task]) -> SnapshotStoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SnapshotStoreError::storage(std::io::Error::other(
                "snapshot store is failing saves",
            )));
        }
        let mut stored = self.tasks.write().map_err(lock_error)?;
        stored.clear();
        stored.extend_from_slice(tasks);
        Ok(())
    }
}

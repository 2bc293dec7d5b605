//! Task Store backed by a whole-collection snapshot store.

use crate::task::{
    domain::{Task, TaskDomainError, TaskId},
    ports::{
        TaskMutation, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSnapshotStore,
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Task repository that writes through to a [`TaskSnapshotStore`].
///
/// Writers in this process are serialized: each mutation is applied to a
/// copy of the collection, saved in full, and committed in memory only once
/// the save succeeds. The backing store offers no multi-process
/// transactions, so two processes writing the same store without
/// coordination degrade to last-writer-wins. Call [`Self::reload`] to pick
/// up changes made elsewhere.
pub struct SnapshotTaskRepository<S>
where
    S: TaskSnapshotStore,
{
    store: Arc<S>,
    tasks: Mutex<Vec<Task>>,
}

impl<S> SnapshotTaskRepository<S>
where
    S: TaskSnapshotStore,
{
    /// Loads the current collection from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when loading fails.
    pub async fn open(store: Arc<S>) -> TaskRepositoryResult<Self> {
        let tasks = store
            .load_all()
            .await
            .map_err(TaskRepositoryError::persistence)?;
        debug!(task_count = tasks.len(), "loaded task snapshot");
        Ok(Self {
            store,
            tasks: Mutex::new(tasks),
        })
    }

    /// Replaces the in-memory collection with the backing store's contents.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when loading fails; the
    /// previous collection is kept in that case.
    pub async fn reload(&self) -> TaskRepositoryResult<()> {
        let mut tasks = self.tasks.lock().await;
        let loaded = self
            .store
            .load_all()
            .await
            .map_err(TaskRepositoryError::persistence)?;
        debug!(task_count = loaded.len(), "reloaded task snapshot");
        *tasks = loaded;
        Ok(())
    }

    async fn commit(&self, current: &mut Vec<Task>, next: Vec<Task>) -> TaskRepositoryResult<()> {
        self.store
            .save_all(&next)
            .await
            .map_err(TaskRepositoryError::persistence)?;
        debug!(task_count = next.len(), "saved task snapshot");
        *current = next;
        Ok(())
    }
}

#[async_trait]
impl<S> TaskRepository for SnapshotTaskRepository<S>
where
    S: TaskSnapshotStore,
{
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.tasks.lock().await;
        if tasks.iter().any(|stored| stored.id() == task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        let mut next = tasks.clone();
        next.push(task.clone());
        self.commit(&mut tasks, next).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.tasks.lock().await;
        Ok(tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        Ok(self.tasks.lock().await.clone())
    }

    async fn modify(
        &self,
        id: TaskId,
        mutation: TaskMutation<'_>,
    ) -> TaskRepositoryResult<Result<Task, TaskDomainError>> {
        let mut tasks = self.tasks.lock().await;
        let mut next = tasks.clone();
        let candidate = next
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        if let Err(rejection) = mutation(candidate) {
            return Ok(Err(rejection));
        }
        let updated = candidate.clone();
        self.commit(&mut tasks, next).await?;
        Ok(Ok(updated))
    }
}

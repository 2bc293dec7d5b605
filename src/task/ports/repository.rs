//! Repository port for task persistence, lookup, and atomic mutation.

use crate::task::domain::{Task, TaskDomainError, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Fallible in-place change applied by [`TaskRepository::modify`].
pub type TaskMutation<'a> = Box<dyn FnOnce(&mut Task) -> Result<(), TaskDomainError> + Send + 'a>;

/// Task Store contract.
///
/// Identifiers are unique and stable for the lifetime of a task; tasks are
/// never deleted.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task at the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task in creation order.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Applies `mutation` to the currently stored task as one atomic
    /// check-then-apply step.
    ///
    /// Concurrent calls for the same task are serialized. When the mutation
    /// rejects, the stored task is left untouched and the rejection is
    /// returned in the inner `Err`; otherwise the updated task is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist,
    /// or a persistence error when the change cannot be written.
    async fn modify(
        &self,
        id: TaskId,
        mutation: TaskMutation<'_>,
    ) -> TaskRepositoryResult<Result<Task, TaskDomainError>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! In-memory Task Store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskDomainError, TaskId},
    ports::{TaskMutation, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Mutations run under the write lock against a copy of the stored task and
/// are committed only when they succeed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with `tasks` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when two tasks share an
    /// identifier.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> TaskRepositoryResult<Self> {
        let mut state = InMemoryTaskState::default();
        for task in tasks {
            state.insert(task)?;
        }
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }
}

impl InMemoryTaskState {
    fn insert(&mut self, task: Task) -> TaskRepositoryResult<()> {
        if self.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        self.order.push(task.id());
        self.tasks.insert(task.id(), task);
        Ok(())
    }

    fn ordered(&self) -> Vec<Task> {
        self.order
            .iter()
            .filter_map(|id| self.tasks.get(id).cloned())
            .collect()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(task.clone())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.ordered())
    }

    async fn modify(
        &self,
        id: TaskId,
        mutation: TaskMutation<'_>,
    ) -> TaskRepositoryResult<Result<Task, TaskDomainError>> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let mut candidate = stored.clone();
        if let Err(rejection) = mutation(&mut candidate) {
            return Ok(Err(rejection));
        }
        *stored = candidate.clone();
        Ok(Ok(candidate))
    }
}

//! Read-only, role-filtered task views.

use crate::task::{
    domain::{ActorContext, Role, Task, TaskStatus, WalletAddress},
    ports::{TaskRepository, TaskRepositoryResult},
};
use std::sync::Arc;

/// Query service producing the lists each role works from.
///
/// All views preserve creation order and never mutate the store.
#[derive(Clone)]
pub struct TaskBoardService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskBoardService<R>
where
    R: TaskRepository,
{
    /// Creates a board reading from `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the main list for the actor's role: the client's unfinished
    /// tasks, or the open tasks an executor may still respond to.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn board_for(&self, actor: &ActorContext) -> TaskRepositoryResult<Vec<Task>> {
        match actor.role() {
            Role::Client => self.client_open_tasks(actor.wallet()).await,
            Role::Executor => self.available_for_executor(actor.wallet()).await,
        }
    }

    /// Tasks `wallet` created that are not yet completed.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn client_open_tasks(
        &self,
        wallet: &WalletAddress,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.filtered(|task| task.creator() == wallet && !task.completed())
            .await
    }

    /// Open tasks `wallet` has not responded to and did not create.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn available_for_executor(
        &self,
        wallet: &WalletAddress,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.filtered(|task| {
            task.status() == TaskStatus::Open
                && task.creator() != wallet
                && !task.has_response_from(wallet)
        })
        .await
    }

    /// Unfinished tasks where `wallet` is the creator or the executor.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn active_tasks(&self, wallet: &WalletAddress) -> TaskRepositoryResult<Vec<Task>> {
        self.filtered(|task| !task.completed() && task.is_participant(wallet))
            .await
    }

    /// Completed tasks where `wallet` is the creator or the executor.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn completed_tasks(&self, wallet: &WalletAddress) -> TaskRepositoryResult<Vec<Task>> {
        self.filtered(|task| task.completed() && task.is_participant(wallet))
            .await
    }

    /// Completed tasks where `wallet` has not yet rated the counterparty.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn awaiting_rating(&self, wallet: &WalletAddress) -> TaskRepositoryResult<Vec<Task>> {
        self.filtered(|task| {
            task.completed()
                && task
                    .role_of(wallet)
                    .is_some_and(|role| task.rating_given_by(role).is_none())
        })
        .await
    }

    async fn filtered(&self, keep: impl Fn(&Task) -> bool) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.repository.list_all().await?;
        Ok(tasks.into_iter().filter(|task| keep(task)).collect())
    }
}

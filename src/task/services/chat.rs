//! Service layer for the per-task chat log.

use super::lifecycle::TaskLifecycleResult;
use crate::task::{
    domain::{ActorContext, ChatMessage, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Append-only chat between a task's creator and executor.
///
/// Reads and writes are restricted to the two participants.
#[derive(Clone)]
pub struct ChatService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    max_message_chars: usize,
}

impl<R, C> ChatService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a chat service accepting messages up to `max_message_chars`.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, max_message_chars: usize) -> Self {
        Self {
            repository,
            clock,
            max_message_chars,
        }
    }

    /// Appends a message from the actor to the task chat.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`](super::TaskLifecycleError::Domain)
    /// when the text is blank or too long, or the actor does not participate
    /// in the task; repository errors when the task is missing.
    pub async fn post_message(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        text: impl Into<String> + Send,
    ) -> TaskLifecycleResult<ChatMessage> {
        let message = ChatMessage::new(
            actor.wallet().clone(),
            text,
            self.max_message_chars,
            &*self.clock,
        )?;
        let appended = message.clone();
        let clock = Arc::clone(&self.clock);
        let outcome = self
            .repository
            .modify(
                task_id,
                Box::new(move |task: &mut Task| task.post_message(message, clock.as_ref())),
            )
            .await?;

        match outcome {
            Ok(_) => {
                debug!(task_id = %task_id, sender = %actor.wallet(), "chat message appended");
                Ok(appended)
            }
            Err(rejection) => {
                warn!(
                    task_id = %task_id,
                    sender = %actor.wallet(),
                    error = %rejection,
                    "chat message rejected"
                );
                Err(rejection.into())
            }
        }
    }

    /// Returns the full chat in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`](super::TaskLifecycleError::Domain)
    /// when the actor does not participate in the task, or
    /// [`TaskRepositoryError::NotFound`] when the task is missing.
    pub async fn read_messages(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<ChatMessage>> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        task.ensure_participant(actor.wallet())?;
        Ok(task.chat().to_vec())
    }
}

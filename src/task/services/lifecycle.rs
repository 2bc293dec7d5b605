//! Service layer for the escrowed task lifecycle.

use crate::config::MarketplaceConfig;
use crate::task::{
    domain::{
        ActorContext, Amount, Deadline, Rating, RejectionKind, ReportRef, Task, TaskAction,
        TaskDomainError, TaskId, TaskListing, WalletAddress,
    },
    ports::{DepositRequest, EscrowClient, EscrowError, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for posting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    amount: Amount,
    deadline: Deadline,
}

impl CreateTaskRequest {
    /// Creates a request with every listing field.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        deadline: Deadline,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            amount,
            deadline,
        }
    }

    /// Replaces the reward.
    #[must_use]
    pub const fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The operation was rejected by a lifecycle rule.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The escrow deposit did not complete; no task was created.
    #[error(transparent)]
    Escrow(#[from] EscrowError),
}

impl TaskLifecycleError {
    /// Returns the rejection category when a lifecycle rule refused the
    /// operation, or `None` for escrow and storage failures.
    #[must_use]
    pub const fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            Self::Domain(err) => Some(err.kind()),
            Self::Repository(_) | Self::Escrow(_) => None,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every transition is one atomic check-then-apply against the stored task;
/// a rejection leaves the task untouched.
#[derive(Clone)]
pub struct TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EscrowClient,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    escrow: Arc<E>,
    clock: Arc<C>,
    config: MarketplaceConfig,
}

impl<R, E, C> TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EscrowClient,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        escrow: Arc<E>,
        clock: Arc<C>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            repository,
            escrow,
            clock,
            config,
        }
    }

    /// Funds a task through escrow and posts it as `open`.
    ///
    /// The listing is validated before any funds move. The deposit is
    /// bounded by the configured timeout; if it fails, times out, or the
    /// returned future is dropped, no task is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for invalid input or a
    /// non-client role, [`TaskLifecycleError::Escrow`] when the deposit does
    /// not complete, and [`TaskLifecycleError::Repository`] when storing
    /// fails.
    pub async fn create(
        &self,
        actor: &ActorContext,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        actor.ensure_role_for(TaskAction::Create)?;
        let listing = TaskListing::new(
            request.title,
            request.description,
            request.amount,
            request.deadline,
        )?;

        let timeout = self.config.deposit_timeout;
        let deposit = DepositRequest {
            amount: listing.amount(),
            destination: self.config.escrow_address.clone(),
            payer: actor.wallet().clone(),
            timeout,
        };
        let receipt = tokio::time::timeout(timeout, self.escrow.deposit(&deposit))
            .await
            .unwrap_or(Err(EscrowError::TimedOut(timeout)))
            .inspect_err(|err| {
                warn!(
                    actor = %actor.wallet(),
                    amount = %deposit.amount,
                    error = %err,
                    "escrow deposit failed"
                );
            })?;

        let task = Task::new(actor.wallet().clone(), listing, receipt, &*self.clock);
        self.repository.store(&task).await?;
        info!(
            task_id = %task.id(),
            actor = %actor.wallet(),
            amount = %task.amount(),
            deposit_tx = %task.deposit_tx(),
            "task created"
        );
        Ok(task)
    }

    /// Records the actor's response to an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the message is blank, the
    /// actor is not an executor or created the task, the task is not open,
    /// or the actor already responded.
    pub async fn respond(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        message: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let text = message.into();
        self.apply(TaskAction::Respond, actor, task_id, move |task, clock| {
            task.respond(actor, text, clock)
        })
        .await
    }

    /// Selects `chosen` as the executor of an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the actor is not the
    /// creator, the task is not open, or `chosen` never responded.
    pub async fn select(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        chosen: &WalletAddress,
    ) -> TaskLifecycleResult<Task> {
        self.apply(TaskAction::Select, actor, task_id, move |task, clock| {
            task.select_executor(actor, chosen, clock)
        })
        .await
    }

    /// Hands in the deliverable for a task in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the actor is not the
    /// selected executor or the task is not in progress.
    pub async fn submit_report(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        report: ReportRef,
    ) -> TaskLifecycleResult<Task> {
        self.apply(TaskAction::SubmitReport, actor, task_id, move |task, clock| {
            task.submit_report(actor, report, clock)
        })
        .await
    }

    /// Confirms the deliverable, completing the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the actor is not the
    /// creator or no report has been submitted.
    pub async fn confirm(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        self.apply(TaskAction::Confirm, actor, task_id, move |task, clock| {
            task.confirm(actor, clock)
        })
        .await
    }

    /// Rates the counterparty of a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the actor does not hold
    /// the relation for their role, the task is not completed, or the
    /// actor's rating slot is already filled.
    pub async fn rate(
        &self,
        actor: &ActorContext,
        task_id: TaskId,
        rating: Rating,
    ) -> TaskLifecycleResult<Task> {
        self.apply(TaskAction::Rate, actor, task_id, move |task, clock| {
            task.rate(actor, rating, clock)
        })
        .await
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    async fn apply<'a, F>(
        &'a self,
        action: TaskAction,
        actor: &'a ActorContext,
        task_id: TaskId,
        mutation: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError> + Send + 'a,
    {
        let clock = Arc::clone(&self.clock);
        let outcome = self
            .repository
            .modify(task_id, Box::new(move |task: &mut Task| mutation(task, clock.as_ref())))
            .await?;

        match outcome {
            Ok(task) => {
                info!(
                    task_id = %task_id,
                    actor = %actor.wallet(),
                    action = %action,
                    status = %task.status(),
                    "task transition applied"
                );
                Ok(task)
            }
            Err(rejection) => {
                warn!(
                    task_id = %task_id,
                    actor = %actor.wallet(),
                    action = %action,
                    error = %rejection,
                    "task transition rejected"
                );
                Err(rejection.into())
            }
        }
    }
}

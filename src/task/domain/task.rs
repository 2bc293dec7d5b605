//! Task aggregate root and the escrow lifecycle state machine.

use super::{
    ActorContext, Amount, ChatMessage, Deadline, DepositReceipt, ParseTaskStatusError, Rating,
    ReportRef, Response, Role, TaskAction, TaskDomainError, TaskId, TaskListing, WalletAddress,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Funded and accepting responses.
    Open,
    /// An executor has been selected and is working.
    InProgress,
    /// The executor handed in a deliverable.
    Submitted,
    /// The client confirmed the deliverable and funds were released.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` for the final status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    const fn requires_executor(self) -> bool {
        !matches!(self, Self::Open)
    }

    const fn requires_report(self) -> bool {
        matches!(self, Self::Submitted | Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "submitted" => Ok(Self::Submitted),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedTaskData", into = "PersistedTaskData")]
pub struct Task {
    id: TaskId,
    listing: TaskListing,
    creator: WalletAddress,
    executor: Option<WalletAddress>,
    status: TaskStatus,
    responses: Vec<Response>,
    chat: Vec<ChatMessage>,
    report_file: Option<ReportRef>,
    client_rating: Option<Rating>,
    executor_rating: Option<Rating>,
    deposit_tx: DepositReceipt,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
///
/// This is also the stored record shape; `completed` is the denormalized
/// filter flag kept alongside `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted listing details.
    #[serde(flatten)]
    pub listing: TaskListing,
    /// Posting client.
    pub creator: WalletAddress,
    /// Selected executor, if any.
    pub executor: Option<WalletAddress>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Responses in arrival order.
    pub responses: Vec<Response>,
    /// Chat in arrival order.
    pub chat: Vec<ChatMessage>,
    /// Deliverable reference, if submitted.
    pub report_file: Option<ReportRef>,
    /// Whether the task is completed.
    pub completed: bool,
    /// Rating given by the client.
    pub client_rating: Option<Rating>,
    /// Rating given by the executor.
    pub executor_rating: Option<Rating>,
    /// Escrow deposit receipt.
    pub deposit_tx: DepositReceipt,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task for a funded listing.
    #[must_use]
    pub fn new(
        creator: WalletAddress,
        listing: TaskListing,
        deposit_tx: DepositReceipt,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            listing,
            creator,
            executor: None,
            status: TaskStatus::Open,
            responses: Vec::new(),
            chat: Vec::new(),
            report_file: None,
            client_rating: None,
            executor_rating: None,
            deposit_tx,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InconsistentRecord`] when the record breaks
    /// a lifecycle invariant.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let task_id = data.id;
        let inconsistent =
            |reason: &'static str| TaskDomainError::InconsistentRecord { task_id, reason };
        let status = data.status;
        if data.executor.is_some() != status.requires_executor() {
            return Err(inconsistent("executor must be set exactly when work has started"));
        }
        if data.report_file.is_some() != status.requires_report() {
            return Err(inconsistent("report must be set exactly when work was submitted"));
        }
        if data.completed != status.is_terminal() {
            return Err(inconsistent("completed flag disagrees with status"));
        }
        if !status.is_terminal() && (data.client_rating.is_some() || data.executor_rating.is_some())
        {
            return Err(inconsistent("ratings require a completed task"));
        }
        let mut seen: Vec<&WalletAddress> = Vec::with_capacity(data.responses.len());
        for response in &data.responses {
            if seen.contains(&response.wallet()) {
                return Err(inconsistent("duplicate response wallet"));
            }
            seen.push(response.wallet());
        }

        Ok(Self {
            id: data.id,
            listing: data.listing,
            creator: data.creator,
            executor: data.executor,
            status,
            responses: data.responses,
            chat: data.chat,
            report_file: data.report_file,
            client_rating: data.client_rating,
            executor_rating: data.executor_rating,
            deposit_tx: data.deposit_tx,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the listing details.
    #[must_use]
    pub const fn listing(&self) -> &TaskListing {
        &self.listing
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.listing.title()
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.listing.description()
    }

    /// Returns the escrowed reward.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.listing.amount()
    }

    /// Returns the urgency category.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.listing.deadline()
    }

    /// Returns the posting client.
    #[must_use]
    pub const fn creator(&self) -> &WalletAddress {
        &self.creator
    }

    /// Returns the selected executor, if any.
    #[must_use]
    pub const fn executor(&self) -> Option<&WalletAddress> {
        self.executor.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` once the client confirmed completion.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns responses in arrival order.
    #[must_use]
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Returns chat messages in arrival order.
    #[must_use]
    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Returns the deliverable reference, if submitted.
    #[must_use]
    pub const fn report_file(&self) -> Option<&ReportRef> {
        self.report_file.as_ref()
    }

    /// Returns the rating given by the client, which scores the executor.
    #[must_use]
    pub const fn client_rating(&self) -> Option<Rating> {
        self.client_rating
    }

    /// Returns the rating given by the executor, which scores the client.
    #[must_use]
    pub const fn executor_rating(&self) -> Option<Rating> {
        self.executor_rating
    }

    /// Returns the rating given by the participant acting in `role`.
    #[must_use]
    pub const fn rating_given_by(&self, role: Role) -> Option<Rating> {
        match role {
            Role::Client => self.client_rating,
            Role::Executor => self.executor_rating,
        }
    }

    /// Returns the escrow deposit receipt.
    #[must_use]
    pub const fn deposit_tx(&self) -> &DepositReceipt {
        &self.deposit_tx
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `wallet` already responded.
    #[must_use]
    pub fn has_response_from(&self, wallet: &WalletAddress) -> bool {
        self.responses.iter().any(|response| response.wallet() == wallet)
    }

    /// Returns `true` when `wallet` is the creator or the executor.
    #[must_use]
    pub fn is_participant(&self, wallet: &WalletAddress) -> bool {
        &self.creator == wallet || self.executor.as_ref() == Some(wallet)
    }

    /// Returns the role `wallet` holds on this task, if any.
    #[must_use]
    pub fn role_of(&self, wallet: &WalletAddress) -> Option<Role> {
        if &self.creator == wallet {
            Some(Role::Client)
        } else if self.executor.as_ref() == Some(wallet) {
            Some(Role::Executor)
        } else {
            None
        }
    }

    /// Records an executor's response.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank message, an authorization error
    /// when the actor is not in the executor role or created the task, and a
    /// state conflict when the task is no longer open or the actor already
    /// responded.
    pub fn respond(
        &mut self,
        actor: &ActorContext,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let response = Response::new(actor.wallet().clone(), message)?;
        actor.ensure_role_for(TaskAction::Respond)?;
        if actor.wallet() == &self.creator {
            return Err(TaskDomainError::CreatorCannotRespond(self.id));
        }
        self.ensure_status(TaskAction::Respond, TaskStatus::Open)?;
        if self.has_response_from(actor.wallet()) {
            return Err(TaskDomainError::DuplicateResponse {
                task_id: self.id,
                wallet: actor.wallet().clone(),
            });
        }

        self.responses.push(response);
        self.touch(clock);
        Ok(())
    }

    /// Selects the executor among the respondents.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the creator acts in the client
    /// role, a state conflict unless the task is open, and a validation
    /// error when `chosen` never responded.
    pub fn select_executor(
        &mut self,
        actor: &ActorContext,
        chosen: &WalletAddress,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        actor.ensure_role_for(TaskAction::Select)?;
        self.ensure_creator(actor)?;
        self.ensure_status(TaskAction::Select, TaskStatus::Open)?;
        if !self.has_response_from(chosen) {
            return Err(TaskDomainError::NotARespondent {
                task_id: self.id,
                wallet: chosen.clone(),
            });
        }

        self.executor = Some(chosen.clone());
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Records the executor's deliverable.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the selected executor acts in
    /// the executor role and a state conflict unless work is in progress.
    pub fn submit_report(
        &mut self,
        actor: &ActorContext,
        report: ReportRef,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        actor.ensure_role_for(TaskAction::SubmitReport)?;
        self.ensure_executor(actor)?;
        self.ensure_status(TaskAction::SubmitReport, TaskStatus::InProgress)?;

        self.report_file = Some(report);
        self.status = TaskStatus::Submitted;
        self.touch(clock);
        Ok(())
    }

    /// Confirms the deliverable and completes the task.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the creator acts in the client
    /// role and a state conflict unless a report was submitted.
    pub fn confirm(
        &mut self,
        actor: &ActorContext,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        actor.ensure_role_for(TaskAction::Confirm)?;
        self.ensure_creator(actor)?;
        self.ensure_status(TaskAction::Confirm, TaskStatus::Submitted)?;

        self.status = TaskStatus::Completed;
        self.touch(clock);
        Ok(())
    }

    /// Rates the counterparty on a completed task.
    ///
    /// A client-role actor must be the creator and fills `client_rating`; an
    /// executor-role actor must be the executor and fills `executor_rating`.
    ///
    /// # Errors
    ///
    /// Returns an authorization error when the actor does not hold the
    /// relation for their role, and a state conflict when the task is not
    /// completed or the slot is already filled.
    pub fn rate(
        &mut self,
        actor: &ActorContext,
        rating: Rating,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let role = actor.role();
        match role {
            Role::Client => self.ensure_creator(actor)?,
            Role::Executor => self.ensure_executor(actor)?,
        }
        self.ensure_status(TaskAction::Rate, TaskStatus::Completed)?;

        let slot = match role {
            Role::Client => &mut self.client_rating,
            Role::Executor => &mut self.executor_rating,
        };
        if slot.is_some() {
            return Err(TaskDomainError::AlreadyRated {
                task_id: self.id,
                role,
            });
        }
        *slot = Some(rating);
        self.touch(clock);
        Ok(())
    }

    /// Appends a chat message from a participant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskParticipant`] when the sender is
    /// neither the creator nor the executor.
    pub fn post_message(
        &mut self,
        message: ChatMessage,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_participant(message.sender())?;
        self.chat.push(message);
        self.touch(clock);
        Ok(())
    }

    /// Checks that `wallet` may read or write the chat.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskParticipant`] for outsiders.
    pub fn ensure_participant(&self, wallet: &WalletAddress) -> Result<(), TaskDomainError> {
        if self.is_participant(wallet) {
            return Ok(());
        }
        Err(TaskDomainError::NotTaskParticipant {
            task_id: self.id,
            wallet: wallet.clone(),
        })
    }

    fn ensure_creator(&self, actor: &ActorContext) -> Result<(), TaskDomainError> {
        if actor.wallet() == &self.creator {
            return Ok(());
        }
        Err(TaskDomainError::NotTaskCreator {
            task_id: self.id,
            wallet: actor.wallet().clone(),
        })
    }

    fn ensure_executor(&self, actor: &ActorContext) -> Result<(), TaskDomainError> {
        if self.executor.as_ref() == Some(actor.wallet()) {
            return Ok(());
        }
        Err(TaskDomainError::NotTaskExecutor {
            task_id: self.id,
            wallet: actor.wallet().clone(),
        })
    }

    fn ensure_status(
        &self,
        action: TaskAction,
        expected: TaskStatus,
    ) -> Result<(), TaskDomainError> {
        if self.status == expected {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStatus {
            task_id: self.id,
            action,
            expected,
            actual: self.status,
        })
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl TryFrom<PersistedTaskData> for Task {
    type Error = TaskDomainError;

    fn try_from(value: PersistedTaskData) -> Result<Self, Self::Error> {
        Self::from_persisted(value)
    }
}

impl From<Task> for PersistedTaskData {
    fn from(task: Task) -> Self {
        let completed = task.completed();
        Self {
            id: task.id,
            listing: task.listing,
            creator: task.creator,
            executor: task.executor,
            status: task.status,
            responses: task.responses,
            chat: task.chat,
            report_file: task.report_file,
            completed,
            client_rating: task.client_rating,
            executor_rating: task.executor_rating,
            deposit_tx: task.deposit_tx,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

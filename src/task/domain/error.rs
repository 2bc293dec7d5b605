//! Error types for task domain validation, authorization, and state checks.

use super::{Role, TaskAction, TaskId, TaskStatus, WalletAddress};
use thiserror::Error;

/// Broad category of a rejected task operation.
///
/// `StateConflict` signals that the caller's view of the task was stale and
/// must stay distinguishable from `Validation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Malformed input: empty fields, non-positive amount, rating out of range.
    Validation,
    /// The actor lacks the role or relation required by the operation.
    Authorization,
    /// The task's current state does not admit the operation.
    StateConflict,
}

/// Errors returned while constructing task values or applying transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The wallet address is empty or contains whitespace.
    #[error("invalid wallet address '{0}'")]
    InvalidWalletAddress(String),

    /// The escrow receipt token is blank.
    #[error("deposit receipt must not be empty")]
    EmptyDepositReceipt,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The amount is zero, negative, or not a decimal number.
    #[error("invalid amount '{0}', expected a positive decimal with at most nine fractional digits")]
    InvalidAmount(String),

    /// The deadline tag is not recognised.
    #[error("unknown deadline '{0}'")]
    InvalidDeadline(String),

    /// The role name is not recognised.
    #[error("unknown role '{0}'")]
    InvalidRole(String),

    /// The response message is empty after trimming.
    #[error("response message must not be empty")]
    EmptyResponseMessage,

    /// The chat message is empty after trimming.
    #[error("chat message must not be empty")]
    EmptyChatMessage,

    /// The chat message exceeds the configured length.
    #[error("chat message exceeds {max} characters")]
    ChatMessageTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The report reference is empty after trimming.
    #[error("report reference must not be empty")]
    EmptyReportRef,

    /// The rating is outside `1..=5`.
    #[error("rating {0} is out of range, expected 1 to 5")]
    RatingOutOfRange(i64),

    /// The chosen wallet never responded to the task.
    #[error("wallet {wallet} has not responded to task {task_id}")]
    NotARespondent {
        /// Task identifier.
        task_id: TaskId,
        /// Wallet that was chosen.
        wallet: WalletAddress,
    },

    /// A stored task record breaks a lifecycle invariant.
    #[error("stored task {task_id} is inconsistent: {reason}")]
    InconsistentRecord {
        /// Task identifier.
        task_id: TaskId,
        /// Violated invariant.
        reason: &'static str,
    },

    /// No wallet identity is available for the session.
    #[error("no wallet identity is connected")]
    MissingIdentity,

    /// The actor's session role may not perform the action.
    #[error("role {role} may not {action}")]
    RoleNotPermitted {
        /// Attempted action.
        action: TaskAction,
        /// Role the actor is operating in.
        role: Role,
    },

    /// Only the task creator may perform the action.
    #[error("wallet {wallet} is not the creator of task {task_id}")]
    NotTaskCreator {
        /// Task identifier.
        task_id: TaskId,
        /// Wallet that attempted the action.
        wallet: WalletAddress,
    },

    /// Only the selected executor may perform the action.
    #[error("wallet {wallet} is not the executor of task {task_id}")]
    NotTaskExecutor {
        /// Task identifier.
        task_id: TaskId,
        /// Wallet that attempted the action.
        wallet: WalletAddress,
    },

    /// The creator tried to respond to their own task.
    #[error("the creator of task {0} cannot respond to it")]
    CreatorCannotRespond(TaskId),

    /// The wallet is neither the creator nor the executor of the task.
    #[error("wallet {wallet} does not participate in task {task_id}")]
    NotTaskParticipant {
        /// Task identifier.
        task_id: TaskId,
        /// Wallet that attempted the action.
        wallet: WalletAddress,
    },

    /// The task is not in the status the action requires.
    #[error("cannot {action} task {task_id} in status {actual}, expected {expected}")]
    InvalidStatus {
        /// Task identifier.
        task_id: TaskId,
        /// Attempted action.
        action: TaskAction,
        /// Status the action requires.
        expected: TaskStatus,
        /// Status the task is currently in.
        actual: TaskStatus,
    },

    /// The wallet already responded to the task.
    #[error("wallet {wallet} already responded to task {task_id}")]
    DuplicateResponse {
        /// Task identifier.
        task_id: TaskId,
        /// Wallet that responded twice.
        wallet: WalletAddress,
    },

    /// The rater's rating slot is already filled.
    #[error("the {role} already rated task {task_id}")]
    AlreadyRated {
        /// Task identifier.
        task_id: TaskId,
        /// Role whose rating slot is filled.
        role: Role,
    },
}

impl TaskDomainError {
    /// Returns the rejection category for this error.
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidWalletAddress(_)
            | Self::EmptyDepositReceipt
            | Self::EmptyTitle
            | Self::EmptyDescription
            | Self::InvalidAmount(_)
            | Self::InvalidDeadline(_)
            | Self::InvalidRole(_)
            | Self::EmptyResponseMessage
            | Self::EmptyChatMessage
            | Self::ChatMessageTooLong { .. }
            | Self::EmptyReportRef
            | Self::RatingOutOfRange(_)
            | Self::NotARespondent { .. }
            | Self::InconsistentRecord { .. } => RejectionKind::Validation,
            Self::MissingIdentity
            | Self::RoleNotPermitted { .. }
            | Self::NotTaskCreator { .. }
            | Self::NotTaskExecutor { .. }
            | Self::CreatorCannotRespond(_)
            | Self::NotTaskParticipant { .. } => RejectionKind::Authorization,
            Self::InvalidStatus { .. }
            | Self::DuplicateResponse { .. }
            | Self::AlreadyRated { .. } => RejectionKind::StateConflict,
        }
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

//! Session roles, task actions, and the explicit actor context.

use super::{TaskDomainError, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a participant operates in during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Posts and pays for tasks.
    #[default]
    Client,
    /// Responds to and performs tasks.
    Executor,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Executor => "executor",
        }
    }

    /// Returns the counterparty role.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Client => Self::Executor,
            Self::Executor => Self::Client,
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "client" => Ok(Self::Client),
            "executor" => Ok(Self::Executor),
            _ => Err(TaskDomainError::InvalidRole(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations an actor can attempt against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Post a new funded task.
    Create,
    /// Express interest in an open task.
    Respond,
    /// Choose an executor among respondents.
    Select,
    /// Hand in the deliverable.
    SubmitReport,
    /// Accept the deliverable and release funds.
    Confirm,
    /// Rate the counterparty.
    Rate,
    /// Read or write the task chat.
    Chat,
}

impl TaskAction {
    /// Returns a lowercase verb phrase for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Respond => "respond to",
            Self::Select => "select an executor for",
            Self::SubmitReport => "submit a report for",
            Self::Confirm => "confirm",
            Self::Rate => "rate",
            Self::Chat => "chat on",
        }
    }

    /// Returns the session role required for the action, if any.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Create | Self::Select | Self::Confirm => Some(Role::Client),
            Self::Respond | Self::SubmitReport => Some(Role::Executor),
            Self::Rate | Self::Chat => None,
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity and role of the caller, passed explicitly into every operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorContext {
    wallet: WalletAddress,
    role: Role,
}

impl ActorContext {
    /// Creates an actor context.
    #[must_use]
    pub const fn new(wallet: WalletAddress, role: Role) -> Self {
        Self { wallet, role }
    }

    /// Shorthand for a client-role actor.
    #[must_use]
    pub const fn client(wallet: WalletAddress) -> Self {
        Self::new(wallet, Role::Client)
    }

    /// Shorthand for an executor-role actor.
    #[must_use]
    pub const fn executor(wallet: WalletAddress) -> Self {
        Self::new(wallet, Role::Executor)
    }

    /// Returns the actor's wallet.
    #[must_use]
    pub const fn wallet(&self) -> &WalletAddress {
        &self.wallet
    }

    /// Returns the actor's session role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Checks that the session role may perform `action`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RoleNotPermitted`] when the action is
    /// reserved for the other role.
    pub fn ensure_role_for(&self, action: TaskAction) -> Result<(), TaskDomainError> {
        match action.required_role() {
            Some(required) if required != self.role => Err(TaskDomainError::RoleNotPermitted {
                action,
                role: self.role,
            }),
            _ => Ok(()),
        }
    }
}

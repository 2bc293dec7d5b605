//! Append-only chat attached to a task.

use super::{TaskDomainError, WalletAddress, listing::non_empty};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A single chat entry.
///
/// Messages are ordered by insertion; the timestamp is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    sender: WalletAddress,
    message: String,
    timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a chat message stamped with the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChatMessage`] when the text is blank
    /// or [`TaskDomainError::ChatMessageTooLong`] when it exceeds
    /// `max_chars`.
    pub fn new(
        sender: WalletAddress,
        message: impl Into<String>,
        max_chars: usize,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let text = non_empty(message.into(), TaskDomainError::EmptyChatMessage)?;
        if text.chars().count() > max_chars {
            return Err(TaskDomainError::ChatMessageTooLong { max: max_chars });
        }
        Ok(Self {
            sender,
            message: text,
            timestamp: clock.utc(),
        })
    }

    /// Returns the sender's wallet.
    #[must_use]
    pub const fn sender(&self) -> &WalletAddress {
        &self.sender
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the message was appended.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

//! Executor responses and deliverable references.

use super::{TaskDomainError, WalletAddress, listing::non_empty};
use serde::{Deserialize, Serialize};

/// An executor's expression of interest in an open task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    wallet: WalletAddress,
    message: String,
}

impl Response {
    /// Creates a response with a trimmed, non-empty message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyResponseMessage`] when the message is
    /// blank.
    pub fn new(wallet: WalletAddress, message: impl Into<String>) -> Result<Self, TaskDomainError> {
        let text = non_empty(message.into(), TaskDomainError::EmptyResponseMessage)?;
        Ok(Self {
            wallet,
            message: text,
        })
    }

    /// Returns the responding wallet.
    #[must_use]
    pub const fn wallet(&self) -> &WalletAddress {
        &self.wallet
    }

    /// Returns the response message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reference to the deliverable handed in by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportRef(String);

impl ReportRef {
    /// Creates a report reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyReportRef`] when the reference is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        non_empty(value.into(), TaskDomainError::EmptyReportRef).map(Self)
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReportRef {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReportRef> for String {
    fn from(value: ReportRef) -> Self {
        value.0
    }
}

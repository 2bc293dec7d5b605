//! Escrow port used to fund tasks before they are posted.

use crate::task::domain::{Amount, DepositReceipt, WalletAddress};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for escrow operations.
pub type EscrowResult<T> = Result<T, EscrowError>;

/// Deposit instruction sent to the escrow network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRequest {
    /// Amount to lock, in nano-units.
    pub amount: Amount,
    /// Escrow custodian address.
    pub destination: WalletAddress,
    /// Wallet paying the deposit.
    pub payer: WalletAddress,
    /// How long the instruction stays valid.
    pub timeout: Duration,
}

/// Escrow network contract.
///
/// The returned receipt is recorded as an opaque token; on-chain settlement
/// is never verified by callers.
#[async_trait]
pub trait EscrowClient: Send + Sync {
    /// Locks `request.amount` at `request.destination`.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError`] when the deposit is refused or fails.
    async fn deposit(&self, request: &DepositRequest) -> EscrowResult<DepositReceipt>;
}

/// Errors returned by escrow adapters.
#[derive(Debug, Clone, Error)]
pub enum EscrowError {
    /// The escrow network or wallet refused the deposit.
    #[error("escrow deposit rejected: {reason}")]
    Rejected {
        /// Reason reported by the network.
        reason: String,
    },

    /// The deposit did not complete within the allowed time.
    #[error("escrow deposit timed out after {0:?}")]
    TimedOut(Duration),

    /// Transport or runtime failure.
    #[error("escrow transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl EscrowError {
    /// Creates a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

//! In-memory escrow adapter for tests and local flows.

use crate::task::{
    domain::DepositReceipt,
    ports::{DepositRequest, EscrowClient, EscrowError, EscrowResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// How the in-memory escrow answers deposit requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EscrowBehaviour {
    /// Accept every deposit and issue a receipt.
    #[default]
    Accept,
    /// Refuse every deposit with the given reason.
    Reject(String),
    /// Never answer, leaving the caller to time out.
    Stall,
}

/// In-memory escrow that records accepted deposits.
///
/// Receipts are issued sequentially as `escrow-receipt-<n>`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEscrowClient {
    state: Arc<RwLock<EscrowState>>,
}

#[derive(Debug, Default)]
struct EscrowState {
    behaviour: EscrowBehaviour,
    deposits: Vec<(DepositRequest, DepositReceipt)>,
}

impl InMemoryEscrowClient {
    /// Creates an escrow that accepts every deposit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an escrow with the given behaviour.
    #[must_use]
    pub fn with_behaviour(behaviour: EscrowBehaviour) -> Self {
        let escrow = Self::default();
        escrow.set_behaviour(behaviour);
        escrow
    }

    /// Changes how subsequent deposits are answered.
    pub fn set_behaviour(&self, behaviour: EscrowBehaviour) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.behaviour = behaviour;
    }

    /// Returns accepted deposits with their receipts, oldest first.
    #[must_use]
    pub fn deposits(&self) -> Vec<(DepositRequest, DepositReceipt)> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .deposits
            .clone()
    }

    fn answer(&self, request: &DepositRequest) -> EscrowResult<Option<DepositReceipt>> {
        let mut state = self
            .state
            .write()
            .map_err(|err| EscrowError::transport(std::io::Error::other(err.to_string())))?;
        match state.behaviour.clone() {
            EscrowBehaviour::Accept => {
                let sequence = state.deposits.len().saturating_add(1);
                let receipt = DepositReceipt::new(format!("escrow-receipt-{sequence}"))
                    .map_err(EscrowError::transport)?;
                state.deposits.push((request.clone(), receipt.clone()));
                Ok(Some(receipt))
            }
            EscrowBehaviour::Reject(reason) => Err(EscrowError::rejected(reason)),
            EscrowBehaviour::Stall => Ok(None),
        }
    }
}

#[async_trait]
impl EscrowClient for InMemoryEscrowClient {
    async fn deposit(&self, request: &DepositRequest) -> EscrowResult<DepositReceipt> {
        match self.answer(request)? {
            Some(receipt) => Ok(receipt),
            None => std::future::pending().await,
        }
    }
}

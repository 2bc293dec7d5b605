//! Session identity held in memory.

use crate::task::{
    domain::{Role, WalletAddress},
    ports::IdentityProvider,
};
use std::sync::{PoisonError, RwLock};

/// Identity provider whose wallet and role are set by the caller.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    wallet: RwLock<Option<WalletAddress>>,
    role: RwLock<Role>,
}

impl StaticIdentityProvider {
    /// Creates a provider with no connected wallet in the client role.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with `wallet` connected in `role`.
    #[must_use]
    pub fn connected(wallet: WalletAddress, role: Role) -> Self {
        Self {
            wallet: RwLock::new(Some(wallet)),
            role: RwLock::new(role),
        }
    }

    /// Connects `wallet`, replacing any previous one.
    pub fn connect(&self, wallet: WalletAddress) {
        *self.wallet.write().unwrap_or_else(PoisonError::into_inner) = Some(wallet);
    }

    /// Disconnects the wallet and resets the role to client.
    pub fn disconnect(&self) {
        *self.wallet.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.role.write().unwrap_or_else(PoisonError::into_inner) = Role::default();
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_identity(&self) -> Option<WalletAddress> {
        self.wallet
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn current_role(&self) -> Role {
        *self.role.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_role(&self, role: Role) {
        *self.role.write().unwrap_or_else(PoisonError::into_inner) = role;
    }
}

//! Identity port supplying the session wallet and role.

use crate::task::domain::{ActorContext, Role, TaskDomainError, WalletAddress};

/// Supplies the connected wallet and the caller-selected role.
///
/// Services never read this ambiently; callers resolve it into an
/// [`ActorContext`] once and pass that into each operation.
pub trait IdentityProvider: Send + Sync {
    /// Returns the connected wallet, if any.
    fn current_identity(&self) -> Option<WalletAddress>;

    /// Returns the role selected for the session.
    fn current_role(&self) -> Role;

    /// Switches the session role.
    fn set_role(&self, role: Role);
}

impl ActorContext {
    /// Snapshots the provider's current wallet and role.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingIdentity`] when no wallet is
    /// connected.
    pub fn from_provider<P>(provider: &P) -> Result<Self, TaskDomainError>
    where
        P: IdentityProvider + ?Sized,
    {
        let wallet = provider
            .current_identity()
            .ok_or(TaskDomainError::MissingIdentity)?;
        Ok(Self::new(wallet, provider.current_role()))
    }
}

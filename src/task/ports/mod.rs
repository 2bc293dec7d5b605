//! Port contracts for the task marketplace.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod escrow;
pub mod identity;
pub mod repository;
pub mod snapshot;

pub use escrow::{DepositRequest, EscrowClient, EscrowError, EscrowResult};
pub use identity::IdentityProvider;
pub use repository::{TaskMutation, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use snapshot::{SnapshotStoreError, SnapshotStoreResult, TaskSnapshotStore};

//! In-memory adapters for tests and single-process use.

mod escrow;
mod identity;
mod snapshot;
mod task;

pub use escrow::{EscrowBehaviour, InMemoryEscrowClient};
pub use identity::StaticIdentityProvider;
pub use snapshot::InMemorySnapshotStore;
pub use task::InMemoryTaskRepository;

//! Domain model for the escrowed task lifecycle.
//!
//! The task aggregate owns every lifecycle rule: which role may act, in which
//! status, and which invariants hold across responses, chat, and ratings.
//! Infrastructure concerns (storage, escrow, identity) stay outside this
//! boundary.

mod actor;
mod chat;
mod error;
mod ids;
mod listing;
mod rating;
mod response;
mod task;

pub use actor::{ActorContext, Role, TaskAction};
pub use chat::ChatMessage;
pub use error::{ParseTaskStatusError, RejectionKind, TaskDomainError};
pub use ids::{DepositReceipt, TaskId, WalletAddress};
pub use listing::{Amount, Deadline, TaskListing};
pub use rating::{AverageRating, Rating};
pub use response::{ReportRef, Response};
pub use task::{PersistedTaskData, Task, TaskStatus};

//! Application services for the task marketplace.

mod board;
mod chat;
mod lifecycle;
mod rating;

pub use board::TaskBoardService;
pub use chat::ChatService;
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use rating::{RatingAggregator, RatingSummary};

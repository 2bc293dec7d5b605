//! Per-identity rating aggregation over completed tasks.

use crate::task::{
    domain::{AverageRating, Role, Task, WalletAddress},
    ports::{TaskRepository, TaskRepositoryResult},
};
use std::fmt;
use std::sync::Arc;

/// Ratings an identity received while acting in one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingSummary {
    role: Role,
    average: Option<AverageRating>,
    count: usize,
}

impl RatingSummary {
    /// Aggregates the ratings `wallet` received in `role` across `tasks`.
    ///
    /// Only completed tasks where `wallet` holds the `role` side count, and
    /// only ratings actually given by the counterparty; missing ratings are
    /// skipped rather than treated as zero.
    #[must_use]
    pub fn from_tasks<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        wallet: &WalletAddress,
        role: Role,
    ) -> Self {
        let ratings: Vec<_> = tasks
            .into_iter()
            .filter(|task| task.completed() && task.role_of(wallet) == Some(role))
            .filter_map(|task| task.rating_given_by(role.counterpart()))
            .collect();
        Self {
            role,
            average: AverageRating::from_ratings(ratings.iter().copied()),
            count: ratings.len(),
        }
    }

    /// Returns the role the ratings were received in.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the one-decimal average, or `None` when nothing was rated.
    #[must_use]
    pub const fn average(&self) -> Option<AverageRating> {
        self.average
    }

    /// Returns how many ratings contributed.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Displays the average, or `0` when there are no ratings.
impl fmt::Display for RatingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.average {
            Some(average) => write!(f, "{average}"),
            None => write!(f, "0"),
        }
    }
}

/// Derives ratings on demand from the Task Store.
#[derive(Clone)]
pub struct RatingAggregator<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> RatingAggregator<R>
where
    R: TaskRepository,
{
    /// Creates an aggregator reading from `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the rating `wallet` received while acting in `role`.
    ///
    /// # Errors
    ///
    /// Returns repository errors when the task list cannot be read.
    pub async fn rating_for(
        &self,
        wallet: &WalletAddress,
        role: Role,
    ) -> TaskRepositoryResult<RatingSummary> {
        let tasks = self.repository.list_all().await?;
        Ok(RatingSummary::from_tasks(&tasks, wallet, role))
    }
}

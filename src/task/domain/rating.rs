//! Rating values and their one-decimal average.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A counterparty rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RatingOutOfRange`] when the value is
    /// outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|score| (Self::MIN..=Self::MAX).contains(score))
            .map(Self)
            .ok_or(TaskDomainError::RatingOutOfRange(value))
    }

    /// Returns the numeric score.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = TaskDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arithmetic mean of ratings, rounded half-up to one decimal place.
///
/// Held in tenths so `4.5` is stored as `45`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AverageRating(u8);

impl AverageRating {
    /// Averages the given ratings, returning `None` when there are none.
    #[must_use]
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Option<Self> {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_u64, 0_u64), |(sum, count), rating| {
                (sum.saturating_add(u64::from(rating.value())), count.saturating_add(1))
            });
        // round(10 * sum / count) == floor((20 * sum + count) / (2 * count))
        let numerator = sum.checked_mul(20)?.checked_add(count)?;
        let tenths = numerator.checked_div(count.checked_mul(2)?)?;
        u8::try_from(tenths).ok().map(Self)
    }

    /// Returns the average in tenths.
    #[must_use]
    pub const fn tenths(self) -> u8 {
        self.0
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0.div_euclid(10), self.0.rem_euclid(10))
    }
}

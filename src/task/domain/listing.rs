//! Immutable listing details supplied by the client when posting a task.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nano-units per whole currency unit.
const NANO_PER_UNIT: u64 = 1_000_000_000;

/// Maximum number of fractional digits accepted by [`Amount::parse`].
const MAX_FRACTION_DIGITS: usize = 9;

/// Positive task reward held in escrow, stored in nano-units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    /// Creates an amount from nano-units.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAmount`] when the value is zero.
    pub fn from_nano(nano: u64) -> Result<Self, TaskDomainError> {
        if nano == 0 {
            return Err(TaskDomainError::InvalidAmount(nano.to_string()));
        }
        Ok(Self(nano))
    }

    /// Creates an amount from whole currency units.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAmount`] when the value is zero or
    /// does not fit in nano-units.
    pub fn from_units(units: u64) -> Result<Self, TaskDomainError> {
        let nano = units
            .checked_mul(NANO_PER_UNIT)
            .ok_or_else(|| TaskDomainError::InvalidAmount(units.to_string()))?;
        Self::from_nano(nano)
    }

    /// Parses a decimal amount such as `"5"` or `"0.25"`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidAmount`] for non-decimal input,
    /// more than nine fractional digits, overflow, or a zero value.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidAmount(value.to_owned());
        let trimmed = value.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(invalid());
        }

        let whole_units: u64 = whole.parse().map_err(|_| invalid())?;
        let padded = format!("{fraction:0<MAX_FRACTION_DIGITS$}");
        let fraction_nano: u64 = padded.parse().map_err(|_| invalid())?;

        let nano = whole_units
            .checked_mul(NANO_PER_UNIT)
            .and_then(|scaled| scaled.checked_add(fraction_nano))
            .ok_or_else(invalid)?;
        if nano == 0 {
            return Err(invalid());
        }
        Ok(Self(nano))
    }

    /// Returns the amount in nano-units.
    #[must_use]
    pub const fn nano(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = TaskDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_nano(value)
    }
}

impl From<Amount> for u64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.div_euclid(NANO_PER_UNIT);
        let fraction = self.0.rem_euclid(NANO_PER_UNIT);
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{fraction:0>MAX_FRACTION_DIGITS$}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Urgency category chosen when the task is posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    /// Needs attention right away.
    Urgent,
    /// Expected within days.
    ShortTerm,
    /// No immediate pressure.
    LongTerm,
}

impl Deadline {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }
}

impl TryFrom<&str> for Deadline {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "urgent" => Ok(Self::Urgent),
            "short_term" => Ok(Self::ShortTerm),
            "long_term" => Ok(Self::LongTerm),
            _ => Err(TaskDomainError::InvalidDeadline(value.to_owned())),
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated listing for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ListingRecord", into = "ListingRecord")]
pub struct TaskListing {
    title: String,
    description: String,
    amount: Amount,
    deadline: Deadline,
}

impl TaskListing {
    /// Creates a listing, trimming and validating the text fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] when either text is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        deadline: Deadline,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            title: non_empty(title.into(), TaskDomainError::EmptyTitle)?,
            description: non_empty(description.into(), TaskDomainError::EmptyDescription)?,
            amount,
            deadline,
        })
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the escrowed reward.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the urgency category.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }
}

/// Unvalidated storage shape of [`TaskListing`].
#[derive(Serialize, Deserialize)]
struct ListingRecord {
    title: String,
    description: String,
    amount: Amount,
    deadline: Deadline,
}

impl TryFrom<ListingRecord> for TaskListing {
    type Error = TaskDomainError;

    fn try_from(record: ListingRecord) -> Result<Self, Self::Error> {
        Self::new(record.title, record.description, record.amount, record.deadline)
    }
}

impl From<TaskListing> for ListingRecord {
    fn from(listing: TaskListing) -> Self {
        Self {
            title: listing.title,
            description: listing.description,
            amount: listing.amount,
            deadline: listing.deadline,
        }
    }
}

/// Trims `value` and returns it, or `error` when nothing is left.
pub(crate) fn non_empty(value: String, error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

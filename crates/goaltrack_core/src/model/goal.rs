//! Goal domain model.
//!
//! # Responsibility
//! - Hold a goal name and its ordered check-off history.
//! - Derive the completion percentage from that history.
//!
//! # Invariants
//! - `completion_dates` keeps insertion order; it is append-only in normal use.
//! - Repeated check-offs are never deduplicated.
//! - Percentage is only defined for a non-empty history and a positive span.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one goal entry inside a user's goal arena.
pub type GoalId = Uuid;

const NANOS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1_000_000_000.0;

/// Errors from completion percentage derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// No completion has been recorded yet.
    EmptyHistory,
    /// Evaluation time is not after the first recorded completion.
    NonPositiveSpan {
        first: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

impl Display for CompletionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyHistory => write!(f, "goal has no recorded completions"),
            Self::NonPositiveSpan { first, now } => write!(
                f,
                "evaluation time {} must be after first completion {}",
                now.to_rfc3339(),
                first.to_rfc3339()
            ),
        }
    }
}

impl Error for CompletionError {}

/// A named objective with a history of completion timestamps.
///
/// Serialized inline inside `GoalRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Display name. Not unique.
    pub name: String,
    /// Check-off history in insertion order.
    pub completion_dates: Vec<DateTime<Utc>>,
}

impl Goal {
    /// Creates a goal with an empty history.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_history(name, Vec::new())
    }

    /// Creates a goal with a caller-provided history. No validation.
    pub fn with_history(name: impl Into<String>, completion_dates: Vec<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            completion_dates,
        }
    }

    /// Appends one check-off timestamp.
    pub fn record_completion(&mut self, now: DateTime<Utc>) {
        self.completion_dates.push(now);
    }

    pub fn completion_count(&self) -> usize {
        self.completion_dates.len()
    }

    pub fn first_completion(&self) -> Option<DateTime<Utc>> {
        self.completion_dates.first().copied()
    }

    pub fn last_completion(&self) -> Option<DateTime<Utc>> {
        self.completion_dates.last().copied()
    }

    /// Completion percentage evaluated against the current wall clock.
    pub fn completion_percentage(&self) -> Result<f64, CompletionError> {
        self.completion_percentage_at(Utc::now())
    }

    /// Completion percentage evaluated at `now`.
    ///
    /// `count / elapsed_days * 100`, where `elapsed_days` is the fractional
    /// number of days between the first completion and `now`. The span is
    /// not rounded to whole days, so the result can exceed 100.
    ///
    /// # Errors
    /// - `EmptyHistory` when nothing has been recorded.
    /// - `NonPositiveSpan` when `now` is not after the first completion.
    pub fn completion_percentage_at(&self, now: DateTime<Utc>) -> Result<f64, CompletionError> {
        let first = self
            .first_completion()
            .ok_or(CompletionError::EmptyHistory)?;

        if now <= first {
            return Err(CompletionError::NonPositiveSpan { first, now });
        }

        let total_days = elapsed_nanos(now - first) / NANOS_PER_DAY;
        Ok(self.completion_count() as f64 / total_days * 100.0)
    }
}

// Why: nanosecond count overflows i64 past ~292 years; coarser units keep the
// ratio usable for far-apart timestamps.
fn elapsed_nanos(span: TimeDelta) -> f64 {
    if let Some(nanos) = span.num_nanoseconds() {
        nanos as f64
    } else if let Some(micros) = span.num_microseconds() {
        micros as f64 * 1_000.0
    } else {
        span.num_milliseconds() as f64 * 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionError, Goal};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn record_completion_appends_without_dedup() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 7, 0, 0).unwrap();
        let mut goal = Goal::new("Stretch");

        goal.record_completion(at);
        goal.record_completion(at);

        assert_eq!(goal.completion_count(), 2);
        assert_eq!(goal.first_completion(), Some(at));
        assert_eq!(goal.last_completion(), Some(at));
    }

    #[test]
    fn sub_day_span_can_exceed_one_hundred() {
        let first = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let goal = Goal::with_history("Read", vec![first, first + Duration::hours(1)]);

        let percentage = goal
            .completion_percentage_at(first + Duration::hours(12))
            .unwrap();
        assert!((percentage - 400.0).abs() < 1e-9);
    }

    #[test]
    fn sub_millisecond_span_is_still_positive() {
        let first = Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap();
        let goal = Goal::with_history("Run", vec![first]);

        let percentage = goal
            .completion_percentage_at(first + Duration::microseconds(700))
            .unwrap();
        let expected_days = 700.0 / (24.0 * 60.0 * 60.0 * 1_000_000.0);
        let expected = 1.0 / expected_days * 100.0;
        assert!(((percentage - expected) / expected).abs() < 1e-9);
    }

    #[test]
    fn percentage_at_first_completion_is_rejected() {
        let first = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let goal = Goal::with_history("Read", vec![first]);

        let err = goal.completion_percentage_at(first).unwrap_err();
        assert_eq!(err, CompletionError::NonPositiveSpan { first, now: first });
    }
}

//! # Quadrant Classification
//!
//! The Eisenhower-matrix classification rule and the deadline arithmetic that
//! feeds it. Classification itself is a pure function of two booleans; the
//! urgency signal is derived from the deadline immediately before each
//! classification and never cached, so the same task can classify differently
//! at different times.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A deadline within this many days (inclusive) makes a task urgent.
pub const URGENCY_WINDOW_DAYS: i64 = 3;

const SECONDS_PER_DAY: i64 = 86_400;

/// Eisenhower-matrix bucket for a task.
///
/// - `Q1`: urgent and important
/// - `Q2`: important, not urgent
/// - `Q3`: urgent, not important
/// - `Q4`: neither
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    /// All quadrants in display order.
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Apply the classification rule. Total: every (important, urgent) pair
    /// maps to exactly one quadrant.
    pub fn classify(important: bool, urgent: bool) -> Self {
        match (important, urgent) {
            (true, true) => Quadrant::Q1,
            (true, false) => Quadrant::Q2,
            (false, true) => Quadrant::Q3,
            (false, false) => Quadrant::Q4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Q1 => "Q1",
            Quadrant::Q2 => "Q2",
            Quadrant::Q3 => "Q3",
            Quadrant::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected quadrant label, carrying the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quadrant '{0}' (expected one of Q1, Q2, Q3, Q4)")]
pub struct InvalidQuadrant(pub String);

impl FromStr for Quadrant {
    type Err = InvalidQuadrant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Q1" => Ok(Quadrant::Q1),
            "Q2" => Ok(Quadrant::Q2),
            "Q3" => Ok(Quadrant::Q3),
            "Q4" => Ok(Quadrant::Q4),
            other => Err(InvalidQuadrant(other.to_string())),
        }
    }
}

/// Deadline-derived urgency signal: within `URGENCY_WINDOW_DAYS` of `now`
/// (boundary inclusive). Overdue deadlines are urgent. Both timestamps are
/// UTC; callers evaluate this fresh right before classifying.
pub fn is_urgent(deadline_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    deadline_at.signed_duration_since(now) <= Duration::days(URGENCY_WINDOW_DAYS)
}

/// Whole days remaining until the deadline, floored.
///
/// Floors rather than truncates so partial overdue days round down:
/// 36 hours overdue reports -2, 36 hours ahead reports 1.
pub fn days_remaining(deadline_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    deadline_at
        .signed_duration_since(now)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

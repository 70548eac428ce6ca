//! # Task Model
//!
//! The task record plus the payload types that create and mutate it.
//!
//! ## Overview
//!
//! `Task` is the stored record: identity, content fields, the derived
//! quadrant, and lifecycle timestamps. `TaskDraft` is the create payload,
//! `TaskPatch` the partial-update payload; both validate the same field
//! constraints before a store ever sees them. Construction and patching run
//! the quadrant classifier here so every backend stores a consistent
//! quadrant, no matter which surface performed the mutation.
//!
//! ## Field constraints
//!
//! - `title`: required, 3-100 characters after trimming
//! - `description`: optional, at most 500 characters
//! - `is_important` and `deadline_at`: required at creation
//!
//! Lengths are counted in characters, not bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::quadrant::{self, Quadrant};

/// Minimum title length in characters, after trimming.
pub const TITLE_MIN_CHARS: usize = 3;
/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A stored task.
///
/// `quadrant` is derived state: it reflects the classification rule applied
/// at the last create or classification-relevant update. `completed_at` is
/// present exactly when `completed` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_important: bool,
    pub deadline_at: DateTime<Utc>,
    pub quadrant: Quadrant,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

impl Task {
    /// Build a task from a validated draft, classifying it against `now`.
    pub fn from_draft(id: i64, owner_id: i64, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        let quadrant = Quadrant::classify(
            draft.is_important,
            quadrant::is_urgent(draft.deadline_at, now),
        );
        Task {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            is_important: draft.is_important,
            deadline_at: draft.deadline_at,
            quadrant,
            completed: false,
            created_at: now,
            completed_at: None,
            owner_id,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}

/// Completion state used by the status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Pending,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected status label, carrying the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{0}' (expected 'completed' or 'pending')")]
pub struct InvalidStatus(pub String);

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TaskStatus::Completed),
            "pending" => Ok(TaskStatus::Pending),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Create payload: everything the caller supplies for a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub is_important: bool,
    pub deadline_at: DateTime<Utc>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// Partial-update payload: only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_important: Option<bool>,
    pub deadline_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// Whether this patch touches an input of the classification rule.
    /// Stores recompute the quadrant exactly when this is true.
    pub fn touches_classification(&self) -> bool {
        self.is_important.is_some() || self.deadline_at.is_some()
    }

    /// Apply the present fields to a task. Classification is the caller's
    /// responsibility (see [`TaskPatch::touches_classification`]).
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(is_important) = self.is_important {
            task.is_important = is_important;
        }
        if let Some(deadline_at) = self.deadline_at {
            task.deadline_at = deadline_at;
        }
    }
}

/// Echo returned by delete: the removed task's identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedTask {
    pub id: i64,
    pub title: String,
}

/// Field constraint violation on a create or update payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must be {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} characters, got {0}")]
    TitleLength(usize),
    #[error("description must be at most {DESCRIPTION_MAX_CHARS} characters, got {0}")]
    DescriptionLength(usize),
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let chars = title.trim().chars().count();
    if chars < TITLE_MIN_CHARS || chars > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleLength(chars));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let chars = description.chars().count();
    if chars > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionLength(chars));
    }
    Ok(())
}

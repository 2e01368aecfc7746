//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, service and sync layers.
//! - Provide identity/content equality semantics used by list diffing.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-blank on every persisted record.
//! - Two records with the same `id` are the same logical task even when other
//!   fields differ.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Task urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// The nil UUID is reserved and never a valid task identity.
    NilId,
    /// Title is empty or whitespace-only.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be the nil uuid"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Identity equality is judged solely by `id`; content equality requires all
/// observable fields (`title`, `description`, `priority`) to match as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for diff identity and store lookups.
    pub id: TaskId,
    /// Short human-readable summary. Must be non-blank.
    pub title: String,
    /// Free-form details. May be empty.
    pub description: String,
    /// Urgency level used by priority sorts.
    pub priority: Priority,
}

impl Task {
    /// Creates a task with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            priority,
        }
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by restore/undo paths where identity already exists.
    ///
    /// # Errors
    /// - Rejects the nil UUID; every other validation is deferred to
    ///   [`Task::validate`] on write paths.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, TaskValidationError> {
        if id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            priority,
        })
    }

    /// Checks model invariants enforced on every write path.
    ///
    /// # Errors
    /// - [`TaskValidationError::NilId`] for the nil UUID.
    /// - [`TaskValidationError::BlankTitle`] for empty/whitespace titles.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Returns whether `other` is the same logical task.
    pub fn same_identity(&self, other: &Task) -> bool {
        self.id == other.id
    }

    /// Returns whether `other` is fully identical in all observable fields.
    pub fn same_content(&self, other: &Task) -> bool {
        self == other
    }
}

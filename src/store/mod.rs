//! # Task Store
//!
//! The repository owning the task collection. [`TaskStore`] is the seam
//! between the HTTP surface and storage: one backend is constructed at
//! startup and injected into handlers through application state, so there is
//! no module-level mutable state anywhere.
//!
//! Two backends exist. [`MemoryStore`] keeps everything behind a
//! `parking_lot::RwLock` and is the development default and the test
//! backend. [`PgStore`] persists to PostgreSQL through sqlx runtime queries.
//!
//! Every task operation takes the resolved [`Caller`] and applies the one
//! visibility predicate: admins operate on all tasks, regular users only on
//! tasks they own. Inputs arrive already parsed and validated (quadrant and
//! status labels, payload constraints, search-query length are rejected at
//! the web boundary), so backends only deal in domain types.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::access::Caller;
use crate::models::{DeletedTask, Task, TaskDraft, TaskPatch, TaskStatus, User, UserSummary};
use crate::quadrant::Quadrant;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage-level failure. Validation and authentication failures never reach
/// this type; they are rejected at the web boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The task does not exist, or the caller may not see it. Callers
    /// cannot tell the two cases apart.
    #[error("task not found")]
    NotFound,

    #[error("database operation failed: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row holds a value the domain cannot represent (for example
    /// an unknown quadrant label).
    #[error("failed to decode stored row: {0}")]
    Decode(String),
}

/// Repository of tasks and users, scoped per call to the caller's
/// visibility set.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All visible tasks in creation (id) order. Empty is success.
    async fn list_tasks(&self, caller: &Caller) -> Result<Vec<Task>, StoreError>;

    /// One task by id; `NotFound` if absent or not visible.
    async fn get_task(&self, caller: &Caller, id: i64) -> Result<Task, StoreError>;

    /// Visible tasks whose stored quadrant matches.
    async fn tasks_by_quadrant(
        &self,
        caller: &Caller,
        quadrant: Quadrant,
    ) -> Result<Vec<Task>, StoreError>;

    /// Visible tasks filtered by completion status.
    async fn tasks_by_status(
        &self,
        caller: &Caller,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError>;

    /// Visible tasks whose deadline falls inside the current UTC day.
    async fn tasks_due_today(&self, caller: &Caller) -> Result<Vec<Task>, StoreError>;

    /// Case-insensitive substring match against title or description.
    /// The query arrives trimmed and at least two characters long.
    async fn search_tasks(&self, caller: &Caller, query: &str) -> Result<Vec<Task>, StoreError>;

    /// Store a new task: next monotonic id, `created_at = now`, quadrant
    /// classified against the draft, ownership assigned to the caller.
    async fn create_task(&self, caller: &Caller, draft: TaskDraft) -> Result<Task, StoreError>;

    /// Apply the present patch fields; reclassify iff the patch touches
    /// importance or deadline. `NotFound` if absent or not visible.
    async fn update_task(
        &self,
        caller: &Caller,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Task, StoreError>;

    /// One-way completion transition. The first call sets `completed_at`;
    /// repeat calls are no-ops that return the task unchanged.
    async fn complete_task(&self, caller: &Caller, id: i64) -> Result<Task, StoreError>;

    /// Permanent removal. The id is never reassigned.
    async fn delete_task(&self, caller: &Caller, id: i64) -> Result<DeletedTask, StoreError>;

    /// Resolve a bearer credential to its user, if any.
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// All users with their owned-task counts, ordered by id. Users owning
    /// zero tasks appear with a zero count.
    async fn list_users_with_counts(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Storage connectivity probe for the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}

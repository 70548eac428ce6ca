pub mod task;
pub mod user;

// Re-export core models for easy access
pub use task::{DeletedTask, Task, TaskDraft, TaskPatch, TaskStatus, ValidationError};
pub use user::{Role, User, UserSummary};

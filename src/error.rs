use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskmatrixError {
    ConfigurationError(String),
    DatabaseError(String),
}

impl fmt::Display for TaskmatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskmatrixError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            TaskmatrixError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for TaskmatrixError {}

pub type Result<T> = std::result::Result<T, TaskmatrixError>;

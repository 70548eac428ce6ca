#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taskmatrix
//!
//! HTTP backend for Eisenhower-matrix task management. Tasks carry an
//! importance flag and a deadline; the service derives urgency from the
//! deadline and sorts every task into one of four quadrants:
//!
//! | | Urgent | Not urgent |
//! |---|---|---|
//! | **Important** | Q1 (do) | Q2 (plan) |
//! | **Not important** | Q3 (delegate) | Q4 (drop) |
//!
//! Urgency is never stored: a task is urgent while its deadline lies within
//! the next three days, evaluated fresh at classification time.
//!
//! ## Module Organization
//!
//! - [`quadrant`] - Classification rules and deadline arithmetic
//! - [`models`] - Task and user records, drafts, patches, validation
//! - [`store`] - The [`TaskStore`](store::TaskStore) trait with in-memory
//!   and PostgreSQL backends
//! - [`stats`] - Aggregate counts and the deadline report
//! - [`access`] - Caller identity and the ownership visibility gate
//! - [`web`] - Axum routes, handlers, middleware, and error mapping
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskmatrix::config::AppConfig;
//! use taskmatrix::web::{create_app, AppState};
//!
//! # tokio_test::block_on(async {
//! let config = AppConfig::from_env()?;
//! let state = AppState::build(config).await?;
//! let app = create_app(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```
//!
//! ## Testing
//!
//! Everything runs against the in-memory store, so the suite needs no
//! database:
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, including the HTTP suite
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod quadrant;
pub mod stats;
pub mod store;
pub mod web;

pub use access::Caller;
pub use config::{AppConfig, StorageBackend};
pub use error::{Result, TaskmatrixError};
pub use models::{DeletedTask, Task, TaskDraft, TaskPatch, TaskStatus};
pub use quadrant::Quadrant;
pub use store::{MemoryStore, PgStore, TaskStore};
pub use web::AppState;

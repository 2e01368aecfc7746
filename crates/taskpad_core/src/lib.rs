//! Core domain logic for taskpad.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Priority, Task, TaskId, TaskValidationError};
pub use repo::task_repo::{
    like_pattern, RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskOrdering,
    TaskRepository,
};
pub use service::task_service::{
    verify_form_input, SnapshotListener, TaskService, TaskView,
};
pub use sync::list_sync::{
    apply, synchronize, PatchOp, PresentationSurface, SyncError, SyncResult,
};
pub use sync::pipeline::{SnapshotPipeline, SubmitOutcome, VecSurface};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

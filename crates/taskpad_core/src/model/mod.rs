//! Domain model for task records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Pin down the identity/content equality rules the sync layer relies on.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Validation failures are surfaced, never silently repaired.

pub mod task;

//! List synchronization between store snapshots and a display surface.
//!
//! # Responsibility
//! - Compute minimal insert/remove/update patches over stable task identity.
//! - Serialize patch application so cycles never interleave.

pub mod list_sync;
pub mod pipeline;

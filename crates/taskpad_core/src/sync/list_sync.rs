//! Incremental list synchronization between task snapshots.
//!
//! # Responsibility
//! - Compute a minimal insert/remove/update patch turning one ordered snapshot
//!   into another, keyed by stable task identity.
//! - Apply a patch against a presentation surface, one callback per operation.
//!
//! # Invariants
//! - Identity equality is judged solely by `Task::id`; content equality
//!   requires every observable field to match.
//! - A matched pair with changed content yields exactly one update, never a
//!   remove+insert.
//! - Emitted operation indices are valid against the surface state after all
//!   preceding operations have been applied.
//! - Duplicate ids within one snapshot are a caller error and are rejected.

use crate::model::task::{Task, TaskId};
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Synchronization failure: ambiguous identity within one input snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    DuplicateId { id: TaskId },
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { id } => {
                write!(f, "duplicate task id within one snapshot: {id}")
            }
        }
    }
}

impl Error for SyncError {}

/// One step of a computed patch, applied against an ordered, indexable
/// structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOp {
    InsertAt { index: usize, task: Task },
    RemoveAt { index: usize },
    UpdateAt { index: usize, task: Task },
}

/// Display-layer contract driven by [`apply`].
///
/// Implementations own an ordered indexable row structure; each callback is
/// invoked once per patch operation, in patch order, on the thread that owns
/// the surface.
pub trait PresentationSurface {
    fn insert_at(&mut self, index: usize, task: Task);
    fn remove_at(&mut self, index: usize);
    fn update_at(&mut self, index: usize, task: Task);
    fn current_count(&self) -> usize;
}

/// Edit-script step over identity equality, prior to index assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Keep { old_idx: usize, new_idx: usize },
    Remove { old_idx: usize },
    Insert { new_idx: usize },
}

/// Computes the patch transforming `old` into `new`.
///
/// The insert/remove set is minimal under identity equality (its size is
/// `|old| + |new| - 2 * LCS`); every identity match whose content changed
/// contributes one `UpdateAt` at the pair's final index.
///
/// # Errors
/// - [`SyncError::DuplicateId`] when either snapshot contains two entries
///   sharing the same id. Silent first-match resolution would hide a caller
///   bug, so the ambiguity is surfaced instead.
pub fn synchronize(old: &[Task], new: &[Task]) -> SyncResult<Vec<PatchOp>> {
    ensure_unique_ids(old)?;
    ensure_unique_ids(new)?;

    let script = compute_edit_script(old, new);

    // Assign application-time indices in one forward pass. While walking the
    // script, the surface holds the already-final prefix `new[..cur]` followed
    // by the untouched old suffix, so every operation lands at `cur`.
    let mut ops = Vec::new();
    let mut cur = 0usize;
    for step in script {
        match step {
            EditOp::Remove { .. } => {
                ops.push(PatchOp::RemoveAt { index: cur });
            }
            EditOp::Insert { new_idx } => {
                ops.push(PatchOp::InsertAt {
                    index: cur,
                    task: new[new_idx].clone(),
                });
                cur += 1;
            }
            EditOp::Keep { old_idx, new_idx } => {
                if !old[old_idx].same_content(&new[new_idx]) {
                    ops.push(PatchOp::UpdateAt {
                        index: cur,
                        task: new[new_idx].clone(),
                    });
                }
                cur += 1;
            }
        }
    }

    Ok(ops)
}

/// Applies a computed patch to the surface, one callback per operation.
///
/// After application the surface's element order and content equal the `new`
/// snapshot the patch was computed from. No other observable effects.
pub fn apply(ops: &[PatchOp], surface: &mut dyn PresentationSurface) {
    let before = surface.current_count();

    for op in ops {
        match op {
            PatchOp::InsertAt { index, task } => surface.insert_at(*index, task.clone()),
            PatchOp::RemoveAt { index } => surface.remove_at(*index),
            PatchOp::UpdateAt { index, task } => surface.update_at(*index, task.clone()),
        }
    }

    debug!(
        "event=list_apply module=sync status=ok ops={} rows_before={} rows_after={}",
        ops.len(),
        before,
        surface.current_count()
    );
}

fn ensure_unique_ids(tasks: &[Task]) -> SyncResult<()> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(SyncError::DuplicateId { id: task.id });
        }
    }
    Ok(())
}

/// LCS-based edit script over identity equality.
///
/// Standard dynamic-programming table plus backtrack; the backtrack emits
/// steps from the tail, so the result is reversed before index assignment.
fn compute_edit_script(old: &[Task], new: &[Task]) -> Vec<EditOp> {
    let old_len = old.len();
    let new_len = new.len();

    let mut dp = vec![vec![0u32; new_len + 1]; old_len + 1];
    for (i, old_task) in old.iter().enumerate() {
        for (j, new_task) in new.iter().enumerate() {
            dp[i + 1][j + 1] = if old_task.same_identity(new_task) {
                dp[i][j] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut script = Vec::new();
    let mut i = old_len;
    let mut j = new_len;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1].same_identity(&new[j - 1]) {
            script.push(EditOp::Keep {
                old_idx: i - 1,
                new_idx: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            script.push(EditOp::Insert { new_idx: j - 1 });
            j -= 1;
        } else {
            script.push(EditOp::Remove { old_idx: i - 1 });
            i -= 1;
        }
    }
    script.reverse();
    script
}

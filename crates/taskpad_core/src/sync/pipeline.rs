//! Single-flight snapshot pipeline.
//!
//! # Responsibility
//! - Drive one synchronize+apply cycle per delivered snapshot.
//! - Guarantee cycles never overlap: snapshots arriving mid-cycle are queued,
//!   and queued snapshots coalesce so only the latest is applied.
//!
//! # Invariants
//! - The displayed snapshot is swapped only after a successful apply; a failed
//!   cycle leaves it untouched.
//! - Surface callbacks run under exclusive access; no interleaved index
//!   mutation is possible.
//! - No cancellation: a started cycle always runs to completion.

use crate::model::task::Task;
use crate::service::task_service::SnapshotListener;
use crate::sync::list_sync::{apply, synchronize, PresentationSurface, SyncError, SyncResult};
use log::{debug, error};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of one [`SnapshotPipeline::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The caller ran the cycle loop itself.
    Applied { cycles: usize, ops: usize },
    /// A cycle was already in flight; the snapshot was queued (latest wins)
    /// and will be applied by the in-flight caller.
    Queued,
}

struct PipelineState {
    displayed: Vec<Task>,
    pending: Option<Vec<Task>>,
    running: bool,
}

/// Serializes synchronize+apply cycles against one presentation surface.
///
/// Safe to call from whichever thread delivers store snapshots; the surface
/// and bookkeeping live behind mutexes, and the `running` flag hands queued
/// snapshots to the cycle already in flight instead of blocking on it.
pub struct SnapshotPipeline<S: PresentationSurface> {
    state: Mutex<PipelineState>,
    surface: Mutex<S>,
}

impl<S: PresentationSurface> SnapshotPipeline<S> {
    /// Creates a pipeline over an empty surface.
    pub fn new(surface: S) -> Self {
        Self {
            state: Mutex::new(PipelineState {
                displayed: Vec::new(),
                pending: None,
                running: false,
            }),
            surface: Mutex::new(surface),
        }
    }

    /// Submits one snapshot for display.
    ///
    /// Runs cycles until no queued snapshot remains, or returns
    /// [`SubmitOutcome::Queued`] when another submit is mid-cycle.
    ///
    /// # Errors
    /// - Propagates the first [`crate::sync::list_sync::SyncError`] seen
    ///   during the cycle loop; the displayed snapshot keeps its value from
    ///   before the failed cycle. Snapshots queued behind a rejected one are
    ///   still drained before the error is returned, so a caller that got
    ///   [`SubmitOutcome::Queued`] is never left waiting on a future submit.
    pub fn submit(&self, snapshot: Vec<Task>) -> SyncResult<SubmitOutcome> {
        {
            let mut state = lock(&self.state);
            // Latest wins: an unprocessed queued snapshot is superseded.
            state.pending = Some(snapshot);
            if state.running {
                debug!("event=snapshot_submit module=sync status=queued");
                return Ok(SubmitOutcome::Queued);
            }
            state.running = true;
        }

        let mut cycles = 0usize;
        let mut total_ops = 0usize;
        let mut first_err: Option<SyncError> = None;
        loop {
            let (displayed, next) = {
                let mut state = lock(&self.state);
                match state.pending.take() {
                    Some(next) => (state.displayed.clone(), next),
                    None => {
                        state.running = false;
                        break;
                    }
                }
            };

            let ops = match synchronize(&displayed, &next) {
                Ok(ops) => ops,
                Err(err) => {
                    // Keep draining: a snapshot queued behind the rejected
                    // one was promised in-flight application.
                    first_err.get_or_insert(err);
                    continue;
                }
            };

            {
                // The running flag guarantees this lock is uncontended by
                // other cycles; submitters only touch `state`.
                let mut surface = lock(&self.surface);
                apply(&ops, &mut *surface);
            }

            lock(&self.state).displayed = next;
            cycles += 1;
            total_ops += ops.len();
        }

        if let Some(err) = first_err {
            return Err(err);
        }

        debug!(
            "event=snapshot_submit module=sync status=ok cycles={cycles} ops={total_ops}"
        );
        Ok(SubmitOutcome::Applied {
            cycles,
            ops: total_ops,
        })
    }

    /// Returns a copy of the currently displayed snapshot.
    pub fn displayed(&self) -> Vec<Task> {
        lock(&self.state).displayed.clone()
    }

    /// Runs `f` against the surface under the pipeline's exclusive access.
    pub fn with_surface<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&lock(&self.surface))
    }
}

impl<S: PresentationSurface> SnapshotListener for SnapshotPipeline<S>
where
    S: Send,
{
    fn on_snapshot(&self, snapshot: Vec<Task>) {
        if let Err(err) = self.submit(snapshot) {
            error!("event=snapshot_submit module=sync status=error error={err}");
        }
    }
}

/// Plain ordered row buffer implementing [`PresentationSurface`].
///
/// Stands in for a display list in headless callers and tests.
#[derive(Debug, Default)]
pub struct VecSurface {
    rows: Vec<Task>,
}

impl VecSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Task] {
        &self.rows
    }
}

impl PresentationSurface for VecSurface {
    fn insert_at(&mut self, index: usize, task: Task) {
        self.rows.insert(index, task);
    }

    fn remove_at(&mut self, index: usize) {
        self.rows.remove(index);
    }

    fn update_at(&mut self, index: usize, task: Task) {
        self.rows[index] = task;
    }

    fn current_count(&self) -> usize {
        self.rows.len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Poison can only come from a panicking surface callback; recover the
    // guard instead of propagating the panic to every later caller.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

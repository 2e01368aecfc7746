//! Task use-case service and store change notifications.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Hold the active view query (full list, substring search, priority sort)
//!   and deliver a fresh ordered snapshot to subscribers after every store
//!   mutation or view change.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Every delivered snapshot is a complete re-query of the active view; the
//!   service never patches a previous snapshot in place.
//! - Listeners are notified synchronously, in registration order, on the
//!   mutating thread. Overlap control belongs to the snapshot pipeline.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{
    like_pattern, RepoError, RepoResult, TaskListQuery, TaskOrdering, TaskRepository,
};
use log::debug;
use std::sync::Arc;

/// Receiver of fresh ordered snapshots after each store mutation.
pub trait SnapshotListener: Send + Sync {
    fn on_snapshot(&self, snapshot: Vec<Task>);
}

/// Active view query deciding what each delivered snapshot contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskView {
    /// Full list in insertion order.
    #[default]
    All,
    /// Title substring match (`%text%` semantics), insertion order.
    Search(String),
    PriorityHighFirst,
    PriorityLowFirst,
}

/// Use-case service facade over the task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    view: TaskView,
    listeners: Vec<Arc<dyn SnapshotListener>>,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            view: TaskView::default(),
            listeners: Vec::new(),
        }
    }

    /// Registers one snapshot subscriber.
    pub fn subscribe(&mut self, listener: Arc<dyn SnapshotListener>) {
        self.listeners.push(listener);
    }

    /// Returns the active view query.
    pub fn current_view(&self) -> &TaskView {
        &self.view
    }

    /// Switches the active view and delivers the matching snapshot.
    pub fn set_view(&mut self, view: TaskView) -> RepoResult<Vec<Task>> {
        self.view = view;
        self.refresh()
    }

    /// Convenience for type-as-you-search input: narrows the view to a title
    /// substring match on `text`.
    pub fn search(&mut self, text: impl Into<String>) -> RepoResult<Vec<Task>> {
        self.set_view(TaskView::Search(text.into()))
    }

    /// Inserts a new task and delivers a fresh snapshot.
    pub fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        let id = self.repo.insert_task(task)?;
        self.refresh()?;
        Ok(id)
    }

    /// Updates an existing task and delivers a fresh snapshot.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.repo.update_task(task)?;
        self.refresh()?;
        Ok(())
    }

    /// Deletes one task and delivers a fresh snapshot.
    ///
    /// Returns the removed record so callers can offer undo via
    /// [`TaskService::restore_task`].
    pub fn delete_task(&self, id: TaskId) -> RepoResult<Task> {
        let task = self.repo.get_task(id)?.ok_or(RepoError::NotFound(id))?;
        self.repo.delete_task(id)?;
        self.refresh()?;
        Ok(task)
    }

    /// Re-inserts a previously deleted task with its original identity.
    pub fn restore_task(&self, task: &Task) -> RepoResult<TaskId> {
        let id = self.repo.insert_task(task)?;
        self.refresh()?;
        Ok(id)
    }

    /// Removes every task and delivers an empty (or re-queried) snapshot.
    ///
    /// Returns the number of removed rows.
    pub fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_tasks()?;
        self.refresh()?;
        Ok(removed)
    }

    /// Fetches one task by id without touching the active view.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Re-runs the active view query and notifies all subscribers.
    pub fn refresh(&self) -> RepoResult<Vec<Task>> {
        let snapshot = self.query_view()?;
        debug!(
            "event=snapshot_notify module=service status=ok rows={} listeners={}",
            snapshot.len(),
            self.listeners.len()
        );
        for listener in &self.listeners {
            listener.on_snapshot(snapshot.clone());
        }
        Ok(snapshot)
    }

    fn query_view(&self) -> RepoResult<Vec<Task>> {
        match &self.view {
            TaskView::All => self.repo.list_tasks(&TaskListQuery::default()),
            TaskView::Search(text) => self.repo.search_tasks(&like_pattern(text)),
            TaskView::PriorityHighFirst => self.repo.list_tasks(&TaskListQuery {
                order: TaskOrdering::PriorityHighFirst,
                ..TaskListQuery::default()
            }),
            TaskView::PriorityLowFirst => self.repo.list_tasks(&TaskListQuery {
                order: TaskOrdering::PriorityLowFirst,
                ..TaskListQuery::default()
            }),
        }
    }
}

/// Form-input verification for interactive entry paths.
///
/// Mirrors the upstream form contract: both fields must carry non-blank text
/// before a task may be created or updated from user input.
pub fn verify_form_input(title: &str, description: &str) -> bool {
    !(title.trim().is_empty() || description.trim().is_empty())
}

use std::sync::{Arc, Mutex};
use taskpad_core::db::open_db_in_memory;
use taskpad_core::{
    like_pattern, Priority, SnapshotListener, SqliteTaskRepository, Task, TaskRepository,
    TaskService, TaskView,
};

#[derive(Default)]
struct RecordingListener {
    snapshots: Mutex<Vec<Vec<Task>>>,
}

impl RecordingListener {
    fn last(&self) -> Vec<Task> {
        self.snapshots
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one snapshot delivered")
    }

    fn count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }
}

impl SnapshotListener for RecordingListener {
    fn on_snapshot(&self, snapshot: Vec<Task>) {
        self.snapshots.lock().unwrap().push(snapshot);
    }
}

#[test]
fn search_matches_title_substring() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let milk = Task::new("Buy milk", "", Priority::Low);
    let rent = Task::new("Pay rent", "", Priority::High);
    repo.insert_task(&milk).unwrap();
    repo.insert_task(&rent).unwrap();

    let hits = repo.search_tasks(&like_pattern("milk")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, milk.id);

    let middle = repo.search_tasks(&like_pattern("y re")).unwrap();
    assert_eq!(middle.len(), 1);
    assert_eq!(middle[0].id, rent.id);
}

#[test]
fn search_is_ascii_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new("Buy Milk", "", Priority::Low);
    repo.insert_task(&task).unwrap();

    let hits = repo.search_tasks(&like_pattern("MILK")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, task.id);
}

#[test]
fn search_treats_like_wildcards_in_input_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let percent = Task::new("Refund 50% deposit", "", Priority::Medium);
    let plain = Task::new("Refund 500 deposit", "", Priority::Medium);
    repo.insert_task(&percent).unwrap();
    repo.insert_task(&plain).unwrap();

    let hits = repo.search_tasks(&like_pattern("50%")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, percent.id);

    let underscore = repo.search_tasks(&like_pattern("50_")).unwrap();
    assert!(underscore.is_empty());
}

#[test]
fn search_with_no_match_returns_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.insert_task(&Task::new("Buy milk", "", Priority::Low))
        .unwrap();

    assert!(repo.search_tasks(&like_pattern("rent")).unwrap().is_empty());
}

#[test]
fn service_search_view_narrows_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut service = TaskService::new(repo);
    let listener = Arc::new(RecordingListener::default());
    service.subscribe(listener.clone());

    let milk = Task::new("Buy milk", "", Priority::Low);
    let rent = Task::new("Pay rent", "", Priority::High);
    service.insert_task(&milk).unwrap();
    service.insert_task(&rent).unwrap();

    let narrowed = service.search("milk").unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id, milk.id);
    assert_eq!(listener.last(), narrowed);
    assert_eq!(service.current_view(), &TaskView::Search("milk".to_string()));

    // Mutations re-run the active search view.
    service.delete_task(milk.id).unwrap();
    assert!(listener.last().is_empty());

    let widened = service.set_view(TaskView::All).unwrap();
    assert_eq!(widened.len(), 1);
    assert_eq!(widened[0].id, rent.id);
}

#[test]
fn service_priority_views_reorder_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut service = TaskService::new(repo);

    let low = Task::new("low", "", Priority::Low);
    let high = Task::new("high", "", Priority::High);
    let medium = Task::new("medium", "", Priority::Medium);
    for task in [&low, &high, &medium] {
        service.insert_task(task).unwrap();
    }

    let high_first = service.set_view(TaskView::PriorityHighFirst).unwrap();
    let priorities: Vec<_> = high_first.iter().map(|task| task.priority).collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::Medium, Priority::Low]
    );

    let low_first = service.set_view(TaskView::PriorityLowFirst).unwrap();
    let priorities: Vec<_> = low_first.iter().map(|task| task.priority).collect();
    assert_eq!(
        priorities,
        vec![Priority::Low, Priority::Medium, Priority::High]
    );
}

#[test]
fn delete_returns_record_and_restore_reuses_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut service = TaskService::new(repo);
    let listener = Arc::new(RecordingListener::default());
    service.subscribe(listener.clone());

    let task = Task::new("Swipe me away", "then undo", Priority::Medium);
    service.insert_task(&task).unwrap();

    let removed = service.delete_task(task.id).unwrap();
    assert_eq!(removed, task);
    assert!(listener.last().is_empty());

    let restored_id = service.restore_task(&removed).unwrap();
    assert_eq!(restored_id, task.id);
    let snapshot = listener.last();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0], task);
}

#[test]
fn every_mutation_delivers_one_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut service = TaskService::new(repo);
    let listener = Arc::new(RecordingListener::default());
    service.subscribe(listener.clone());

    let mut task = Task::new("Pack bags", "", Priority::Low);
    service.insert_task(&task).unwrap();
    task.priority = Priority::High;
    service.update_task(&task).unwrap();
    service.delete_all().unwrap();

    assert_eq!(listener.count(), 3);
    assert!(listener.last().is_empty());
}

use taskpad_core::{
    apply, synchronize, PatchOp, PresentationSurface, Priority, SyncError, Task, VecSurface,
};
use uuid::Uuid;

fn task(n: u128, title: &str, priority: Priority) -> Task {
    Task::with_id(Uuid::from_u128(n), title, "", priority).unwrap()
}

fn surface_with(tasks: &[Task]) -> VecSurface {
    let mut surface = VecSurface::new();
    for (index, task) in tasks.iter().enumerate() {
        surface.insert_at(index, task.clone());
    }
    surface
}

#[test]
fn synchronizing_identical_lists_yields_no_ops() {
    let list = vec![
        task(1, "Buy milk", Priority::Low),
        task(2, "Pay rent", Priority::High),
        task(3, "Call mom", Priority::Medium),
    ];

    assert!(synchronize(&list, &list).unwrap().is_empty());
}

#[test]
fn both_empty_lists_yield_no_ops() {
    assert!(synchronize(&[], &[]).unwrap().is_empty());
}

#[test]
fn remove_and_insert_example_matches_expected_patch() {
    let old = vec![
        task(1, "Buy milk", Priority::Low),
        task(2, "Pay rent", Priority::High),
    ];
    let new = vec![
        task(2, "Pay rent", Priority::High),
        task(3, "Call mom", Priority::Medium),
    ];

    let ops = synchronize(&old, &new).unwrap();
    assert_eq!(
        ops,
        vec![
            PatchOp::RemoveAt { index: 0 },
            PatchOp::InsertAt {
                index: 1,
                task: new[1].clone(),
            },
        ]
    );

    let mut surface = surface_with(&old);
    apply(&ops, &mut surface);
    assert_eq!(surface.rows(), new.as_slice());
}

#[test]
fn content_change_emits_single_update_at_final_index() {
    let old = vec![task(1, "X", Priority::Low)];
    let new = vec![task(1, "Y", Priority::Low)];

    let ops = synchronize(&old, &new).unwrap();
    assert_eq!(
        ops,
        vec![PatchOp::UpdateAt {
            index: 0,
            task: new[0].clone(),
        }]
    );

    let mut surface = surface_with(&old);
    apply(&ops, &mut surface);
    assert_eq!(surface.rows(), new.as_slice());
}

#[test]
fn priority_change_never_becomes_remove_plus_insert() {
    let old = vec![
        task(1, "Buy milk", Priority::Low),
        task(2, "Pay rent", Priority::High),
    ];
    let mut new = old.clone();
    new[1].priority = Priority::Medium;

    let ops = synchronize(&old, &new).unwrap();
    assert_eq!(ops.len(), 1);
    match &ops[0] {
        PatchOp::UpdateAt { index, task } => {
            assert_eq!(*index, 1);
            assert_eq!(task.id, new[1].id);
        }
        other => panic!("expected update, got {other:?}"),
    }
}

#[test]
fn insert_remove_count_is_minimal_under_identity() {
    let old = vec![
        task(1, "a", Priority::Low),
        task(2, "b", Priority::Low),
        task(3, "c", Priority::Low),
        task(4, "d", Priority::Low),
    ];
    let new = vec![
        task(2, "b", Priority::Low),
        task(4, "d", Priority::Low),
        task(5, "e", Priority::Low),
    ];

    // Common-by-id subsequence is [2, 4], so |old| + |new| - 2 * 2 = 3.
    let ops = synchronize(&old, &new).unwrap();
    let structural = ops
        .iter()
        .filter(|op| !matches!(op, PatchOp::UpdateAt { .. }))
        .count();
    assert_eq!(structural, 3);

    let mut surface = surface_with(&old);
    apply(&ops, &mut surface);
    assert_eq!(surface.rows(), new.as_slice());
}

#[test]
fn move_is_modeled_as_remove_plus_insert() {
    let old = vec![
        task(1, "a", Priority::Low),
        task(2, "b", Priority::Low),
        task(3, "c", Priority::Low),
    ];
    let new = vec![
        task(3, "c", Priority::Low),
        task(1, "a", Priority::Low),
        task(2, "b", Priority::Low),
    ];

    let ops = synchronize(&old, &new).unwrap();
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().any(|op| matches!(op, PatchOp::RemoveAt { .. })));
    assert!(ops
        .iter()
        .any(|op| matches!(op, PatchOp::InsertAt { task, .. } if task.id == new[0].id)));

    let mut surface = surface_with(&old);
    apply(&ops, &mut surface);
    assert_eq!(surface.rows(), new.as_slice());
}

#[test]
fn initial_load_inserts_every_row() {
    let new = vec![
        task(1, "a", Priority::Low),
        task(2, "b", Priority::Medium),
        task(3, "c", Priority::High),
    ];

    let ops = synchronize(&[], &new).unwrap();
    assert_eq!(ops.len(), 3);
    assert!(ops.iter().all(|op| matches!(op, PatchOp::InsertAt { .. })));

    let mut surface = VecSurface::new();
    apply(&ops, &mut surface);
    assert_eq!(surface.rows(), new.as_slice());
}

#[test]
fn clearing_the_list_removes_rows_at_index_zero() {
    let old = vec![
        task(1, "a", Priority::Low),
        task(2, "b", Priority::Medium),
    ];

    let ops = synchronize(&old, &[]).unwrap();
    assert_eq!(
        ops,
        vec![PatchOp::RemoveAt { index: 0 }, PatchOp::RemoveAt { index: 0 }]
    );

    let mut surface = surface_with(&old);
    apply(&ops, &mut surface);
    assert!(surface.rows().is_empty());
}

#[test]
fn mixed_change_round_trips_to_new_snapshot() {
    let old = vec![
        task(1, "a", Priority::Low),
        task(2, "b", Priority::Medium),
        task(3, "c", Priority::High),
        task(4, "d", Priority::Low),
        task(5, "e", Priority::Medium),
    ];
    let new = vec![
        task(6, "f", Priority::High),
        task(2, "b2", Priority::Medium),
        task(4, "d", Priority::High),
        task(3, "c", Priority::High),
        task(7, "g", Priority::Low),
    ];

    let ops = synchronize(&old, &new).unwrap();
    let mut surface = surface_with(&old);
    apply(&ops, &mut surface);
    assert_eq!(surface.rows(), new.as_slice());
}

#[test]
fn duplicate_id_in_either_snapshot_is_rejected() {
    let duped = vec![
        task(1, "first", Priority::Low),
        task(1, "second", Priority::High),
    ];
    let clean = vec![task(2, "ok", Priority::Low)];

    let err = synchronize(&duped, &clean).unwrap_err();
    assert_eq!(
        err,
        SyncError::DuplicateId {
            id: Uuid::from_u128(1)
        }
    );

    let err = synchronize(&clean, &duped).unwrap_err();
    assert!(matches!(err, SyncError::DuplicateId { .. }));
}

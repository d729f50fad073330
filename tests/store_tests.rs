//! Integration tests for the SQLite store.

use chrono::{TimeZone, Utc};
use trello_import::store::{SqliteStore, Store};
use trello_import::types::{
    NewBoard, NewImportRecord, NewSubtask, NewTag, NewTask, Priority, Recurrence, Status,
};

fn setup_store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("Failed to create in-memory database")
}

fn new_board(user: &str, name: &str) -> NewBoard {
    NewBoard {
        user_id: user.into(),
        name: name.into(),
        color: "#3B82F6".into(),
        icon: "📋".into(),
        sort_order: 0,
    }
}

fn new_task(user: &str, board_id: &str, title: &str, sort_order: i64) -> NewTask {
    NewTask {
        user_id: user.into(),
        board_id: board_id.into(),
        title: title.into(),
        description: None,
        completed: false,
        assigned_to: "me".into(),
        due_date: None,
        priority: Priority::None,
        status: Status::Todo,
        tags: vec![],
        recurring: Recurrence::None,
        sort_order,
    }
}

#[tokio::test]
async fn board_roundtrip() {
    let store = setup_store();

    let board = store.create_board(new_board("u1", "Imported")).await.unwrap();
    assert!(!board.id.is_empty());
    assert!(board.created_at > 0);

    let fetched = store.get_board(&board.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Imported");
    assert_eq!(fetched.user_id, "u1");
    assert_eq!(fetched.icon, "📋");
}

#[tokio::test]
async fn task_roundtrip_preserves_fields() {
    let store = setup_store();
    let board = store.create_board(new_board("u1", "B")).await.unwrap();

    let due = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let mut task = new_task("u1", &board.id, "With everything", 3);
    task.description = Some("details".into());
    task.completed = true;
    task.due_date = Some(due);
    task.priority = Priority::High;
    task.status = Status::InProgress;
    task.tags = vec!["tag-1".into(), "tag-2".into()];

    let created = store.create_task(task).await.unwrap();
    assert_eq!(created.priority, Priority::High);

    let tasks = store.tasks_for_board(&board.id).unwrap();
    assert_eq!(tasks.len(), 1);
    let stored = &tasks[0];
    assert_eq!(stored.title, "With everything");
    assert_eq!(stored.due_date, Some(due));
    assert_eq!(stored.status, Status::InProgress);
    assert_eq!(stored.tags, vec!["tag-1", "tag-2"]);
    assert_eq!(stored.recurring, Recurrence::None);
    assert_eq!(stored.sort_order, 3);
    assert!(stored.completed);
}

#[tokio::test]
async fn empty_tag_set_reads_back_empty() {
    let store = setup_store();
    let board = store.create_board(new_board("u1", "B")).await.unwrap();

    store
        .create_task(new_task("u1", &board.id, "No tags", 0))
        .await
        .unwrap();

    let tasks = store.tasks_for_board(&board.id).unwrap();
    assert!(tasks[0].tags.is_empty());
}

#[tokio::test]
async fn tag_names_are_unique_per_user_case_insensitively() {
    let store = setup_store();

    store
        .create_tag(NewTag {
            user_id: "u1".into(),
            name: "Urgent".into(),
            color: "#EF4444".into(),
        })
        .await
        .unwrap();

    // Same name, different case, same user: rejected by the index.
    let duplicate = store
        .create_tag(NewTag {
            user_id: "u1".into(),
            name: "URGENT".into(),
            color: "#EF4444".into(),
        })
        .await;
    assert!(duplicate.is_err());

    // Same name for a different user is fine.
    store
        .create_tag(NewTag {
            user_id: "u2".into(),
            name: "urgent".into(),
            color: "#EF4444".into(),
        })
        .await
        .unwrap();

    assert_eq!(store.list_tags("u1").await.unwrap().len(), 1);
    assert_eq!(store.list_tags("u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn subtasks_read_back_in_sort_order() {
    let store = setup_store();
    let board = store.create_board(new_board("u1", "B")).await.unwrap();
    let task = store
        .create_task(new_task("u1", &board.id, "Parent", 0))
        .await
        .unwrap();

    let subtasks = vec![
        NewSubtask {
            task_id: task.id.clone(),
            title: "third".into(),
            completed: false,
            sort_order: 30.0,
        },
        NewSubtask {
            task_id: task.id.clone(),
            title: "first".into(),
            completed: true,
            sort_order: 10.0,
        },
        NewSubtask {
            task_id: task.id.clone(),
            title: "second".into(),
            completed: false,
            sort_order: 20.0,
        },
    ];
    store.insert_subtasks(&subtasks).await.unwrap();

    let stored = store.subtasks_for_task(&task.id).unwrap();
    let titles: Vec<&str> = stored.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
    assert!(stored[0].completed);
}

#[tokio::test]
async fn import_records_are_scoped_per_user() {
    let store = setup_store();

    store
        .record_import(NewImportRecord {
            user_id: "u1".into(),
            trello_board_id: "trello-1".into(),
            trello_board_name: "Sprint".into(),
            board_id: "board-1".into(),
            tasks_imported: 7,
        })
        .await
        .unwrap();

    assert!(store.find_import("u1", "trello-1").await.unwrap().is_some());
    assert!(store.find_import("u2", "trello-1").await.unwrap().is_none());
    assert!(store.find_import("u1", "trello-2").await.unwrap().is_none());
}

#[tokio::test]
async fn import_history_is_most_recent_first() {
    let store = setup_store();

    for (board, name) in [("t1", "First"), ("t2", "Second"), ("t3", "Third")] {
        store
            .record_import(NewImportRecord {
                user_id: "u1".into(),
                trello_board_id: board.into(),
                trello_board_name: name.into(),
                board_id: format!("b-{board}"),
                tasks_imported: 1,
            })
            .await
            .unwrap();
    }

    let history = store.list_imports("u1").await.unwrap();
    let names: Vec<&str> = history
        .iter()
        .map(|r| r.trello_board_name.as_str())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);

    assert!(store.list_imports("u2").await.unwrap().is_empty());
}

#[tokio::test]
async fn open_creates_database_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.create_board(new_board("u1", "Persisted")).await.unwrap();
    }

    // Reopen and confirm the data survived.
    let store = SqliteStore::open(&path).unwrap();
    let history = store.list_imports("u1").await.unwrap();
    assert!(history.is_empty());
    assert!(path.exists());
}

//! End-to-end save/load behavior of the board store: round trips,
//! reconciliation, and skip-on-error loading.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use kanri::io::board_io::BoardStore;
use kanri::model::{Board, Color, Column, Priority, Status, Task};

/// A small board: "Demo" with one "In Progress" column (wip_limit=3)
/// holding DEMO-1-fix-bug (high priority, #urgent).
fn demo_board() -> Board {
    let mut board = Board::new("Demo", "A demo board.").unwrap();
    let mut column = Column::new("In Progress", "Active work.", 0, 3, None).unwrap();

    let id = board.mint_task_id("Fix bug").unwrap();
    let mut task = Task::new(id, "Fix bug", "It crashes on save.", Priority::High, Status::Todo)
        .unwrap();
    task.add_tag("urgent");
    column.add_task(task).unwrap();

    board.add_column(column).unwrap();
    board
}

#[test]
fn test_demo_board_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());
    store.save(&demo_board()).unwrap();

    // Both halves of the task's split pair exist on disk.
    let task_dir = tmp.path().join("demo/columns/in-progress/tasks/DEMO-1-fix-bug");
    assert!(task_dir.join("metadata.yml").is_file());
    assert!(task_dir.join("task.md").is_file());

    let board = store.find_by_id("demo").unwrap();
    let column = &board.columns[0];
    assert_eq!(column.order, 0);
    assert_eq!(column.wip_limit, 3);

    let task = &column.tasks[0];
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.tags, vec!["urgent"]);
}

#[test]
fn test_removing_task_reconciles_its_directory_away() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());
    let mut board = demo_board();
    store.save(&board).unwrap();

    let id = "DEMO-1-fix-bug".parse().unwrap();
    board.column_mut("In Progress").unwrap().remove_task(&id);
    store.save(&board).unwrap();

    let column_dir = tmp.path().join("demo/columns/in-progress");
    assert!(!column_dir.join("tasks/DEMO-1-fix-bug").exists());
    assert!(column_dir.join("metadata.yml").is_file());
    assert!(column_dir.join("column.md").is_file());
}

#[test]
fn test_removing_column_deletes_its_subtree_only() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());
    let mut board = demo_board();
    board
        .add_column(Column::new("Done", "", 1, 0, None).unwrap())
        .unwrap();
    store.save(&board).unwrap();

    board.remove_column("In Progress");
    store.save(&board).unwrap();

    assert!(!tmp.path().join("demo/columns/in-progress").exists());
    assert!(tmp.path().join("demo/columns/done").is_dir());
}

#[test]
fn test_all_fields_survive_a_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());

    let mut board = Board::new("Full Fields", "Everything set.").unwrap();
    let mut column = Column::new(
        "Review",
        "Waiting on review.",
        2,
        5,
        Some(Color::new("#336699").unwrap()),
    )
    .unwrap();

    let id = board.mint_task_id("Polish docs").unwrap();
    let mut task = Task::new(
        id,
        "Polish docs",
        "Several paragraphs.\n\nWith a blank line.",
        Priority::Critical,
        Status::InProgress,
    )
    .unwrap();
    task.add_tag("docs");
    task.add_tag("p1");
    task.set_metadata("git_branch", "docs/polish");
    task.set_due_date(chrono::Utc::now() + chrono::Duration::days(7))
        .unwrap();
    column.add_task(task).unwrap();
    board.add_column(column).unwrap();

    store.save(&board).unwrap();
    let loaded = store.find_by_id("full-fields").unwrap();

    assert_eq!(loaded.name, "Full Fields");
    assert_eq!(loaded.description, "Everything set.");
    assert_eq!(loaded.prefix, "FULL");
    assert_eq!(loaded.next_task_num, 2);

    let column = &loaded.columns[0];
    assert_eq!(column.name, "Review");
    assert_eq!(column.description, "Waiting on review.");
    assert_eq!(column.color, Some(Color::new("#336699").unwrap()));

    let task = &column.tasks[0];
    assert_eq!(task.title, "Polish docs");
    assert_eq!(task.description, "Several paragraphs.\n\nWith a blank line.");
    assert_eq!(task.priority, Priority::Critical);
    assert_eq!(task.status, Status::InProgress);
    assert_eq!(task.tags, vec!["docs", "p1"]);
    assert_eq!(task.metadata_value("git_branch"), Some("docs/polish"));
    assert!(task.due_date.is_some());
}

#[test]
fn test_completed_date_survives_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());

    let mut board = demo_board();
    let column = board.column_mut("In Progress").unwrap();
    column.tasks[0].update_status(Status::Done);
    let stamped = column.tasks[0].completed_date.unwrap();

    store.save(&board).unwrap();
    let loaded = store.find_by_id("demo").unwrap();
    let task = &loaded.columns[0].tasks[0];

    assert_eq!(task.status, Status::Done);
    assert_eq!(
        task.completed_date.map(|d| d.timestamp()),
        Some(stamped.timestamp())
    );
}

#[test]
fn test_corrupt_sibling_task_does_not_block_the_rest() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());

    let mut board = demo_board();
    {
        let id = board.mint_task_id("Write tests").unwrap();
        let task = Task::new(id, "Write tests", "", Priority::Low, Status::Todo).unwrap();
        board.column_mut("In Progress").unwrap().add_task(task).unwrap();
    }
    store.save(&board).unwrap();

    fs::write(
        tmp.path()
            .join("demo/columns/in-progress/tasks/DEMO-2-write-tests/metadata.yml"),
        "][ definitely not yaml\n",
    )
    .unwrap();

    let loaded = store.find_by_id("demo").unwrap();
    let ids: Vec<String> = loaded.columns[0]
        .tasks
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(ids, vec!["DEMO-1-fix-bug"]);
}

#[test]
fn test_corrupt_column_does_not_block_siblings() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());
    let mut board = demo_board();
    board
        .add_column(Column::new("Done", "", 1, 0, None).unwrap())
        .unwrap();
    store.save(&board).unwrap();

    fs::write(
        tmp.path().join("demo/columns/done/metadata.yml"),
        "][ broken\n",
    )
    .unwrap();

    let loaded = store.find_by_id("demo").unwrap();
    assert_eq!(loaded.columns.len(), 1);
    assert_eq!(loaded.columns[0].name, "In Progress");
}

#[test]
fn test_legacy_flat_layout_loads_transparently() {
    let tmp = TempDir::new().unwrap();

    // Generation B: split files, but no columns/ or tasks/ containers.
    let board_dir = tmp.path().join("legacy");
    let column_dir = board_dir.join("doing");
    let task_dir = column_dir.join("LEG-1-old-task");
    fs::create_dir_all(&task_dir).unwrap();

    fs::write(
        board_dir.join("metadata.yml"),
        "id: legacy\nprefix: LEG\ndescription: Old layout\nnext_task_num: 2\n",
    )
    .unwrap();
    fs::write(board_dir.join("board.md"), "# Legacy\n\nOld layout\n").unwrap();
    fs::write(column_dir.join("metadata.yml"), "order: 0\nwip_limit: 0\n").unwrap();
    fs::write(column_dir.join("column.md"), "# Doing\n").unwrap();
    fs::write(
        task_dir.join("metadata.yml"),
        "id: LEG-1\ntitle: Old task\npriority: medium\nstatus: in-progress\n",
    )
    .unwrap();
    fs::write(task_dir.join("task.md"), "Still here.\n").unwrap();

    let store = BoardStore::new(tmp.path());
    let board = store.find_by_id("legacy").unwrap();

    assert_eq!(board.name, "Legacy");
    assert_eq!(board.prefix, "LEG");
    assert_eq!(board.columns.len(), 1);
    assert_eq!(board.columns[0].name, "Doing");
    assert_eq!(board.columns[0].tasks[0].title, "Old task");
    assert_eq!(board.columns[0].tasks[0].status, Status::InProgress);
}

#[test]
fn test_front_matter_generation_loads_transparently() {
    let tmp = TempDir::new().unwrap();

    // Generation A: one front-matter file per entity, flat layout.
    let board_dir = tmp.path().join("ancient");
    let column_dir = board_dir.join("To Do");
    let task_dir = column_dir.join("OLD-1-first");
    fs::create_dir_all(&task_dir).unwrap();

    fs::write(
        board_dir.join("board.md"),
        "---\nname: Ancient\nprefix: OLD\nnext_task_num: 2\n---\nThe original format\n",
    )
    .unwrap();
    fs::write(
        column_dir.join("column.md"),
        "---\ndisplay_name: To Do\norder: 0\nwip_limit: 4\n---\n",
    )
    .unwrap();
    fs::write(
        task_dir.join("task.md"),
        "---\nid: OLD-1\ntitle: First task\npriority: low\nstatus: todo\ntags:\n  - seed\n---\nBody text\n",
    )
    .unwrap();

    let store = BoardStore::new(tmp.path());
    let board = store.find_by_id("ancient").unwrap();

    assert_eq!(board.name, "Ancient");
    assert_eq!(board.description, "The original format");
    assert_eq!(board.next_task_num, 2);

    let column = &board.columns[0];
    assert_eq!(column.name, "To Do");
    assert_eq!(column.wip_limit, 4);

    let task = &column.tasks[0];
    assert_eq!(task.title, "First task");
    assert_eq!(task.description, "Body text");
    assert_eq!(task.tags, vec!["seed"]);
}

#[test]
fn test_saving_a_legacy_board_rewrites_to_current_layout() {
    let tmp = TempDir::new().unwrap();

    let board_dir = tmp.path().join("legacy");
    fs::create_dir_all(&board_dir).unwrap();
    fs::write(
        board_dir.join("board.md"),
        "---\nname: Legacy\nprefix: LEG\n---\n",
    )
    .unwrap();

    let store = BoardStore::new(tmp.path());
    let mut board = store.find_by_id("legacy").unwrap();
    board
        .add_column(Column::new("To Do", "", 0, 0, None).unwrap())
        .unwrap();
    store.save(&board).unwrap();

    // The save emits the split pair and the columns/ container.
    assert!(board_dir.join("metadata.yml").is_file());
    assert!(board_dir.join("columns/to-do/column.md").is_file());
}

#[test]
fn test_saving_twice_with_same_name_reuses_column_key() {
    let tmp = TempDir::new().unwrap();
    let store = BoardStore::new(tmp.path());
    let board = demo_board();

    store.save(&board).unwrap();
    store.save(&board).unwrap();

    let columns: Vec<String> = fs::read_dir(tmp.path().join("demo/columns"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(columns, vec!["in-progress"]);
}

use std::path::PathBuf;

use crate::cli::commands::*;
use crate::io::board_io::{BoardStore, StoreError};
use crate::io::config_io;
use crate::model::{Board, Column};
use crate::ops::migrate;

/// Default columns for a freshly created board.
const DEFAULT_COLUMNS: [&str; 3] = ["To Do", "In Progress", "Done"];

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(cli.boards_dir)?;

    match cli.command {
        Commands::Create(args) => cmd_create(&store, args),
        Commands::List => cmd_list(&store),
        Commands::Show(args) => cmd_show(&store, args),
        Commands::Delete(args) => cmd_delete(&store, args),
        Commands::Migrate(args) => cmd_migrate(&store, args),
    }
}

fn open_store(boards_dir: Option<PathBuf>) -> Result<BoardStore, Box<dyn std::error::Error>> {
    let root = match boards_dir {
        Some(dir) => dir,
        None => config_io::load_config()?.storage.boards_path,
    };
    Ok(BoardStore::new(root))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_create(store: &BoardStore, args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = Board::new(&args.name, &args.description)?;
    if let Some(prefix) = args.prefix {
        board.prefix = prefix.to_ascii_uppercase();
    }
    if store.exists(&board.id) {
        return Err(format!("board already exists: {}", board.id).into());
    }

    for (order, name) in DEFAULT_COLUMNS.iter().enumerate() {
        board.add_column(Column::new(name, "", order as u32, 0, None)?)?;
    }

    store.save(&board)?;
    println!("Created board {} ({})", board.name, board.id);
    Ok(())
}

fn cmd_list(store: &BoardStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut boards = store.find_all()?;
    if boards.is_empty() {
        println!("No boards. Create one with `kn create <name>`.");
        return Ok(());
    }
    boards.sort_by(|a, b| a.id.cmp(&b.id));

    for board in boards {
        println!(
            "{}\t{}\t{} columns, {} tasks",
            board.id,
            board.name,
            board.columns.len(),
            board.task_count()
        );
    }
    Ok(())
}

fn cmd_show(store: &BoardStore, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let board = find_board(store, &args.board)?;

    println!("# {} ({})", board.name, board.id);
    if !board.description.is_empty() {
        println!("{}", board.description);
    }

    for column in &board.columns {
        let limit = match column.wip_limit {
            0 => String::new(),
            n => format!(" [{}/{}]", column.tasks.len(), n),
        };
        println!("\n## {}{}", column.name, limit);

        for task in &column.tasks {
            let marker = match task.status {
                crate::model::Status::Todo => ' ',
                crate::model::Status::InProgress => '>',
                crate::model::Status::Done => 'x',
            };
            let mut line = format!("- [{}] {} {}", marker, task.id.short(), task.title);
            if task.priority != crate::model::Priority::None {
                line.push_str(&format!(" ({})", task.priority));
            }
            for tag in &task.tags {
                line.push_str(&format!(" #{tag}"));
            }
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_delete(store: &BoardStore, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    store.delete(&args.board)?;
    println!("Deleted board {}", args.board);
    Ok(())
}

fn cmd_migrate(store: &BoardStore, args: MigrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ids: Vec<String> = match args.board {
        Some(id) => vec![id],
        None => store
            .find_all()?
            .into_iter()
            .map(|board| board.id)
            .collect(),
    };

    for id in ids {
        migrate::migrate_board(store, &id)?;
        println!("Migrated board {id}");
    }
    Ok(())
}

/// Accept either a board id or a display name.
fn find_board(store: &BoardStore, board_ref: &str) -> Result<Board, StoreError> {
    match store.find_by_id(board_ref) {
        Err(StoreError::NotFound { .. }) => store.find_by_name(board_ref),
        other => other,
    }
}

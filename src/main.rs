//! trello-import CLI
//!
//! Imports Trello boards (lists, cards, labels, checklists) into the
//! Vectors task database, with preview and history subcommands around
//! the one-shot import pipeline.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trello_import::cli::{Cli, Command};
use trello_import::config::Config;
use trello_import::import::{ImportContext, ImportOptions, Importer};
use trello_import::store::SqliteStore;
use trello_import::trello::TrelloClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to initialize logging")?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database = Some(database);
    }
    if let Some(user) = cli.user {
        config.user_id = Some(user);
    }

    let credentials = config.trello_credentials()?;
    let trello = TrelloClient::new(credentials);

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;

    let importer = Importer::new(
        trello,
        store,
        ImportContext {
            user_id: config.user_id(),
        },
    );

    match cli.command {
        Command::Boards => list_boards(&importer).await,
        Command::Preview { board_id } => preview_board(&importer, &board_id).await,
        Command::Import(args) => {
            import_board(&importer, &args.board_id, args.icon).await
        }
        Command::History => show_history(&importer).await,
    }
}

async fn list_boards(importer: &Importer<SqliteStore>) -> Result<()> {
    let boards = importer.trello().get_boards().await?;

    if boards.is_empty() {
        println!("No open Trello boards.");
        return Ok(());
    }

    for board in boards {
        let marker = if importer.has_been_imported(&board.id).await? {
            "  (imported)"
        } else {
            ""
        };
        println!("{}  {}{}", board.id, board.name, marker);
    }
    Ok(())
}

async fn preview_board(importer: &Importer<SqliteStore>, board_id: &str) -> Result<()> {
    let summary = importer.trello().get_board_summary(board_id).await?;

    println!("Board:           {}", summary.board_name);
    println!("Cards:           {}", summary.card_count);
    println!("Labels in use:   {}", summary.label_count);
    println!("Checklist items: {}", summary.checklist_item_count);
    Ok(())
}

async fn import_board(
    importer: &Importer<SqliteStore>,
    board_id: &str,
    icon: Option<String>,
) -> Result<()> {
    let options = ImportOptions { icon };

    let outcome = importer
        .import_board(board_id, &options, |percent, message| {
            println!("[{percent:>3.0}%] {message}");
        })
        .await?;

    println!();
    println!("Board \"{}\" imported.", outcome.board.name);
    println!("  tasks:    {}", outcome.tasks_imported);
    println!("  subtasks: {}", outcome.subtasks_imported);
    println!("  new tags: {}", outcome.tags_created);

    if !outcome.errors.is_empty() {
        println!();
        println!(
            "Warning: {} item(s) could not be imported:",
            outcome.errors.len()
        );
        for error in &outcome.errors {
            println!("  - {error}");
        }
    }
    Ok(())
}

async fn show_history(importer: &Importer<SqliteStore>) -> Result<()> {
    let records = importer.history().await?;

    if records.is_empty() {
        println!("No imports yet.");
        return Ok(());
    }

    for record in records {
        let when = DateTime::<Utc>::from_timestamp_millis(record.imported_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{}  {}  ({} tasks)",
            when, record.trello_board_name, record.tasks_imported
        );
    }
    Ok(())
}

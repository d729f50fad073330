//! CLI command definitions for trello-import
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Trello board importer for the Vectors task database
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the task database (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// User id the import belongs to (overrides config)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List your open Trello boards, flagging already-imported ones
    Boards,

    /// Show what an import of a board would bring over
    Preview {
        /// Trello board id
        board_id: String,
    },

    /// Import a Trello board into the task database
    Import(ImportArgs),

    /// Show import history, most recent first
    History,
}

/// Arguments for the import subcommand
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Trello board id to import
    #[arg(value_name = "BOARD_ID")]
    pub board_id: String,

    /// Icon for the created board (default: 📋)
    #[arg(long)]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_command() {
        let cli = Cli::try_parse_from(["trello-import", "import", "abc123", "--icon", "🚀"])
            .expect("parse failed");
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.board_id, "abc123");
                assert_eq!(args.icon.as_deref(), Some("🚀"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from([
            "trello-import",
            "history",
            "--user",
            "alice",
            "--database",
            "/tmp/t.db",
        ])
        .expect("parse failed");
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/t.db")));
        assert!(matches!(cli.command, Command::History));
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Cli::try_parse_from(["trello-import"]).is_err());
    }
}

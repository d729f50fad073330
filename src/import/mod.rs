//! The board import pipeline.
//!
//! One-shot ETL: fetch a complete Trello board snapshot, create a
//! target board, reconcile labels into tags, convert cards to tasks
//! and checklist items to subtasks, then record the import in history.
//! Per-card and per-batch failures are data, not exceptions: they land
//! in [`ImportOutcome::errors`] while the run keeps going. Only a
//! stage-level failure (fetch, board creation) aborts the import.

pub mod mapping;
pub mod progress;
pub mod subtasks;
pub mod tags;
pub mod tasks;

use crate::error::{ImportError, ItemError};
use crate::store::Store;
use crate::trello::TrelloClient;
use crate::types::{Board, ImportRecord, NewBoard, NewImportRecord};
use progress::{ProgressReporter, Stage};
use tracing::{info, warn};

/// Board color used when the Trello board has no background color.
const DEFAULT_BOARD_COLOR: &str = "#3B82F6";

/// Icon for imported boards unless overridden.
const DEFAULT_BOARD_ICON: &str = "\u{1F4CB}";

/// Identity of the importing user, threaded explicitly through every
/// stage instead of being re-derived from ambient session state.
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub user_id: String,
}

/// Caller-tunable import options.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Icon for the created board. Defaults to 📋.
    pub icon: Option<String>,
}

/// Aggregated result of one import run.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The board created for this import.
    pub board: Board,
    pub tasks_imported: usize,
    pub subtasks_imported: usize,
    pub tags_created: usize,
    /// Item-level failures from the task and subtask stages, in stage
    /// order. Non-empty errors still mean the run as a whole resolved.
    pub errors: Vec<ItemError>,
}

/// Drives the import stages against a Trello client and a store.
pub struct Importer<S> {
    trello: TrelloClient,
    store: S,
    ctx: ImportContext,
}

impl<S: Store> Importer<S> {
    pub fn new(trello: TrelloClient, store: S, ctx: ImportContext) -> Self {
        Self { trello, store, ctx }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn trello(&self) -> &TrelloClient {
        &self.trello
    }

    /// Import one Trello board end to end.
    ///
    /// `on_progress` receives (percent 0–100, message) repeatedly;
    /// successive percents never decrease and the final report is
    /// exactly 100. The future resolves once every stage has completed
    /// (successfully or with recorded per-item errors).
    pub async fn import_board(
        &self,
        trello_board_id: &str,
        options: &ImportOptions,
        on_progress: impl FnMut(f64, &str),
    ) -> Result<ImportOutcome, ImportError> {
        let mut reporter = ProgressReporter::new(on_progress);

        // Stage 1: one parallel fetch of the whole board graph.
        reporter.update(Stage::Fetch, 0.0, "Fetching Trello board data...");
        let snapshot = self.trello.fetch_board_for_import(trello_board_id).await?;
        reporter.update(
            Stage::Fetch,
            1.0,
            &format!("Found {} cards to import", snapshot.summary.cards),
        );

        // Stage 2: the target board every task will reference.
        reporter.update(Stage::CreateBoard, 0.5, "Creating board...");
        let color = snapshot
            .board
            .prefs
            .as_ref()
            .and_then(|prefs| prefs.background_color.clone())
            .unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string());
        let board = self
            .store
            .create_board(NewBoard {
                user_id: self.ctx.user_id.clone(),
                name: snapshot.board.name.clone(),
                color,
                icon: options
                    .icon
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BOARD_ICON.to_string()),
                sort_order: 0,
            })
            .await
            .map_err(ImportError::BoardCreate)?;
        reporter.update(
            Stage::CreateBoard,
            1.0,
            &format!("Board \"{}\" created", board.name),
        );

        // Stage 3: label → tag reconciliation.
        reporter.update(Stage::Tags, 0.5, "Setting up tags...");
        let tag_mapping = tags::reconcile_labels(&self.store, &snapshot.labels, &self.ctx).await?;
        let tags_created = tag_mapping.created_count();
        reporter.update(Stage::Tags, 1.0, &format!("{tags_created} tags created"));

        // Stage 4: cards → tasks, one insert per card.
        reporter.update(Stage::Tasks, 0.0, "Importing tasks...");
        let task_outcome = tasks::import_cards(
            &self.store,
            &snapshot.cards,
            &board.id,
            &tag_mapping,
            &self.ctx,
            &mut reporter,
        )
        .await;

        // Stage 5: checklist items → subtasks, batched.
        reporter.update(Stage::Subtasks, 0.0, "Importing subtasks from checklists...");
        let subtask_outcome = subtasks::import_subtasks(
            &self.store,
            &snapshot.cards,
            &task_outcome.card_to_task,
            &mut reporter,
        )
        .await;

        // Stage 6: history record. Best-effort: the import already
        // succeeded, so a failure here is logged and swallowed.
        reporter.update(Stage::History, 0.5, "Saving import record...");
        if let Err(e) = self
            .store
            .record_import(NewImportRecord {
                user_id: self.ctx.user_id.clone(),
                trello_board_id: trello_board_id.to_string(),
                trello_board_name: snapshot.board.name.clone(),
                board_id: board.id.clone(),
                tasks_imported: task_outcome.imported as i64,
            })
            .await
        {
            warn!(error = %e, "failed to record import history");
        }
        reporter.update(Stage::History, 1.0, "Import complete!");

        let mut errors = task_outcome.errors;
        errors.extend(subtask_outcome.errors);

        info!(
            board = %board.name,
            tasks = task_outcome.imported,
            subtasks = subtask_outcome.imported,
            tags = tags_created,
            errors = errors.len(),
            "import finished"
        );

        Ok(ImportOutcome {
            board,
            tasks_imported: task_outcome.imported,
            subtasks_imported: subtask_outcome.imported,
            tags_created,
            errors,
        })
    }

    /// Whether this user has already imported the given Trello board.
    ///
    /// Advisory only: it drives the "already imported" flag in the
    /// board-selection UI and does not block a re-import.
    pub async fn has_been_imported(&self, trello_board_id: &str) -> Result<bool, ImportError> {
        let record = self
            .store
            .find_import(&self.ctx.user_id, trello_board_id)
            .await?;
        Ok(record.is_some())
    }

    /// This user's import history, most recent first.
    pub async fn history(&self) -> Result<Vec<ImportRecord>, ImportError> {
        Ok(self.store.list_imports(&self.ctx.user_id).await?)
    }
}

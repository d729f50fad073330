//! Checklist-item → subtask conversion.
//!
//! Two passes: a pure flatten that gathers every check item on every
//! card that actually got a task, then fixed-size batch inserts so a
//! board with hundreds of checklist items stays within a handful of
//! round trips.

use super::progress::{ProgressReporter, Stage};
use crate::error::ItemError;
use crate::store::Store;
use crate::trello::types::EnrichedCard;
use crate::types::NewSubtask;
use std::collections::HashMap;

/// Records per insert batch.
pub const SUBTASK_BATCH_SIZE: usize = 50;

/// Outcome of the subtask-import stage.
#[derive(Debug, Default)]
pub struct SubtaskImportOutcome {
    pub imported: usize,
    /// Per-batch failures, keyed by the batch's starting index.
    pub errors: Vec<ItemError>,
}

/// Flatten every checklist item into candidate subtask rows.
///
/// Cards without a resolved task id contribute nothing: an import
/// never creates orphaned subtasks.
pub fn flatten_checklists(
    cards: &[EnrichedCard],
    card_to_task: &HashMap<String, String>,
) -> Vec<NewSubtask> {
    let mut subtasks = Vec::new();

    for enriched in cards {
        let Some(task_id) = card_to_task.get(&enriched.card.id) else {
            continue;
        };

        for checklist in &enriched.checklists {
            for item in &checklist.check_items {
                subtasks.push(NewSubtask {
                    task_id: task_id.clone(),
                    title: item.name.clone(),
                    completed: item.is_complete(),
                    sort_order: item.pos,
                });
            }
        }
    }

    subtasks
}

/// Import checklist items as subtasks, batched.
///
/// A failed batch records an error entry and only drops its own
/// records; later batches still run. With zero candidates the stage
/// reports complete without touching the store.
pub async fn import_subtasks<S: Store, F: FnMut(f64, &str)>(
    store: &S,
    cards: &[EnrichedCard],
    card_to_task: &HashMap<String, String>,
    reporter: &mut ProgressReporter<F>,
) -> SubtaskImportOutcome {
    let mut outcome = SubtaskImportOutcome::default();

    let subtasks = flatten_checklists(cards, card_to_task);
    let total = subtasks.len();

    if total == 0 {
        reporter.update(Stage::Subtasks, 1.0, "No subtasks to import");
        return outcome;
    }

    for (batch_index, batch) in subtasks.chunks(SUBTASK_BATCH_SIZE).enumerate() {
        let start = batch_index * SUBTASK_BATCH_SIZE;
        match store.insert_subtasks(batch).await {
            Ok(()) => outcome.imported += batch.len(),
            Err(e) => outcome.errors.push(ItemError::batch(start, e.to_string())),
        }

        let processed = start + batch.len();
        let fraction = processed as f64 / total as f64;
        reporter.update(
            Stage::Subtasks,
            fraction,
            &format!("Importing subtasks... {}%", (fraction * 100.0).round() as u32),
        );
    }

    outcome
}

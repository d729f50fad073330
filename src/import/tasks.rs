//! Card → task conversion.
//!
//! Cards are inserted one at a time, in the exact order the fetch
//! returned them, so a bad card can be skipped without losing the rest
//! of the board and so sort positions preserve source order.

use super::progress::{ProgressReporter, Stage};
use super::tags::TagMapping;
use super::{ImportContext, mapping};
use crate::error::ItemError;
use crate::store::Store;
use crate::trello::types::EnrichedCard;
use crate::types::{NewTask, Recurrence};
use std::collections::HashMap;

/// Imported tasks default to the importing user's own bucket.
const DEFAULT_ASSIGNEE: &str = "me";

/// Outcome of the task-import stage.
#[derive(Debug, Default)]
pub struct TaskImportOutcome {
    /// Count of successfully inserted tasks.
    pub imported: usize,
    /// Per-card failures, in card order.
    pub errors: Vec<ItemError>,
    /// Card id → created task id, for the subtask stage.
    pub card_to_task: HashMap<String, String>,
}

/// Import enriched cards as tasks on `board_id`.
///
/// A failed insert records an error entry and moves on; sort positions
/// are the iteration index and are never renumbered after a skip.
/// Progress is reported after every card, success or not, so this
/// stage always reaches its full window.
pub async fn import_cards<S: Store, F: FnMut(f64, &str)>(
    store: &S,
    cards: &[EnrichedCard],
    board_id: &str,
    tags: &TagMapping,
    ctx: &ImportContext,
    reporter: &mut ProgressReporter<F>,
) -> TaskImportOutcome {
    let mut outcome = TaskImportOutcome::default();
    let total = cards.len();

    if total == 0 {
        reporter.update(Stage::Tasks, 1.0, "No cards to import");
        return outcome;
    }

    for (index, enriched) in cards.iter().enumerate() {
        let card = &enriched.card;

        // Labels with no reconciled tag are silently dropped.
        let tag_ids: Vec<String> = card
            .labels
            .iter()
            .filter_map(|label| tags.resolve(&label.id).map(String::from))
            .collect();

        let task = NewTask {
            user_id: ctx.user_id.clone(),
            board_id: board_id.to_string(),
            title: card.name.clone(),
            description: card.desc.clone().filter(|desc| !desc.is_empty()),
            completed: card.due_complete,
            assigned_to: DEFAULT_ASSIGNEE.to_string(),
            due_date: card.due,
            priority: mapping::infer_priority(&card.labels),
            status: mapping::status_for_list(&enriched.list_name),
            tags: tag_ids,
            recurring: Recurrence::None,
            sort_order: index as i64,
        };

        match store.create_task(task).await {
            Ok(created) => {
                outcome.card_to_task.insert(card.id.clone(), created.id);
                outcome.imported += 1;
            }
            Err(e) => {
                outcome.errors.push(ItemError::card(&card.name, e.to_string()));
            }
        }

        let fraction = (index + 1) as f64 / total as f64;
        reporter.update(
            Stage::Tasks,
            fraction,
            &format!("Importing tasks... {}%", (fraction * 100.0).round() as u32),
        );
    }

    outcome
}

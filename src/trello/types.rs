//! Wire types for the Trello REST API.
//!
//! Field names follow Trello's JSON (camelCase); everything here is a
//! read-only snapshot shape, deserialized once per fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trello member profile (`/members/me`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Board display preferences. Only the background color is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPrefs {
    #[serde(default)]
    pub background_color: Option<String>,
}

/// A Trello board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub prefs: Option<BoardPrefs>,
    #[serde(default)]
    pub date_last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed: bool,
}

/// A list (column) on a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub closed: bool,
}

/// A label. Trello allows nameless labels and colorless labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Label {
    /// Label name, treating Trello's empty string as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A card on a board, with its labels inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_complete: bool,
    pub id_list: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub closed: bool,
}

/// One item inside a checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckItem {
    pub name: String,
    #[serde(default)]
    pub pos: f64,
    /// "complete" or "incomplete".
    #[serde(default)]
    pub state: String,
}

impl CheckItem {
    pub fn is_complete(&self) -> bool {
        self.state == "complete"
    }
}

/// A checklist attached to a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    pub name: String,
    pub id_card: String,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub check_items: Vec<CheckItem>,
}

/// A card enriched at fetch time with its resolved list name and its
/// checklists, ready for the import pipeline.
#[derive(Debug, Clone)]
pub struct EnrichedCard {
    pub card: Card,
    pub list_name: String,
    pub checklists: Vec<Checklist>,
}

/// Summary counts for a fetched board.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SnapshotCounts {
    pub cards: usize,
    pub lists: usize,
    pub labels: usize,
    pub checklists: usize,
    pub checklist_items: usize,
}

/// Complete snapshot of one board, fetched once per import.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub board: Board,
    pub lists: Vec<List>,
    pub cards: Vec<EnrichedCard>,
    pub labels: Vec<Label>,
    pub summary: SnapshotCounts,
}

/// Lightweight preview counts for the board-selection UI.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSummary {
    pub board_name: String,
    pub card_count: usize,
    /// Count of distinct labels actually applied across the fetched
    /// cards, not the board-level label count.
    pub label_count: usize,
    pub checklist_item_count: usize,
}

//! Fixed translation tables from Trello vocabulary to the task model.
//!
//! Everything here is pure: no I/O, no state. Label colors drive tag
//! colors and priority inference; list names drive workflow status.

use crate::trello::types::Label;
use crate::types::{Priority, Status};

/// Trello label colors mapped to tag hex colors.
const COLOR_MAP: &[(&str, &str)] = &[
    ("red", "#EF4444"),
    ("orange", "#F97316"),
    ("yellow", "#F59E0B"),
    ("lime", "#84CC16"),
    ("green", "#10B981"),
    ("sky", "#0EA5E9"),
    ("blue", "#3B82F6"),
    ("purple", "#8B5CF6"),
    ("pink", "#EC4899"),
    ("black", "#374151"),
];

/// Hex color for labels with no color.
const NO_COLOR: &str = "#6B7280";

/// List-name keywords that mean a card is done.
const DONE_KEYWORDS: &[&str] = &["done", "complete", "finished", "shipped"];

/// List-name keywords that mean a card is being worked on.
const IN_PROGRESS_KEYWORDS: &[&str] = &["doing", "progress", "working", "active", "current"];

/// Tag color for a Trello label color. Unknown or absent colors map to
/// a neutral gray.
pub fn tag_color_for(color: Option<&str>) -> &'static str {
    color
        .and_then(|c| COLOR_MAP.iter().find(|(name, _)| *name == c))
        .map(|(_, hex)| *hex)
        .unwrap_or(NO_COLOR)
}

/// Priority inferred from a single label color, if any.
pub fn priority_for_color(color: Option<&str>) -> Option<Priority> {
    match color {
        Some("red") | Some("orange") => Some(Priority::High),
        Some("yellow") => Some(Priority::Medium),
        _ => None,
    }
}

/// Priority inferred from a card's labels.
///
/// The first label in iteration order that yields an inference wins;
/// later labels never override it.
pub fn infer_priority(labels: &[Label]) -> Priority {
    labels
        .iter()
        .find_map(|label| priority_for_color(label.color.as_deref()))
        .unwrap_or(Priority::None)
}

/// Workflow status for a card based on the name of the list it sits
/// in. Case-insensitive substring match; done beats in-progress, and
/// anything unrecognized is todo.
pub fn status_for_list(list_name: &str) -> Status {
    let normalized = list_name.to_lowercase();

    if DONE_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        return Status::Done;
    }

    if IN_PROGRESS_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        return Status::InProgress;
    }

    Status::Todo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(color: Option<&str>) -> Label {
        Label {
            id: "l".into(),
            name: Some("x".into()),
            color: color.map(String::from),
        }
    }

    #[test]
    fn colors_map_to_palette() {
        assert_eq!(tag_color_for(Some("red")), "#EF4444");
        assert_eq!(tag_color_for(Some("sky")), "#0EA5E9");
        assert_eq!(tag_color_for(Some("chartreuse")), NO_COLOR);
        assert_eq!(tag_color_for(None), NO_COLOR);
    }

    #[test]
    fn priority_from_single_color() {
        assert_eq!(priority_for_color(Some("red")), Some(Priority::High));
        assert_eq!(priority_for_color(Some("orange")), Some(Priority::High));
        assert_eq!(priority_for_color(Some("yellow")), Some(Priority::Medium));
        assert_eq!(priority_for_color(Some("green")), None);
        assert_eq!(priority_for_color(None), None);
    }

    #[test]
    fn first_matching_label_wins() {
        // yellow before red: the earlier inference sticks.
        let labels = vec![label(Some("yellow")), label(Some("red"))];
        assert_eq!(infer_priority(&labels), Priority::Medium);

        // Non-inferring colors are skipped, not treated as matches.
        let labels = vec![label(Some("green")), label(Some("red"))];
        assert_eq!(infer_priority(&labels), Priority::High);

        let labels = vec![label(None), label(Some("blue"))];
        assert_eq!(infer_priority(&labels), Priority::None);
        assert_eq!(infer_priority(&[]), Priority::None);
    }

    #[test]
    fn status_matches_case_insensitively() {
        assert_eq!(status_for_list("DOING"), Status::InProgress);
        assert_eq!(status_for_list("In Progress!!"), Status::InProgress);
        assert_eq!(status_for_list("Currently Active"), Status::InProgress);
        assert_eq!(status_for_list("Backlog"), Status::Todo);
    }

    #[test]
    fn done_takes_precedence_over_in_progress() {
        assert_eq!(status_for_list("Done"), Status::Done);
        assert_eq!(status_for_list("Shipped \u{1F680}"), Status::Done);
        // Contains both "working" and "finished"; done wins.
        assert_eq!(status_for_list("Working / Finished"), Status::Done);
        assert_eq!(status_for_list("Completed"), Status::Done);
    }
}

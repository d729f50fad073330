//! Error types for the import pipeline.
//!
//! The taxonomy follows the pipeline's failure semantics: fatal,
//! stage-level failures are `ImportError` variants and abort the whole
//! import; per-card and per-batch failures are captured as
//! [`ItemError`] entries on the result instead of being thrown.

use serde::Serialize;

/// Fatal, stage-level import failure.
///
/// Any of these aborts the import and propagates to the caller with a
/// human-readable message. The host UI displays the message and
/// returns the wizard to a retry-capable step.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// No Trello credentials are configured.
    #[error("Trello not connected. Please connect your Trello account first.")]
    NotConnected,

    /// Trello returned 401 for an authenticated request.
    #[error("Trello authorization expired. Please reconnect your account.")]
    AuthExpired,

    /// Trello returned a non-success status other than 401.
    #[error("Trello API error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Trello request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Creating the target board failed. Nothing else was written.
    #[error("Failed to create board: {0}")]
    BoardCreate(#[source] anyhow::Error),

    /// A store operation outside the per-item loops failed.
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// A recoverable, item-level failure folded into the import result.
///
/// Exactly one of `card` and `batch` is set: `card` names the card
/// whose task insert failed, `batch` holds the starting index of a
/// subtask batch that failed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<usize>,
    pub message: String,
}

impl ItemError {
    pub fn card(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            card: Some(name.into()),
            batch: None,
            message: message.into(),
        }
    }

    pub fn batch(start_index: usize, message: impl Into<String>) -> Self {
        Self {
            card: None,
            batch: Some(start_index),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref card) = self.card {
            write!(f, "card \"{}\": {}", card, self.message)
        } else if let Some(batch) = self.batch {
            write!(f, "subtask batch at {}: {}", batch, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

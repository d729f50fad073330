//! Trello API client.
//!
//! Thin authenticated wrapper over the Trello REST API plus the two
//! composite fetches the import pipeline runs on: a full board
//! snapshot ([`TrelloClient::fetch_board_for_import`]) and a cheap
//! preview ([`TrelloClient::get_board_summary`]).
//!
//! All reads are scoped to one board. The client performs no retries;
//! every network failure propagates to the caller.

pub mod types;

use crate::error::ImportError;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use types::{
    Board, BoardSnapshot, BoardSummary, Card, Checklist, EnrichedCard, Label, List, Member,
    SnapshotCounts,
};

const TRELLO_API_BASE: &str = "https://api.trello.com/1";

/// API key + member token pair obtained through the connect flow.
#[derive(Debug, Clone)]
pub struct TrelloCredentials {
    pub api_key: String,
    pub token: String,
}

/// Authenticated Trello API client.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    credentials: TrelloCredentials,
}

impl TrelloClient {
    pub fn new(credentials: TrelloCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TRELLO_API_BASE.to_string(),
            credentials,
        }
    }

    /// Override the API base URL (used by tests to point at a mock
    /// server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Issue an authenticated GET and deserialize the JSON response.
    ///
    /// 401 maps to [`ImportError::AuthExpired`]; any other non-success
    /// status maps to [`ImportError::Api`].
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ImportError> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}key={}&token={}",
            self.base_url,
            endpoint,
            separator,
            urlencoding::encode(&self.credentials.api_key),
            urlencoding::encode(&self.credentials.token),
        );

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ImportError::AuthExpired);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    /// Get the connected member's profile.
    pub async fn get_member(&self) -> Result<Member, ImportError> {
        self.get("/members/me?fields=id,fullName,username,email,avatarUrl")
            .await
    }

    /// Get all open boards for the connected member.
    pub async fn get_boards(&self) -> Result<Vec<Board>, ImportError> {
        self.get("/members/me/boards?fields=id,name,desc,dateLastActivity,prefs,closed&filter=open")
            .await
    }

    /// Get one board by id.
    pub async fn get_board(&self, board_id: &str) -> Result<Board, ImportError> {
        self.get(&format!("/boards/{board_id}?fields=id,name,desc,prefs"))
            .await
    }

    /// Get all open lists on a board.
    pub async fn get_lists(&self, board_id: &str) -> Result<Vec<List>, ImportError> {
        self.get(&format!(
            "/boards/{board_id}/lists?fields=id,name,pos,closed&filter=open"
        ))
        .await
    }

    /// Get all open cards on a board, labels inline.
    pub async fn get_cards(&self, board_id: &str) -> Result<Vec<Card>, ImportError> {
        self.get(&format!(
            "/boards/{board_id}/cards?fields=id,name,desc,due,dueComplete,idList,labels,pos,closed&filter=open"
        ))
        .await
    }

    /// Get all labels defined on a board.
    pub async fn get_labels(&self, board_id: &str) -> Result<Vec<Label>, ImportError> {
        self.get(&format!("/boards/{board_id}/labels?fields=id,name,color"))
            .await
    }

    /// Get every checklist on a board in one call, items included.
    pub async fn get_board_checklists(&self, board_id: &str) -> Result<Vec<Checklist>, ImportError> {
        self.get(&format!(
            "/boards/{board_id}/checklists?fields=id,name,idCard,pos&checkItems=all&checkItem_fields=name,pos,state"
        ))
        .await
    }

    /// Get the checklists of a single card.
    pub async fn get_card_checklists(&self, card_id: &str) -> Result<Vec<Checklist>, ImportError> {
        self.get(&format!(
            "/cards/{card_id}/checklists?fields=id,name,idCard,pos&checkItems=all&checkItem_fields=name,pos,state"
        ))
        .await
    }

    /// Fetch everything the import pipeline needs for one board in the
    /// minimum number of round trips.
    ///
    /// Board, lists, cards, checklists, and labels are requested
    /// concurrently and awaited together; the fetch fails as a whole
    /// if any sub-fetch fails. Cards come back enriched with their
    /// resolved list name and their checklists, in board order.
    pub async fn fetch_board_for_import(
        &self,
        board_id: &str,
    ) -> Result<BoardSnapshot, ImportError> {
        let (board, lists, cards, checklists, labels) = tokio::try_join!(
            self.get_board(board_id),
            self.get_lists(board_id),
            self.get_cards(board_id),
            self.get_board_checklists(board_id),
            self.get_labels(board_id),
        )?;

        let list_names: HashMap<&str, &str> = lists
            .iter()
            .map(|list| (list.id.as_str(), list.name.as_str()))
            .collect();

        let checklist_count = checklists.len();
        let checklist_item_count: usize =
            checklists.iter().map(|cl| cl.check_items.len()).sum();

        let mut checklists_by_card: HashMap<String, Vec<Checklist>> = HashMap::new();
        for checklist in checklists {
            checklists_by_card
                .entry(checklist.id_card.clone())
                .or_default()
                .push(checklist);
        }

        let summary = SnapshotCounts {
            cards: cards.len(),
            lists: lists.len(),
            labels: labels.len(),
            checklists: checklist_count,
            checklist_items: checklist_item_count,
        };

        let enriched = cards
            .into_iter()
            .map(|card| {
                let list_name = list_names
                    .get(card.id_list.as_str())
                    .map_or_else(|| "Unknown".to_string(), |name| (*name).to_string());
                let checklists = checklists_by_card.remove(&card.id).unwrap_or_default();
                EnrichedCard {
                    card,
                    list_name,
                    checklists,
                }
            })
            .collect();

        Ok(BoardSnapshot {
            board,
            lists,
            cards: enriched,
            labels,
            summary,
        })
    }

    /// Lightweight preview fetch: board, cards, and checklists only.
    ///
    /// Counts distinct labels actually applied across the cards rather
    /// than the board-level label set.
    pub async fn get_board_summary(&self, board_id: &str) -> Result<BoardSummary, ImportError> {
        let (board, cards, checklists) = tokio::try_join!(
            self.get_board(board_id),
            self.get_cards(board_id),
            self.get_board_checklists(board_id),
        )?;

        let checklist_item_count: usize =
            checklists.iter().map(|cl| cl.check_items.len()).sum();

        let applied_labels: HashSet<&str> = cards
            .iter()
            .flat_map(|card| card.labels.iter().map(|label| label.id.as_str()))
            .collect();

        Ok(BoardSummary {
            board_name: board.name,
            card_count: cards.len(),
            label_count: applied_labels.len(),
            checklist_item_count,
        })
    }
}

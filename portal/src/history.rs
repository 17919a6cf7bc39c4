//! History and bookmark recorder
//!
//! History writes are fire-and-forget: they need a signed-in identity, are
//! skipped quietly without one, and never fail the feature that triggered
//! them. Bookmarks are user-initiated, so a missing identity or a failed
//! write becomes a notice.

use crate::backend::{Backend, TableQuery, HISTORY_TABLE, SAVED_ITEMS_TABLE};
use crate::error::VidyaError;
use crate::models::{ActionKind, Bookmark, HistoryEvent, Identity, NewHistoryEvent, NewSavedItem, SavedItem};
use crate::notice::Notice;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// How a bookmark request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    AlreadySaved,
    SignInRequired,
    Unavailable,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub status: SaveStatus,
    pub notice: Notice,
}

impl SaveOutcome {
    fn new(status: SaveStatus, notice: Notice) -> Self {
        Self { status, notice }
    }
}

/// A signed-in user's recent activity, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserActivity {
    pub history: Vec<HistoryEvent>,
    pub saved: Vec<SavedItem>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone)]
pub struct Recorder<B> {
    backend: B,
    history_limit: usize,
}

impl<B: Backend + Sync> Recorder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Append an event to the signed-in user's history. Returns whether a
    /// row was written; every failure is logged and otherwise ignored.
    pub async fn record(&self, kind: ActionKind, content: Value) -> bool {
        let user = match self.backend.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(action = kind.as_str(), "no signed-in user; history not recorded");
                return false;
            }
            Err(e) => {
                tracing::warn!(action = kind.as_str(), error = %e, "could not resolve user for history");
                return false;
            }
        };

        let event = NewHistoryEvent {
            user_id: &user.id,
            action_type: kind,
            content: &content,
        };
        let row = match serde_json::to_value(&event) {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(action = kind.as_str(), error = %e, "could not encode history event");
                return false;
            }
        };

        match self.backend.insert(HISTORY_TABLE, row).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(action = kind.as_str(), error = %e, "failed to record history");
                false
            }
        }
    }

    /// Keep a bookmark in the signed-in user's collection
    pub async fn save(&self, bookmark: &Bookmark) -> SaveOutcome {
        if !self.backend.is_configured() {
            return SaveOutcome::new(SaveStatus::Unavailable, Notice::error("Service is not available."));
        }

        let user = match self.backend.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return SaveOutcome::new(
                    SaveStatus::SignInRequired,
                    Notice::error("Please login to save entries"),
                )
            }
            Err(e) => {
                tracing::error!(error = %e, "save: could not resolve user");
                return SaveOutcome::new(SaveStatus::Failed, Notice::error("Failed to save entry"));
            }
        };

        match self.insert_saved(&user, bookmark).await {
            Ok(()) => SaveOutcome::new(SaveStatus::Saved, Notice::success("Entry saved to your collection")),
            Err(e) if e.is_unique_violation() => {
                SaveOutcome::new(SaveStatus::AlreadySaved, Notice::info("Entry already saved"))
            }
            Err(e) => {
                tracing::error!(kind = bookmark.kind.as_str(), error = %e, "save entry failed");
                SaveOutcome::new(SaveStatus::Failed, Notice::error("Failed to save entry"))
            }
        }
    }

    async fn insert_saved(&self, user: &Identity, bookmark: &Bookmark) -> Result<(), VidyaError> {
        let row = serde_json::to_value(NewSavedItem {
            user_id: &user.id,
            item_type: bookmark.kind,
            item_id: bookmark.item_id.as_deref(),
            content: &bookmark.content,
        })?;
        self.backend.insert(SAVED_ITEMS_TABLE, row).await
    }

    /// Remove one saved item, then drop it from `items`. On failure `items`
    /// is left as it was.
    pub async fn delete(&self, items: &mut Vec<SavedItem>, id: &str) -> Notice {
        if !self.backend.is_configured() {
            return Notice::error("Service is not available");
        }
        match self.backend.delete(SAVED_ITEMS_TABLE, id).await {
            Ok(()) => {
                items.retain(|item| item.id != id);
                Notice::success("Item removed from saved collection")
            }
            Err(e) => {
                tracing::error!(id, error = %e, "delete saved item failed");
                Notice::error("Failed to remove item")
            }
        }
    }

    /// Recent history and every saved item for the signed-in user
    pub async fn load(&self) -> UserActivity {
        if !self.backend.is_configured() {
            return UserActivity {
                notices: vec![Notice::error("Service is not available")],
                ..UserActivity::default()
            };
        }

        let user = match self.backend.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return UserActivity {
                    notices: vec![Notice::error("Please login to view your history")],
                    ..UserActivity::default()
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "load user data: could not resolve user");
                return Self::load_failed();
            }
        };

        match self.fetch_activity(&user).await {
            Ok((history, saved)) => UserActivity {
                history,
                saved,
                notices: Vec::new(),
            },
            Err(e) => {
                tracing::error!(user = %user.id, error = %e, "load user data failed");
                Self::load_failed()
            }
        }
    }

    fn load_failed() -> UserActivity {
        UserActivity {
            notices: vec![Notice::error("Failed to load user data")],
            ..UserActivity::default()
        }
    }

    async fn fetch_activity(&self, user: &Identity) -> Result<(Vec<HistoryEvent>, Vec<SavedItem>), VidyaError> {
        let history = self
            .fetch_rows(
                TableQuery::from(HISTORY_TABLE)
                    .eq("user_id", user.id.as_str())
                    .order("created_at", false)
                    .limit(self.history_limit),
            )
            .await?;
        let saved = self
            .fetch_rows(
                TableQuery::from(SAVED_ITEMS_TABLE)
                    .eq("user_id", user.id.as_str())
                    .order("created_at", false),
            )
            .await?;
        Ok((history, saved))
    }

    /// Rows that do not decode are skipped so one bad record cannot hide the rest
    async fn fetch_rows<T: DeserializeOwned>(&self, query: TableQuery) -> Result<Vec<T>, VidyaError> {
        let rows = self.backend.select(&query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(table = %query.table, error = %e, "skipping undecodable row");
                    None
                }
            })
            .collect())
    }
}

//! Remote search: dictionary lookups and verse substring search
//!
//! Both searches validate the query before touching the network, reset
//! their results to empty on failure, and report one notice per outcome.
//! A successful search is recorded in the user's history; that write never
//! changes the outcome.

use crate::backend::{Backend, TableQuery, VERSES_TABLE};
use crate::error::VidyaError;
use crate::history::Recorder;
use crate::models::{ActionKind, DictionaryEntry, Verse};
use crate::notice::{plural, Notice};
use crate::source::DataSource;
use serde_json::json;

pub const DEFAULT_DICTIONARY_LIMIT: usize = 20;
pub const VERSE_SEARCH_LIMIT: usize = 20;

/// Columns a verse search matches against
pub const VERSE_SEARCH_COLUMNS: [&str; 4] =
    ["sanskrit", "english_translation", "hindi_translation", "commentary"];

/// Verse columns plus the parent text's summary
const VERSE_WITH_TEXT: &str = "*,texts:text_id(title,slug,category)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Completed,
    MissingQuery,
    Unavailable,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<T> {
    /// The trimmed query
    pub query: String,
    pub results: Vec<T>,
    pub status: SearchStatus,
    pub notices: Vec<Notice>,
}

impl<T> SearchOutcome<T> {
    fn rejected(query: &str, status: SearchStatus, notice: Notice) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
            status,
            notices: vec![notice],
        }
    }

    fn completed(query: &str, results: Vec<T>, notice: Notice) -> Self {
        Self {
            query: query.to_string(),
            results,
            status: SearchStatus::Completed,
            notices: vec![notice],
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SearchStatus::Completed
    }
}

/// Notices for one kind of search
struct Messages {
    missing: &'static str,
    unavailable: &'static str,
    empty: &'static str,
    failed: &'static str,
    singular: &'static str,
    plural: &'static str,
}

const DICTIONARY_MESSAGES: Messages = Messages {
    missing: "Please enter a word to search",
    unavailable: "Dictionary service is not available. Please check your configuration.",
    empty: "No entries found for your search",
    failed: "Failed to search dictionary. Please try again.",
    singular: "entry",
    plural: "entries",
};

const VERSE_MESSAGES: Messages = Messages {
    missing: "Please enter search terms",
    unavailable: "Search service is not available",
    empty: "No verses found for your search",
    failed: "Failed to search verses",
    singular: "verse",
    plural: "verses",
};

impl Messages {
    fn count(&self, count: usize) -> Notice {
        if count == 0 {
            Notice::info(self.empty)
        } else {
            Notice::success(format!("Found {}", plural(count, self.singular, self.plural)))
        }
    }
}

/// Validates, runs and reports one search. `run` is only awaited for a
/// non-empty query against an available service.
async fn run_search<T, Fut>(
    messages: &Messages,
    raw_query: &str,
    available: bool,
    run: impl FnOnce(String) -> Fut,
) -> SearchOutcome<T>
where
    Fut: std::future::Future<Output = Result<Vec<T>, VidyaError>>,
{
    let query = raw_query.trim();
    if query.is_empty() {
        return SearchOutcome::rejected(query, SearchStatus::MissingQuery, Notice::error(messages.missing));
    }
    if !available {
        return SearchOutcome::rejected(query, SearchStatus::Unavailable, Notice::error(messages.unavailable));
    }
    match run(query.to_string()).await {
        Ok(results) => {
            let notice = messages.count(results.len());
            SearchOutcome::completed(query, results, notice)
        }
        Err(e) => {
            tracing::error!(query, error = %e, "search failed");
            SearchOutcome::rejected(query, SearchStatus::Failed, Notice::error(messages.failed))
        }
    }
}

/// Dictionary lookup over any [`DataSource`]
#[derive(Debug, Clone)]
pub struct DictionarySearch<S, B> {
    source: S,
    recorder: Recorder<B>,
    limit: usize,
}

impl<S, B> DictionarySearch<S, B>
where
    S: DataSource + Sync,
    B: Backend + Sync,
{
    pub fn new(source: S, recorder: Recorder<B>) -> Self {
        Self {
            source,
            recorder,
            limit: DEFAULT_DICTIONARY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn recorder(&self) -> &Recorder<B> {
        &self.recorder
    }

    pub async fn search(&self, query: &str) -> SearchOutcome<DictionaryEntry> {
        let limit = self.limit;
        let outcome = run_search(&DICTIONARY_MESSAGES, query, self.source.is_available(), |q| async move {
            self.source.search_dictionary(&q, limit).await
        })
        .await;

        if outcome.is_completed() {
            self.recorder
                .record(
                    ActionKind::Search,
                    json!({ "query": outcome.query, "results_count": outcome.results.len() }),
                )
                .await;
        }
        outcome
    }
}

/// Substring search across verse text, translations and commentary
#[derive(Debug, Clone)]
pub struct VerseSearch<B> {
    backend: B,
    recorder: Recorder<B>,
    limit: usize,
}

impl<B> VerseSearch<B>
where
    B: Backend + Clone + Sync,
{
    pub fn new(backend: B) -> Self {
        Self {
            recorder: Recorder::new(backend.clone()),
            backend,
            limit: VERSE_SEARCH_LIMIT,
        }
    }

    pub fn with_recorder(mut self, recorder: Recorder<B>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn query_for(&self, needle: &str) -> TableQuery {
        TableQuery::from(VERSES_TABLE)
            .select(VERSE_WITH_TEXT)
            .any_contains(&VERSE_SEARCH_COLUMNS, needle)
            .limit(self.limit)
    }

    pub async fn search(&self, query: &str) -> SearchOutcome<Verse> {
        let outcome = run_search(&VERSE_MESSAGES, query, self.backend.is_configured(), |q| async move {
            let rows = self.backend.select(&self.query_for(&q)).await?;
            rows.into_iter()
                .map(|row| serde_json::from_value(row).map_err(VidyaError::from))
                .collect::<Result<Vec<Verse>, _>>()
        })
        .await;

        if outcome.is_completed() {
            self.recorder
                .record(
                    ActionKind::VerseSearch,
                    json!({ "query": outcome.query, "results_count": outcome.results.len() }),
                )
                .await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Operation, Unconfigured, DICTIONARY_TABLE, HISTORY_TABLE};
    use crate::models::Identity;
    use crate::notice::{error_count, NoticeLevel};
    use crate::source::{RemoteSource, StaticSource};
    use std::sync::Arc;

    fn dictionary_backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_rows(
            DICTIONARY_TABLE,
            vec![
                json!({ "id": "1", "word": "धर्म", "transliteration": "dharma", "meaning": "Righteous conduct" }),
                json!({ "id": "2", "word": "कर्म", "transliteration": "karma", "meaning": "Action" }),
            ],
        ))
    }

    fn remote_search(backend: &Arc<MemoryBackend>) -> DictionarySearch<RemoteSource<Arc<MemoryBackend>>, Arc<MemoryBackend>> {
        DictionarySearch::new(RemoteSource::new(backend.clone()), Recorder::new(backend.clone()))
    }

    fn sign_in(backend: &MemoryBackend) {
        backend.sign_in(Identity {
            id: "u1".to_string(),
            email: None,
        });
    }

    #[tokio::test]
    async fn blank_query_fails_fast_without_network() {
        let backend = dictionary_backend();
        let outcome = remote_search(&backend).search("   ").await;
        assert_eq!(outcome.status, SearchStatus::MissingQuery);
        assert_eq!(outcome.notices, vec![Notice::error("Please enter a word to search")]);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn unconfigured_service_is_reported() {
        let search = DictionarySearch::new(RemoteSource::new(Unconfigured), Recorder::new(Unconfigured));
        let outcome = search.search("dharma").await;
        assert_eq!(outcome.status, SearchStatus::Unavailable);
        assert_eq!(
            outcome.notices[0].message,
            "Dictionary service is not available. Please check your configuration."
        );
    }

    #[tokio::test]
    async fn found_entries_are_counted() {
        let backend = dictionary_backend();
        let outcome = remote_search(&backend).search(" DHARMA ").await;
        assert_eq!(outcome.query, "DHARMA");
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.notices, vec![Notice::success("Found 1 entry")]);
    }

    #[tokio::test]
    async fn no_match_is_informational() {
        let backend = dictionary_backend();
        let outcome = remote_search(&backend).search("zzz").await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.notices[0].level, NoticeLevel::Info);
        assert_eq!(error_count(&outcome.notices), 0);
    }

    #[tokio::test]
    async fn failure_yields_empty_list_and_one_error() {
        let backend = dictionary_backend();
        backend.fail(Operation::Invoke);
        let outcome = remote_search(&backend).search("dharma").await;
        assert_eq!(outcome.status, SearchStatus::Failed);
        assert!(outcome.results.is_empty());
        assert_eq!(error_count(&outcome.notices), 1);
        assert_eq!(outcome.notices[0].message, "Failed to search dictionary. Please try again.");
    }

    #[tokio::test]
    async fn successful_search_records_history_for_signed_in_user() {
        let backend = dictionary_backend();
        sign_in(&backend);
        remote_search(&backend).search("karma").await;
        let rows = backend.rows(HISTORY_TABLE);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["action_type"], "search");
        assert_eq!(rows[0]["content"], json!({ "query": "karma", "results_count": 1 }));
    }

    #[tokio::test]
    async fn history_failure_does_not_change_the_result() {
        let backend = dictionary_backend();
        sign_in(&backend);
        backend.fail(Operation::Insert);
        let outcome = remote_search(&backend).search("karma").await;
        assert!(outcome.is_completed());
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(error_count(&outcome.notices), 0);
    }

    #[tokio::test]
    async fn static_source_exact_key() {
        let search = DictionarySearch::new(StaticSource::new(), Recorder::new(Unconfigured));
        let outcome = search.search("dharma").await;
        let words: Vec<&str> = outcome.results.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["धर्म"]);
    }

    #[test]
    fn verse_query_targets_four_columns_with_parent_text() {
        let params = VerseSearch::new(Unconfigured).query_for("karma").to_params();
        assert_eq!(params[0].1, "*,texts:text_id(title,slug,category)");
        assert_eq!(params[1].0, "or");
        assert!(params[1].1.contains("hindi_translation.ilike"));
        assert_eq!(params[1].1.matches(".ilike.").count(), 4);
        assert_eq!(params[2], ("limit".to_string(), "20".to_string()));
    }

    fn verse_backend() -> Arc<MemoryBackend> {
        let verses = (1..=25)
            .map(|n| {
                json!({ "id": format!("v{}", n), "text_id": "t1", "chapter": 2, "verse": n,
                        "sanskrit": "कर्मण्येवाधिकारस्ते",
                        "english_translation": format!("On action alone, line {}", n) })
            })
            .chain(std::iter::once(json!({
                "id": "other", "text_id": "t2", "chapter": 1, "verse": 1,
                "sanskrit": "ॐ", "commentary": "The primordial sound"
            })))
            .collect();
        Arc::new(MemoryBackend::new().with_rows(VERSES_TABLE, verses))
    }

    #[tokio::test]
    async fn verse_search_caps_at_twenty_and_records() {
        let backend = verse_backend();
        sign_in(&backend);
        let outcome = VerseSearch::new(backend.clone()).search("ACTION").await;
        assert_eq!(outcome.results.len(), 20);
        assert_eq!(outcome.notices, vec![Notice::success("Found 20 verses")]);
        assert_eq!(backend.rows(HISTORY_TABLE)[0]["action_type"], "verse_search");
    }

    #[tokio::test]
    async fn verse_search_matches_commentary() {
        let outcome = VerseSearch::new(verse_backend()).search("primordial").await;
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].id.as_deref(), Some("other"));
    }

    #[tokio::test]
    async fn verse_search_messages() {
        let backend = verse_backend();
        let search = VerseSearch::new(backend.clone());
        assert_eq!(search.search("").await.notices, vec![Notice::error("Please enter search terms")]);
        assert_eq!(search.search("   ").await.status, SearchStatus::MissingQuery);
        assert_eq!(backend.request_count(), 0);
        assert_eq!(
            search.search("nothing-like-this").await.notices,
            vec![Notice::info("No verses found for your search")]
        );

        let unconfigured = VerseSearch::new(Unconfigured).search("karma").await;
        assert_eq!(unconfigured.notices, vec![Notice::error("Search service is not available")]);

        let backend = verse_backend();
        backend.fail(Operation::Select);
        let failed = VerseSearch::new(backend).search("karma").await;
        assert_eq!(failed.notices, vec![Notice::error("Failed to search verses")]);
        assert!(failed.results.is_empty());
    }
}

//! In-memory backend for demos and tests
//!
//! Keeps tables as JSON rows, serves the dictionary and text-content
//! functions over them, enforces configured uniqueness keys, and counts every
//! request so callers can assert that nothing reached the network.

use super::{Backend, Filter, TableQuery};
use crate::error::VidyaError;
use crate::models::Identity;
use crate::wire::{
    DictionarySearchRequest, TextContentRequest, DICTIONARY_SEARCH_FUNCTION, TEXT_CONTENT_FUNCTION,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};

pub const DICTIONARY_TABLE: &str = "dictionary";
pub const TEXTS_TABLE: &str = "texts";

/// Operations that can be made to fail on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Invoke,
    Select,
    Insert,
    Delete,
    Auth,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    unique_keys: HashMap<String, Vec<String>>,
    identity: Mutex<Option<Identity>>,
    failing: Mutex<HashSet<Operation>>,
    requests: AtomicUsize,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, VidyaError> {
    mutex
        .lock()
        .map_err(|_| VidyaError::Other("Failed to acquire backend lock".to_string()))
}

fn field_str(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn contains_ci(row: &Value, column: &str, needle_lower: &str) -> bool {
    field_str(row, column)
        .map(|v| v.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => field_str(row, column).as_deref() == Some(value.as_str()),
        Filter::AnyContains { columns, needle } => {
            let needle = needle.to_lowercase();
            columns.iter().any(|c| contains_ci(row, c, &needle))
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inserts into `table` that repeat the values of `columns`
    pub fn with_unique(mut self, table: &str, columns: &[&str]) -> Self {
        self.unique_keys.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Uniqueness keys the hosted schema declares for saved items
    pub fn with_portal_schema(self) -> Self {
        self.with_unique(super::SAVED_ITEMS_TABLE, &["user_id", "item_type", "item_id"])
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.entry(table.to_string()).or_default().extend(rows);
        }
        self
    }

    pub fn sign_in(&self, identity: Identity) {
        if let Ok(mut current) = self.identity.lock() {
            *current = Some(identity);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut current) = self.identity.lock() {
            *current = None;
        }
    }

    pub fn fail(&self, operation: Operation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(operation);
        }
    }

    pub fn recover(&self, operation: Operation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(&operation);
        }
    }

    /// Number of calls that would have gone over the network
    pub fn request_count(&self) -> usize {
        self.requests.load(AtomicOrdering::SeqCst)
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn begin(&self, operation: Operation) -> Result<(), VidyaError> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);
        if lock(&self.failing)?.contains(&operation) {
            return Err(VidyaError::Network(format!("simulated {:?} failure", operation)));
        }
        Ok(())
    }

    fn run_query(&self, query: &TableQuery) -> Result<Vec<Value>, VidyaError> {
        let tables = lock(&self.tables)?;
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| compare_values(a.get(&order.column), b.get(&order.column)));
            if !order.ascending {
                // Newest insert first among equal keys
                rows.reverse();
            }
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn dictionary_search(&self, body: Value) -> Result<Value, VidyaError> {
        let request: DictionarySearchRequest = serde_json::from_value(body)?;
        let query = request.query.trim();
        if query.is_empty() {
            return Err(VidyaError::Remote {
                status: 400,
                message: "Query parameter is required".to_string(),
            });
        }
        let results = self.run_query(
            &TableQuery::from(DICTIONARY_TABLE)
                .any_contains(&["word", "transliteration", "meaning"], query)
                .order("word", true)
                .limit(request.limit),
        )?;
        Ok(json!({ "results": results }))
    }

    fn text_content(&self, body: Value) -> Result<Value, VidyaError> {
        let request: TextContentRequest = serde_json::from_value(body)?;
        let Some(slug) = request.text_slug else {
            let texts = self.run_query(&TableQuery::from(TEXTS_TABLE).order("title", true))?;
            return Ok(json!({ "texts": texts }));
        };

        let text = self
            .run_query(&TableQuery::from(TEXTS_TABLE).eq("slug", slug.as_str()))?
            .into_iter()
            .next()
            .ok_or_else(|| VidyaError::Remote {
                status: 404,
                message: format!("text '{}' not found", slug),
            })?;
        let text_id = field_str(&text, "id").unwrap_or_default();
        let verses_query = TableQuery::from(super::VERSES_TABLE).eq("text_id", text_id);

        match (request.chapter, request.verse) {
            (Some(chapter), Some(verse)) => {
                let found = self
                    .run_query(
                        &verses_query
                            .eq("chapter", chapter.to_string())
                            .eq("verse", verse.to_string()),
                    )?
                    .into_iter()
                    .next()
                    .ok_or_else(|| VidyaError::Remote {
                        status: 404,
                        message: format!("{} {}.{} not found", slug, chapter, verse),
                    })?;
                Ok(json!({ "verse": found }))
            }
            _ => {
                let mut verses = self.run_query(&verses_query)?;
                verses.sort_by(|a, b| {
                    compare_values(a.get("chapter"), b.get("chapter"))
                        .then_with(|| compare_values(a.get("verse"), b.get("verse")))
                });
                Ok(json!({ "text": text, "verses": verses }))
            }
        }
    }
}

impl Backend for MemoryBackend {
    fn is_configured(&self) -> bool {
        true
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, VidyaError> {
        self.begin(Operation::Invoke)?;
        match function {
            DICTIONARY_SEARCH_FUNCTION => self.dictionary_search(body),
            TEXT_CONTENT_FUNCTION => self.text_content(body),
            other => Err(VidyaError::Remote {
                status: 404,
                message: format!("function '{}' not found", other),
            }),
        }
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, VidyaError> {
        self.begin(Operation::Select)?;
        self.run_query(query)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), VidyaError> {
        self.begin(Operation::Insert)?;
        let Value::Object(mut row) = row else {
            return Err(VidyaError::Other("rows must be JSON objects".to_string()));
        };

        let mut tables = lock(&self.tables)?;
        let existing = tables.entry(table.to_string()).or_default();
        if let Some(columns) = self.unique_keys.get(table) {
            let candidate = Value::Object(row.clone());
            // A null key column never collides, as in Postgres
            let duplicate = existing.iter().any(|stored| {
                columns.iter().all(|c| match field_str(&candidate, c) {
                    Some(value) => field_str(stored, c).as_deref() == Some(value.as_str()),
                    None => false,
                })
            });
            if duplicate {
                return Err(VidyaError::UniqueViolation(format!(
                    "duplicate key value violates unique constraint on {}",
                    table
                )));
            }
        }

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        row.entry("id").or_insert_with(|| json!(id.to_string()));
        row.entry("created_at")
            .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        existing.push(Value::Object(row));
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), VidyaError> {
        self.begin(Operation::Delete)?;
        let mut tables = lock(&self.tables)?;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| field_str(row, "id").as_deref() != Some(id));
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Identity>, VidyaError> {
        self.begin(Operation::Auth)?;
        Ok(lock(&self.identity)?.clone())
    }
}

//! Hosted backend capability
//!
//! Every component talks to the backend through [`Backend`]. The portal ships
//! a REST client for the hosted service, an explicit [`Unconfigured`] variant
//! used when credentials are missing, and an in-memory store for demos and
//! tests. [`BackendClient`] picks between the first two at startup so views
//! never carry an optional client around.

mod memory;
mod rest;

pub use memory::{MemoryBackend, Operation, DICTIONARY_TABLE, TEXTS_TABLE};
pub use rest::RestBackend;

use crate::config::BackendConfig;
use crate::error::VidyaError;
use crate::models::Identity;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

pub const HISTORY_TABLE: &str = "user_history";
pub const SAVED_ITEMS_TABLE: &str = "saved_items";
pub const VERSES_TABLE: &str = "verses";

pub trait Backend {
    /// Whether credentials are present; `false` only for [`Unconfigured`]
    fn is_configured(&self) -> bool;

    /// Call a named server-side function with a JSON body
    fn invoke(
        &self,
        function: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, VidyaError>> + Send;

    fn select(&self, query: &TableQuery)
        -> impl Future<Output = Result<Vec<Value>, VidyaError>> + Send;

    /// Insert one row. A uniqueness violation is reported as
    /// [`VidyaError::UniqueViolation`].
    fn insert(
        &self,
        table: &str,
        row: Value,
    ) -> impl Future<Output = Result<(), VidyaError>> + Send;

    fn delete(&self, table: &str, id: &str) -> impl Future<Output = Result<(), VidyaError>> + Send;

    /// The signed-in identity, `None` when nobody is signed in
    fn current_user(&self) -> impl Future<Output = Result<Option<Identity>, VidyaError>> + Send;
}

/// Views share one client through an `Arc`
impl<B> Backend for Arc<B>
where
    B: Backend + Send + Sync,
{
    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, VidyaError> {
        (**self).invoke(function, body).await
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, VidyaError> {
        (**self).select(query).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), VidyaError> {
        (**self).insert(table, row).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), VidyaError> {
        (**self).delete(table, id).await
    }

    async fn current_user(&self) -> Result<Option<Identity>, VidyaError> {
        (**self).current_user().await
    }
}

// ============ Table queries ============

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: String },
    /// Case-insensitive substring match on any of the columns
    AnyContains { columns: Vec<String>, needle: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A read against one table, rendered to REST query parameters by
/// [`RestBackend`] and evaluated directly by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl TableQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn any_contains(mut self, columns: &[&str], needle: &str) -> Self {
        self.filters.push(Filter::AnyContains {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            needle: needle.to_string(),
        });
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in the hosted backend's REST dialect
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => {
                    params.push((column.clone(), format!("eq.{}", value)));
                }
                Filter::AnyContains { columns, needle } => {
                    let pattern = quote_value(&format!("*{}*", needle));
                    let clauses: Vec<String> = columns
                        .iter()
                        .map(|column| format!("{}.ilike.{}", column, pattern))
                        .collect();
                    params.push(("or".to_string(), format!("({})", clauses.join(","))));
                }
            }
        }
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Double-quotes a value so commas and parentheses in user input cannot
/// break out of a logical filter group.
fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

// ============ Unconfigured backend ============

/// Stand-in used when backend credentials are missing. Reads and writes
/// fail with [`VidyaError::NotConfigured`]; nobody is ever signed in.
#[derive(Debug, Clone, Default)]
pub struct Unconfigured;

impl Unconfigured {
    fn error() -> VidyaError {
        VidyaError::NotConfigured("backend URL and anon key are not set".to_string())
    }
}

impl Backend for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn invoke(&self, _function: &str, _body: Value) -> Result<Value, VidyaError> {
        Err(Self::error())
    }

    async fn select(&self, _query: &TableQuery) -> Result<Vec<Value>, VidyaError> {
        Err(Self::error())
    }

    async fn insert(&self, _table: &str, _row: Value) -> Result<(), VidyaError> {
        Err(Self::error())
    }

    async fn delete(&self, _table: &str, _id: &str) -> Result<(), VidyaError> {
        Err(Self::error())
    }

    async fn current_user(&self) -> Result<Option<Identity>, VidyaError> {
        Ok(None)
    }
}

// ============ Configured-or-not client ============

/// The backend chosen from configuration at startup
#[derive(Debug, Clone)]
pub enum BackendClient {
    Rest(RestBackend),
    Unconfigured(Unconfigured),
}

impl BackendClient {
    pub fn from_config(config: &BackendConfig) -> Self {
        if !config.is_configured() {
            tracing::warn!("backend credentials missing; dependent features are disabled");
            return BackendClient::Unconfigured(Unconfigured);
        }
        match RestBackend::new(config) {
            Ok(rest) => BackendClient::Rest(rest),
            Err(e) => {
                tracing::error!(error = %e, "failed to build backend client");
                BackendClient::Unconfigured(Unconfigured)
            }
        }
    }
}

impl Backend for BackendClient {
    fn is_configured(&self) -> bool {
        match self {
            BackendClient::Rest(b) => b.is_configured(),
            BackendClient::Unconfigured(b) => b.is_configured(),
        }
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, VidyaError> {
        match self {
            BackendClient::Rest(b) => b.invoke(function, body).await,
            BackendClient::Unconfigured(b) => b.invoke(function, body).await,
        }
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, VidyaError> {
        match self {
            BackendClient::Rest(b) => b.select(query).await,
            BackendClient::Unconfigured(b) => b.select(query).await,
        }
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), VidyaError> {
        match self {
            BackendClient::Rest(b) => b.insert(table, row).await,
            BackendClient::Unconfigured(b) => b.insert(table, row).await,
        }
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), VidyaError> {
        match self {
            BackendClient::Rest(b) => b.delete(table, id).await,
            BackendClient::Unconfigured(b) => b.delete(table, id).await,
        }
    }

    async fn current_user(&self) -> Result<Option<Identity>, VidyaError> {
        match self {
            BackendClient::Rest(b) => b.current_user().await,
            BackendClient::Unconfigured(b) => b.current_user().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_history_query() {
        let query = TableQuery::from(HISTORY_TABLE)
            .eq("user_id", "u1")
            .order("created_at", false)
            .limit(50);
        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn renders_any_contains_as_quoted_or_group() {
        let query = TableQuery::from(VERSES_TABLE).any_contains(&["sanskrit", "commentary"], "karma, (yoga)");
        let params = query.to_params();
        assert_eq!(
            params[1],
            (
                "or".to_string(),
                "(sanskrit.ilike.\"*karma, (yoga)*\",commentary.ilike.\"*karma, (yoga)*\")".to_string()
            )
        );
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote_value("say \"om\""), "\"say \\\"om\\\"\"");
    }

    #[tokio::test]
    async fn unconfigured_backend_has_no_identity_and_refuses_calls() {
        let backend = BackendClient::from_config(&BackendConfig::default());
        assert!(!backend.is_configured());
        assert_eq!(backend.current_user().await.unwrap(), None);
        let err = backend.invoke("dictionary-search", Value::Null).await.unwrap_err();
        assert!(matches!(err, VidyaError::NotConfigured(_)));
    }
}

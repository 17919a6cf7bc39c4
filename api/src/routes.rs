//! HTTP routes serving the backend functions over the content database

use crate::db::Database;
use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use vidya_lib::wire::{
    CatalogResponse, DictionarySearchRequest, DictionarySearchResponse, TextContentRequest,
    VerseResponse,
};

pub struct AppState {
    pub db: Database,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    texts: i64,
}

const MISSING_QUERY: &str = "Query parameter is required";

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/functions/v1/dictionary-search", post(dictionary_search))
        .route("/functions/v1/text-content", post(text_content))
        .layer(cors)
        .with_state(state)
}

/// Run a blocking database call off the async runtime
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || f(&db)).await?
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let texts = blocking(&state, |db| Ok(db.count_texts()?)).await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        texts,
    }))
}

async fn dictionary_search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DictionarySearchRequest>, JsonRejection>,
) -> Result<Json<DictionarySearchResponse>, ApiError> {
    let Ok(Json(request)) = body else {
        return Err(ApiError::BadRequest(MISSING_QUERY.to_string()));
    };
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest(MISSING_QUERY.to_string()));
    }

    tracing::debug!(query = %request.query, limit = request.limit, "dictionary search");
    let results = blocking(&state, move |db| {
        Ok(db.search_dictionary(&request.query, request.limit)?)
    })
    .await?;
    Ok(Json(DictionarySearchResponse { results }))
}

/// An empty body lists the catalog, same as `{}`
async fn text_content(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let request: TextContentRequest = if body.is_empty() {
        TextContentRequest::catalog()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    match request {
        TextContentRequest {
            text_slug: Some(slug),
            chapter: Some(chapter),
            verse: Some(verse),
        } => {
            let key = slug.clone();
            let found = blocking(&state, move |db| Ok(db.verse(&key, chapter, verse)?)).await?;
            let verse = found
                .ok_or_else(|| ApiError::NotFound(format!("{} {}.{}", slug, chapter, verse)))?;
            Ok(Json(VerseResponse { verse }).into_response())
        }
        TextContentRequest {
            text_slug: Some(slug),
            ..
        } => {
            let key = slug.clone();
            let found = blocking(&state, move |db| Ok(db.text_with_verses(&key)?)).await?;
            let text = found.ok_or_else(|| ApiError::NotFound(slug))?;
            Ok(Json(text).into_response())
        }
        _ => {
            let texts = blocking(&state, |db| Ok(db.list_texts()?)).await?;
            Ok(Json(CatalogResponse { texts }).into_response())
        }
    }
}

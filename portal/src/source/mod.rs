//! Where views get their catalog and dictionary entries from
//!
//! One capability, [`DataSource`], with three implementations: the built-in
//! [`StaticSource`], the backend-driven [`RemoteSource`], and
//! [`TieredSource`], which tries a primary source and falls back to a
//! secondary one.

mod fallback;
mod remote;

pub use fallback::{builtin_texts, demo_dictionary, NoMatchPolicy, StaticSource};
pub use remote::RemoteSource;

use crate::error::VidyaError;
use crate::models::{DictionaryEntry, Text};
use std::future::Future;

pub trait DataSource {
    /// `false` when the source cannot be reached at all (missing config)
    fn is_available(&self) -> bool {
        true
    }

    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<Text>, VidyaError>> + Send;

    fn search_dictionary(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<DictionaryEntry>, VidyaError>> + Send;
}

/// Which tier answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub items: T,
    pub origin: Origin,
}

/// Primary source with a secondary one used when the primary is unavailable
/// or fails. Callers see [`Origin::Fallback`] and report it as information,
/// not as an error.
#[derive(Debug, Clone)]
pub struct TieredSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> TieredSource<P, F>
where
    P: DataSource + Sync,
    F: DataSource + Sync,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub async fn fetch_catalog_sourced(&self) -> Result<Sourced<Vec<Text>>, VidyaError> {
        if self.primary.is_available() {
            match self.primary.fetch_catalog().await {
                Ok(items) => {
                    return Ok(Sourced {
                        items,
                        origin: Origin::Primary,
                    })
                }
                Err(e) => {
                    tracing::warn!(error = %e, "primary catalog failed; using fallback");
                }
            }
        } else {
            tracing::debug!("primary catalog unavailable; using fallback");
        }
        let items = self.fallback.fetch_catalog().await?;
        Ok(Sourced {
            items,
            origin: Origin::Fallback,
        })
    }

    pub async fn search_dictionary_sourced(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Sourced<Vec<DictionaryEntry>>, VidyaError> {
        if self.primary.is_available() {
            match self.primary.search_dictionary(query, limit).await {
                Ok(items) => {
                    return Ok(Sourced {
                        items,
                        origin: Origin::Primary,
                    })
                }
                Err(e) => {
                    tracing::warn!(error = %e, query, "primary dictionary failed; using fallback");
                }
            }
        }
        let items = self.fallback.search_dictionary(query, limit).await?;
        Ok(Sourced {
            items,
            origin: Origin::Fallback,
        })
    }
}

impl<P, F> DataSource for TieredSource<P, F>
where
    P: DataSource + Sync,
    F: DataSource + Sync,
{
    fn is_available(&self) -> bool {
        self.primary.is_available() || self.fallback.is_available()
    }

    async fn fetch_catalog(&self) -> Result<Vec<Text>, VidyaError> {
        Ok(self.fetch_catalog_sourced().await?.items)
    }

    async fn search_dictionary(&self, query: &str, limit: usize) -> Result<Vec<DictionaryEntry>, VidyaError> {
        Ok(self.search_dictionary_sourced(query, limit).await?.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Operation, Unconfigured, TEXTS_TABLE};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn unconfigured_primary_falls_back_without_a_request() {
        let tiered = TieredSource::new(RemoteSource::new(Unconfigured), StaticSource::new());
        let sourced = tiered.fetch_catalog_sourced().await.unwrap();
        assert_eq!(sourced.origin, Origin::Fallback);
        assert_eq!(sourced.items.len(), 24);
    }

    #[tokio::test]
    async fn failing_primary_falls_back() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail(Operation::Invoke);
        let tiered = TieredSource::new(RemoteSource::new(backend.clone()), StaticSource::new());
        let sourced = tiered.fetch_catalog_sourced().await.unwrap();
        assert_eq!(sourced.origin, Origin::Fallback);
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn healthy_primary_wins_even_when_empty() {
        let backend = Arc::new(MemoryBackend::new().with_rows(
            TEXTS_TABLE,
            vec![json!({
                "id": "t1", "slug": "vedas", "title": "Vedas", "category": "Scripture",
                "description": "Hymns", "chapters": 4, "verses": 20000
            })],
        ));
        let tiered = TieredSource::new(RemoteSource::new(backend), StaticSource::new());
        let sourced = tiered.fetch_catalog_sourced().await.unwrap();
        assert_eq!(sourced.origin, Origin::Primary);
        assert_eq!(sourced.items.len(), 1);

        let sourced = tiered.search_dictionary_sourced("dharma", 20).await.unwrap();
        assert_eq!(sourced.origin, Origin::Primary);
        assert!(sourced.items.is_empty());
    }
}

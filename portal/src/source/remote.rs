//! Backend-driven catalog and dictionary

use super::DataSource;
use crate::backend::Backend;
use crate::error::VidyaError;
use crate::models::{DictionaryEntry, Text, Verse};
use crate::wire::{
    CatalogResponse, DictionarySearchRequest, DictionarySearchResponse, TextContentRequest,
    TextWithVerses, VerseResponse, DICTIONARY_SEARCH_FUNCTION, TEXT_CONTENT_FUNCTION,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct RemoteSource<B> {
    backend: B,
}

impl<B: Backend + Sync> RemoteSource<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn call<Req, Resp>(&self, function: &str, request: &Req) -> Result<Resp, VidyaError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_value(request)?;
        let value = self.backend.invoke(function, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// One text with all of its verses, in chapter/verse order
    pub async fn fetch_text(&self, slug: &str) -> Result<TextWithVerses, VidyaError> {
        self.call(TEXT_CONTENT_FUNCTION, &TextContentRequest::text(slug))
            .await
    }

    pub async fn fetch_verse(&self, slug: &str, chapter: u32, verse: u32) -> Result<Verse, VidyaError> {
        let response: VerseResponse = self
            .call(TEXT_CONTENT_FUNCTION, &TextContentRequest::verse(slug, chapter, verse))
            .await?;
        Ok(response.verse)
    }
}

impl<B: Backend + Sync> DataSource for RemoteSource<B> {
    fn is_available(&self) -> bool {
        self.backend.is_configured()
    }

    async fn fetch_catalog(&self) -> Result<Vec<Text>, VidyaError> {
        let response: CatalogResponse = self
            .call(TEXT_CONTENT_FUNCTION, &TextContentRequest::catalog())
            .await?;
        Ok(response.texts)
    }

    async fn search_dictionary(&self, query: &str, limit: usize) -> Result<Vec<DictionaryEntry>, VidyaError> {
        let request = DictionarySearchRequest {
            query: query.trim().to_string(),
            limit,
        };
        let response: DictionarySearchResponse = self.call(DICTIONARY_SEARCH_FUNCTION, &request).await?;
        Ok(response.results.into_iter().map(DictionaryEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, DICTIONARY_TABLE, TEXTS_TABLE, VERSES_TABLE};
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_rows(
                TEXTS_TABLE,
                vec![
                    json!({ "id": "t2", "slug": "vedas", "title": "Vedas", "category": "Scripture",
                            "description": "Hymns", "chapters": 4, "verses": 20000 }),
                    json!({ "id": "t1", "slug": "bhagavad-gita", "title": "Bhagavad Gita",
                            "category": "Philosophy", "description": "Krishna and Arjuna",
                            "chapters": 18, "verses": 700 }),
                ],
            )
            .with_rows(
                VERSES_TABLE,
                vec![
                    json!({ "id": "v2", "text_id": "t1", "chapter": 2, "verse": 47,
                            "sanskrit": "कर्मण्येवाधिकारस्ते मा फलेषु कदाचन।" }),
                    json!({ "id": "v1", "text_id": "t1", "chapter": 1, "verse": 1,
                            "sanskrit": "धर्मक्षेत्रे कुरुक्षेत्रे" }),
                ],
            )
            .with_rows(
                DICTIONARY_TABLE,
                vec![json!({ "id": "d1", "word": "धर्म", "transliteration": "dharma",
                             "meaning": "Righteous conduct", "usage_examples": ["धर्मो रक्षति रक्षितः"] })],
            )
    }

    #[tokio::test]
    async fn catalog_is_ordered_by_title() {
        let source = RemoteSource::new(backend());
        let texts = source.fetch_catalog().await.unwrap();
        let titles: Vec<&str> = texts.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Bhagavad Gita", "Vedas"]);
    }

    #[tokio::test]
    async fn text_comes_with_ordered_verses() {
        let source = RemoteSource::new(backend());
        let text = source.fetch_text("bhagavad-gita").await.unwrap();
        assert_eq!(text.text.title, "Bhagavad Gita");
        let refs: Vec<(u32, u32)> = text.verses.iter().map(|v| (v.chapter, v.verse)).collect();
        assert_eq!(refs, vec![(1, 1), (2, 47)]);
    }

    #[tokio::test]
    async fn single_verse_lookup() {
        let source = RemoteSource::new(backend());
        let verse = source.fetch_verse("bhagavad-gita", 2, 47).await.unwrap();
        assert_eq!(verse.id.as_deref(), Some("v2"));
        assert!(source.fetch_verse("bhagavad-gita", 9, 9).await.is_err());
    }

    #[tokio::test]
    async fn dictionary_rows_become_entries() {
        let source = RemoteSource::new(backend());
        let entries = source.search_dictionary("  righteous ", 20).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].primary_meaning(), Some("Righteous conduct"));
        assert_eq!(entries[0].examples[0].native, "धर्मो रक्षति रक्षितः");
    }
}

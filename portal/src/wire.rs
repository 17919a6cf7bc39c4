//! Request and response bodies of the backend functions
//!
//! Shared by the portal's remote source and by the content API that serves
//! these functions, so both ends agree on one shape.

use crate::models::{DictionaryEntry, Text, UsageExample, Verse};
use serde::{Deserialize, Deserializer, Serialize};

pub const DICTIONARY_SEARCH_FUNCTION: &str = "dictionary-search";
pub const TEXT_CONTENT_FUNCTION: &str = "text-content";
pub const TRANSLATE_FUNCTION: &str = "translate";

/// Limit applied by the dictionary function when the caller sends none
pub const DEFAULT_DICTIONARY_LIMIT: usize = 10;

fn default_dictionary_limit() -> usize {
    DEFAULT_DICTIONARY_LIMIT
}

/// Treats an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionarySearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_dictionary_limit")]
    pub limit: usize,
}

/// One row of the `dictionary` table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DictionaryRow {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub etymology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage_examples: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_words: Vec<String>,
}

impl From<DictionaryRow> for DictionaryEntry {
    fn from(row: DictionaryRow) -> Self {
        DictionaryEntry {
            id: Some(row.id),
            word: row.word,
            transliteration: row.transliteration.filter(|t| !t.is_empty()),
            meanings: row.meaning.into_iter().filter(|m| !m.is_empty()).collect(),
            examples: row
                .usage_examples
                .into_iter()
                .map(|native| UsageExample {
                    native,
                    transliteration: None,
                    gloss: None,
                })
                .collect(),
            grammar: row.grammar,
            definition: row.definition,
            part_of_speech: row.part_of_speech,
            etymology: row.etymology,
            related_words: row.related_words,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionarySearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<DictionaryRow>,
}

/// `{}` lists the catalog, `{textSlug}` loads one text with its verses,
/// `{textSlug, chapter, verse}` loads a single verse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,
}

impl TextContentRequest {
    pub fn catalog() -> Self {
        Self::default()
    }

    pub fn text(slug: &str) -> Self {
        Self {
            text_slug: Some(slug.to_string()),
            ..Self::default()
        }
    }

    pub fn verse(slug: &str, chapter: u32, verse: u32) -> Self {
        Self {
            text_slug: Some(slug.to_string()),
            chapter: Some(chapter),
            verse: Some(verse),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub texts: Vec<Text>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextWithVerses {
    pub text: Text,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseResponse {
    pub verse: Verse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub direction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
}

/// Body returned with a failure status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_request_defaults_limit() {
        let req: DictionarySearchRequest = serde_json::from_value(json!({ "query": "dharma" })).unwrap();
        assert_eq!(req.limit, DEFAULT_DICTIONARY_LIMIT);
    }

    #[test]
    fn row_with_null_arrays_converts_to_entry() {
        let row: DictionaryRow = serde_json::from_value(json!({
            "id": "d1",
            "word": "धर्म",
            "transliteration": "dharma",
            "meaning": "Righteous conduct",
            "definition": null,
            "part_of_speech": "noun",
            "etymology": null,
            "usage_examples": null,
            "related_words": ["karma"]
        }))
        .unwrap();
        let entry = DictionaryEntry::from(row);
        assert_eq!(entry.id.as_deref(), Some("d1"));
        assert_eq!(entry.meanings, vec!["Righteous conduct".to_string()]);
        assert!(entry.examples.is_empty());
        assert_eq!(entry.related_words, vec!["karma".to_string()]);
    }

    #[test]
    fn text_content_request_uses_camel_case() {
        let body = serde_json::to_value(TextContentRequest::verse("bhagavad-gita", 2, 47)).unwrap();
        assert_eq!(body, json!({ "textSlug": "bhagavad-gita", "chapter": 2, "verse": 47 }));
        assert_eq!(serde_json::to_value(TextContentRequest::catalog()).unwrap(), json!({}));
    }
}

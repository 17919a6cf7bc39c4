//! Portal data model: dictionary entries, texts, verses, history and saved items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Image shown for texts without a stored image reference
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

// ============ Texts ============

/// Category of a text in the library. Values the portal does not know are
/// kept verbatim so they still round-trip and filter by equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextCategory {
    Epic,
    Philosophy,
    Scripture,
    Mythology,
    Law,
    EconomicsPolitics,
    Devotional,
    Other(String),
}

impl TextCategory {
    /// Known categories in the order the library's category bar lists them
    pub const KNOWN: [TextCategory; 7] = [
        TextCategory::Epic,
        TextCategory::Philosophy,
        TextCategory::Scripture,
        TextCategory::Mythology,
        TextCategory::Law,
        TextCategory::EconomicsPolitics,
        TextCategory::Devotional,
    ];

    pub fn label(&self) -> &str {
        match self {
            TextCategory::Epic => "Epic",
            TextCategory::Philosophy => "Philosophy",
            TextCategory::Scripture => "Scripture",
            TextCategory::Mythology => "Mythology",
            TextCategory::Law => "Law",
            TextCategory::EconomicsPolitics => "Economics & Politics",
            TextCategory::Devotional => "Devotional",
            TextCategory::Other(label) => label,
        }
    }
}

impl From<&str> for TextCategory {
    fn from(label: &str) -> Self {
        match label {
            "Epic" => TextCategory::Epic,
            "Philosophy" => TextCategory::Philosophy,
            "Scripture" => TextCategory::Scripture,
            "Mythology" => TextCategory::Mythology,
            "Law" => TextCategory::Law,
            "Economics & Politics" => TextCategory::EconomicsPolitics,
            "Devotional" => TextCategory::Devotional,
            other => TextCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for TextCategory {
    fn from(label: String) -> Self {
        TextCategory::from(label.as_str())
    }
}

impl From<TextCategory> for String {
    fn from(category: TextCategory) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for TextCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    pub category: TextCategory,
    #[serde(default)]
    pub description: String,
    /// Number of chapters
    #[serde(default)]
    pub chapters: u32,
    /// Number of verses
    #[serde(default)]
    pub verses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Text {
    pub fn image(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

// ============ Verses ============

/// Parent text summary embedded in verse search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseSource {
    pub title: String,
    pub slug: String,
    pub category: TextCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_id: Option<String>,
    pub chapter: u32,
    pub verse: u32,
    pub sanskrit: String,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub english_translation: Option<String>,
    #[serde(default)]
    pub hindi_translation: Option<String>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default, rename = "texts", skip_serializing_if = "Option::is_none")]
    pub source: Option<VerseSource>,
}

impl Verse {
    /// "Chapter 2, Verse 47"
    pub fn reference(&self) -> String {
        format!("Chapter {}, Verse {}", self.chapter, self.verse)
    }
}

// ============ Dictionary ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageExample {
    pub native: String,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub gloss: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Headword in Devanagari
    pub word: String,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub examples: Vec<UsageExample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_words: Vec<String>,
}

impl DictionaryEntry {
    pub fn primary_meaning(&self) -> Option<&str> {
        self.meanings.first().map(String::as_str)
    }

    /// Identifier used when bookmarking: the stored id, else the headword
    pub fn bookmark_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.word.clone())
    }
}

// ============ Activity ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Search,
    VerseSearch,
    Translation,
    TextView,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Search => "search",
            ActionKind::VerseSearch => "verse_search",
            ActionKind::Translation => "translation",
            ActionKind::TextView => "text_view",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Definition,
    Translation,
    Verse,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Definition => "definition",
            ItemKind::Translation => "translation",
            ItemKind::Verse => "verse",
        }
    }
}

/// Signed-in user as resolved by the backend's auth endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: String,
    pub user_id: String,
    pub action_type: ActionKind,
    #[serde(default)]
    pub content: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: String,
    pub user_id: String,
    pub item_type: ItemKind,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub content: Value,
    pub created_at: DateTime<Utc>,
}

/// Row written to the history log
#[derive(Debug, Clone, Serialize)]
pub struct NewHistoryEvent<'a> {
    pub user_id: &'a str,
    pub action_type: ActionKind,
    pub content: &'a Value,
}

/// Row written to the saved-items collection
#[derive(Debug, Clone, Serialize)]
pub struct NewSavedItem<'a> {
    pub user_id: &'a str,
    pub item_type: ItemKind,
    pub item_id: Option<&'a str>,
    pub content: &'a Value,
}

/// Something the user asked to keep, before it is bound to an identity
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub kind: ItemKind,
    pub item_id: Option<String>,
    pub content: Value,
}

impl Bookmark {
    pub fn definition(entry: &DictionaryEntry) -> Self {
        Self {
            kind: ItemKind::Definition,
            item_id: Some(entry.bookmark_id()),
            content: serde_json::to_value(entry).unwrap_or(Value::Null),
        }
    }

    pub fn verse(verse: &Verse) -> Self {
        let item_id = verse.id.clone().unwrap_or_else(|| {
            let text = verse
                .source
                .as_ref()
                .map(|s| s.slug.as_str())
                .or(verse.text_id.as_deref())
                .unwrap_or_default();
            format!("{}:{}:{}", text, verse.chapter, verse.verse)
        });
        Self {
            kind: ItemKind::Verse,
            item_id: Some(item_id),
            content: serde_json::to_value(verse).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_round_trips_through_labels() {
        for category in TextCategory::KNOWN {
            let label = category.label().to_string();
            assert_eq!(TextCategory::from(label.as_str()), category);
        }
        let parsed: TextCategory = serde_json::from_value(json!("Economics & Politics")).unwrap();
        assert_eq!(parsed, TextCategory::EconomicsPolitics);
    }

    #[test]
    fn unknown_category_is_preserved() {
        let parsed: TextCategory = serde_json::from_value(json!("Poetry")).unwrap();
        assert_eq!(parsed, TextCategory::Other("Poetry".to_string()));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!("Poetry"));
    }

    #[test]
    fn text_without_image_uses_placeholder() {
        let text: Text = serde_json::from_value(json!({
            "id": "t1",
            "slug": "vedas",
            "title": "Vedas",
            "category": "Scripture",
            "description": "The oldest scriptures",
            "chapters": 4,
            "verses": 20000,
            "image_url": ""
        }))
        .unwrap();
        assert_eq!(text.image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn verse_reads_embedded_parent_text() {
        let verse: Verse = serde_json::from_value(json!({
            "id": "v1",
            "text_id": "t1",
            "chapter": 2,
            "verse": 47,
            "sanskrit": "कर्मण्येवाधिकारस्ते मा फलेषु कदाचन।",
            "transliteration": null,
            "english_translation": "You have a right to your actions alone.",
            "texts": { "title": "Bhagavad Gita", "slug": "bhagavad-gita", "category": "Philosophy" }
        }))
        .unwrap();
        let source = verse.source.as_ref().unwrap();
        assert_eq!(source.slug, "bhagavad-gita");
        assert_eq!(verse.reference(), "Chapter 2, Verse 47");
        assert!(verse.transliteration.is_none());
    }

    #[test]
    fn action_kinds_use_backend_names() {
        assert_eq!(serde_json::to_value(ActionKind::VerseSearch).unwrap(), json!("verse_search"));
        assert_eq!(ActionKind::TextView.as_str(), "text_view");
        assert_eq!(serde_json::to_value(ItemKind::Definition).unwrap(), json!("definition"));
    }

    #[test]
    fn verse_bookmark_falls_back_to_reference_key() {
        let verse = Verse {
            id: None,
            text_id: None,
            chapter: 1,
            verse: 1,
            sanskrit: "ॐ".to_string(),
            transliteration: None,
            english_translation: None,
            hindi_translation: None,
            commentary: None,
            source: Some(VerseSource {
                title: "Isha Upanishad".to_string(),
                slug: "ishavasyopanishad".to_string(),
                category: TextCategory::Philosophy,
            }),
        };
        let bookmark = Bookmark::verse(&verse);
        assert_eq!(bookmark.kind, ItemKind::Verse);
        assert_eq!(bookmark.item_id.as_deref(), Some("ishavasyopanishad:1:1"));
    }
}

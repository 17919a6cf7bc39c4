//! Display formatting: which of the parallel renderings to show, font size,
//! and the labels used by the activity list

use crate::models::{ActionKind, DictionaryEntry, HistoryEvent, ItemKind, SavedItem, UsageExample, Verse};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown in transliterated mode when nothing is stored. Transliteration is
/// never computed.
pub const TRANSLITERATION_PLACEHOLDER: &str = "transliterated text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Devanagari
    #[default]
    #[serde(rename = "sanskrit", alias = "native")]
    Native,
    Transliterated,
    /// English gloss
    #[serde(rename = "english", alias = "gloss")]
    Gloss,
}

impl DisplayMode {
    /// Toggle order
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Gloss, DisplayMode::Native, DisplayMode::Transliterated];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Native => "देवनागरी",
            DisplayMode::Transliterated => "Transliterated",
            DisplayMode::Gloss => "English",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to draw for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub primary: String,
    /// Stored transliteration under a Devanagari headline
    pub romanized: Option<String>,
    /// Gloss under the primary line, absent when the primary is the gloss
    pub caption: Option<String>,
}

/// Anything carrying native, transliterated and glossed forms of the same
/// content
pub trait Parallel {
    fn native(&self) -> &str;
    fn transliteration(&self) -> Option<&str>;
    fn gloss(&self) -> Option<&str>;
}

impl Parallel for DictionaryEntry {
    fn native(&self) -> &str {
        &self.word
    }

    fn transliteration(&self) -> Option<&str> {
        self.transliteration.as_deref()
    }

    fn gloss(&self) -> Option<&str> {
        self.primary_meaning()
    }
}

impl Parallel for UsageExample {
    fn native(&self) -> &str {
        &self.native
    }

    fn transliteration(&self) -> Option<&str> {
        self.transliteration.as_deref()
    }

    fn gloss(&self) -> Option<&str> {
        self.gloss.as_deref()
    }
}

impl Parallel for Verse {
    fn native(&self) -> &str {
        &self.sanskrit
    }

    fn transliteration(&self) -> Option<&str> {
        self.transliteration.as_deref()
    }

    fn gloss(&self) -> Option<&str> {
        self.english_translation.as_deref()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Exactly one rendering becomes the primary line. A missing gloss in gloss
/// mode falls back to the native line.
pub fn render<P: Parallel + ?Sized>(item: &P, mode: DisplayMode) -> Rendered {
    let gloss = present(item.gloss()).map(str::to_string);
    match mode {
        DisplayMode::Native => Rendered {
            primary: item.native().to_string(),
            romanized: present(item.transliteration()).map(str::to_string),
            caption: gloss,
        },
        DisplayMode::Transliterated => Rendered {
            primary: present(item.transliteration())
                .unwrap_or(TRANSLITERATION_PLACEHOLDER)
                .to_string(),
            romanized: None,
            caption: gloss,
        },
        DisplayMode::Gloss => match gloss {
            Some(gloss) => Rendered {
                primary: gloss,
                romanized: None,
                caption: None,
            },
            None => Rendered {
                primary: item.native().to_string(),
                romanized: None,
                caption: None,
            },
        },
    }
}

// ============ Font size ============

/// Reading font size in pixels, kept within [`FontSize::MIN`]..=[`FontSize::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN: u8 = 12;
    pub const MAX: u8 = 28;
    pub const STEP: u8 = 2;
    pub const DEFAULT: u8 = 16;

    pub fn new(px: u8) -> Self {
        Self(px.clamp(Self::MIN, Self::MAX))
    }

    pub fn px(&self) -> u8 {
        self.0
    }

    pub fn increase(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    pub fn decrease(self) -> Self {
        Self::new(self.0.saturating_sub(Self::STEP))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u8> for FontSize {
    fn from(px: u8) -> Self {
        Self::new(px)
    }
}

impl From<FontSize> for u8 {
    fn from(size: FontSize) -> Self {
        size.0
    }
}

// ============ Activity list ============

/// "verse search", "text view"
pub fn action_label(kind: ActionKind) -> String {
    kind.as_str().replacen('_', " ", 1)
}

pub fn action_icon(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Translation => "🔄",
        ActionKind::Search => "🔍",
        ActionKind::VerseSearch => "📖",
        ActionKind::TextView => "👁️",
    }
}

/// "Apr 20, 2025, 10:30 AM"
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Detail lines under a history event's label
pub fn event_summary(event: &HistoryEvent) -> Vec<String> {
    let field = |key: &str| event.content.get(key).and_then(|v| v.as_str()).unwrap_or_default();
    match event.action_type {
        ActionKind::Search | ActionKind::VerseSearch => {
            let count = event
                .content
                .get("results_count")
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            vec![
                format!("Query: \"{}\"", field("query")),
                format!("Found {} results", count),
            ]
        }
        ActionKind::Translation => vec![
            format!("Direction: {}", field("direction")),
            format!("\"{}\"", field("input")),
        ],
        ActionKind::TextView => vec![field("title").to_string()],
    }
}

/// Lines shown for a saved item, read from the snapshot taken when it was saved
pub fn saved_summary(item: &SavedItem) -> Vec<String> {
    let content = &item.content;
    let field = |key: &str| content.get(key).and_then(|v| v.as_str()).unwrap_or_default();
    match item.item_type {
        ItemKind::Definition => {
            let headword = match content.get("transliteration").and_then(|v| v.as_str()) {
                Some(romanized) if !romanized.is_empty() => format!("{} ({})", field("word"), romanized),
                _ => field("word").to_string(),
            };
            let meanings: Vec<&str> = content
                .get("meanings")
                .and_then(|v| v.as_array())
                .map(|list| list.iter().filter_map(|m| m.as_str()).collect())
                .unwrap_or_default();
            vec![headword, meanings.join(", ")]
        }
        ItemKind::Translation => vec![
            format!("\"{}\"", field("input")),
            format!("\"{}\"", field("output")),
        ],
        ItemKind::Verse => {
            let title = content
                .pointer("/texts/title")
                .and_then(|v| v.as_str())
                .unwrap_or_else(|| field("text_id"));
            let number = |key: &str| content.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
            vec![
                title.to_string(),
                format!("Chapter {}, Verse {}", number("chapter"), number("verse")),
            ]
        }
    }
}

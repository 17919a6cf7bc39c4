//! Translation helper: a static phrasebook and a pass-through remote
//! translator, plus how a result is displayed and bookmarked

use crate::backend::Backend;
use crate::display::{DisplayMode, TRANSLITERATION_PLACEHOLDER};
use crate::error::VidyaError;
use crate::models::{Bookmark, ItemKind};
use crate::wire::{TranslateRequest, TranslateResponse, TRANSLATE_FUNCTION};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    EnglishToSanskrit,
    SanskritToEnglish,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::EnglishToSanskrit => "english-to-sanskrit",
            Direction::SanskritToEnglish => "sanskrit-to-english",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::EnglishToSanskrit => Direction::SanskritToEnglish,
            Direction::SanskritToEnglish => Direction::EnglishToSanskrit,
        }
    }

    /// Placeholder returned when the phrasebook has no match
    pub fn placeholder(&self) -> &'static str {
        match self {
            Direction::EnglishToSanskrit => "संस्कृत अनुवाद",
            Direction::SanskritToEnglish => "English translation",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub input: String,
    pub output: String,
    pub direction: Direction,
}

impl Translation {
    /// Text to show for `mode`. Only a Sanskrit result has a transliteration
    /// to show; everything else shows the translated text as is.
    pub fn display(&self, mode: DisplayMode) -> String {
        match (mode, self.direction) {
            (DisplayMode::Transliterated, Direction::EnglishToSanskrit) => transliteration_of(&self.output)
                .unwrap_or(TRANSLITERATION_PLACEHOLDER)
                .to_string(),
            _ => self.output.clone(),
        }
    }
}

impl Bookmark {
    /// Keyed by direction and input so the same translation saves once
    pub fn translation(translation: &Translation) -> Self {
        Self {
            kind: ItemKind::Translation,
            item_id: Some(format!("{}:{}", translation.direction.as_str(), translation.input)),
            content: json!({
                "input": translation.input,
                "output": translation.output,
                "direction": translation.direction,
            }),
        }
    }
}

/// (English, Devanagari, transliteration)
const PHRASES: &[(&str, &str, &str)] = &[
    ("Hello", "नमस्ते", "namaste"),
    ("Thank you", "धन्यवाद", "dhanyavād"),
    ("Welcome", "स्वागतम्", "svāgatam"),
    ("How are you?", "कथमस्ति भवान्?", "kathamasti bhavān?"),
    ("One who speaks the truth", "सत्यवादी", "satyavādī"),
    ("The world is a family", "वसुधैव कुटुम्बकम्", "vasudhaiva kuṭumbakam"),
    ("Knowledge is wealth", "विद्या धनम्", "vidyā dhanam"),
    ("Peace", "शान्तिः", "śāntiḥ"),
    ("Wisdom", "ज्ञानम्", "jñānam"),
];

/// Stored transliteration of a phrasebook output
pub fn transliteration_of(devanagari: &str) -> Option<&'static str> {
    PHRASES
        .iter()
        .find(|(_, native, _)| *native == devanagari)
        .map(|(_, _, romanized)| *romanized)
}

pub trait Translator {
    fn translate(
        &self,
        text: &str,
        direction: Direction,
    ) -> impl Future<Output = Result<String, VidyaError>> + Send;
}

/// Exact-match lookup in both directions
#[derive(Debug, Clone, Copy, Default)]
pub struct Phrasebook;

impl Phrasebook {
    pub fn lookup(&self, text: &str, direction: Direction) -> String {
        let found = match direction {
            Direction::EnglishToSanskrit => PHRASES
                .iter()
                .find(|(english, _, _)| *english == text)
                .map(|(_, native, _)| *native),
            Direction::SanskritToEnglish => PHRASES
                .iter()
                .find(|(_, native, _)| *native == text)
                .map(|(english, _, _)| *english),
        };
        found.unwrap_or_else(|| direction.placeholder()).to_string()
    }
}

impl Translator for Phrasebook {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, VidyaError> {
        Ok(self.lookup(text, direction))
    }
}

/// Passes `{text, direction}` to the backend's translate function
#[derive(Debug, Clone)]
pub struct RemoteTranslator<B> {
    backend: B,
}

impl<B: Backend + Sync> RemoteTranslator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: Backend + Sync> Translator for RemoteTranslator<B> {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, VidyaError> {
        let body = serde_json::to_value(TranslateRequest {
            text: text.to_string(),
            direction: direction.as_str().to_string(),
        })?;
        let value = self.backend.invoke(TRANSLATE_FUNCTION, body).await?;
        let response: TranslateResponse = serde_json::from_value(value)?;
        Ok(response.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, Operation};
    use crate::models::Identity;

    #[test]
    fn phrasebook_translates_both_ways() {
        let book = Phrasebook;
        assert_eq!(book.lookup("Hello", Direction::EnglishToSanskrit), "नमस्ते");
        assert_eq!(book.lookup("विद्या धनम्", Direction::SanskritToEnglish), "Knowledge is wealth");
    }

    #[test]
    fn unmatched_input_gets_the_direction_placeholder() {
        let book = Phrasebook;
        assert_eq!(book.lookup("hello", Direction::EnglishToSanskrit), "संस्कृत अनुवाद");
        assert_eq!(book.lookup("नमो", Direction::SanskritToEnglish), "English translation");
    }

    #[test]
    fn transliterated_display_uses_stored_table() {
        let translation = Translation {
            input: "Peace".to_string(),
            output: "शान्तिः".to_string(),
            direction: Direction::EnglishToSanskrit,
        };
        assert_eq!(translation.display(DisplayMode::Transliterated), "śāntiḥ");
        assert_eq!(translation.display(DisplayMode::Native), "शान्तिः");

        let unknown = Translation {
            output: "संस्कृत अनुवाद".to_string(),
            ..translation
        };
        assert_eq!(unknown.display(DisplayMode::Transliterated), TRANSLITERATION_PLACEHOLDER);
    }

    #[test]
    fn english_result_is_shown_verbatim_in_every_mode() {
        let translation = Translation {
            input: "नमस्ते".to_string(),
            output: "Hello".to_string(),
            direction: Direction::SanskritToEnglish,
        };
        for mode in DisplayMode::ALL {
            assert_eq!(translation.display(mode), "Hello");
        }
    }

    #[test]
    fn direction_wire_names() {
        assert_eq!(
            serde_json::to_value(Direction::SanskritToEnglish).unwrap(),
            json!("sanskrit-to-english")
        );
        assert_eq!(Direction::EnglishToSanskrit.reversed(), Direction::SanskritToEnglish);
    }

    #[tokio::test]
    async fn translations_save_once_each() {
        use crate::history::{Recorder, SaveStatus};

        let backend = MemoryBackend::new().with_portal_schema();
        backend.sign_in(Identity {
            id: "u1".to_string(),
            email: None,
        });
        let recorder = Recorder::new(backend);
        let hello = Translation {
            input: "Hello".to_string(),
            output: "नमस्ते".to_string(),
            direction: Direction::EnglishToSanskrit,
        };
        let peace = Translation {
            input: "Peace".to_string(),
            output: "शान्तिः".to_string(),
            direction: Direction::EnglishToSanskrit,
        };

        assert_eq!(recorder.save(&Bookmark::translation(&hello)).await.status, SaveStatus::Saved);
        assert_eq!(recorder.save(&Bookmark::translation(&peace)).await.status, SaveStatus::Saved);
        assert_eq!(
            recorder.save(&Bookmark::translation(&hello)).await.status,
            SaveStatus::AlreadySaved
        );
        assert_eq!(recorder.backend().rows(crate::backend::SAVED_ITEMS_TABLE).len(), 2);
    }

    #[tokio::test]
    async fn remote_translator_reports_backend_errors() {
        let backend = MemoryBackend::new();
        let err = RemoteTranslator::new(backend).translate("Hello", Direction::EnglishToSanskrit).await;
        assert!(matches!(err, Err(VidyaError::Remote { status: 404, .. })));

        let failing = MemoryBackend::new();
        failing.fail(Operation::Invoke);
        let err = RemoteTranslator::new(failing).translate("Hello", Direction::EnglishToSanskrit).await;
        assert!(matches!(err, Err(VidyaError::Network(_))));
    }
}

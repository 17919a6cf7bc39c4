//! View state for the portal's screens
//!
//! Each view owns its local lists and applies the reconciliation rules:
//! failed loads reset lists to empty, the library filters on render, and
//! deletes drop items by id only after the backend confirms. Every
//! operation returns the notices it produced.

use crate::backend::Backend;
use crate::catalog::{self, CategoryFilter};
use crate::display::{self, DisplayMode, FontSize, Rendered};
use crate::history::{Recorder, SaveOutcome};
use crate::models::{ActionKind, Bookmark, DictionaryEntry, HistoryEvent, SavedItem, Text, Verse};
use crate::notice::{plural, Notice};
use crate::search::{DictionarySearch, SearchStatus, VerseSearch};
use crate::source::{DataSource, Origin, RemoteSource, StaticSource, TieredSource};
use crate::translate::{Direction, Translation, Translator};
use crate::wire::TextWithVerses;
use serde_json::json;

// ============ Dictionary ============

#[derive(Debug)]
pub struct DictionaryView<S, B> {
    search: DictionarySearch<S, B>,
    pub query: String,
    pub mode: DisplayMode,
    results: Vec<DictionaryEntry>,
    has_searched: bool,
}

impl<S, B> DictionaryView<S, B>
where
    S: DataSource + Sync,
    B: Backend + Sync,
{
    pub fn new(search: DictionarySearch<S, B>) -> Self {
        Self {
            search,
            query: String::new(),
            mode: DisplayMode::default(),
            results: Vec::new(),
            has_searched: false,
        }
    }

    pub fn results(&self) -> &[DictionaryEntry] {
        &self.results
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Run the current query. Rejected queries leave the previous results
    /// in place; a failed search clears them.
    pub async fn search(&mut self) -> Vec<Notice> {
        let outcome = self.search.search(&self.query).await;
        match outcome.status {
            SearchStatus::Completed | SearchStatus::Failed => {
                self.has_searched = true;
                self.results = outcome.results;
            }
            SearchStatus::MissingQuery | SearchStatus::Unavailable => {}
        }
        outcome.notices
    }

    pub fn rendered(&self) -> Vec<Rendered> {
        self.results
            .iter()
            .map(|entry| display::render(entry, self.mode))
            .collect()
    }

    /// Bookmark the result at `index`
    pub async fn save(&self, index: usize) -> Option<SaveOutcome> {
        let entry = self.results.get(index)?;
        Some(self.search.recorder().save(&Bookmark::definition(entry)).await)
    }
}

// ============ Library ============

/// Texts from a tiered source plus verse search
#[derive(Debug)]
pub struct LibraryView<B, F = StaticSource> {
    source: TieredSource<RemoteSource<B>, F>,
    verse_search: VerseSearch<B>,
    recorder: Recorder<B>,
    texts: Vec<Text>,
    origin: Option<Origin>,
    pub search_text: String,
    pub category: CategoryFilter,
    pub verse_query: String,
    verse_results: Vec<Verse>,
}

impl<B, F> LibraryView<B, F>
where
    B: Backend + Clone + Sync,
    F: DataSource + Sync,
{
    pub fn new(backend: B, fallback: F) -> Self {
        Self {
            source: TieredSource::new(RemoteSource::new(backend.clone()), fallback),
            verse_search: VerseSearch::new(backend.clone()),
            recorder: Recorder::new(backend),
            texts: Vec::new(),
            origin: None,
            search_text: String::new(),
            category: CategoryFilter::All,
            verse_query: String::new(),
            verse_results: Vec::new(),
        }
    }

    /// Use `recorder` for history and bookmarks, including verse searches
    pub fn with_recorder(mut self, recorder: Recorder<B>) -> Self {
        self.verse_search = self.verse_search.with_recorder(recorder.clone());
        self.recorder = recorder;
        self
    }

    pub fn with_verse_limit(mut self, limit: usize) -> Self {
        self.verse_search = self.verse_search.with_limit(limit);
        self
    }

    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    /// Which tier supplied the current texts, `None` before a load
    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        match self.source.fetch_catalog_sourced().await {
            Ok(sourced) => {
                self.texts = sourced.items;
                self.origin = Some(sourced.origin);
                match sourced.origin {
                    Origin::Primary => vec![Notice::success(format!(
                        "Loaded {}",
                        plural(self.texts.len(), "text", "texts")
                    ))],
                    Origin::Fallback => vec![Notice::info(
                        "Text service is not available; showing the built-in library",
                    )],
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "load texts failed");
                self.texts.clear();
                self.origin = None;
                vec![Notice::error("Failed to load texts")]
            }
        }
    }

    pub fn select_category(&mut self, label: &str) {
        self.category = CategoryFilter::parse(label);
    }

    /// Texts passing the search box and the category bar
    pub fn visible(&self) -> Vec<&Text> {
        catalog::filter(&self.texts, &self.search_text, &self.category)
    }

    pub fn verse_results(&self) -> &[Verse] {
        &self.verse_results
    }

    pub async fn search_verses(&mut self) -> Vec<Notice> {
        let outcome = self.verse_search.search(&self.verse_query).await;
        match outcome.status {
            SearchStatus::Completed | SearchStatus::Failed => self.verse_results = outcome.results,
            SearchStatus::MissingQuery | SearchStatus::Unavailable => {}
        }
        outcome.notices
    }

    /// Load a text with its verses and record the visit
    pub async fn open_text(&self, slug: &str) -> (Option<TextWithVerses>, Vec<Notice>) {
        match self.source.primary().fetch_text(slug).await {
            Ok(text) => {
                self.recorder
                    .record(
                        ActionKind::TextView,
                        json!({ "slug": text.text.slug, "title": text.text.title }),
                    )
                    .await;
                (Some(text), Vec::new())
            }
            Err(e) => {
                tracing::error!(slug, error = %e, "open text failed");
                (None, vec![Notice::error("Failed to load text")])
            }
        }
    }

    pub async fn save_verse(&self, index: usize) -> Option<SaveOutcome> {
        let verse = self.verse_results.get(index)?;
        Some(self.recorder.save(&Bookmark::verse(verse)).await)
    }
}

// ============ Translation ============

#[derive(Debug)]
pub struct TranslationView<T, B> {
    translator: T,
    recorder: Recorder<B>,
    pub input: String,
    pub direction: Direction,
    pub mode: DisplayMode,
    pub font_size: FontSize,
    result: Option<Translation>,
}

impl<T, B> TranslationView<T, B>
where
    T: Translator + Sync,
    B: Backend + Sync,
{
    pub fn new(translator: T, recorder: Recorder<B>) -> Self {
        Self {
            translator,
            recorder,
            input: String::new(),
            direction: Direction::default(),
            mode: DisplayMode::default(),
            font_size: FontSize::default(),
            result: None,
        }
    }

    pub fn result(&self) -> Option<&Translation> {
        self.result.as_ref()
    }

    pub async fn translate(&mut self) -> Vec<Notice> {
        if self.input.trim().is_empty() {
            return vec![Notice::error("Please enter text to translate")];
        }
        match self.translator.translate(&self.input, self.direction).await {
            Ok(output) => {
                let translation = Translation {
                    input: self.input.clone(),
                    output,
                    direction: self.direction,
                };
                let content = serde_json::to_value(&translation).unwrap_or_default();
                self.recorder.record(ActionKind::Translation, content).await;
                self.result = Some(translation);
                Vec::new()
            }
            Err(e) => {
                tracing::error!(direction = %self.direction, error = %e, "translation failed");
                self.result = None;
                vec![Notice::error("Failed to translate text")]
            }
        }
    }

    /// Flip the direction; the previous result no longer applies
    pub fn swap_direction(&mut self) {
        self.direction = self.direction.reversed();
        self.result = None;
    }

    /// Output line for the current display mode, empty before a translation
    pub fn output(&self) -> String {
        self.result
            .as_ref()
            .map(|t| t.display(self.mode))
            .unwrap_or_default()
    }

    pub async fn save(&self) -> Option<SaveOutcome> {
        let translation = self.result.as_ref()?;
        Some(self.recorder.save(&Bookmark::translation(translation)).await)
    }
}

// ============ History ============

/// One row of the activity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLine {
    pub icon: &'static str,
    pub label: String,
    pub when: String,
    pub details: Vec<String>,
}

/// One row of the saved collection; `id` is what `delete` takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLine {
    pub id: String,
    pub badge: &'static str,
    pub when: String,
    pub details: Vec<String>,
}

#[derive(Debug)]
pub struct HistoryView<B> {
    recorder: Recorder<B>,
    history: Vec<HistoryEvent>,
    saved: Vec<SavedItem>,
}

impl<B: Backend + Sync> HistoryView<B> {
    pub fn new(recorder: Recorder<B>) -> Self {
        Self {
            recorder,
            history: Vec::new(),
            saved: Vec::new(),
        }
    }

    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    pub fn saved(&self) -> &[SavedItem] {
        &self.saved
    }

    pub async fn load(&mut self) -> Vec<Notice> {
        let activity = self.recorder.load().await;
        self.history = activity.history;
        self.saved = activity.saved;
        activity.notices
    }

    pub async fn delete(&mut self, id: &str) -> Notice {
        self.recorder.delete(&mut self.saved, id).await
    }

    pub fn activity(&self) -> Vec<ActivityLine> {
        self.history
            .iter()
            .map(|event| ActivityLine {
                icon: display::action_icon(event.action_type),
                label: display::action_label(event.action_type),
                when: display::format_timestamp(&event.created_at),
                details: display::event_summary(event),
            })
            .collect()
    }

    pub fn saved_lines(&self) -> Vec<SavedLine> {
        self.saved
            .iter()
            .map(|item| SavedLine {
                id: item.id.clone(),
                badge: item.item_type.as_str(),
                when: display::format_timestamp(&item.created_at),
                details: display::saved_summary(item),
            })
            .collect()
    }
}

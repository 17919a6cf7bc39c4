//! Vidya - Sanskrit learning portal
//!
//! UI-independent core of the portal: catalog filtering, remote dictionary
//! and verse search, history and bookmarks, and display formatting.

// Data model and wire types come first; everything else builds on them
pub mod models;
pub mod wire;
pub mod error;
pub mod notice;
pub mod config;
pub mod backend;
pub mod catalog;
pub mod source;
pub mod history;
pub mod search;
pub mod display;
pub mod translate;
pub mod views;
pub mod state;

pub use error::VidyaError;
pub use state::{AppState, SharedBackend};
pub use config::{BackendConfig, PortalConfig, SearchConfig};
pub use backend::{Backend, BackendClient, MemoryBackend, RestBackend, TableQuery, Unconfigured};
pub use catalog::{filter, CategoryFilter, Catalogued};
pub use source::{DataSource, NoMatchPolicy, Origin, RemoteSource, StaticSource, TieredSource};
pub use history::{Recorder, SaveOutcome, SaveStatus, UserActivity};
pub use search::{DictionarySearch, SearchOutcome, SearchStatus, VerseSearch};
pub use display::{render, DisplayMode, FontSize, Parallel, Rendered};
pub use translate::{Direction, Phrasebook, RemoteTranslator, Translation, Translator};
pub use views::{ActivityLine, DictionaryView, HistoryView, LibraryView, SavedLine, TranslationView};
pub use notice::{Notice, NoticeLevel};
pub use models::{
    ActionKind, Bookmark, DictionaryEntry, HistoryEvent, Identity, ItemKind, SavedItem, Text,
    TextCategory, UsageExample, Verse,
};

//! Application state management

use crate::backend::BackendClient;
use crate::config::PortalConfig;
use crate::error::VidyaError;
use crate::history::Recorder;
use crate::search::DictionarySearch;
use crate::source::{RemoteSource, StaticSource};
use crate::translate::{Phrasebook, RemoteTranslator};
use crate::views::{DictionaryView, HistoryView, LibraryView, TranslationView};
use std::sync::Arc;

/// Backend client shared by every view
pub type SharedBackend = Arc<BackendClient>;

/// Application state holding configuration and the backend client
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: PortalConfig,
    pub backend: SharedBackend,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Self {
        let backend = Arc::new(BackendClient::from_config(&config.backend));
        Self { config, backend }
    }

    /// Load `.env`, `vidya.toml` and `VIDYA_*` variables, then build the state
    pub fn from_env() -> Result<Self, VidyaError> {
        Ok(Self::new(PortalConfig::load_with_dotenv()?))
    }

    pub fn recorder(&self) -> Recorder<SharedBackend> {
        Recorder::new(self.backend.clone()).with_history_limit(self.config.search.history_limit)
    }

    /// Dictionary backed by the hosted search function
    pub fn dictionary_view(&self) -> DictionaryView<RemoteSource<SharedBackend>, SharedBackend> {
        let search = DictionarySearch::new(RemoteSource::new(self.backend.clone()), self.recorder())
            .with_limit(self.config.search.dictionary_limit);
        DictionaryView::new(search)
    }

    /// Dictionary over the built-in demo words
    pub fn demo_dictionary_view(&self) -> DictionaryView<StaticSource, SharedBackend> {
        let search = DictionarySearch::new(StaticSource::demo(), self.recorder())
            .with_limit(self.config.search.dictionary_limit);
        DictionaryView::new(search)
    }

    pub fn library_view(&self) -> LibraryView<SharedBackend> {
        LibraryView::new(self.backend.clone(), StaticSource::new())
            .with_recorder(self.recorder())
            .with_verse_limit(self.config.search.verse_limit)
    }

    pub fn translation_view(&self) -> TranslationView<Phrasebook, SharedBackend> {
        TranslationView::new(Phrasebook, self.recorder())
    }

    pub fn remote_translation_view(&self) -> TranslationView<RemoteTranslator<SharedBackend>, SharedBackend> {
        TranslationView::new(RemoteTranslator::new(self.backend.clone()), self.recorder())
    }

    pub fn history_view(&self) -> HistoryView<SharedBackend> {
        HistoryView::new(self.recorder())
    }
}

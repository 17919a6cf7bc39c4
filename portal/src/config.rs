//! Layered configuration for the portal
//!
//! Sources, highest priority first:
//! 1. Environment variables (`VIDYA_` prefix, `__` between sections)
//! 2. `vidya.toml` in the working directory
//! 3. Built-in defaults
//!
//! `VIDYA_BACKEND__URL` maps to `backend.url`,
//! `VIDYA_SEARCH__VERSE_LIMIT` to `search.verse_limit`, and so on.

use crate::error::VidyaError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "vidya.toml";
const ENV_PREFIX: &str = "VIDYA_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Hosted backend connection settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key sent with every request
    #[serde(default)]
    pub anon_key: String,

    /// Session token of the signed-in user, if any
    #[serde(default)]
    pub access_token: Option<String>,
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

const fn default_dictionary_limit() -> usize {
    20
}

const fn default_verse_limit() -> usize {
    20
}

const fn default_history_limit() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_dictionary_limit")]
    pub dictionary_limit: usize,

    #[serde(default = "default_verse_limit")]
    pub verse_limit: usize,

    /// Most recent history events loaded into the history view
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dictionary_limit: default_dictionary_limit(),
            verse_limit: default_verse_limit(),
            history_limit: default_history_limit(),
        }
    }
}

impl PortalConfig {
    /// Load from defaults, `vidya.toml` and `VIDYA_*` variables.
    pub fn load() -> Result<Self, VidyaError> {
        Ok(Self::figment().extract()?)
    }

    /// Same as [`PortalConfig::load`], reading a `.env` file first.
    pub fn load_with_dotenv() -> Result<Self, VidyaError> {
        // A missing .env is normal outside development
        let _ = dotenvy::dotenv();
        Self::load()
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = PathBuf::from(CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_are_unconfigured() {
        let config = PortalConfig::default();
        assert!(!config.backend.is_configured());
        assert_eq!(config.search.dictionary_limit, 20);
        assert_eq!(config.search.verse_limit, 20);
        assert_eq!(config.search.history_limit, 50);
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [backend]
                url = "https://file.example.co"
                anon_key = "file-key"

                [search]
                verse_limit = 5
                "#,
            )?;
            jail.set_env("VIDYA_BACKEND__URL", "https://env.example.co");

            let config: PortalConfig = PortalConfig::figment().extract()?;
            assert_eq!(config.backend.url, "https://env.example.co");
            assert_eq!(config.backend.anon_key, "file-key");
            assert_eq!(config.search.verse_limit, 5);
            assert_eq!(config.search.dictionary_limit, 20);
            assert!(config.backend.is_configured());
            Ok(())
        });
    }

    #[test]
    fn blank_key_is_not_configured() {
        let backend = BackendConfig {
            url: "https://example.co".to_string(),
            anon_key: "   ".to_string(),
            access_token: None,
        };
        assert!(!backend.is_configured());
    }
}

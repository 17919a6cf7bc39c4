//! API configuration: defaults overridden by `VIDYA_API_*` variables

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// SQLite database file, created if missing
    pub db_path: PathBuf,
    /// Address to listen on
    pub bind: String,
    /// Seed empty tables with the built-in catalog and demo dictionary
    pub seed: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("vidya.db"),
            bind: "127.0.0.1:3000".to_string(),
            seed: true,
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("VIDYA_API_"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("VIDYA_API_DB_PATH", "/tmp/content.db");
            jail.set_env("VIDYA_API_SEED", "false");
            let config = ApiConfig::load()?;
            assert_eq!(config.db_path, PathBuf::from("/tmp/content.db"));
            assert_eq!(config.bind, "127.0.0.1:3000");
            assert!(!config.seed);
            Ok(())
        });
    }
}

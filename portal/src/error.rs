//! Error types for Vidya

use thiserror::Error;

/// Postgres error code the backend reports for a uniqueness violation.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

#[derive(Error, Debug)]
pub enum VidyaError {
    #[error("Service not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Duplicate record: {0}")]
    UniqueViolation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl VidyaError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, VidyaError::UniqueViolation(_))
    }
}

impl From<reqwest::Error> for VidyaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            VidyaError::Decode(e.to_string())
        } else {
            VidyaError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for VidyaError {
    fn from(e: serde_json::Error) -> Self {
        VidyaError::Decode(e.to_string())
    }
}

impl From<figment::Error> for VidyaError {
    fn from(e: figment::Error) -> Self {
        VidyaError::Config(e.to_string())
    }
}

impl serde::Serialize for VidyaError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

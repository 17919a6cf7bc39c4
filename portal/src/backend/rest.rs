//! REST client for the hosted backend (functions, tables, auth)

use super::{Backend, TableQuery};
use crate::config::BackendConfig;
use crate::error::{VidyaError, UNIQUE_VIOLATION_CODE};
use crate::models::Identity;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// Error body returned by the table and auth endpoints
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, VidyaError> {
        if !config.is_configured() {
            return Err(VidyaError::NotConfigured(
                "backend URL and anon key are required".to_string(),
            ));
        }
        let client = Client::builder()
            .user_agent(concat!("vidya/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.trim().to_string(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Use a signed-in user's session token for subsequent requests
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn function_url(&self, function: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, function)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    /// Turn a non-success response into a typed error
    async fn check(response: Response) -> Result<Response, VidyaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let body: Option<RemoteErrorBody> = serde_json::from_str(&text).ok();
        let code = body.as_ref().and_then(|b| b.code.clone());
        let message = body
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text.clone()
                }
            });
        if code.as_deref() == Some(UNIQUE_VIOLATION_CODE) || status == StatusCode::CONFLICT {
            return Err(VidyaError::UniqueViolation(message));
        }
        Err(VidyaError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

impl Backend for RestBackend {
    fn is_configured(&self) -> bool {
        true
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, VidyaError> {
        let response = self
            .authorized(self.client.post(self.function_url(function)))
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, VidyaError> {
        let response = self
            .authorized(self.client.get(self.table_url(&query.table)))
            .query(&query.to_params())
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), VidyaError> {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), VidyaError> {
        let filter = format!("eq.{}", id);
        let response = self
            .authorized(self.client.delete(self.table_url(table)))
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Identity>, VidyaError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            // Expired or revoked session
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(Some(response.json::<Identity>().await?))
    }
}

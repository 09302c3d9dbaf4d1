//! Free pivot provider: a LibreTranslate-compatible `/translate` endpoint.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TranslationProvider;
use crate::errors::{AppError, AppResult};

// LibreTranslate request body
#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

// LibreTranslate response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: Option<String>,
}

/// No credential needed; also the universal fallback of every other adapter.
pub struct LibreTranslate {
    client: Client,
    endpoint: String,
}

impl LibreTranslate {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn request(&self, text: &str, target_lang: &str) -> AppResult<Option<String>> {
        let body = LibreRequest {
            q: text,
            source: "auto",
            target: target_lang,
            format: "text",
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        debug!("LibreTranslate response status: {}", status);

        if !status.is_success() {
            return Err(AppError::ApiError(format!("LibreTranslate returned HTTP {}", status)));
        }

        let parsed: LibreResponse = response.json().await?;
        Ok(parsed.translated_text)
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslate {
    fn name(&self) -> &'static str {
        "libre"
    }

    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String> {
        self.request(text, target_lang).await.unwrap_or_else(|e| {
            error!("LibreTranslate error: {}", e);
            None
        })
    }
}

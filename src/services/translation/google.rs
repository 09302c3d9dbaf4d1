//! Cloud translation vendor (Google Translation v2). Requires `apiKey`.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TranslationProvider;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct GoogleRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    #[serde(default)]
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
}

pub struct GoogleTranslate {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleTranslate {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    async fn request(&self, text: &str, target_lang: &str, api_key: &str) -> AppResult<String> {
        let body = GoogleRequest {
            q: text,
            target: target_lang,
            format: "text",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("Google Translate response status: {}", status);
        if !status.is_success() {
            return Err(AppError::ApiError(format!("Google Translate API error: {}", status)));
        }

        let parsed: GoogleResponse = response.json().await?;
        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| AppError::ApiError("Google Translate returned no translations".to_string()))
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!("Google Translate API key not provided, fallback to LibreTranslate");
            return None;
        };

        match self.request(text, target_lang, api_key).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                error!("Google Translation error: {}", e);
                None
            }
        }
    }
}

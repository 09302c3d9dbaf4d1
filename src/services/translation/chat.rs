//! LLM chat providers: OpenAI chat completions and Anthropic messages.
//! Both require `apiKey` and ask the model for the translation only.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TranslationProvider;
use crate::errors::{AppError, AppResult};
use crate::utils::language::language_name;

const OPENAI_MODEL: &str = "gpt-3.5-turbo";
const ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.3;

/// System instruction shared by the chat-style providers.
pub fn system_prompt(target_lang: &str) -> String {
    format!(
        "You are a professional translator. Translate the given text to {}. \
         Only return the translated text, no explanations.",
        language_name(target_lang)
    )
}

// Chat message structure for OpenAI-style APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

// Chat completion request, also used by the custom endpoint adapter
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn translation(model: Option<&str>, text: &str, target_lang: &str) -> Self {
        Self {
            model: model.map(str::to_string),
            messages: vec![
                Message::new("system", system_prompt(target_lang)),
                Message::new("user", text),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

// OpenAI API response
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

pub struct OpenAiChat {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenAiChat {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    async fn request(&self, text: &str, target_lang: &str, api_key: &str) -> AppResult<String> {
        let request = ChatRequest::translation(Some(OPENAI_MODEL), text, target_lang);

        debug!("Sending translation request to OpenAI API");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("OpenAI API response status: {}", status);
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ApiError(format!("OpenAI API error: HTTP {}, body: {}", status, error_text)));
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| AppError::ApiError("OpenAI returned no choices".to_string()))
    }
}

#[async_trait]
impl TranslationProvider for OpenAiChat {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!("OpenAI API key not provided, fallback to LibreTranslate");
            return None;
        };

        match self.request(text, target_lang, api_key).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                error!("OpenAI translation error: {}", e);
                None
            }
        }
    }
}

// Anthropic messages request
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicMessages {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl AnthropicMessages {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    async fn request(&self, text: &str, target_lang: &str, api_key: &str) -> AppResult<String> {
        let prompt = format!(
            "Translate the following text to {}. Only return the translated text, no explanations:\n\n{}",
            language_name(target_lang),
            text
        );
        let request = AnthropicRequest {
            model: ANTHROPIC_MODEL.to_string(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message::new("user", prompt)],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Anthropic API response status: {}", status);
        if !status.is_success() {
            return Err(AppError::ApiError(format!("Anthropic API error: {}", status)));
        }

        let parsed: AnthropicResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| AppError::ApiError("Anthropic returned no text block".to_string()))
    }
}

#[async_trait]
impl TranslationProvider for AnthropicMessages {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!("Anthropic API key not provided, fallback to LibreTranslate");
            return None;
        };

        match self.request(text, target_lang, api_key).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                error!("Anthropic translation error: {}", e);
                None
            }
        }
    }
}

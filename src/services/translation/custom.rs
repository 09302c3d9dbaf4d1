//! User-configured endpoint (llama.cpp, Ollama, OpenAI-compatible proxies...).
//!
//! The reply schema is not known in advance, so the body is classified by
//! [`ResponseShape::detect`] before the text is extracted.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde_json::Value;

use super::TranslationProvider;
use super::chat::ChatRequest;
use crate::errors::{AppError, AppResult};

/// Known reply schemas of chat-style endpoints, checked in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"choices": [{"message": {"content": ..}}]}` or `{"choices": [{"text": ..}]}`.
    /// A first choice carrying neither is [`ResponseShape::Unknown`]; the
    /// other fields are not consulted.
    ChatChoices(String),
    /// `{"response": ..}` (Ollama generate)
    Response(String),
    /// `{"content": ..}`, either a string or an array of `{"text": ..}` blocks
    Content(String),
    /// `{"text": ..}`
    Text(String),
    Unknown,
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl ResponseShape {
    pub fn detect(body: &Value) -> Self {
        if let Some(first) = body.get("choices").and_then(|c| c.get(0)) {
            let text = non_empty_str(first.pointer("/message/content")).or_else(|| non_empty_str(first.get("text")));
            return match text {
                Some(text) => ResponseShape::ChatChoices(text.to_string()),
                None => ResponseShape::Unknown,
            };
        }

        if let Some(text) = non_empty_str(body.get("response")) {
            return ResponseShape::Response(text.to_string());
        }

        match body.get("content") {
            Some(Value::String(text)) if !text.is_empty() => {
                return ResponseShape::Content(text.clone());
            }
            Some(Value::Array(blocks)) => {
                let joined: String = blocks
                    .iter()
                    .filter_map(|block| block.get("text").and_then(Value::as_str))
                    .collect();
                if !joined.is_empty() {
                    return ResponseShape::Content(joined);
                }
            }
            _ => {}
        }

        if let Some(text) = non_empty_str(body.get("text")) {
            return ResponseShape::Text(text.to_string());
        }

        ResponseShape::Unknown
    }

    /// Extracted reply, trimmed. `None` for [`ResponseShape::Unknown`].
    pub fn into_text(self) -> Option<String> {
        match self {
            ResponseShape::ChatChoices(text)
            | ResponseShape::Response(text)
            | ResponseShape::Content(text)
            | ResponseShape::Text(text) => Some(text.trim().to_string()),
            ResponseShape::Unknown => None,
        }
    }
}

pub struct CustomEndpoint {
    client: Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl CustomEndpoint {
    pub fn new(client: Client, endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    async fn request(&self, endpoint: &str, text: &str, target_lang: &str) -> AppResult<String> {
        let request = ChatRequest::translation(None, text, target_lang);

        let mut builder = self.client.post(endpoint).json(&request);
        if let Some(api_key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("Custom API response status: {}", status);
        if !status.is_success() {
            return Err(AppError::ApiError(format!("Custom API error: {}", status)));
        }

        let body: Value = response.json().await?;
        let shape = ResponseShape::detect(&body);
        debug!("Custom API response shape: {:?}", shape);

        // unknown format is not an error, the input is passed through
        Ok(shape.into_text().unwrap_or_else(|| {
            warn!("Unknown custom API response format: {}", body);
            text.to_string()
        }))
    }
}

#[async_trait]
impl TranslationProvider for CustomEndpoint {
    fn name(&self) -> &'static str {
        "custom"
    }

    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            info!("Custom API URL not provided, fallback to LibreTranslate");
            return None;
        };

        match self.request(endpoint, text, target_lang).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                error!("Custom API translation error: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::{Json, Router, http::HeaderMap, routing::post};
    use serde_json::json;

    #[test]
    fn test_detect_known_shapes() {
        assert_eq!(
            ResponseShape::detect(&json!({"choices": [{"message": {"content": "a"}}]})),
            ResponseShape::ChatChoices("a".into())
        );
        assert_eq!(
            ResponseShape::detect(&json!({"choices": [{"text": "b"}]})),
            ResponseShape::ChatChoices("b".into())
        );
        assert_eq!(ResponseShape::detect(&json!({"response": "c"})), ResponseShape::Response("c".into()));
        assert_eq!(ResponseShape::detect(&json!({"content": "d"})), ResponseShape::Content("d".into()));
        assert_eq!(
            ResponseShape::detect(&json!({"content": [{"type": "text", "text": "e"}, {"text": "f"}]})),
            ResponseShape::Content("ef".into())
        );
        assert_eq!(ResponseShape::detect(&json!({"text": "g"})), ResponseShape::Text("g".into()));
        assert_eq!(ResponseShape::detect(&json!({"result": "h"})), ResponseShape::Unknown);
        assert_eq!(ResponseShape::detect(&json!(["x"])), ResponseShape::Unknown);
    }

    #[test]
    fn test_detect_order() {
        let body = json!({"response": "first", "content": "second", "text": "third"});
        assert_eq!(ResponseShape::detect(&body), ResponseShape::Response("first".into()));
        let body = json!({"response": "", "text": "fallback"});
        assert_eq!(ResponseShape::detect(&body), ResponseShape::Text("fallback".into()));
    }

    #[test]
    fn test_empty_first_choice_stops_detection() {
        let body = json!({"choices": [{"message": {"role": "assistant"}}], "response": "ignored"});
        assert_eq!(ResponseShape::detect(&body), ResponseShape::Unknown);
        let body = json!({"choices": [], "text": "used"});
        assert_eq!(ResponseShape::detect(&body), ResponseShape::Text("used".into()));
    }

    #[tokio::test]
    async fn test_content_field_is_trimmed() {
        let app = Router::new().route("/llm", post(|| async { Json(json!({"content": "  xin chào \n"})) }));
        let base = serve(app).await;

        let custom = CustomEndpoint::new(Client::new(), Some(format!("{}/llm", base)), None);
        assert_eq!(custom.attempt("hello", "vi").await.as_deref(), Some("xin chào"));
    }

    #[tokio::test]
    async fn test_unknown_shape_echoes_input_and_sends_bearer() {
        let app = Router::new().route(
            "/llm",
            post(|headers: HeaderMap| async move {
                assert_eq!(headers["authorization"], "Bearer local-key");
                Json(json!({"output": "ignored"}))
            }),
        );
        let base = serve(app).await;

        let custom = CustomEndpoint::new(Client::new(), Some(format!("{}/llm", base)), Some("local-key".into()));
        assert_eq!(custom.attempt("hello", "vi").await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_none() {
        let custom = CustomEndpoint::new(Client::new(), None, Some("key".into()));
        assert_eq!(custom.attempt("hello", "vi").await, None);
    }
}

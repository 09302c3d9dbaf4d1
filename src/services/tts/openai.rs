//! Alternate TTS through the OpenAI speech endpoint. Requires `openai_api_key`.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::Serialize;

use super::SpeechProvider;
use crate::config::VoiceType;
use crate::errors::{AppError, AppResult};
use crate::models::{AudioHandle, SpeechRequest, SpeechSource};

const MODEL: &str = "tts-1";

/// Request body for OpenAI TTS.
#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

pub fn voice_for(voice: VoiceType) -> &'static str {
    match voice {
        VoiceType::Female => "nova",
        VoiceType::Male => "onyx",
    }
}

pub struct OpenAiTts {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenAiTts {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    async fn request(&self, request: &SpeechRequest, api_key: &str) -> AppResult<AudioHandle> {
        let body = SpeechBody {
            model: MODEL,
            input: &request.text,
            voice: voice_for(request.voice),
            response_format: "mp3",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("OpenAI TTS response status: {}", status);
        if !status.is_success() {
            return Err(AppError::ApiError(format!("OpenAI TTS error: {}", status)));
        }

        // the response body is the audio itself
        let data = response.bytes().await?;
        if data.is_empty() {
            return Err(AppError::AudioProcessingError("OpenAI TTS returned empty audio".to_string()));
        }

        Ok(AudioHandle::new(data, "audio/mpeg", SpeechSource::OpenAiTts))
    }
}

#[async_trait]
impl SpeechProvider for OpenAiTts {
    fn name(&self) -> &'static str {
        "openai-tts"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Option<AudioHandle> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("OpenAI API key not configured");
            return None;
        };

        match self.request(request, api_key).await {
            Ok(handle) => {
                info!("OpenAI TTS produced {} bytes", handle.len());
                Some(handle)
            }
            Err(e) => {
                error!("OpenAI TTS error: {}", e);
                None
            }
        }
    }
}

// TTS module
// Stage 3 of the pipeline: speech synthesis chain ending in a demo tone

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;

use crate::config::{ApiEndpoints, Settings};
use crate::models::{AudioHandle, SpeechRequest};

pub mod demo;
pub mod google;
pub mod openai;
pub mod system;

pub use demo::demo_audio;
pub use google::GoogleTts;
pub use openai::OpenAiTts;
pub use system::SystemSpeech;

/// Trait that all speech backends implement. `None` means "try the next one".
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn synthesize(&self, request: &SpeechRequest) -> Option<AudioHandle>;
}

pub struct SpeechChain {
    providers: Vec<Box<dyn SpeechProvider>>,
}

impl SpeechChain {
    pub fn new(providers: Vec<Box<dyn SpeechProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// First non-empty handle; the demo tone when no provider delivers.
    pub async fn synthesize(&self, request: &SpeechRequest) -> AudioHandle {
        for provider in &self.providers {
            match provider.synthesize(request).await {
                Some(handle) if !handle.is_empty() => {
                    info!("Speech for {} generated via {}", request.lang, provider.name());
                    return handle;
                }
                _ => {}
            }
        }

        warn!("⚠️ Could not generate real audio, using demo audio");
        demo_audio()
    }
}

/// Builds the speech chain from the stored credentials.
pub struct SpeechSynthesizer {
    client: Client,
    endpoints: ApiEndpoints,
    system_voices: Vec<String>,
}

impl SpeechSynthesizer {
    pub fn new(client: Client, endpoints: ApiEndpoints) -> Self {
        Self {
            client,
            endpoints,
            system_voices: Vec::new(),
        }
    }

    pub fn with_system_voices(mut self, voices: Vec<String>) -> Self {
        self.system_voices = voices;
        self
    }

    #[cfg(test)]
    pub(crate) fn system_voices(&self) -> &[String] {
        &self.system_voices
    }

    pub fn chain(&self, settings: &Settings) -> SpeechChain {
        SpeechChain::new(vec![
            Box::new(GoogleTts::new(
                self.client.clone(),
                self.endpoints.google_tts.clone(),
                settings.google_tts_api_key(),
            )),
            Box::new(OpenAiTts::new(
                self.client.clone(),
                self.endpoints.openai_speech.clone(),
                settings.openai_api_key(),
            )),
            Box::new(SystemSpeech::new(self.system_voices.clone())),
        ])
    }

    pub async fn synthesize(&self, settings: &Settings, request: &SpeechRequest) -> AudioHandle {
        self.chain(settings).synthesize(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeechSource;
    use crate::test_support::{refused_url, serve};
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    #[tokio::test]
    async fn test_zero_credentials_yield_demo_tone() {
        let synthesizer = SpeechSynthesizer::new(Client::new(), ApiEndpoints::with_base(&refused_url()));
        let handle = synthesizer
            .synthesize(&Settings::default(), &SpeechRequest::new("Xin chào", "vi"))
            .await;
        assert_eq!(handle.source, SpeechSource::DemoTone);
        assert!(!handle.is_empty());
    }

    #[tokio::test]
    async fn test_falls_through_to_openai() {
        let app = Router::new()
            .route("/google", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/v1/audio/speech", post(|| async { vec![7u8; 16] }));
        let base = serve(app).await;

        let mut endpoints = ApiEndpoints::with_base(&base);
        endpoints.google_tts = format!("{}/google", base);
        let synthesizer = SpeechSynthesizer::new(Client::new(), endpoints);
        let settings = Settings {
            google_tts_api_key: Some("g".to_string()),
            openai_api_key: Some("o".to_string()),
            ..Settings::default()
        };

        let handle = synthesizer.synthesize(&settings, &SpeechRequest::new("hi", "en")).await;
        assert_eq!(handle.source, SpeechSource::OpenAiTts);
        assert_eq!(handle.len(), 16);
    }

    #[tokio::test]
    async fn test_google_first_when_it_succeeds() {
        let app = Router::new().route("/google", post(|| async { Json(json!({"audioContent": "AAAA"})) }));
        let base = serve(app).await;

        let mut endpoints = ApiEndpoints::with_base(&refused_url());
        endpoints.google_tts = format!("{}/google", base);
        let synthesizer = SpeechSynthesizer::new(Client::new(), endpoints).with_system_voices(vec!["vi-VN".into()]);
        let settings = Settings {
            google_tts_api_key: Some("g".to_string()),
            ..Settings::default()
        };

        let chain = synthesizer.chain(&settings);
        assert_eq!(chain.provider_names(), vec!["google-tts", "openai-tts", "system"]);
        let handle = chain.synthesize(&SpeechRequest::new("hi", "vi")).await;
        assert_eq!(handle.source, SpeechSource::GoogleTts);
        assert_eq!(handle.mime_type, "audio/wav");
    }
}

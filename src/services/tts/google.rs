//! Cloud TTS vendor (Google Text-to-Speech). Requires `google_tts_api_key`.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::SpeechProvider;
use crate::config::{AudioQuality, VoiceType};
use crate::errors::{AppError, AppResult};
use crate::models::{AudioHandle, SpeechRequest, SpeechSource};

/// Vendor voice for `(language, gender)`; `<lang>-Standard-A` when unmapped.
pub fn voice_name(lang: &str, voice: VoiceType) -> String {
    let female = voice == VoiceType::Female;
    let name = match lang {
        "en" => if female { "en-US-Journey-F" } else { "en-US-Journey-D" },
        "vi" => if female { "vi-VN-Wavenet-A" } else { "vi-VN-Wavenet-B" },
        "ja" => if female { "ja-JP-Wavenet-A" } else { "ja-JP-Wavenet-C" },
        "ko" => if female { "ko-KR-Wavenet-A" } else { "ko-KR-Wavenet-C" },
        "zh" => if female { "cmn-CN-Wavenet-A" } else { "cmn-CN-Wavenet-B" },
        _ => return format!("{}-Standard-A", lang),
    };
    name.to_string()
}

/// Encoding requested from the vendor and the MIME type of the result.
pub fn encoding(quality: AudioQuality) -> (&'static str, &'static str) {
    match quality {
        AudioQuality::Premium => ("MP3", "audio/mpeg"),
        AudioQuality::Standard => ("LINEAR16", "audio/wav"),
    }
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: String,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

pub struct GoogleTts {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleTts {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    async fn request(&self, request: &SpeechRequest, api_key: &str) -> AppResult<AudioHandle> {
        let (audio_encoding, mime_type) = encoding(request.quality);
        let body = SynthesizeRequest {
            input: SynthesisInput { text: &request.text },
            voice: VoiceSelection {
                language_code: &request.lang,
                name: voice_name(&request.lang, request.voice),
                ssml_gender: request.voice.ssml_gender(),
            },
            audio_config: AudioConfig {
                audio_encoding,
                speaking_rate: 1.0,
                pitch: 0.0,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("Google TTS response status: {}", status);
        if !status.is_success() {
            return Err(AppError::ApiError(format!("Google TTS error: {}", status)));
        }

        let parsed: SynthesizeResponse = response.json().await?;
        let data = BASE64.decode(parsed.audio_content.as_bytes())?;
        if data.is_empty() {
            return Err(AppError::AudioProcessingError("Google TTS returned empty audio".to_string()));
        }

        Ok(AudioHandle::new(data, mime_type, SpeechSource::GoogleTts))
    }
}

#[async_trait]
impl SpeechProvider for GoogleTts {
    fn name(&self) -> &'static str {
        "google-tts"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Option<AudioHandle> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Google TTS API key not configured");
            return None;
        };

        match self.request(request, api_key).await {
            Ok(handle) => {
                info!("Google TTS produced {} bytes of {}", handle.len(), handle.mime_type);
                Some(handle)
            }
            Err(e) => {
                error!("Google TTS error: {}", e);
                None
            }
        }
    }
}

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::{AudioQuality, VoiceType};

/// Which link of the speech chain produced a handle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpeechSource {
    GoogleTts,
    OpenAiTts,
    DemoTone,
}

/// Parameters of one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// Two-letter language code.
    pub lang: String,
    pub voice: VoiceType,
    pub quality: AudioQuality,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            voice: VoiceType::default(),
            quality: AudioQuality::default(),
        }
    }

    pub fn voice(mut self, voice: VoiceType) -> Self {
        self.voice = voice;
        self
    }

    pub fn quality(mut self, quality: AudioQuality) -> Self {
        self.quality = quality;
        self
    }
}

/// Playable audio produced by the speech chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioHandle {
    pub data: Bytes,
    pub mime_type: String,
    pub source: SpeechSource,
}

impl AudioHandle {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>, source: SpeechSource) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_payload(&self) -> AudioPayload {
        AudioPayload {
            mime_type: self.mime_type.clone(),
            data: BASE64.encode(&self.data),
            source: self.source,
        }
    }
}

/// Wire form of an [`AudioHandle`] inside a completion message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioPayload {
    pub mime_type: String,
    /// Base64 of the audio bytes.
    pub data: String,
    pub source: SpeechSource,
}

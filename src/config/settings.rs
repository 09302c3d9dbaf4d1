use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};

/// Default target language when neither the request nor the settings name one.
pub const DEFAULT_TARGET_LANG: &str = "vi";

// Available translation providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Free pivot provider, no credential needed.
    #[default]
    Libre,
    Google,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Custom,
}

impl ProviderId {
    /// Unknown identifiers select the free pivot provider.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Self::Google,
            "openai" => Self::OpenAi,
            "anthropic" => Self::Anthropic,
            "custom" => Self::Custom,
            _ => Self::Libre,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Libre => "libre",
            Self::Google => "google",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Custom => "custom",
        }
    }
}

/// Configuration of the translation backend chosen by the user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub credential: Option<String>,
    /// Only meaningful for [`ProviderId::Custom`].
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    #[default]
    Female,
    Male,
}

impl VoiceType {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Female
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }

    /// Gender name as expected by SSML-based voice selection.
    pub fn ssml_gender(&self) -> &'static str {
        match self {
            Self::Female => "FEMALE",
            Self::Male => "MALE",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    #[default]
    Standard,
    Premium,
}

impl AudioQuality {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("premium") {
            Self::Premium
        } else {
            Self::Standard
        }
    }
}

/// Typed view over the externally-owned settings store.
///
/// Only the keys below are read; anything else the settings UI stores
/// (volume, subtitle size, speakers...) is ignored. The core never writes back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "apiProvider")]
    pub api_provider: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "apiUrl")]
    pub api_url: Option<String>,
    #[serde(rename = "targetLang")]
    pub target_lang: Option<String>,
    #[serde(rename = "voiceType")]
    pub voice_type: Option<String>,
    #[serde(rename = "voiceQuality")]
    pub voice_quality: Option<String>,
    #[serde(rename = "dubbingEnabled")]
    pub dubbing_enabled: Option<bool>,
    pub youtube_api_key: Option<String>,
    pub google_tts_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

const STRING_KEYS: &[&str] = &[
    "apiProvider",
    "apiKey",
    "apiUrl",
    "targetLang",
    "voiceType",
    "voiceQuality",
    "youtube_api_key",
    "google_tts_api_key",
    "openai_api_key",
];

const BOOL_KEYS: &[&str] = &["dubbingEnabled"];

fn has_expected_type(key: &str, value: &Value) -> bool {
    if value.is_null() {
        return true;
    }
    if STRING_KEYS.contains(&key) {
        value.is_string()
    } else if BOOL_KEYS.contains(&key) {
        value.is_boolean()
    } else {
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Settings {
    /// Parse a raw key-value snapshot. A known key holding a value of the
    /// wrong type is dropped on its own; the remaining keys still apply.
    pub fn from_map(mut map: Map<String, Value>) -> AppResult<Self> {
        map.retain(|key, value| {
            let keep = has_expected_type(key, value);
            if !keep {
                warn!("Ignoring setting {} with unexpected value {}", key, value);
            }
            keep
        });
        serde_json::from_value(Value::Object(map))
            .map_err(|e| AppError::ConfigurationError(format!("Failed to parse settings: {}", e)))
    }

    pub fn provider(&self) -> ProviderId {
        self.api_provider
            .as_deref()
            .map(ProviderId::parse)
            .unwrap_or_default()
    }

    pub fn translation_provider(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: self.provider(),
            credential: non_empty(&self.api_key),
            endpoint: non_empty(&self.api_url),
        }
    }

    pub fn target_lang(&self) -> String {
        non_empty(&self.target_lang).unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string())
    }

    pub fn voice_type(&self) -> VoiceType {
        self.voice_type
            .as_deref()
            .map(VoiceType::parse)
            .unwrap_or_default()
    }

    pub fn audio_quality(&self) -> AudioQuality {
        self.voice_quality
            .as_deref()
            .map(AudioQuality::parse)
            .unwrap_or_default()
    }

    pub fn dubbing_enabled(&self) -> bool {
        self.dubbing_enabled.unwrap_or(false)
    }

    pub fn youtube_api_key(&self) -> Option<String> {
        non_empty(&self.youtube_api_key)
    }

    pub fn google_tts_api_key(&self) -> Option<String> {
        non_empty(&self.google_tts_api_key)
    }

    pub fn openai_api_key(&self) -> Option<String> {
        non_empty(&self.openai_api_key)
    }
}

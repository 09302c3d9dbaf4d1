use serde::{Deserialize, Serialize};

/// Base URLs of every third-party service the core talks to.
///
/// The defaults point at the public services; tests and self-hosted mirrors
/// override individual entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiEndpoints {
    /// Free pivot translation service (LibreTranslate-compatible `/translate`).
    pub libre_translate: String,
    pub google_translate: String,
    pub openai_chat: String,
    pub openai_speech: String,
    pub anthropic_messages: String,
    /// YouTube Data API captions collection.
    pub youtube_captions: String,
    /// Unofficial timed-text endpoint.
    pub youtube_timedtext: String,
    pub google_tts: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            libre_translate: "https://libretranslate.de/translate".to_string(),
            google_translate: "https://translation.googleapis.com/language/translate/v2".to_string(),
            openai_chat: "https://api.openai.com/v1/chat/completions".to_string(),
            openai_speech: "https://api.openai.com/v1/audio/speech".to_string(),
            anthropic_messages: "https://api.anthropic.com/v1/messages".to_string(),
            youtube_captions: "https://www.googleapis.com/youtube/v3/captions".to_string(),
            youtube_timedtext: "https://video.google.com/timedtext".to_string(),
            google_tts: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Every endpoint rooted at `base`, keeping the public paths. Used to point
    /// the whole core at a single mirror.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            libre_translate: format!("{}/translate", base),
            google_translate: format!("{}/language/translate/v2", base),
            openai_chat: format!("{}/v1/chat/completions", base),
            openai_speech: format!("{}/v1/audio/speech", base),
            anthropic_messages: format!("{}/v1/messages", base),
            youtube_captions: format!("{}/youtube/v3/captions", base),
            youtube_timedtext: format!("{}/timedtext", base),
            google_tts: format!("{}/v1/text:synthesize", base),
        }
    }
}

//! On-device speech synthesis.
//!
//! A system voice can only speak aloud; it never yields a capturable audio
//! handle, so this link always resolves to `None`.

use async_trait::async_trait;
use log::debug;

use super::SpeechProvider;
use crate::models::{AudioHandle, SpeechRequest};

#[derive(Debug, Clone, Default)]
pub struct SystemSpeech {
    /// BCP-47 tags of the voices installed on the host.
    voices: Vec<String>,
}

impl SystemSpeech {
    pub fn new(voices: Vec<String>) -> Self {
        Self { voices }
    }

    /// First voice whose tag starts with `lang`, else the first installed one.
    pub fn select_voice(&self, lang: &str) -> Option<&str> {
        self.voices
            .iter()
            .find(|v| v.starts_with(lang))
            .or_else(|| self.voices.first())
            .map(String::as_str)
    }
}

#[async_trait]
impl SpeechProvider for SystemSpeech {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Option<AudioHandle> {
        match self.select_voice(&request.lang) {
            Some(voice) => debug!("System voice {} selected, but speech cannot be captured", voice),
            None => debug!("No system voices available"),
        }
        None
    }
}

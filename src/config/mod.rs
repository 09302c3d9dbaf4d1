// Configuration module
// Centralized management of application configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod endpoints;
pub mod settings;
pub mod store;

pub use endpoints::ApiEndpoints;
pub use settings::{AudioQuality, ProviderDescriptor, ProviderId, Settings, VoiceType};
pub use store::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};

/// Media duration assumed by the background when the real one is unknown (5 minutes).
pub const ASSUMED_MEDIA_DURATION_SECS: f64 = 300.0;

/// Orchestrator-wide configuration. Unlike [`Settings`], this is owned by the
/// process hosting the core, not by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoints: ApiEndpoints,
    /// Transport timeout applied to every outbound request.
    pub http_timeout_secs: u64,
    /// Total duration used to derive segment timing in completion messages.
    pub assumed_duration_secs: f64,
    /// BCP-47 tags of the voices the host can speak with.
    #[serde(default)]
    pub system_voices: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: ApiEndpoints::default(),
            http_timeout_secs: 60,
            assumed_duration_secs: ASSUMED_MEDIA_DURATION_SECS,
            system_voices: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Comma-separated voice tags, as passed by the host. Blank entries are skipped.
    pub fn with_system_voices(mut self, voices: &str) -> Self {
        self.system_voices = voices
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Shared HTTP client for all providers.
    pub fn build_http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.http_timeout())
            .user_agent(concat!("yt-dubbing/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Could not create custom client, using default: {}", e);
                reqwest::Client::new()
            })
    }
}

// Translation module
// Stage 2 of the pipeline: provider chain with free pivot and canned fallback

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;

use crate::config::{ApiEndpoints, ProviderId, Settings};

pub mod chat;
pub mod custom;
pub mod demo;
pub mod google;
pub mod libre;

pub use chat::{AnthropicMessages, OpenAiChat};
pub use custom::{CustomEndpoint, ResponseShape};
pub use demo::{CannedTranslation, demo_translation};
pub use google::GoogleTranslate;
pub use libre::LibreTranslate;

/// One translation backend. Any failure, including a missing credential,
/// is reported as `None`.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn attempt(&self, text: &str, target_lang: &str) -> Option<String>;
}

/// Ordered providers, terminated by [`CannedTranslation`].
pub struct TranslationChain {
    providers: Vec<Box<dyn TranslationProvider>>,
}

impl TranslationChain {
    pub fn new(providers: Vec<Box<dyn TranslationProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// First non-blank result; the canned phrase when every provider fails.
    pub async fn run(&self, text: &str, target_lang: &str) -> Translation {
        for provider in &self.providers {
            match provider.attempt(text, target_lang).await {
                Some(translated) if !translated.trim().is_empty() => {
                    info!("Translated {} chars to {} via {}", text.len(), target_lang, provider.name());
                    return Translation {
                        text: translated,
                        provider: provider.name(),
                    };
                }
                _ => warn!("Provider {} gave no translation, trying next", provider.name()),
            }
        }

        warn!("All translation providers failed, using demo translation");
        Translation {
            text: demo_translation(text, target_lang),
            provider: CannedTranslation.name(),
        }
    }
}

/// Result of a chain run and the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub provider: &'static str,
}

impl Translation {
    pub fn is_canned(&self) -> bool {
        self.provider == CannedTranslation.name()
    }
}

/// Builds the translation chain from the stored provider settings.
pub struct Translator {
    client: Client,
    endpoints: ApiEndpoints,
}

impl Translator {
    pub fn new(client: Client, endpoints: ApiEndpoints) -> Self {
        Self { client, endpoints }
    }

    fn libre(&self) -> Box<dyn TranslationProvider> {
        Box::new(LibreTranslate::new(self.client.clone(), self.endpoints.libre_translate.clone()))
    }

    /// Selected adapter first, then the free pivot (unless it was selected).
    pub fn chain(&self, settings: &Settings) -> TranslationChain {
        let descriptor = settings.translation_provider();
        info!("🔧 Using API provider: {}", descriptor.id.as_str());

        let selected: Box<dyn TranslationProvider> = match descriptor.id {
            ProviderId::Libre => return self.pivot_chain(),
            ProviderId::Google => Box::new(GoogleTranslate::new(
                self.client.clone(),
                self.endpoints.google_translate.clone(),
                descriptor.credential,
            )),
            ProviderId::OpenAi => Box::new(OpenAiChat::new(
                self.client.clone(),
                self.endpoints.openai_chat.clone(),
                descriptor.credential,
            )),
            ProviderId::Anthropic => Box::new(AnthropicMessages::new(
                self.client.clone(),
                self.endpoints.anthropic_messages.clone(),
                descriptor.credential,
            )),
            ProviderId::Custom => Box::new(CustomEndpoint::new(
                self.client.clone(),
                descriptor.endpoint,
                descriptor.credential,
            )),
        };

        TranslationChain::new(vec![selected, self.libre()])
    }

    pub fn pivot_chain(&self) -> TranslationChain {
        TranslationChain::new(vec![self.libre()])
    }

    /// Chain for a settings read that may have failed. Without settings only
    /// the free pivot is tried, whatever provider the user picked.
    pub fn chain_or_pivot(&self, settings: Option<&Settings>) -> TranslationChain {
        match settings {
            Some(settings) => self.chain(settings),
            None => {
                warn!("Translation settings unavailable, falling back to LibreTranslate");
                self.pivot_chain()
            }
        }
    }

    pub async fn run_or_pivot(&self, settings: Option<&Settings>, text: &str, target_lang: &str) -> Translation {
        self.chain_or_pivot(settings).run(text, target_lang).await
    }
}

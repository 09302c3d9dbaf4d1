//! Background orchestrator of the YouTube AI dubbing extension: per-tab task
//! registry plus the transcript -> translation -> speech pipeline, each stage
//! backed by a provider chain that degrades to demo output.

pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use config::{AppConfig, Settings, SettingsStore};
pub use errors::{AppError, AppResult};
pub use events::{Notification, NotificationSink, Request};
pub use orchestrator::Orchestrator;

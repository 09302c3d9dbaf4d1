// Orchestrator module
// Per-tab task registry and the translation pipeline driver

use std::sync::Arc;

use log::info;
use tokio::task::JoinHandle;

use crate::config::{AppConfig, SettingsStore};
use crate::events::{Notification, NotificationSink, Request};
use crate::models::{TabId, Task, TaskId};
use crate::services::{SpeechSynthesizer, TranscriptFetcher, Translator};

pub mod pipeline;
pub mod registry;
pub mod stats;

#[cfg(test)]
mod tests;

pub use pipeline::PipelineStep;
pub use registry::TaskRegistry;
pub use stats::{UsageSnapshot, UsageStats};

pub(crate) struct Inner {
    config: AppConfig,
    store: Arc<dyn SettingsStore>,
    sink: Arc<dyn NotificationSink>,
    registry: TaskRegistry,
    stats: UsageStats,
    transcripts: TranscriptFetcher,
    translator: Translator,
    synthesizer: SpeechSynthesizer,
}

/// A pipeline started by [`Orchestrator::submit`].
#[derive(Debug)]
pub struct SubmittedTask {
    pub task_id: TaskId,
    pub handle: JoinHandle<()>,
}

/// Background side of the extension. Cheap to clone; all clones share the
/// same registry and counters.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub fn new(config: AppConfig, store: Arc<dyn SettingsStore>, sink: Arc<dyn NotificationSink>) -> Self {
        let client = config.build_http_client();
        let endpoints = config.endpoints.clone();
        Self {
            inner: Arc::new(Inner {
                transcripts: TranscriptFetcher::new(client.clone(), endpoints.clone()),
                translator: Translator::new(client.clone(), endpoints.clone()),
                synthesizer: SpeechSynthesizer::new(client, endpoints)
                    .with_system_voices(config.system_voices.clone()),
                config,
                store,
                sink,
                registry: TaskRegistry::new(),
                stats: UsageStats::new(),
            }),
        }
    }

    /// Start a pipeline for `tab_id`, superseding any task the tab already has.
    /// Must be called from within a Tokio runtime.
    pub fn submit(
        &self,
        tab_id: TabId,
        video_id: impl Into<String>,
        video_title: Option<String>,
        target_lang: Option<String>,
    ) -> SubmittedTask {
        let task = Task::new(tab_id, video_id, video_title, target_lang);
        let task_id = task.id;
        self.inner.registry.register(task.clone());

        let handle = tokio::spawn(pipeline::drive(self.inner.clone(), task));
        SubmittedTask { task_id, handle }
    }

    /// Cancel the tab's task, if any. No terminal message is sent for it.
    pub fn cancel(&self, tab_id: TabId) -> bool {
        self.inner.registry.cancel(tab_id).is_some()
    }

    /// Dispatch one request from `tab_id`. Returns the started task for
    /// `translate` requests.
    pub async fn handle_request(&self, tab_id: TabId, request: Request) -> Option<SubmittedTask> {
        match request {
            Request::Translate {
                video_id,
                video_title,
                target_lang,
            } => Some(self.submit(tab_id, video_id, video_title, target_lang)),
            Request::CancelTranslation => {
                self.cancel(tab_id);
                None
            }
            Request::GetStats => {
                let data = self.stats();
                self.inner.sink.deliver(tab_id, Notification::UpdateStats { data }).await;
                None
            }
        }
    }

    pub fn stats(&self) -> UsageSnapshot {
        self.inner.stats.snapshot()
    }

    pub fn is_active(&self, tab_id: TabId) -> bool {
        self.inner.registry.is_active(tab_id)
    }

    pub fn active_tasks(&self) -> usize {
        self.inner.registry.len()
    }

    /// Cancel every live task; used when the host goes away.
    pub fn shutdown(&self) -> usize {
        let cancelled = self.inner.registry.cancel_all();
        info!("🔄 Orchestrator shutting down, cancelled {} task(s)", cancelled);
        cancelled
    }
}

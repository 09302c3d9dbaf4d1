//! Pipeline driver: transcript -> translation -> optional speech, with
//! progress reporting and cooperative cancellation at stage boundaries.

use std::sync::Arc;

use log::{error, info, warn};

use super::Inner;
use crate::config::Settings;
use crate::errors::{AppError, AppResult};
use crate::events::Notification;
use crate::models::{SpeechRequest, SpeechSource, Task};
use crate::services::transcript::DEMO_TRANSCRIPT;
use crate::utils::language::display_name;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    FetchTranscript,
    Translate,
    /// Step 3 when dubbing is enabled.
    Synthesize,
    /// Step 3 otherwise.
    Finish,
}

impl PipelineStep {
    pub fn number(&self) -> u8 {
        match self {
            PipelineStep::FetchTranscript => 1,
            PipelineStep::Translate => 2,
            PipelineStep::Synthesize | PipelineStep::Finish => 3,
        }
    }

    /// Progress text shown by the overlay. Only the translation step names
    /// the target language.
    pub fn step_text(&self, target_lang: &str) -> String {
        match self {
            PipelineStep::FetchTranscript => "Đang lấy phụ đề tiếng Anh...".to_string(),
            PipelineStep::Translate => format!("Đang dịch sang {}...", display_name(target_lang)),
            PipelineStep::Synthesize => "Đang tạo giọng lồng tiếng...".to_string(),
            PipelineStep::Finish => "Hoàn thành dịch thuật!".to_string(),
        }
    }

    pub fn notification(&self, target_lang: &str) -> Notification {
        Notification::TranslationProgress {
            step: self.number(),
            step_text: self.step_text(target_lang),
        }
    }
}

/// Terminal notification for a pipeline failure; `None` for cancellation,
/// which ends the task without a message.
pub fn failure_notification(err: &AppError) -> Option<Notification> {
    match err {
        AppError::Cancelled => None,
        other => Some(Notification::TranslationError {
            error: other.to_string(),
        }),
    }
}

struct Pipeline<'a> {
    inner: &'a Inner,
    task: &'a Task,
}

impl Pipeline<'_> {
    fn checkpoint(&self) -> AppResult<()> {
        if self.task.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    /// Deliver to the task's tab unless the task has been cancelled meanwhile.
    async fn emit(&self, notification: Notification) -> AppResult<()> {
        self.checkpoint()?;
        self.inner.sink.deliver(self.task.tab_id, notification).await;
        Ok(())
    }

    /// `None` when the store cannot be read at all. Transcript and speech then
    /// run with default settings (no keys, dubbing off) and translation is
    /// limited to the free pivot.
    async fn load_settings(&self) -> Option<Settings> {
        match self.inner.store.load().await {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!("Failed to read settings, continuing without them: {}", e);
                None
            }
        }
    }

    async fn run(&self) -> AppResult<()> {
        let loaded = self.load_settings().await;
        let settings = loaded.clone().unwrap_or_default();
        let target_lang = self
            .task
            .target_lang
            .clone()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| settings.target_lang());

        // Step 1: transcript
        self.emit(PipelineStep::FetchTranscript.notification(&target_lang)).await?;
        let transcript = self
            .inner
            .transcripts
            .fetch_video_transcript(&settings, &self.task.video_id)
            .await?;
        if transcript.text() == DEMO_TRANSCRIPT {
            self.inner.stats.record_demo_transcript();
        }
        self.checkpoint()?;

        // Step 2: translation
        self.emit(PipelineStep::Translate.notification(&target_lang)).await?;
        let translation = self
            .inner
            .translator
            .run_or_pivot(loaded.as_ref(), transcript.text(), &target_lang)
            .await;
        if translation.is_canned() {
            self.inner.stats.record_canned_translation();
        }
        self.checkpoint()?;

        // Step 3: optional dubbing
        let audio = if settings.dubbing_enabled() {
            self.emit(PipelineStep::Synthesize.notification(&target_lang)).await?;
            let request = SpeechRequest::new(translation.text.as_str(), target_lang.as_str())
                .voice(settings.voice_type())
                .quality(settings.audio_quality());
            let handle = self.inner.synthesizer.synthesize(&settings, &request).await;
            if handle.source == SpeechSource::DemoTone {
                self.inner.stats.record_demo_audio();
            }
            self.checkpoint()?;
            Some(handle.to_payload())
        } else {
            self.emit(PipelineStep::Finish.notification(&target_lang)).await?;
            None
        };

        let timing = transcript.segments(self.inner.config.assumed_duration_secs);
        self.emit(Notification::TranslationComplete {
            subtitles: translation.text,
            original_transcript: transcript.into_text(),
            timing,
            audio,
        })
        .await
    }
}

/// Runs one task to its end and releases its registry entry.
pub(super) async fn drive(inner: Arc<Inner>, task: Task) {
    info!("🎯 Starting translation for video {} on tab {}", task.video_id, task.tab_id);
    inner.stats.record_started();

    let result = Pipeline {
        inner: &inner,
        task: &task,
    }
    .run()
    .await;

    match result {
        Ok(()) => {
            info!("Translation for tab {} completed", task.tab_id);
            inner.stats.record_completed();
        }
        Err(AppError::Cancelled) => {
            info!("Task {} for tab {} stopped after cancellation", task.id, task.tab_id);
            inner.stats.record_cancelled();
        }
        Err(e) => {
            error!("❌ Translation error ({}): {}", e.kind(), e);
            inner.stats.record_failed();
            if !task.is_cancelled() {
                if let Some(notification) = failure_notification(&e) {
                    inner.sink.deliver(task.tab_id, notification).await;
                }
            }
        }
    }

    inner.registry.finish(task.tab_id, task.id);
}

// Events module
// Message contract between the foreground controller and the orchestrator

use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::{AudioPayload, Segment, TabId};
use crate::orchestrator::UsageSnapshot;

/// Requests sent by the page-injected controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "translate", rename_all = "camelCase")]
    Translate {
        video_id: String,
        #[serde(default)]
        video_title: Option<String>,
        #[serde(default)]
        target_lang: Option<String>,
    },
    #[serde(rename = "cancel_translation")]
    CancelTranslation,
    #[serde(rename = "get_stats")]
    GetStats,
}

/// Notifications sent back to the requesting tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action")]
pub enum Notification {
    #[serde(rename = "translationProgress", rename_all = "camelCase")]
    TranslationProgress { step: u8, step_text: String },

    #[serde(rename = "translationComplete", rename_all = "camelCase")]
    TranslationComplete {
        subtitles: String,
        original_transcript: String,
        timing: Vec<Segment>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<AudioPayload>,
    },

    #[serde(rename = "translationError")]
    TranslationError { error: String },

    #[serde(rename = "updateStats")]
    UpdateStats { data: UsageSnapshot },
}

impl Notification {
    pub fn action(&self) -> &'static str {
        match self {
            Notification::TranslationProgress { .. } => "translationProgress",
            Notification::TranslationComplete { .. } => "translationComplete",
            Notification::TranslationError { .. } => "translationError",
            Notification::UpdateStats { .. } => "updateStats",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Notification::TranslationComplete { .. } | Notification::TranslationError { .. }
        )
    }
}

/// Wire envelope used by the stdio host: which tab a message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub tab_id: TabId,
    pub message: T,
}

/// Reporting channel towards the tabs.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, tab_id: TabId, notification: Notification);
}

/// Sink forwarding every notification into a Tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Envelope<Notification>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Envelope<Notification>>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, with the given buffer size.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Envelope<Notification>>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn deliver(&self, tab_id: TabId, notification: Notification) {
        let action = notification.action();
        match self.tx.send(Envelope { tab_id, message: notification }).await {
            Ok(_) => debug!("Emitted {} to tab {}", action, tab_id),
            Err(e) => error!("Failed to emit {} to tab {}: {}", action, tab_id, e),
        }
    }
}

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Identifier of the browser tab that sent a request.
pub type TabId = u64;

/// Unique id of one pipeline run.
pub type TaskId = Uuid;

/// One in-flight transcript -> translate [-> speak] run for a single tab.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub tab_id: TabId,
    pub video_id: String,
    pub video_title: Option<String>,
    /// Target language requested by the foreground, if any. The settings
    /// default applies otherwise.
    pub target_lang: Option<String>,
    pub token: CancellationToken,
}

impl Task {
    pub fn new(
        tab_id: TabId,
        video_id: impl Into<String>,
        video_title: Option<String>,
        target_lang: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tab_id,
            video_id: video_id.into(),
            video_title,
            target_lang,
            token: CancellationToken::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

//! Primary transcript source: the official captions API.

use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, header};
use serde::Deserialize;

use super::TranscriptSource;
use crate::errors::{AppError, AppResult};

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static TIMING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}").expect("valid timing regex")
});
static INDEX_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+$").expect("valid index regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid blank regex"));

fn strip_caption_artifacts(text: &str) -> String {
    let text = MARKUP_TAG.replace_all(text, "");
    let text = TIMING_LINE.replace_all(&text, "");
    let text = INDEX_LINE.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n");
    text.trim().to_string()
}

/// Reduce a caption body (XML, SRT or VTT flavoured) to plain text: tag
/// fragments, `HH:MM:SS.mmm --> HH:MM:SS.mmm` lines and bare index lines are
/// removed, blank lines collapsed.
///
/// The pass is repeated until nothing changes, so the result is a fixed
/// point: cleaning already-cleaned text returns it unchanged.
pub fn clean_caption_text(text: &str) -> String {
    let mut current = strip_caption_artifacts(text);
    loop {
        let next = strip_caption_artifacts(&current);
        // every rewrite shortens the text, so this terminates
        if next == current {
            return current;
        }
        current = next;
    }
}

#[derive(Debug, Deserialize)]
struct CaptionList {
    #[serde(default)]
    items: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    id: String,
    #[serde(default)]
    snippet: CaptionSnippet,
}

#[derive(Debug, Default, Deserialize)]
struct CaptionSnippet {
    #[serde(default)]
    language: String,
}

/// Caption tracks via the YouTube Data API. Needs the `youtube_api_key` setting.
pub struct YouTubeCaptions {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl YouTubeCaptions {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    async fn request(&self, video_id: &str, api_key: &str) -> AppResult<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("part", "snippet"), ("videoId", video_id), ("key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ApiError(format!("caption list returned HTTP {}", status)));
        }

        let list: CaptionList = response.json().await?;
        // prefer the English track, else the first one listed
        let Some(track) = list
            .items
            .iter()
            .find(|t| t.snippet.language == "en")
            .or_else(|| list.items.first())
        else {
            debug!("No caption tracks for video {}", video_id);
            return Ok(None);
        };

        debug!("Using caption track {} ({})", track.id, track.snippet.language);
        let response = self
            .client
            .get(format!("{}/{}", self.endpoint.trim_end_matches('/'), track.id))
            .query(&[("key", api_key)])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ApiError(format!("caption download returned HTTP {}", status)));
        }

        let body = response.text().await?;
        let text = clean_caption_text(&body);
        Ok((!text.is_empty()).then_some(text))
    }
}

#[async_trait]
impl TranscriptSource for YouTubeCaptions {
    fn name(&self) -> &'static str {
        "youtube-captions"
    }

    async fn fetch(&self, video_id: &str) -> Option<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("YouTube API key not configured, skipping captions API");
            return None;
        };

        match self.request(video_id, api_key).await {
            Ok(Some(text)) => {
                info!("Fetched {} chars of captions for {}", text.len(), video_id);
                Some(text)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Error fetching YouTube transcript: {}", e);
                None
            }
        }
    }
}

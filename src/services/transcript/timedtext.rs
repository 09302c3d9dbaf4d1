//! Secondary transcript source: the unofficial timed-text endpoint.

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use super::TranscriptSource;
use crate::errors::{AppError, AppResult};
use crate::utils::common::{decode_html_entities, normalize_whitespace};

static TEXT_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b[^>]*>(.*?)</text>").expect("valid text element regex"));
static INNER_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Concatenate the contents of every `<text>` element, separated by a single
/// space. `None` when the document carries no text at all.
pub fn parse_timed_text(xml: &str) -> Option<String> {
    let pieces: Vec<String> = TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_html_entities(&INNER_TAG.replace_all(m.as_str(), "")))
        .map(|piece| normalize_whitespace(&piece))
        .filter(|piece| !piece.is_empty())
        .collect();

    if pieces.is_empty() {
        None
    } else {
        Some(pieces.join(" "))
    }
}

pub struct TimedText {
    client: Client,
    endpoint: String,
}

impl TimedText {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn request(&self, video_id: &str) -> AppResult<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("lang", "en"), ("v", video_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ApiError(format!(
                "timedtext returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(parse_timed_text(&body))
    }
}

#[async_trait]
impl TranscriptSource for TimedText {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch(&self, video_id: &str) -> Option<String> {
        match self.request(video_id).await {
            Ok(text) => {
                if text.is_none() {
                    debug!("timedtext returned no text for {}", video_id);
                }
                text
            }
            Err(e) => {
                warn!("Error with alternative transcript method: {}", e);
                None
            }
        }
    }
}

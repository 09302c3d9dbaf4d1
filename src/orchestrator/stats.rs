//! In-memory usage counters. Nothing here is persisted.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct UsageStats {
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
    demo_transcripts: AtomicU64,
    canned_translations: AtomicU64,
    demo_audio: AtomicU64,
    last_completed_at: Mutex<Option<DateTime<Utc>>>,
}

/// Point-in-time copy of [`UsageStats`], sent with `updateStats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub started: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub demo_transcripts: u64,
    pub canned_translations: u64,
    pub demo_audio: u64,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        *self.last_completed_at.lock() = Some(Utc::now());
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_demo_transcript(&self) {
        self.demo_transcripts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_canned_translation(&self) {
        self.canned_translations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_demo_audio(&self) {
        self.demo_audio.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            demo_transcripts: self.demo_transcripts.load(Ordering::Relaxed),
            canned_translations: self.canned_translations.load(Ordering::Relaxed),
            demo_audio: self.demo_audio.load(Ordering::Relaxed),
            last_completed_at: *self.last_completed_at.lock(),
        }
    }
}

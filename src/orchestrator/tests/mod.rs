//! End-to-end pipeline scenarios against local mock services.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::Query, routing::{get, post}};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::*;
use crate::config::{ApiEndpoints, JsonFileSettingsStore, MemorySettingsStore};
use crate::events::{ChannelSink, Envelope};
use crate::models::SpeechSource;
use crate::services::transcript::DEMO_TRANSCRIPT;
use crate::services::translation::demo_translation;
use crate::test_support::{refused_url, serve};

fn setup(endpoints: ApiEndpoints, store: impl SettingsStore + 'static) -> (Orchestrator, mpsc::Receiver<Envelope<Notification>>) {
    let (sink, rx) = ChannelSink::channel(64);
    let config = AppConfig {
        endpoints,
        http_timeout_secs: 5,
        ..AppConfig::default()
    };
    (Orchestrator::new(config, Arc::new(store), Arc::new(sink)), rx)
}

fn offline() -> (Orchestrator, mpsc::Receiver<Envelope<Notification>>) {
    setup(ApiEndpoints::with_base(&refused_url()), MemorySettingsStore::new())
}

fn drain(rx: &mut mpsc::Receiver<Envelope<Notification>>) -> Vec<Envelope<Notification>> {
    let mut out = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        out.push(envelope);
    }
    out
}

fn progress_steps(messages: &[Envelope<Notification>]) -> Vec<u8> {
    messages
        .iter()
        .filter_map(|e| match &e.message {
            Notification::TranslationProgress { step, .. } => Some(*step),
            _ => None,
        })
        .collect()
}

/// Mock YouTube timed-text plus LibreTranslate. Video "slow" answers late.
async fn mock_services() -> String {
    let app = Router::new()
        .route(
            "/timedtext",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let video = params.get("v").cloned().unwrap_or_default();
                if video == "slow" {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
                format!("<transcript><text>Transcript of {}.</text><text>Second line!</text></transcript>", video)
            }),
        )
        .route(
            "/translate",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"translatedText": format!("dịch: {}", body["q"].as_str().unwrap_or_default())}))
            }),
        );
    serve(app).await
}

#[tokio::test]
async fn test_no_settings_completes_with_demo_values() {
    let (orchestrator, mut rx) = offline();

    let submitted = orchestrator.submit(1, "dQw4w9WgXcQ", Some("Title".into()), None);
    submitted.handle.await.unwrap();

    let messages = drain(&mut rx);
    assert!(messages.iter().all(|e| e.tab_id == 1));
    assert_eq!(progress_steps(&messages), vec![1, 2, 3]);
    assert_eq!(messages.len(), 4);

    match &messages[3].message {
        Notification::TranslationComplete {
            subtitles,
            original_transcript,
            timing,
            audio,
        } => {
            assert_eq!(subtitles, &demo_translation(DEMO_TRANSCRIPT, "vi"));
            assert_eq!(original_transcript, DEMO_TRANSCRIPT);
            assert_eq!(timing.len(), 5);
            assert_eq!(timing[0].start_time, 0.0);
            assert_eq!(timing[4].end_time, 300.0);
            assert!(audio.is_none());
        }
        other => panic!("unexpected terminal message: {:?}", other),
    }

    assert!(!orchestrator.is_active(1));
    let stats = orchestrator.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.demo_transcripts, 1);
    assert_eq!(stats.canned_translations, 1);
}

#[tokio::test]
async fn test_immediate_cancel_emits_nothing() {
    let (orchestrator, mut rx) = offline();

    let submitted = orchestrator.submit(5, "abc", None, None);
    assert!(orchestrator.cancel(5));
    submitted.handle.await.unwrap();

    assert!(drain(&mut rx).is_empty());
    assert!(!orchestrator.is_active(5));
    assert_eq!(orchestrator.stats().cancelled, 1);

    // second cancel is a no-op
    assert!(!orchestrator.cancel(5));
}

#[tokio::test]
async fn test_resubmission_silences_superseded_task() {
    let base = mock_services().await;
    let (orchestrator, mut rx) = setup(ApiEndpoints::with_base(&base), MemorySettingsStore::new());

    let first = orchestrator.submit(3, "slow", None, None);
    // wait until the first task is inside its transcript request
    let envelope = rx.recv().await.unwrap();
    assert_eq!(envelope.message, PipelineStep::FetchTranscript.notification("vi"));

    let second = orchestrator.submit(3, "fast", None, None);
    first.handle.await.unwrap();
    second.handle.await.unwrap();

    let messages = drain(&mut rx);
    assert_eq!(progress_steps(&messages), vec![1, 2, 3]);
    let completions: Vec<_> = messages.iter().filter(|e| e.message.is_terminal()).collect();
    assert_eq!(completions.len(), 1);
    match &completions[0].message {
        Notification::TranslationComplete {
            subtitles,
            original_transcript,
            ..
        } => {
            assert_eq!(original_transcript, "Transcript of fast. Second line!");
            assert_eq!(subtitles, "dịch: Transcript of fast. Second line!");
        }
        other => panic!("unexpected terminal message: {:?}", other),
    }
    assert!(!orchestrator.is_active(3));
}

#[tokio::test]
async fn test_custom_provider_and_requested_language() {
    let app = Router::new()
        .route("/timedtext", get(|| async { "<transcript><text>Hello there.</text></transcript>" }))
        .route(
            "/llm",
            post(|Json(body): Json<Value>| async move {
                assert!(body["messages"][0]["content"].as_str().unwrap_or_default().contains("Japanese"));
                Json(json!({"content": " xin chào "}))
            }),
        );
    let base = serve(app).await;

    let store = MemorySettingsStore::new();
    store.set("apiProvider", json!("custom"));
    store.set("apiUrl", json!(format!("{}/llm", base)));
    let (orchestrator, mut rx) = setup(ApiEndpoints::with_base(&base), store);

    let submitted = orchestrator
        .handle_request(
            2,
            Request::Translate {
                video_id: "vid".into(),
                video_title: None,
                target_lang: Some("ja".into()),
            },
        )
        .await
        .unwrap();
    submitted.handle.await.unwrap();

    let messages = drain(&mut rx);
    assert_eq!(messages[1].message, PipelineStep::Translate.notification("ja"));
    match &messages[1].message {
        Notification::TranslationProgress { step_text, .. } => assert_eq!(step_text, "Đang dịch sang tiếng Nhật..."),
        other => panic!("unexpected progress message: {:?}", other),
    }
    match &messages.last().unwrap().message {
        Notification::TranslationComplete { subtitles, timing, .. } => {
            assert_eq!(subtitles, "xin chào");
            assert_eq!(timing.len(), 1);
        }
        other => panic!("unexpected terminal message: {:?}", other),
    }
}

#[tokio::test]
async fn test_dubbing_attaches_demo_tone() {
    let store = MemorySettingsStore::new();
    store.set("dubbingEnabled", json!(true));
    store.set("voiceType", json!("male"));
    let (orchestrator, mut rx) = setup(ApiEndpoints::with_base(&refused_url()), store);

    orchestrator.submit(4, "vid", None, None).handle.await.unwrap();

    let messages = drain(&mut rx);
    assert_eq!(messages[2].message, PipelineStep::Synthesize.notification("vi"));
    match &messages[3].message {
        Notification::TranslationComplete { audio: Some(audio), .. } => {
            assert_eq!(audio.source, SpeechSource::DemoTone);
            assert_eq!(audio.mime_type, "audio/wav");
            assert!(!audio.data.is_empty());
        }
        other => panic!("expected completion with audio, got {:?}", other),
    }
    assert_eq!(orchestrator.stats().demo_audio, 1);
}

#[tokio::test]
async fn test_tabs_run_independently() {
    let base = mock_services().await;
    let (orchestrator, mut rx) = setup(ApiEndpoints::with_base(&base), MemorySettingsStore::new());

    let a = orchestrator.submit(10, "slow", None, None);
    let b = orchestrator.submit(11, "fast", None, None);
    assert_eq!(orchestrator.active_tasks(), 2);
    a.handle.await.unwrap();
    b.handle.await.unwrap();

    let messages = drain(&mut rx);
    for tab in [10, 11] {
        let for_tab: Vec<_> = messages.iter().filter(|e| e.tab_id == tab).cloned().collect();
        assert_eq!(progress_steps(&for_tab), vec![1, 2, 3]);
        assert!(for_tab.last().unwrap().message.is_terminal());
    }
    assert_eq!(orchestrator.active_tasks(), 0);
}

#[tokio::test]
async fn test_get_stats_and_shutdown() {
    let (orchestrator, mut rx) = offline();

    let running = orchestrator.submit(7, "vid", None, None);
    assert_eq!(orchestrator.shutdown(), 1);
    running.handle.await.unwrap();
    assert!(drain(&mut rx).is_empty());

    assert!(orchestrator.handle_request(8, Request::GetStats).await.is_none());
    let envelope = rx.recv().await.unwrap();
    assert_eq!(envelope.tab_id, 8);
    match envelope.message {
        Notification::UpdateStats { data } => {
            assert_eq!(data.started, 1);
            assert_eq!(data.cancelled, 1);
            assert_eq!(data.completed, 0);
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

fn expected_progress(lang: &str, last: PipelineStep) -> Vec<Notification> {
    vec![
        PipelineStep::FetchTranscript.notification(lang),
        PipelineStep::Translate.notification(lang),
        last.notification(lang),
    ]
}

#[tokio::test]
async fn test_unreadable_settings_fall_back_to_pivot() {
    let base = mock_services().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"apiProvider": "google", "dubbingEnabled": tr"#).unwrap();
    let (orchestrator, mut rx) = setup(ApiEndpoints::with_base(&base), JsonFileSettingsStore::new(file.path()));

    orchestrator.submit(12, "vid", None, None).handle.await.unwrap();

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 4);
    let progress: Vec<_> = messages[..3].iter().map(|e| e.message.clone()).collect();
    assert_eq!(progress, expected_progress("vi", PipelineStep::Finish));
    match &messages[3].message {
        Notification::TranslationComplete { subtitles, audio, .. } => {
            assert_eq!(subtitles, "dịch: Transcript of vid. Second line!");
            assert!(audio.is_none());
        }
        other => panic!("unexpected terminal message: {:?}", other),
    }
    assert_eq!(orchestrator.stats().canned_translations, 0);
}

#[tokio::test]
async fn test_unreadable_settings_offline_give_canned_subtitles() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let (orchestrator, mut rx) = setup(
        ApiEndpoints::with_base(&refused_url()),
        JsonFileSettingsStore::new(file.path()),
    );

    orchestrator.submit(13, "vid", None, None).handle.await.unwrap();

    let messages = drain(&mut rx);
    assert_eq!(progress_steps(&messages), vec![1, 2, 3]);
    match &messages.last().unwrap().message {
        Notification::TranslationComplete { subtitles, .. } => {
            assert_eq!(subtitles, &demo_translation(DEMO_TRANSCRIPT, "vi"));
        }
        other => panic!("unexpected terminal message: {:?}", other),
    }
}

#[tokio::test]
async fn test_mistyped_key_keeps_other_settings() {
    let store = MemorySettingsStore::new();
    store.set("apiKey", json!(42));
    store.set("dubbingEnabled", json!(true));
    store.set("targetLang", json!("ko"));
    let (orchestrator, mut rx) = setup(ApiEndpoints::with_base(&refused_url()), store);

    orchestrator.submit(14, "vid", None, None).handle.await.unwrap();

    let messages = drain(&mut rx);
    let progress: Vec<_> = messages[..3].iter().map(|e| e.message.clone()).collect();
    assert_eq!(progress, expected_progress("ko", PipelineStep::Synthesize));
    match &messages[3].message {
        Notification::TranslationComplete { subtitles, audio, .. } => {
            assert_eq!(subtitles, &demo_translation(DEMO_TRANSCRIPT, "ko"));
            assert!(audio.is_some());
        }
        other => panic!("unexpected terminal message: {:?}", other),
    }
}

#[test]
fn test_system_voices_come_from_config() {
    let (sink, _rx) = ChannelSink::channel(1);
    let config = AppConfig {
        system_voices: vec!["vi-VN".to_string()],
        ..AppConfig::default()
    };
    let orchestrator = Orchestrator::new(config, Arc::new(MemorySettingsStore::new()), Arc::new(sink));
    assert_eq!(orchestrator.inner.synthesizer.system_voices(), ["vi-VN".to_string()]);
}

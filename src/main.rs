// Stdio host for the orchestrator.
// Reads `{"tabId", "message"}` request lines from stdin and writes
// notification lines to stdout. Logs go to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use yt_dubbing::config::{AppConfig, JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
use yt_dubbing::events::{ChannelSink, Envelope, Request};
use yt_dubbing::orchestrator::Orchestrator;
use yt_dubbing::utils::logger::init_logger;

/// Path of the JSON settings file written by the extension UI.
const SETTINGS_ENV: &str = "YT_DUBBING_SETTINGS";
/// Comma-separated BCP-47 tags of the host's speech voices.
const VOICES_ENV: &str = "YT_DUBBING_VOICES";

fn app_config() -> AppConfig {
    let voices = std::env::var(VOICES_ENV).unwrap_or_default();
    let config = AppConfig::default().with_system_voices(&voices);
    info!("{} system voice(s) available", config.system_voices.len());
    config
}

fn settings_store() -> Arc<dyn SettingsStore> {
    match std::env::var(SETTINGS_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            info!("Reading settings from {}", path);
            Arc::new(JsonFileSettingsStore::new(path))
        }
        _ => {
            info!("{} not set, running with empty settings", SETTINGS_ENV);
            Arc::new(MemorySettingsStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let (sink, mut notifications) = ChannelSink::channel(256);
    let orchestrator = Orchestrator::new(app_config(), settings_store(), Arc::new(sink));

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(envelope) = notifications.recv().await {
            let line = match serde_json::to_string(&envelope) {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to serialize notification: {}", e);
                    continue;
                }
            };
            if let Err(e) = stdout.write_all(format!("{}\n", line).as_bytes()).await {
                error!("Failed to write to stdout: {}", e);
                break;
            }
            if let Err(e) = stdout.flush().await {
                error!("Failed to flush stdout: {}", e);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut running = Vec::new();
    let mut interrupted = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read request from stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Envelope<Request>>(&line) {
                    Ok(envelope) => {
                        if let Some(task) = orchestrator.handle_request(envelope.tab_id, envelope.message).await {
                            running.push(task.handle);
                        }
                    }
                    Err(e) => warn!("Ignoring malformed request: {}", e),
                }
            }
            _ = &mut ctrl_c => {
                orchestrator.shutdown();
                interrupted = true;
                break;
            }
        }
        running.retain(|handle| !handle.is_finished());
    }

    if interrupted {
        for handle in &running {
            handle.abort();
        }
    } else {
        info!("stdin closed, waiting for {} task(s)", running.len());
    }

    for handle in running {
        if let Err(e) = handle.await {
            if !e.is_cancelled() {
                error!("Pipeline task panicked: {}", e);
            }
        }
    }

    // last sender goes away with the orchestrator, which ends the writer
    drop(orchestrator);
    writer.await.context("Notification writer failed")?;
    Ok(())
}

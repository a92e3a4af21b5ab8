// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stabilizer_adapters::{FakeConfigStore, FakeRules, FakeStream, FakeWiki, StreamError};
use stabilizer_core::{Config, FakeClock};
use std::time::Duration;
use tempfile::TempDir;

const CONFIG: &str = r#"
mode = "local"
stream_url = "https://stream.example.org/v2/stream/recentchange"
lang = "fi"
namespaces = [0]
delay = "10m"
max_reconnects = 2
"#;

const MESSAGES: &str = r#"
{ "fi": { "reasons": { "auto_stabilize": "Automaattinen vakautus ({{ link }})" } } }
"#;

fn write_files(dir: &TempDir, config: &str, messages: &str) -> DaemonConfig {
    let config_path = dir.path().join("stabilizer.toml");
    let messages_path = dir.path().join("messages.json");
    std::fs::write(&config_path, config).unwrap();
    std::fs::write(&messages_path, messages).unwrap();
    DaemonConfig {
        config_path,
        messages_path,
        log_path: None,
    }
}

fn fake_worker(
    stream: FakeStream,
) -> StreamWorker<FakeStream, FakeWiki, FakeRules, FakeConfigStore, FakeClock> {
    StreamWorker::new(WorkerDeps {
        stream,
        wiki: FakeWiki::new(),
        rules: FakeRules::new(),
        config: FakeConfigStore::new(Config::from_toml(CONFIG).unwrap()),
        clock: FakeClock::new(),
        messages: Arc::new(MessageTable::from_json(MESSAGES).unwrap()),
    })
}

#[tokio::test]
async fn startup_loads_config_and_messages() {
    let dir = TempDir::new().unwrap();
    let config = write_files(&dir, CONFIG, MESSAGES);

    let startup = startup(&config).await.unwrap();

    assert_eq!(startup.store.path(), config.config_path.as_path());
    assert_eq!(startup.store.current().site_id(), "fiwiki");
    assert_eq!(
        startup.messages.protect_reason("fi", 7).unwrap(),
        "Automaattinen vakautus ([[Special:Diff/7|7]])"
    );
}

#[tokio::test]
async fn startup_fails_without_config_file() {
    let dir = TempDir::new().unwrap();
    let mut config = write_files(&dir, CONFIG, MESSAGES);
    config.config_path = dir.path().join("missing.toml");

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(
        err,
        LifecycleError::Config(ConfigStoreError::Read { .. })
    ));
}

#[tokio::test]
async fn startup_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = write_files(&dir, "mode = \"sideways\"", MESSAGES);

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(err, LifecycleError::Config(_)));
}

#[tokio::test]
async fn startup_fails_without_messages_file() {
    let dir = TempDir::new().unwrap();
    let mut config = write_files(&dir, CONFIG, MESSAGES);
    config.messages_path = dir.path().join("missing.json");

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(err, LifecycleError::ReadMessages { .. }));
}

#[tokio::test]
async fn startup_rejects_malformed_messages() {
    let dir = TempDir::new().unwrap();
    let config = write_files(&dir, CONFIG, "{ not json");

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(
        err,
        LifecycleError::Messages(MessageError::Parse(_))
    ));
}

#[tokio::test]
async fn startup_requires_reason_for_configured_locale() {
    let dir = TempDir::new().unwrap();
    let config = write_files(
        &dir,
        CONFIG,
        r#"{ "sv": { "reasons": { "auto_stabilize": "Automatisk stabilisering" } } }"#,
    );

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(
        err,
        LifecycleError::Messages(MessageError::UnknownLocale(_))
    ));
}

#[tokio::test]
async fn build_worker_starts_idle() {
    let dir = TempDir::new().unwrap();
    let config = write_files(&dir, CONFIG, MESSAGES);
    let startup = startup(&config).await.unwrap();

    let worker = build_worker(startup, FakeWiki::new(), FakeRules::new());

    assert!(worker.pending().is_empty());
    assert!(!worker.cancellation().is_signaled());
}

#[tokio::test(start_paused = true)]
async fn supervise_reports_exhausted_reconnects() {
    let stream = FakeStream::new();
    for _ in 0..3 {
        stream.push_connection(vec![Err(StreamError::ConnectionReset(
            "reset".to_string(),
        ))]);
    }

    let exit = supervise(fake_worker(stream.clone())).await.unwrap();

    assert!(matches!(exit, WorkerExit::ReconnectsExhausted { attempts: 2 }));
    assert_eq!(exit_status(&exit), ExitCode::from(1));
    assert_eq!(stream.opened().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn supervise_stops_on_cancellation() {
    let worker = fake_worker(FakeStream::new());
    let cancel = worker.cancellation();
    let handle = tokio::spawn(supervise(worker));

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.signal();
    let exit = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert!(matches!(exit, WorkerExit::Shutdown));
    assert_eq!(exit_status(&exit), ExitCode::SUCCESS);
}

#[test]
fn fatal_exit_maps_to_failure_status() {
    let exit = WorkerExit::Fatal(stabilizer_engine::WorkerError::Stream(
        StreamError::Connect("HTTP 500".to_string()),
    ));
    assert_eq!(exit_status(&exit), ExitCode::from(1));
}

#[test]
fn setup_logging_rejects_path_without_file_name() {
    let err = setup_logging(Some(Path::new("/"))).err().unwrap();
    assert!(matches!(err, LifecycleError::InvalidLogPath(_)));
}

#[test]
fn setup_logging_writes_to_log_file_and_installs_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs").join("stabilizer.log");

    let guard = setup_logging(Some(&path)).unwrap();
    tracing::info!("logging ready");
    drop(guard);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("logging ready"), "log:\n{}", content);

    let err = setup_logging(None).err().unwrap();
    assert!(matches!(err, LifecycleError::Logging(_)));
}

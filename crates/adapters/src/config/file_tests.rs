// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stabilizer_core::ConfigMode;
use std::time::Duration;
use tempfile::TempDir;

const CONFIG: &str = r#"
mode = "local"
stream_url = "https://stream.example.org/v2/stream/recentchange"
lang = "fi"
namespaces = [0]
delay = "5m"
"#;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("stabilizer.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_reads_initial_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);

    let store = FileConfigStore::load(&path).unwrap();
    let config = store.current();
    assert_eq!(config.mode, ConfigMode::Local);
    assert_eq!(config.delay, Duration::from_secs(300));
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn load_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = FileConfigStore::load(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigStoreError::Read { .. })));
}

#[tokio::test]
async fn local_refresh_without_changes_reports_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let store = FileConfigStore::load(&path).unwrap();

    assert!(!store.refresh_from_local().await.unwrap());
}

#[tokio::test]
async fn local_refresh_picks_up_edits() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let store = FileConfigStore::load(&path).unwrap();

    write_config(&dir, &format!("{CONFIG}dry_run = true\n"));

    assert!(store.refresh_from_local().await.unwrap());
    assert!(store.current().dry_run);
}

#[tokio::test]
async fn invalid_edit_keeps_previous_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let store = FileConfigStore::load(&path).unwrap();

    write_config(&dir, "mode = ");

    assert!(matches!(
        store.refresh_from_local().await,
        Err(ConfigStoreError::Config(_))
    ));
    assert_eq!(store.current().lang, "fi");
}

#[tokio::test]
async fn network_refresh_requires_online_url() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let store = FileConfigStore::load(&path).unwrap();

    assert!(matches!(
        store.refresh_from_network().await,
        Err(ConfigStoreError::NoOnlineUrl)
    ));
}

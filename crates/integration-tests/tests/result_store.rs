//! Result store properties against the JSON file adapter

use std::path::PathBuf;
use std::sync::Arc;

use rebound_core::application::ResultRecorder;
use rebound_core::domain::{IterationRecord, Reachability, Scenario, Status, SKIPPED_SENTINEL};
use rebound_core::port::event_sink::mocks::RecordingEventSink;
use rebound_infra_json::JsonFileStore;

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rebound_{}_{}.json", tag, uuid::Uuid::new_v4()))
}

fn recorder(path: &PathBuf) -> ResultRecorder {
    ResultRecorder::new(
        Arc::new(JsonFileStore::new(path)),
        Arc::new(RecordingEventSink::new()),
    )
}

fn record(iteration: i64) -> IterationRecord {
    let local_up = iteration % 3 != 0;
    IterationRecord {
        iteration,
        scenario: if iteration % 2 == 0 {
            Scenario::Reboot
        } else {
            Scenario::SoftReset
        },
        status: if local_up { Status::Pass } else { Status::Fail },
        local_address: "10.0.0.1".to_string(),
        remote_address: "10.0.0.2".to_string(),
        reachability: Reachability {
            local_up,
            remote_up: local_up,
        },
        log_excerpt: if local_up {
            None
        } else {
            Some(SKIPPED_SENTINEL.to_string())
        },
        recorded_at_ms: 1_700_000_000_000 + iteration,
    }
}

#[tokio::test]
async fn test_missing_and_empty_files_converge() {
    let missing = temp_path("missing");
    let empty = temp_path("empty");
    std::fs::write(&empty, r#"{"iterations": []}"#).unwrap();

    recorder(&missing).append(&record(1)).await.unwrap();
    recorder(&empty).append(&record(1)).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&missing).unwrap(),
        std::fs::read_to_string(&empty).unwrap()
    );

    let _ = std::fs::remove_file(&missing);
    let _ = std::fs::remove_file(&empty);
}

#[tokio::test]
async fn test_records_reload_in_order() {
    let path = temp_path("reload");

    let written: Vec<IterationRecord> = (1..=12).map(record).collect();
    for r in &written {
        recorder(&path).append(r).await.unwrap();
    }

    let reloaded = recorder(&path).load_records().await.unwrap();
    assert_eq!(reloaded, written);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_corrupt_file_recovers() {
    let path = temp_path("corrupt");
    std::fs::write(&path, "{\"iterations\": [ {\"iteration\": 1, ").unwrap();

    let total = recorder(&path).append(&record(5)).await.unwrap();

    assert_eq!(total, 1);
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["iterations"][0]["iteration"], 5);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_file_is_human_readable() {
    let path = temp_path("pretty");

    recorder(&path).append(&record(2)).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\n    \"iterations\": [\n        {"));
    assert!(contents.contains("\"status\": \"PASS\""));

    let _ = std::fs::remove_file(&path);
}

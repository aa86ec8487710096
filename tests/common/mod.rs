//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use import_monitor::{FetchError, StatusSnapshot, StatusSource};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// A status payload shaped like the importer's `status.json`.
pub fn status_json(status: &str, files_scanned: u64, nodes_created: u64) -> Value {
    json!({
        "currentStatus": status,
        "activeThreads": if status == "Running" { 4 } else { 0 },
        "durationInNS": 5_000_000_000u64,
        "completedBatches": nodes_created / 10,
        "currentFileOrFolder": "/import/source/folder",
        "endDate": if status == "Running" { Value::Null } else { json!("2026-10-19T12:00:00Z") },
        "sourceStatistics": {
            "foldersScanned": 2,
            "filesScanned": files_scanned,
            "unreadableEntries": 0,
            "contentFilesRead": files_scanned,
            "contentBytesRead": files_scanned * 1024,
            "metadataFilesRead": 0,
            "metadataBytesRead": 0,
            "contentVersionFilesRead": 0,
            "contentVersionBytesRead": 0,
            "metadataVersionFilesRead": 0,
            "metadataVersionBytesRead": 0
        },
        "targetStatistics": {
            "spaceNodesCreated": 1,
            "spaceNodesReplaced": 0,
            "spaceNodesSkipped": 0,
            "spacePropertiesWritten": 3,
            "contentNodesCreated": nodes_created,
            "contentNodesReplaced": 0,
            "contentNodesSkipped": 0,
            "contentBytesWritten": nodes_created * 1024,
            "contentPropertiesWritten": nodes_created * 5,
            "contentVersionsCreated": 0,
            "contentVersionsBytesWritten": 0,
            "contentVersionsPropertiesWritten": 0
        }
    })
}

pub fn snapshot(status: &str, files_scanned: u64, nodes_created: u64) -> StatusSnapshot {
    serde_json::from_value(status_json(status, files_scanned, nodes_created)).unwrap()
}

pub enum Step {
    Snapshot(StatusSnapshot),
    Unavailable,
    Malformed,
}

/// Replays a fixed script of responses; the last step repeats once the script runs out.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<StatusSnapshot>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Self::with_delay(steps, Duration::ZERO)
    }

    pub fn with_delay(steps: Vec<Step>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let step = self.steps.lock().await.pop_front();
        match step {
            Some(Step::Snapshot(snapshot)) => {
                *self.last.lock().await = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Step::Unavailable) => Err(FetchError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE)),
            Some(Step::Malformed) => Err(serde_json::from_str::<StatusSnapshot>("{\"currentStatus\":").unwrap_err().into()),
            None => match self.last.lock().await.clone() {
                Some(snapshot) => Ok(snapshot),
                None => Err(FetchError::HttpStatus(StatusCode::NOT_FOUND)),
            },
        }
    }
}

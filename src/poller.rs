use crate::display::SharedSurface;
use crate::lifecycle::LifecycleState;
use crate::status::{SnapshotStore, StatusSnapshot};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

/// Path of the status document, relative to the web script context.
pub const STATUS_PATH: &str = "bulk/import/filesystem/status.json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Status endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status endpoint returned HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("JSON parsing exception: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// True for network and HTTP failures, false for malformed payloads.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus(_))
    }
}

/// Anything that can produce the importer's current status.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError>;
}

/// Fetches `status.json` over HTTP.
pub struct HttpStatusSource {
    client: Client,
    status_uri: Url,
}

impl HttpStatusSource {
    pub fn new(context_url: &str, timeout: Duration, user_agent: &str) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            status_uri: status_uri(context_url)?,
        })
    }

    pub fn status_uri(&self) -> &Url {
        &self.status_uri
    }
}

/// Builds `<context>/bulk/import/filesystem/status.json`.
pub fn status_uri(context_url: &str) -> crate::Result<Url> {
    let context = context_url.trim_end_matches('/');
    Ok(Url::parse(&format!("{}/{}", context, STATUS_PATH))?)
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        log::debug!("Retrieving import status from {}", self.status_uri);

        let res = self.client.get(self.status_uri.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body = res.text().await?;
        Ok(StatusSnapshot::from_json(&body)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A new non-terminal snapshot was stored.
    Updated,
    /// A terminal snapshot was stored; the dashboard should stop.
    Terminal,
    /// The fetch failed and the error was shown; the store is unchanged.
    Failed,
    /// A previous fetch is still outstanding, nothing was requested.
    InFlight,
    /// The dashboard stopped while the fetch was outstanding; the result was dropped.
    Discarded,
}

/// Clears the in-flight flag however the fetch ends, including cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    store: SnapshotStore,
    surface: SharedSurface,
    lifecycle: watch::Receiver<LifecycleState>,
    in_flight: AtomicBool,
}

impl StatusPoller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        store: SnapshotStore,
        surface: SharedSurface,
        lifecycle: watch::Receiver<LifecycleState>,
    ) -> Self {
        Self {
            source,
            store,
            surface,
            lifecycle,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Fetches one snapshot and folds it into the store.
    pub async fn poll(&self) -> PollOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("Previous status request still outstanding, skipping poll");
            return PollOutcome::InFlight;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let result = self.source.fetch().await;

        if *self.lifecycle.borrow() != LifecycleState::Active {
            log::debug!("Dashboard no longer active, discarding status response");
            return PollOutcome::Discarded;
        }

        match result {
            Ok(snapshot) => {
                let terminal = snapshot.is_terminal();
                let stored = self.store.replace(snapshot);
                log::debug!(
                    "Stored status snapshot: {} ({} batches)",
                    stored.current_status,
                    stored.completed_batches
                );
                if terminal {
                    PollOutcome::Terminal
                } else {
                    PollOutcome::Updated
                }
            }
            Err(e) => {
                log::warn!("Failed to retrieve import status: {}", e);
                self.surface.lock().await.show_error(&e.to_string());
                PollOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uri_appends_path() {
        assert_eq!(
            status_uri("http://localhost:8080/alfresco/service").unwrap().as_str(),
            "http://localhost:8080/alfresco/service/bulk/import/filesystem/status.json"
        );
        assert_eq!(
            status_uri("http://localhost:8080/alfresco/service/").unwrap().as_str(),
            "http://localhost:8080/alfresco/service/bulk/import/filesystem/status.json"
        );
    }

    #[test]
    fn status_uri_rejects_garbage() {
        assert!(status_uri("not a url").is_err());
    }

    #[test]
    fn classifies_errors() {
        assert!(FetchError::HttpStatus(StatusCode::BAD_GATEWAY).is_transport());
        let parse = serde_json::from_str::<StatusSnapshot>("{").unwrap_err();
        assert!(!FetchError::from(parse).is_transport());
    }
}

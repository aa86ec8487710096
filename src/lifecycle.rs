use crate::chart::{ChartFeeder, ChartGroup, SharedChart};
use crate::display::{Panel, SharedSurface};
use crate::error::{Error, Result};
use crate::poller::{PollOutcome, StatusPoller, StatusSource};
use crate::refresher::TextRefresher;
use crate::scheduler::Scheduler;
use crate::status::SnapshotStore;
use futures::future::BoxFuture;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, watch};

pub const POLL_CADENCE: &str = "status-poll";
pub const TEXT_CADENCE: &str = "text-refresh";
pub const FILES_CHART_CADENCE: &str = "files-chart";
pub const BYTES_CHART_CADENCE: &str = "bytes-chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Built, no cadence running yet.
    Pending,
    Active,
    /// The stop sequence is running.
    Stopping,
    /// Every cadence and chart is stopped. There is no way back.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadences {
    pub poll: Duration,
    pub text_refresh: Duration,
    pub chart: Duration,
}

impl Default for Cadences {
    fn default() -> Self {
        Self {
            poll: Duration::from_millis(1000),
            text_refresh: Duration::from_millis(2000),
            chart: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub cadences: Cadences,
    pub duration_details: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            cadences: Cadences::default(),
            duration_details: true,
        }
    }
}

struct Inner {
    state: watch::Sender<LifecycleState>,
    store: SnapshotStore,
    poller: Arc<StatusPoller>,
    refresher: Arc<TextRefresher>,
    files_feeder: Arc<ChartFeeder>,
    bytes_feeder: Arc<ChartFeeder>,
    surface: SharedSurface,
    scheduler: Mutex<Scheduler>,
    cadences: Cadences,
}

/// Owns every cadence of one dashboard and the one-way stop into the terminal state.
#[derive(Clone)]
pub struct LifecycleController {
    inner: Arc<Inner>,
}

impl LifecycleController {
    pub async fn new(
        source: Arc<dyn StatusSource>,
        surface: SharedSurface,
        files_chart: SharedChart,
        bytes_chart: SharedChart,
        options: DashboardOptions,
    ) -> Self {
        let (state, state_rx) = watch::channel(LifecycleState::Pending);
        let store = SnapshotStore::new();

        let poller = StatusPoller::new(source, store.clone(), surface.clone(), state_rx);
        let refresher = TextRefresher::new(store.clone(), surface.clone(), options.duration_details);
        let files_feeder =
            ChartFeeder::attach(ChartGroup::files_per_second(), store.clone(), files_chart).await;
        let bytes_feeder =
            ChartFeeder::attach(ChartGroup::bytes_per_second(), store.clone(), bytes_chart).await;

        Self {
            inner: Arc::new(Inner {
                state,
                store,
                poller: Arc::new(poller),
                refresher: Arc::new(refresher),
                files_feeder: Arc::new(files_feeder),
                bytes_feeder: Arc::new(bytes_feeder),
                surface,
                scheduler: Mutex::new(Scheduler::new()),
                cadences: options.cadences,
            }),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    pub fn state(&self) -> LifecycleState {
        *self.inner.state.borrow()
    }

    pub async fn is_running(&self, cadence: &str) -> bool {
        self.inner.scheduler.lock().await.is_running(cadence)
    }

    /// Starts the spinner and all four cadences. Only valid once.
    pub async fn start(&self) -> Result<()> {
        let started = self.inner.state.send_if_modified(|state| {
            if *state == LifecycleState::Pending {
                *state = LifecycleState::Active;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(Error::AlreadyStarted);
        }

        log::info!("Starting import status dashboard");
        self.inner.surface.lock().await.start_spinner();

        let cadences = self.inner.cadences;
        let mut scheduler = self.inner.scheduler.lock().await;

        let weak = Arc::downgrade(&self.inner);
        scheduler.register(POLL_CADENCE, cadences.poll, move || poll_tick(weak.clone()))?;

        let refresher = self.inner.refresher.clone();
        scheduler.register(TEXT_CADENCE, cadences.text_refresh, move || {
            let refresher = refresher.clone();
            Box::pin(async move {
                refresher.refresh().await;
            })
        })?;

        for (name, feeder) in [
            (FILES_CHART_CADENCE, self.inner.files_feeder.clone()),
            (BYTES_CHART_CADENCE, self.inner.bytes_feeder.clone()),
        ] {
            scheduler.register(name, cadences.chart, move || {
                let feeder = feeder.clone();
                Box::pin(async move {
                    feeder.tick().await;
                })
            })?;
        }

        Ok(())
    }

    /// Runs the stop sequence. Only the first caller does any work; later or
    /// concurrent calls return `false` immediately. The completed panel is only
    /// shown when the last stored status is terminal.
    pub async fn stop(&self) -> bool {
        let first = self.inner.state.send_if_modified(|state| match state {
            LifecycleState::Pending | LifecycleState::Active => {
                *state = LifecycleState::Stopping;
                true
            }
            LifecycleState::Stopping | LifecycleState::Terminal => false,
        });
        if !first {
            log::debug!("Dashboard already stopping, ignoring repeated stop");
            return false;
        }

        let stopped = self.inner.scheduler.lock().await.stop_all();
        log::debug!("Stopped {} cadences", stopped);

        // Cadences are halted, so this is the last render the surface sees.
        self.inner.refresher.refresh().await;

        for feeder in [&self.inner.files_feeder, &self.inner.bytes_feeder] {
            feeder.chart().lock().await.stop();
        }

        let finished = self
            .inner
            .store
            .current()
            .is_some_and(|snapshot| snapshot.is_terminal());
        {
            let mut surface = self.inner.surface.lock().await;
            surface.stop_spinner();
            // An aborted watch keeps the in-progress panel.
            if finished {
                surface.toggle_panels(Panel::InProgress, Panel::Completed);
            }
        }

        self.inner.state.send_replace(LifecycleState::Terminal);
        if finished {
            log::info!("Dashboard stopped");
        } else {
            log::info!("Dashboard stopped before the import finished");
        }
        true
    }

    /// Resolves once the stop sequence has completed.
    pub async fn wait_terminal(&self) {
        let mut rx = self.inner.state.subscribe();
        if rx.wait_for(|state| *state == LifecycleState::Terminal).await.is_err() {
            log::debug!("Lifecycle channel closed before reaching terminal state");
        }
    }

    /// Waits for every cadence task to exit.
    pub async fn join(&self) {
        self.inner.scheduler.lock().await.join_all().await;
    }

    async fn handle_poll(&self) {
        match self.inner.poller.poll().await {
            PollOutcome::Terminal => {
                let status = self
                    .inner
                    .store
                    .current()
                    .map(|s| s.current_status.to_string())
                    .unwrap_or_default();
                log::info!("Import reached terminal status '{}'", status);
                self.stop().await;
            }
            outcome => log::trace!("Poll finished: {:?}", outcome),
        }
    }
}

/// Dispatches one poll without waiting for it, so a slow endpoint never holds up the cadence.
fn poll_tick(weak: Weak<Inner>) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        if let Some(inner) = weak.upgrade() {
            let controller = LifecycleController { inner };
            tokio::spawn(async move {
                controller.handle_poll().await;
            });
        }
    })
}

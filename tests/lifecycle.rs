//! Cadence and lifecycle behaviour on tokio's paused clock

mod common;

use common::{ScriptedSource, Step, snapshot};
use import_monitor::chart::feeder::ZERO_BASELINE;
use import_monitor::display::{Field, Panel, StatusColor};
use import_monitor::lifecycle::{
    BYTES_CHART_CADENCE, DashboardOptions, FILES_CHART_CADENCE, POLL_CADENCE, TEXT_CADENCE,
};
use import_monitor::{
    Error, LifecycleController, LifecycleState, MemorySurface, PollOutcome, RollingChart,
    SnapshotStore, StatusPoller,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};

struct Harness {
    controller: LifecycleController,
    source: Arc<ScriptedSource>,
    surface: Arc<Mutex<MemorySurface>>,
    files_chart: Arc<Mutex<RollingChart>>,
    bytes_chart: Arc<Mutex<RollingChart>>,
}

async fn harness(source: Arc<ScriptedSource>) -> Harness {
    let surface = Arc::new(Mutex::new(MemorySurface::new()));
    let files_chart = Arc::new(Mutex::new(RollingChart::new("files/s", 60)));
    let bytes_chart = Arc::new(Mutex::new(RollingChart::new("bytes/s", 60)));

    let controller = LifecycleController::new(
        source.clone(),
        surface.clone(),
        files_chart.clone(),
        bytes_chart.clone(),
        DashboardOptions::default(),
    )
    .await;

    Harness {
        controller,
        source,
        surface,
        files_chart,
        bytes_chart,
    }
}

async fn wait_terminal(controller: &LifecycleController) {
    tokio::time::timeout(Duration::from_secs(60), controller.wait_terminal())
        .await
        .expect("dashboard never reached terminal state");
}

#[tokio::test(start_paused = true)]
async fn test_runs_until_terminal_status_then_stops_everything() {
    let h = harness(ScriptedSource::new(vec![
        Step::Snapshot(snapshot("Running", 10, 1)),
        Step::Snapshot(snapshot("Running", 25, 4)),
        Step::Snapshot(snapshot("Idle", 40, 9)),
    ]))
    .await;

    h.controller.start().await.unwrap();
    assert_eq!(h.controller.state(), LifecycleState::Active);
    assert!(h.surface.lock().await.spinner_running());

    wait_terminal(&h.controller).await;
    h.controller.join().await;

    assert_eq!(h.controller.state(), LifecycleState::Terminal);
    for cadence in [POLL_CADENCE, TEXT_CADENCE, FILES_CHART_CADENCE, BYTES_CHART_CADENCE] {
        assert!(!h.controller.is_running(cadence).await, "{} still running", cadence);
    }

    let pair = h.controller.store().pair();
    assert_eq!(pair.previous.unwrap().source_statistics.files_scanned, 25);
    assert_eq!(pair.current.unwrap().source_statistics.files_scanned, 40);

    {
        let surface = h.surface.lock().await;
        assert_eq!(surface.text(Field::CurrentStatus), Some("Idle"));
        assert_eq!(surface.text(Field::FilesScanned), Some("40"));
        assert_eq!(surface.text(Field::DurationCaption), Some("Duration:"));
        assert_eq!(surface.color(Field::CurrentStatus), StatusColor::Green);
        assert!(!surface.spinner_running());
        assert_eq!(surface.visible_panel(), Some(Panel::Completed));
        assert!(surface.render_count() >= 1);
    }
    assert!(h.files_chart.lock().await.is_stopped());
    assert!(h.bytes_chart.lock().await.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_no_callbacks_fire_after_terminal() {
    let h = harness(ScriptedSource::new(vec![
        Step::Snapshot(snapshot("Running", 5, 0)),
        Step::Snapshot(snapshot("Succeeded", 8, 2)),
    ]))
    .await;

    h.controller.start().await.unwrap();
    wait_terminal(&h.controller).await;

    let calls = h.source.calls();
    let renders = h.surface.lock().await.render_count();
    let files_appends = h.files_chart.lock().await.append_count();
    let bytes_appends = h.bytes_chart.lock().await.append_count();

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(h.source.calls(), calls);
    assert_eq!(h.surface.lock().await.render_count(), renders);
    assert_eq!(h.files_chart.lock().await.append_count(), files_appends);
    assert_eq!(h.bytes_chart.lock().await.append_count(), bytes_appends);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent_and_start_is_once() {
    let h = harness(ScriptedSource::new(vec![Step::Snapshot(snapshot("Running", 1, 0))])).await;

    h.controller.start().await.unwrap();
    assert!(matches!(h.controller.start().await, Err(Error::AlreadyStarted)));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let (first, second) = tokio::join!(h.controller.stop(), h.controller.stop());
    assert!(first ^ second);
    assert!(!h.controller.stop().await);
    assert_eq!(h.controller.state(), LifecycleState::Terminal);

    assert!(matches!(h.controller.start().await, Err(Error::AlreadyStarted)));

    // Exactly one final render came from the stop sequence.
    let renders = h.surface.lock().await.render_count();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.surface.lock().await.render_count(), renders);
}

#[tokio::test(start_paused = true)]
async fn test_abort_while_running_keeps_in_progress_panel() {
    let h = harness(ScriptedSource::new(vec![Step::Snapshot(snapshot("Running", 3, 0))])).await;

    h.controller.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(h.controller.stop().await);
    h.controller.join().await;

    assert_eq!(h.controller.state(), LifecycleState::Terminal);
    let surface = h.surface.lock().await;
    assert_eq!(surface.text(Field::CurrentStatus), Some("Running"));
    assert!(!surface.spinner_running());
    assert_ne!(surface.visible_panel(), Some(Panel::Completed));
    assert!(h.files_chart.lock().await.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_shown_and_polling_continues() {
    let h = harness(ScriptedSource::new(vec![
        Step::Unavailable,
        Step::Malformed,
        Step::Snapshot(snapshot("Running", 5, 0)),
    ]))
    .await;

    h.controller.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert_eq!(h.controller.state(), LifecycleState::Active);
    assert_eq!(h.source.calls(), 3);
    {
        let surface = h.surface.lock().await;
        assert_eq!(surface.errors().len(), 2);
        assert!(surface.errors()[0].contains("503"));
        assert!(surface.errors()[1].starts_with("JSON parsing exception"));
    }
    let pair = h.controller.store().pair();
    assert!(pair.previous.is_none());
    assert_eq!(pair.current.unwrap().source_statistics.files_scanned, 5);

    h.controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_blocks_further_polls() {
    let h = harness(ScriptedSource::with_delay(
        vec![
            Step::Snapshot(snapshot("Running", 5, 0)),
            Step::Snapshot(snapshot("Running", 9, 0)),
        ],
        Duration::from_millis(2500),
    ))
    .await;

    h.controller.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(3100)).await;

    // Ticks at 1s and 2s found the first request still outstanding.
    assert_eq!(h.source.calls(), 2);
    assert_eq!(
        h.controller.store().current().unwrap().source_statistics.files_scanned,
        5
    );

    h.controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_fetch_completing_after_stop_is_discarded() {
    let h = harness(ScriptedSource::with_delay(
        vec![Step::Snapshot(snapshot("Running", 5, 0))],
        Duration::from_millis(2500),
    ))
    .await;

    h.controller.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(h.controller.stop().await);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.source.calls(), 1);
    assert!(h.controller.store().current().is_none());
    assert_eq!(h.surface.lock().await.render_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_chart_series_stay_time_aligned() {
    let h = harness(ScriptedSource::new(vec![
        Step::Snapshot(snapshot("Running", 10, 1)),
        Step::Snapshot(snapshot("Running", 30, 5)),
        Step::Snapshot(snapshot("Running", 35, 6)),
        Step::Snapshot(snapshot("Idle", 35, 6)),
    ]))
    .await;

    h.controller.start().await.unwrap();
    wait_terminal(&h.controller).await;

    let chart = h.files_chart.lock().await;
    assert_eq!(
        chart.series_names(),
        vec!["scanned", "read", "nodes created", ZERO_BASELINE]
    );
    let baseline = chart.series(ZERO_BASELINE).unwrap();
    assert!(baseline.len() >= 3);
    assert!(baseline.iter().all(|s| s.value == 0.0));

    let timestamps: Vec<i64> = baseline.iter().map(|s| s.timestamp_ms).collect();
    for entry in chart.entries() {
        let series_ts: Vec<i64> = entry.data.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(series_ts, timestamps, "series '{}' drifted", entry.name);
        assert!(entry.data.iter().all(|s| s.value >= 0.0));
    }
}

#[tokio::test(start_paused = true)]
async fn test_poller_allows_one_outstanding_request() {
    let source = ScriptedSource::with_delay(
        vec![Step::Snapshot(snapshot("Running", 5, 0))],
        Duration::from_millis(500),
    );
    let (_state_tx, state_rx) = watch::channel(LifecycleState::Active);
    let poller = Arc::new(StatusPoller::new(
        source.clone(),
        SnapshotStore::new(),
        Arc::new(Mutex::new(MemorySurface::new())),
        state_rx,
    ));

    let first = tokio::spawn({
        let poller = poller.clone();
        async move { poller.poll().await }
    });
    tokio::task::yield_now().await;

    assert!(poller.is_in_flight());
    assert_eq!(poller.poll().await, PollOutcome::InFlight);
    assert_eq!(first.await.unwrap(), PollOutcome::Updated);
    assert!(!poller.is_in_flight());
    assert_eq!(source.calls(), 1);
}

use super::{RateSample, SeriesColor, SeriesStyle, SharedChart};
use crate::rates::{self, CounterSelector};
use crate::status::{SnapshotPair, SnapshotStore};
use chrono::Utc;

/// Name of the constant-zero series that pins the bottom of every chart at 0.
pub const ZERO_BASELINE: &str = "zero";

#[derive(Debug, Clone, Copy)]
pub struct RateSeries {
    pub name: &'static str,
    pub selector: CounterSelector,
    pub style: SeriesStyle,
}

/// A set of rate series that share one chart.
#[derive(Debug, Clone)]
pub struct ChartGroup {
    pub name: &'static str,
    pub series: Vec<RateSeries>,
}

impl ChartGroup {
    pub fn files_per_second() -> Self {
        Self {
            name: "files/s",
            series: vec![
                RateSeries {
                    name: "scanned",
                    selector: rates::FILES_SCANNED,
                    style: SeriesStyle::line(SeriesColor::Red),
                },
                RateSeries {
                    name: "read",
                    selector: rates::FILES_READ,
                    style: SeriesStyle::line(SeriesColor::Green),
                },
                RateSeries {
                    name: "nodes created",
                    selector: rates::CONTENT_NODES_CREATED,
                    style: SeriesStyle::line(SeriesColor::Blue),
                },
            ],
        }
    }

    pub fn bytes_per_second() -> Self {
        Self {
            name: "bytes/s",
            series: vec![
                RateSeries {
                    name: "read",
                    selector: rates::CONTENT_BYTES_READ,
                    style: SeriesStyle::line(SeriesColor::Green),
                },
                RateSeries {
                    name: "written",
                    selector: rates::BYTES_WRITTEN,
                    style: SeriesStyle::line(SeriesColor::Blue),
                },
            ],
        }
    }

    /// One sample per series plus the zero baseline, all stamped `timestamp_ms`.
    pub fn sample(&self, pair: &SnapshotPair, timestamp_ms: i64) -> Vec<(&'static str, RateSample)> {
        self.series
            .iter()
            .map(|series| {
                let value = rates::rate(&series.selector, pair) as f64;
                (series.name, RateSample { timestamp_ms, value })
            })
            .chain(std::iter::once((
                ZERO_BASELINE,
                RateSample {
                    timestamp_ms,
                    value: 0.0,
                },
            )))
            .collect()
    }
}

/// Feeds one chart from the snapshot store on every tick.
pub struct ChartFeeder {
    group: ChartGroup,
    store: SnapshotStore,
    chart: SharedChart,
}

impl ChartFeeder {
    /// Registers the group's series (and the zero baseline) on `chart`.
    pub async fn attach(group: ChartGroup, store: SnapshotStore, chart: SharedChart) -> Self {
        {
            let mut widget = chart.lock().await;
            for series in &group.series {
                widget.add_series(series.name, series.style);
            }
            widget.add_series(ZERO_BASELINE, SeriesStyle::hidden());
        }
        log::debug!("Feeding '{}' chart with {} series", group.name, group.series.len());

        Self { group, store, chart }
    }

    pub fn chart(&self) -> SharedChart {
        self.chart.clone()
    }

    /// Appends one sample per series; returns the shared timestamp used.
    pub async fn tick(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let samples = self.group.sample(&self.store.pair(), now);

        let mut widget = self.chart.lock().await;
        for (name, sample) in samples {
            widget.append_sample(name, sample.timestamp_ms, sample.value);
        }
        widget.flush();
        now
    }
}

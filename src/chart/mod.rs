use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod console;
pub mod feeder;
pub mod rolling;

pub use console::{ConsoleChart, ValueUnit};
pub use feeder::{ChartFeeder, ChartGroup, RateSeries};
pub use rolling::RollingChart;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateSample {
    pub timestamp_ms: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesColor {
    Red,
    Green,
    Blue,
    /// Drawn with no stroke; only influences the chart's scale.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub color: SeriesColor,
    pub line_width: u8,
}

impl SeriesStyle {
    pub const fn line(color: SeriesColor) -> Self {
        Self { color, line_width: 3 }
    }

    pub const fn hidden() -> Self {
        Self {
            color: SeriesColor::Hidden,
            line_width: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.color != SeriesColor::Hidden && self.line_width > 0
    }
}

/// Bounded, time-ordered samples; the oldest is evicted once full.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    samples: VecDeque<RateSample>,
    capacity: usize,
}

impl TimeSeries {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, timestamp_ms: i64, value: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(RateSample { timestamp_ms, value });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<RateSample> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateSample> {
        self.samples.iter()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::max)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::min)
    }
}

/// A streaming chart that accepts named series and timestamped samples.
pub trait ChartWidget: Send {
    fn add_series(&mut self, name: &str, style: SeriesStyle);

    fn append_sample(&mut self, series: &str, timestamp_ms: i64, value: f64);

    /// Called once per feed tick after every series has been appended.
    fn flush(&mut self) {}

    fn stop(&mut self);
}

pub type SharedChart = Arc<Mutex<dyn ChartWidget>>;

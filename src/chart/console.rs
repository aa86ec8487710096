use super::{ChartWidget, RollingChart, SeriesStyle};
use crate::format::{format_bytes, round_to_digits};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;

const SPARK_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueUnit {
    Count,
    Bytes,
}

impl ValueUnit {
    fn format(self, value: f64) -> String {
        match self {
            Self::Count => round_to_digits(value, 2).to_string(),
            Self::Bytes => format_bytes(value),
        }
    }
}

/// A [`RollingChart`] drawn as one sparkline row per visible series.
pub struct ConsoleChart {
    chart: RollingChart,
    unit: ValueUnit,
    bar: ProgressBar,
}

impl ConsoleChart {
    pub fn new(chart: RollingChart, unit: ValueUnit, multi: Option<Arc<MultiProgress>>) -> Self {
        let bar = ProgressBar::hidden();
        let bar = match &multi {
            Some(multi) => multi.add(bar),
            None => bar,
        };
        if let Ok(style) = ProgressStyle::with_template("{prefix:.bold}\n{msg}") {
            bar.set_style(style);
        }
        bar.set_prefix(chart.title().to_string());

        Self { chart, unit, bar }
    }

    pub fn chart(&self) -> &RollingChart {
        &self.chart
    }

    fn rows(&self) -> String {
        self.chart
            .entries()
            .iter()
            .filter(|entry| entry.style.is_visible())
            .map(|entry| {
                let latest = entry.data.latest().map(|s| s.value).unwrap_or(0.0);
                format!(
                    "  {:<14}{} {}/s",
                    entry.name,
                    self.chart.sparkline(&entry.name, SPARK_WIDTH),
                    self.unit.format(latest)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChartWidget for ConsoleChart {
    fn add_series(&mut self, name: &str, style: SeriesStyle) {
        self.chart.add_series(name, style);
    }

    fn append_sample(&mut self, series: &str, timestamp_ms: i64, value: f64) {
        self.chart.append_sample(series, timestamp_ms, value);
    }

    fn flush(&mut self) {
        self.chart.flush();
        if !self.chart.is_stopped() {
            self.bar.set_message(self.rows());
            self.bar.tick();
        }
    }

    fn stop(&mut self) {
        self.chart.stop();
        self.bar.finish();
    }
}

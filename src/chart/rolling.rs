use super::{ChartWidget, SeriesStyle, TimeSeries};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone)]
pub struct SeriesEntry {
    pub name: String,
    pub style: SeriesStyle,
    pub data: TimeSeries,
}

/// In-memory rolling window of every series on one chart.
#[derive(Debug, Clone)]
pub struct RollingChart {
    title: String,
    history: usize,
    series: Vec<SeriesEntry>,
    stopped: bool,
    appended: usize,
    flushes: usize,
}

impl RollingChart {
    pub fn new(title: impl Into<String>, history: usize) -> Self {
        Self {
            title: title.into(),
            history,
            series: Vec::new(),
            stopped: false,
            appended: 0,
            flushes: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self, name: &str) -> Option<&TimeSeries> {
        self.series.iter().find(|s| s.name == name).map(|s| &s.data)
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.series
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Samples accepted since creation, across all series.
    pub fn append_count(&self) -> usize {
        self.appended
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Vertical range shared by every series, hidden ones included.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let min = self.series.iter().filter_map(|s| s.data.min_value()).reduce(f64::min)?;
        let max = self.series.iter().filter_map(|s| s.data.max_value()).reduce(f64::max)?;
        Some((min, max))
    }

    /// Renders the most recent `width` samples of a series as block characters
    /// scaled to the chart-wide range.
    pub fn sparkline(&self, name: &str, width: usize) -> String {
        let (Some(series), Some((min, max))) = (self.series(name), self.value_range()) else {
            return String::new();
        };
        let span = max - min;
        let skip = series.len().saturating_sub(width);
        series
            .iter()
            .skip(skip)
            .map(|sample| {
                if span <= 0.0 {
                    return SPARK_LEVELS[0];
                }
                let level = ((sample.value - min) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[(level as usize).min(SPARK_LEVELS.len() - 1)]
            })
            .collect()
    }
}

impl ChartWidget for RollingChart {
    fn add_series(&mut self, name: &str, style: SeriesStyle) {
        if self.series.iter().any(|s| s.name == name) {
            log::warn!("Series '{}' already exists on chart '{}'", name, self.title);
            return;
        }
        self.series.push(SeriesEntry {
            name: name.to_string(),
            style,
            data: TimeSeries::new(self.history),
        });
    }

    fn append_sample(&mut self, series: &str, timestamp_ms: i64, value: f64) {
        if self.stopped {
            log::debug!("Chart '{}' is stopped, dropping sample for '{}'", self.title, series);
            return;
        }
        match self.series.iter_mut().find(|s| s.name == series) {
            Some(entry) => {
                entry.data.append(timestamp_ms, value);
                self.appended += 1;
            }
            None => log::warn!("Unknown series '{}' on chart '{}'", series, self.title),
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn stop(&mut self) {
        if !self.stopped {
            log::debug!("Chart '{}' stopped", self.title);
            self.stopped = true;
        }
    }
}

use crate::lifecycle::{Cadences, DashboardOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MonitorConfig {
    /// Web script context the status path is appended to,
    /// e.g. `http://localhost:8080/alfresco/service`.
    #[serde(default)]
    #[validate(url)]
    pub context_url: String,

    #[serde(default = "default_poll_interval")]
    #[validate(range(min = 100, max = 60000))]
    pub poll_interval_ms: u64,

    #[serde(default = "default_text_refresh_interval")]
    #[validate(range(min = 100, max = 60000))]
    pub text_refresh_interval_ms: u64,

    #[serde(default = "default_chart_interval")]
    #[validate(range(min = 100, max = 60000))]
    pub chart_interval_ms: u64,

    /// Samples kept per chart series.
    #[serde(default = "default_chart_history")]
    #[validate(range(min = 1, max = 10000))]
    pub chart_history: usize,

    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 100))]
    pub request_timeout_ms: u64,

    /// Append milliseconds and microseconds to the rendered duration.
    #[serde(default = "default_duration_details")]
    pub duration_details: bool,

    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    /// Optional path to a parent configuration file to inherit from
    #[serde(default)]
    pub extends: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            context_url: String::new(),
            poll_interval_ms: default_poll_interval(),
            text_refresh_interval_ms: default_text_refresh_interval(),
            chart_interval_ms: default_chart_interval(),
            chart_history: default_chart_history(),
            request_timeout_ms: default_request_timeout(),
            duration_details: default_duration_details(),
            user_agent: default_user_agent(),
            extends: None,
        }
    }
}

impl MonitorConfig {
    pub fn with_context_url(context_url: impl Into<String>) -> Self {
        Self {
            context_url: context_url.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            cadences: Cadences {
                poll: Duration::from_millis(self.poll_interval_ms),
                text_refresh: Duration::from_millis(self.text_refresh_interval_ms),
                chart: Duration::from_millis(self.chart_interval_ms),
            },
            duration_details: self.duration_details,
        }
    }
}

pub(crate) fn default_poll_interval() -> u64 {
    1000
}

pub(crate) fn default_text_refresh_interval() -> u64 {
    2000
}

pub(crate) fn default_chart_interval() -> u64 {
    1000
}

pub(crate) fn default_chart_history() -> usize {
    120
}

pub(crate) fn default_request_timeout() -> u64 {
    10_000
}

fn default_duration_details() -> bool {
    true
}

pub(crate) fn default_user_agent() -> String {
    format!("import-monitor/{}", env!("CARGO_PKG_VERSION"))
}

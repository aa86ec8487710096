use serde::{Deserialize, Serialize};
use std::fmt;

/// Importer status as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentStatus {
    Running,
    Idle,
    Succeeded,
    Failed,
}

impl CurrentStatus {
    /// No further progress will be reported once the importer is in one of these states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle | Self::Succeeded | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Idle => "Idle",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for CurrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportType {
    Streaming,
    InPlace,
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streaming => f.write_str("Streaming"),
            Self::InPlace => f.write_str("In place"),
        }
    }
}

/// Read-side cumulative counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceStatistics {
    pub folders_scanned: u64,
    pub files_scanned: u64,
    pub unreadable_entries: u64,
    pub content_files_read: u64,
    pub content_bytes_read: u64,
    pub metadata_files_read: u64,
    pub metadata_bytes_read: u64,
    pub content_version_files_read: u64,
    pub content_version_bytes_read: u64,
    pub metadata_version_files_read: u64,
    pub metadata_version_bytes_read: u64,
}

/// Write-side cumulative counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetStatistics {
    pub space_nodes_created: u64,
    pub space_nodes_replaced: u64,
    pub space_nodes_skipped: u64,
    pub space_properties_written: u64,
    pub content_nodes_created: u64,
    pub content_nodes_replaced: u64,
    pub content_nodes_skipped: u64,
    pub content_bytes_written: u64,
    pub content_properties_written: u64,
    pub content_versions_created: u64,
    pub content_versions_bytes_written: u64,
    pub content_versions_properties_written: u64,
}

/// One payload fetched from the status endpoint.
///
/// Counters are cumulative for the lifetime of a single import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub current_status: CurrentStatus,

    #[serde(default)]
    pub active_threads: u64,

    #[serde(default, rename = "durationInNS")]
    pub duration_in_ns: Option<u64>,

    #[serde(default)]
    pub completed_batches: u64,

    #[serde(default)]
    pub current_file_or_folder: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    pub source_statistics: SourceStatistics,

    pub target_statistics: TargetStatistics,

    #[serde(default)]
    pub source_directory: Option<String>,

    #[serde(default)]
    pub target_space: Option<String>,

    #[serde(default)]
    pub import_type: Option<ImportType>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub batch_weight: Option<u64>,

    #[serde(default)]
    pub last_exception: Option<String>,

    #[serde(default)]
    pub file_that_failed: Option<String>,
}

impl StatusSnapshot {
    /// An empty snapshot with every counter at zero.
    pub fn new(current_status: CurrentStatus) -> Self {
        Self {
            current_status,
            active_threads: 0,
            duration_in_ns: None,
            completed_batches: 0,
            current_file_or_folder: None,
            end_date: None,
            source_statistics: SourceStatistics::default(),
            target_statistics: TargetStatistics::default(),
            source_directory: None,
            target_space: None,
            import_type: None,
            start_date: None,
            batch_weight: None,
            last_exception: None,
            file_that_failed: None,
        }
    }

    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    pub fn is_terminal(&self) -> bool {
        self.current_status.is_terminal()
    }

    /// Elapsed job time in seconds, `0.0` when the importer has not reported one.
    pub fn duration_secs(&self) -> f64 {
        self.duration_in_ns.unwrap_or(0) as f64 / 1e9
    }
}

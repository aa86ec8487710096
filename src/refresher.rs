use crate::display::{Field, SharedSurface, StatusColor};
use crate::format::{format_bytes, format_duration, per_second, round_to_digits};
use crate::rates::{BYTES_WRITTEN, DATA_READ, ENTRIES_SCANNED, FILES_READ, NODES_WRITTEN};
use crate::status::{CurrentStatus, SnapshotStore, StatusSnapshot};

pub fn status_color(status: CurrentStatus) -> StatusColor {
    match status {
        CurrentStatus::Idle | CurrentStatus::Succeeded => StatusColor::Green,
        CurrentStatus::Failed => StatusColor::Red,
        CurrentStatus::Running => StatusColor::Default,
    }
}

fn duration_caption(snapshot: &StatusSnapshot) -> &'static str {
    if snapshot.end_date.is_some() {
        "Duration:"
    } else {
        "Elapsed Time:"
    }
}

/// Every text slot derived from `snapshot`.
///
/// Throughput figures are averages over the whole job duration, not the
/// per-tick deltas shown on the charts. Optional slots are only present when
/// the importer reported them, so a render never blanks a previous value.
pub fn text_fields(snapshot: &StatusSnapshot, duration_details: bool) -> Vec<(Field, String)> {
    let source = &snapshot.source_statistics;
    let target = &snapshot.target_statistics;
    let secs = snapshot.duration_secs();
    let rate2 = |amount: u64| round_to_digits(per_second(amount, secs), 2).to_string();
    let bytes_rate = |amount: u64| format_bytes(per_second(amount, secs));
    let bytes = |amount: u64| format_bytes(amount as f64);

    let mut fields = vec![
        (Field::CurrentStatus, snapshot.current_status.to_string()),
        (Field::ActiveThreads, snapshot.active_threads.to_string()),
        (
            Field::DurationCaption,
            duration_caption(snapshot).to_string(),
        ),
        (
            Field::Duration,
            format_duration(snapshot.duration_in_ns.unwrap_or(0), duration_details),
        ),
        (Field::CompletedBatches, snapshot.completed_batches.to_string()),
        (
            Field::CurrentFileOrFolder,
            snapshot.current_file_or_folder.clone().unwrap_or_default(),
        ),
        (Field::FoldersScanned, source.folders_scanned.to_string()),
        (Field::FilesScanned, source.files_scanned.to_string()),
        (Field::UnreadableEntries, source.unreadable_entries.to_string()),
        (Field::ContentFilesRead, source.content_files_read.to_string()),
        (Field::ContentBytesRead, bytes(source.content_bytes_read)),
        (Field::MetadataFilesRead, source.metadata_files_read.to_string()),
        (Field::MetadataBytesRead, bytes(source.metadata_bytes_read)),
        (Field::ContentVersionFilesRead, source.content_version_files_read.to_string()),
        (Field::ContentVersionBytesRead, bytes(source.content_version_bytes_read)),
        (Field::MetadataVersionFilesRead, source.metadata_version_files_read.to_string()),
        (Field::MetadataVersionBytesRead, bytes(source.metadata_version_bytes_read)),
        (Field::EntriesScannedPerSecond, rate2(ENTRIES_SCANNED.select(snapshot))),
        (Field::FilesReadPerSecond, rate2(FILES_READ.select(snapshot))),
        (Field::DataReadPerSecond, bytes_rate(DATA_READ.select(snapshot))),
        (Field::SpaceNodesCreated, target.space_nodes_created.to_string()),
        (Field::SpaceNodesReplaced, target.space_nodes_replaced.to_string()),
        (Field::SpaceNodesSkipped, target.space_nodes_skipped.to_string()),
        (Field::SpacePropertiesWritten, target.space_properties_written.to_string()),
        (Field::ContentNodesCreated, target.content_nodes_created.to_string()),
        (Field::ContentNodesReplaced, target.content_nodes_replaced.to_string()),
        (Field::ContentNodesSkipped, target.content_nodes_skipped.to_string()),
        (Field::ContentBytesWritten, bytes(target.content_bytes_written)),
        (Field::ContentPropertiesWritten, target.content_properties_written.to_string()),
        (Field::ContentVersionsCreated, target.content_versions_created.to_string()),
        (Field::ContentVersionBytesWritten, bytes(target.content_versions_bytes_written)),
        (
            Field::ContentVersionPropertiesWritten,
            target.content_versions_properties_written.to_string(),
        ),
        (Field::NodesWrittenPerSecond, rate2(NODES_WRITTEN.select(snapshot))),
        (Field::DataWrittenPerSecond, bytes_rate(BYTES_WRITTEN.select(snapshot))),
    ];

    let optional = [
        (Field::EndDate, snapshot.end_date.clone()),
        (Field::SourceDirectory, snapshot.source_directory.clone()),
        (Field::TargetSpace, snapshot.target_space.clone()),
        (Field::ImportType, snapshot.import_type.map(|t| t.to_string())),
        (Field::StartDate, snapshot.start_date.clone()),
        (Field::BatchWeight, snapshot.batch_weight.map(|w| w.to_string())),
        (Field::FileThatFailed, snapshot.file_that_failed.clone()),
        (Field::LastException, snapshot.last_exception.clone()),
    ];
    fields.extend(
        optional
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v))),
    );
    fields
}

/// Renders the cached snapshot into the display surface.
pub struct TextRefresher {
    store: SnapshotStore,
    surface: SharedSurface,
    duration_details: bool,
}

impl TextRefresher {
    pub fn new(store: SnapshotStore, surface: SharedSurface, duration_details: bool) -> Self {
        Self {
            store,
            surface,
            duration_details,
        }
    }

    /// Renders whatever snapshot is currently stored, changed or not.
    pub async fn refresh(&self) -> bool {
        let current = self.store.current();
        self.render(current.as_deref()).await
    }

    /// Returns `false` without touching the surface when there is nothing to show.
    pub async fn render(&self, current: Option<&StatusSnapshot>) -> bool {
        let Some(snapshot) = current else {
            log::debug!("No status received yet, nothing to render");
            return false;
        };

        let fields = text_fields(snapshot, self.duration_details);
        let mut surface = self.surface.lock().await;
        for (field, text) in fields {
            surface.set_text(field, text);
        }
        surface.set_color(Field::CurrentStatus, status_color(snapshot.current_status));
        surface.present();
        true
    }
}

//! Per-tick deltas derived from two cumulative snapshots.

use crate::status::{SnapshotPair, StatusSnapshot};

/// A single named cumulative counter in a status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    FoldersScanned,
    FilesScanned,
    UnreadableEntries,
    ContentFilesRead,
    ContentBytesRead,
    MetadataFilesRead,
    MetadataBytesRead,
    ContentVersionFilesRead,
    ContentVersionBytesRead,
    MetadataVersionFilesRead,
    MetadataVersionBytesRead,
    SpaceNodesCreated,
    SpaceNodesReplaced,
    SpaceNodesSkipped,
    SpacePropertiesWritten,
    ContentNodesCreated,
    ContentNodesReplaced,
    ContentNodesSkipped,
    ContentBytesWritten,
    ContentPropertiesWritten,
    ContentVersionsCreated,
    ContentVersionsBytesWritten,
    ContentVersionsPropertiesWritten,
}

impl Counter {
    pub fn read(self, snapshot: &StatusSnapshot) -> u64 {
        let source = &snapshot.source_statistics;
        let target = &snapshot.target_statistics;
        match self {
            Self::FoldersScanned => source.folders_scanned,
            Self::FilesScanned => source.files_scanned,
            Self::UnreadableEntries => source.unreadable_entries,
            Self::ContentFilesRead => source.content_files_read,
            Self::ContentBytesRead => source.content_bytes_read,
            Self::MetadataFilesRead => source.metadata_files_read,
            Self::MetadataBytesRead => source.metadata_bytes_read,
            Self::ContentVersionFilesRead => source.content_version_files_read,
            Self::ContentVersionBytesRead => source.content_version_bytes_read,
            Self::MetadataVersionFilesRead => source.metadata_version_files_read,
            Self::MetadataVersionBytesRead => source.metadata_version_bytes_read,
            Self::SpaceNodesCreated => target.space_nodes_created,
            Self::SpaceNodesReplaced => target.space_nodes_replaced,
            Self::SpaceNodesSkipped => target.space_nodes_skipped,
            Self::SpacePropertiesWritten => target.space_properties_written,
            Self::ContentNodesCreated => target.content_nodes_created,
            Self::ContentNodesReplaced => target.content_nodes_replaced,
            Self::ContentNodesSkipped => target.content_nodes_skipped,
            Self::ContentBytesWritten => target.content_bytes_written,
            Self::ContentPropertiesWritten => target.content_properties_written,
            Self::ContentVersionsCreated => target.content_versions_created,
            Self::ContentVersionsBytesWritten => target.content_versions_bytes_written,
            Self::ContentVersionsPropertiesWritten => target.content_versions_properties_written,
        }
    }
}

/// A named sum of counters, e.g. "files read" across all four file categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSelector {
    pub name: &'static str,
    pub terms: &'static [Counter],
}

impl CounterSelector {
    pub const fn new(name: &'static str, terms: &'static [Counter]) -> Self {
        Self { name, terms }
    }

    pub fn select(&self, snapshot: &StatusSnapshot) -> u64 {
        self.terms
            .iter()
            .fold(0u64, |sum, counter| sum.saturating_add(counter.read(snapshot)))
    }
}

pub const FILES_SCANNED: CounterSelector =
    CounterSelector::new("files scanned", &[Counter::FilesScanned]);

pub const ENTRIES_SCANNED: CounterSelector = CounterSelector::new(
    "entries scanned",
    &[Counter::FilesScanned, Counter::FoldersScanned],
);

pub const FILES_READ: CounterSelector = CounterSelector::new(
    "files read",
    &[
        Counter::ContentFilesRead,
        Counter::MetadataFilesRead,
        Counter::ContentVersionFilesRead,
        Counter::MetadataVersionFilesRead,
    ],
);

/// Content bytes only; metadata reads are too small to be worth charting.
pub const CONTENT_BYTES_READ: CounterSelector = CounterSelector::new(
    "bytes read",
    &[Counter::ContentBytesRead, Counter::ContentVersionBytesRead],
);

pub const DATA_READ: CounterSelector = CounterSelector::new(
    "data read",
    &[
        Counter::ContentBytesRead,
        Counter::MetadataBytesRead,
        Counter::ContentVersionBytesRead,
        Counter::MetadataVersionBytesRead,
    ],
);

pub const CONTENT_NODES_CREATED: CounterSelector =
    CounterSelector::new("nodes created", &[Counter::ContentNodesCreated]);

pub const NODES_WRITTEN: CounterSelector = CounterSelector::new(
    "nodes written",
    &[
        Counter::SpaceNodesCreated,
        Counter::SpaceNodesReplaced,
        Counter::ContentNodesCreated,
        Counter::ContentNodesReplaced,
        Counter::ContentVersionsCreated,
    ],
);

pub const BYTES_WRITTEN: CounterSelector = CounterSelector::new(
    "bytes written",
    &[Counter::ContentBytesWritten, Counter::ContentVersionsBytesWritten],
);

/// Delta of `selector` between the two snapshots of `pair`.
///
/// Without a previous snapshot the raw cumulative value is returned, so the
/// first sample of a run shows the total so far rather than a rate. A counter
/// that went backwards (job restart, out-of-order response) yields 0.
pub fn rate(selector: &CounterSelector, pair: &SnapshotPair) -> u64 {
    let Some(current) = pair.current.as_deref() else {
        return 0;
    };
    let value = selector.select(current);
    match pair.previous.as_deref() {
        Some(previous) => value.saturating_sub(selector.select(previous)),
        None => value,
    }
}

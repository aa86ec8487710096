use std::sync::Arc;
use tokio::sync::Mutex;

pub mod console;
pub mod memory;

pub use console::ConsoleSurface;
pub use memory::MemorySurface;

/// Named text slots on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CurrentStatus,
    ActiveThreads,
    SourceDirectory,
    TargetSpace,
    ImportType,
    BatchWeight,
    StartDate,
    EndDate,
    DurationCaption,
    Duration,
    CompletedBatches,
    CurrentFileOrFolder,

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
    EntriesScannedPerSecond,
    FilesReadPerSecond,
    DataReadPerSecond,

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
    ContentVersionBytesWritten,
    ContentVersionPropertiesWritten,
    NodesWrittenPerSecond,
    DataWrittenPerSecond,

    FileThatFailed,
    LastException,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Source,
    Target,
    Errors,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Self::General => "Status",
            Self::Source => "Source (read)",
            Self::Target => "Target (write)",
            Self::Errors => "Errors",
        }
    }
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::CurrentStatus => "Current status",
            Self::ActiveThreads => "Active threads",
            Self::SourceDirectory => "Source directory",
            Self::TargetSpace => "Target space",
            Self::ImportType => "Import type",
            Self::BatchWeight => "Batch weight",
            Self::StartDate => "Start date",
            Self::EndDate => "End date",
            Self::DurationCaption => "Duration caption",
            Self::Duration => "Duration",
            Self::CompletedBatches => "Completed batches",
            Self::CurrentFileOrFolder => "Current file or folder",
            Self::FoldersScanned => "Folders scanned",
            Self::FilesScanned => "Files scanned",
            Self::UnreadableEntries => "Unreadable entries",
            Self::ContentFilesRead => "Content files read",
            Self::ContentBytesRead => "Content bytes read",
            Self::MetadataFilesRead => "Metadata files read",
            Self::MetadataBytesRead => "Metadata bytes read",
            Self::ContentVersionFilesRead => "Content version files read",
            Self::ContentVersionBytesRead => "Content version bytes read",
            Self::MetadataVersionFilesRead => "Metadata version files read",
            Self::MetadataVersionBytesRead => "Metadata version bytes read",
            Self::EntriesScannedPerSecond => "Entries scanned / s",
            Self::FilesReadPerSecond => "Files read / s",
            Self::DataReadPerSecond => "Data read / s",
            Self::SpaceNodesCreated => "Space nodes created",
            Self::SpaceNodesReplaced => "Space nodes replaced",
            Self::SpaceNodesSkipped => "Space nodes skipped",
            Self::SpacePropertiesWritten => "Space properties written",
            Self::ContentNodesCreated => "Content nodes created",
            Self::ContentNodesReplaced => "Content nodes replaced",
            Self::ContentNodesSkipped => "Content nodes skipped",
            Self::ContentBytesWritten => "Content bytes written",
            Self::ContentPropertiesWritten => "Content properties written",
            Self::ContentVersionsCreated => "Content versions created",
            Self::ContentVersionBytesWritten => "Content version bytes written",
            Self::ContentVersionPropertiesWritten => "Content version properties written",
            Self::NodesWrittenPerSecond => "Nodes written / s",
            Self::DataWrittenPerSecond => "Data written / s",
            Self::FileThatFailed => "File that failed",
            Self::LastException => "Last exception",
        }
    }

    pub fn section(self) -> Section {
        use Field::*;
        match self {
            CurrentStatus | ActiveThreads | SourceDirectory | TargetSpace | ImportType
            | BatchWeight | StartDate | EndDate | DurationCaption | Duration
            | CompletedBatches | CurrentFileOrFolder => Section::General,
            FoldersScanned
            | FilesScanned
            | UnreadableEntries
            | ContentFilesRead
            | ContentBytesRead
            | MetadataFilesRead
            | MetadataBytesRead
            | ContentVersionFilesRead
            | ContentVersionBytesRead
            | MetadataVersionFilesRead
            | MetadataVersionBytesRead
            | EntriesScannedPerSecond
            | FilesReadPerSecond
            | DataReadPerSecond => Section::Source,
            FileThatFailed | LastException => Section::Errors,
            _ => Section::Target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusColor {
    #[default]
    Default,
    Green,
    Red,
}

/// The two containers swapped when the import finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    InProgress,
    Completed,
}

/// Where the dashboard writes its text, status colours, errors and activity indicator.
pub trait DisplaySurface: Send {
    fn set_text(&mut self, field: Field, text: String);

    fn set_color(&mut self, field: Field, color: StatusColor);

    fn show_error(&mut self, message: &str);

    /// Called once after all fields of a render have been written.
    fn present(&mut self) {}

    fn start_spinner(&mut self) {}

    fn stop_spinner(&mut self) {}

    fn toggle_panels(&mut self, _hide: Panel, _show: Panel) {}
}

pub type SharedSurface = Arc<Mutex<dyn DisplaySurface>>;

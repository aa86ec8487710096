pub mod snapshot;
pub mod store;

pub use snapshot::{CurrentStatus, ImportType, SourceStatistics, StatusSnapshot, TargetStatistics};
pub use store::{SnapshotPair, SnapshotStore};

pub mod chart;
pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod poller;
pub mod rates;
pub mod refresher;
pub mod scheduler;
pub mod status;

pub use chart::{ChartFeeder, ChartGroup, ChartWidget, RollingChart};
pub use display::{DisplaySurface, MemorySurface};
pub use error::{Error, Result};
pub use lifecycle::{LifecycleController, LifecycleState};
pub use poller::{FetchError, HttpStatusSource, PollOutcome, StatusPoller, StatusSource};
pub use refresher::TextRefresher;
pub use status::{CurrentStatus, SnapshotPair, SnapshotStore, StatusSnapshot};

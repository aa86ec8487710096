use crate::status::snapshot::StatusSnapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// The two most recent snapshots. `previous` is what `current` held one poll earlier.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPair {
    pub previous: Option<Arc<StatusSnapshot>>,
    pub current: Option<Arc<StatusSnapshot>>,
}

impl SnapshotPair {
    pub fn new(previous: Option<StatusSnapshot>, current: Option<StatusSnapshot>) -> Self {
        Self {
            previous: previous.map(Arc::new),
            current: current.map(Arc::new),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

/// Shared holder for the snapshot pair.
///
/// Cloning yields another handle onto the same pair. Each replacement is a
/// single write to the underlying channel, so readers never see a pair with
/// only one side updated.
#[derive(Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<SnapshotPair>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        let (tx, _) = watch::channel(SnapshotPair::default());
        Self { tx: Arc::new(tx) }
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts the current snapshot into `previous` and stores `next` as current.
    pub fn replace(&self, next: StatusSnapshot) -> Arc<StatusSnapshot> {
        let next = Arc::new(next);
        let stored = next.clone();
        self.tx.send_modify(move |pair| {
            pair.previous = pair.current.take();
            pair.current = Some(next);
        });
        stored
    }

    pub fn pair(&self) -> SnapshotPair {
        self.tx.borrow().clone()
    }

    pub fn current(&self) -> Option<Arc<StatusSnapshot>> {
        self.tx.borrow().current.clone()
    }
}

// Dashboard view-model shared by the view, the initial load and the listener
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::stats::DashboardStats;
use tokio::sync::watch;

/// Holds the snapshot of one mounted dashboard.
///
/// `None` in the channel means the owning view has been unmounted; every
/// mutation after that point is dropped.
pub struct DashboardModel {
    tx: watch::Sender<Option<DashboardSnapshot>>,
}

impl DashboardModel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Some(DashboardSnapshot::default()));
        Self { tx }
    }

    /// Replace the whole snapshot. Returns `false` if the view is gone.
    pub fn replace(&self, snapshot: DashboardSnapshot) -> bool {
        self.tx.send_if_modified(|current| match current {
            Some(existing) => {
                *existing = snapshot;
                true
            }
            None => false,
        })
    }

    /// Apply an in-place change to the counters. Returns `false` if the view is gone.
    pub fn update_stats(&self, change: impl FnOnce(&mut DashboardStats)) -> bool {
        self.tx.send_if_modified(|current| match current {
            Some(existing) => {
                change(&mut existing.stats);
                true
            }
            None => false,
        })
    }

    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSnapshot>> {
        self.tx.subscribe()
    }

    /// Mark the owning view as unmounted. Irreversible.
    pub fn detach(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for DashboardModel {
    fn default() -> Self {
        Self::new()
    }
}

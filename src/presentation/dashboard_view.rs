// Dashboard view - Owns the view-model and the tasks feeding it while mounted
use crate::application::dashboard_model::DashboardModel;
use crate::application::dashboard_service::DashboardService;
use crate::application::live_update::{LiveUpdateListener, load_into};
use crate::application::store_api::EventFeed;
use crate::domain::chart::{ChartPalette, DashboardCharts};
use crate::domain::snapshot::DashboardSnapshot;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A mounted dashboard.
///
/// Mounting starts the initial load and the push listener. Dropping (or
/// [`DashboardView::unmount`]) detaches the view-model before aborting those
/// tasks, so nothing that completes later can touch it.
pub struct DashboardView {
    model: Arc<DashboardModel>,
    dashboard: DashboardService,
    palette: ChartPalette,
    tasks: Vec<JoinHandle<()>>,
}

impl DashboardView {
    /// Must be called from within a tokio runtime.
    pub fn mount(
        dashboard: DashboardService,
        feed: Arc<dyn EventFeed>,
        palette: ChartPalette,
        preloaded: Option<DashboardSnapshot>,
    ) -> Self {
        let model = Arc::new(DashboardModel::new());
        let load = tokio::spawn(load_into(dashboard.clone(), model.clone(), preloaded));
        let listener = LiveUpdateListener::new(feed, dashboard.clone(), model.clone());
        let listen = tokio::spawn(listener.run());

        Self {
            model,
            dashboard,
            palette,
            tasks: vec![load, listen],
        }
    }

    /// Explicitly retrigger a full aggregation, e.g. after a failed load.
    pub fn reload(&mut self) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks
            .push(tokio::spawn(load_into(self.dashboard.clone(), self.model.clone(), None)));
    }

    /// Follow snapshot changes. The value becomes `None` once the view unmounts.
    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSnapshot>> {
        self.model.subscribe()
    }

    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.model.snapshot()
    }

    pub fn charts(&self) -> Option<DashboardCharts> {
        self.model
            .snapshot()
            .map(|snapshot| DashboardCharts::build(&snapshot, &self.palette))
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.model.detach();
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::FakeStore;
    use crate::application::live_update::tests::FakeFeed;
    use crate::domain::stats::DashboardStats;
    use std::sync::atomic::Ordering;

    async fn next_snapshot(
        rx: &mut watch::Receiver<Option<DashboardSnapshot>>,
    ) -> Option<DashboardSnapshot> {
        rx.changed().await.expect("view alive");
        rx.borrow_and_update().clone()
    }

    #[tokio::test]
    async fn test_mount_fetches_when_nothing_preloaded() {
        let store = Arc::new(FakeStore::with_customers(7));
        let (feed, _tx) = FakeFeed::new();
        let view = DashboardView::mount(
            DashboardService::new(store.clone()),
            feed,
            ChartPalette::default(),
            None,
        );
        let mut rx = view.subscribe();

        let snapshot = next_snapshot(&mut rx).await.expect("mounted");

        assert_eq!(snapshot.stats, DashboardStats::new(7, 8, 21));
        assert_eq!(store.calls.load(Ordering::SeqCst), 6);
        let charts = view.charts().expect("mounted");
        assert_eq!(charts.revenue.datasets[0].values.values()[2], 300.0);
    }

    #[tokio::test]
    async fn test_mount_adopts_preloaded_snapshot() {
        let store = Arc::new(FakeStore::default());
        let (feed, _tx) = FakeFeed::new();
        let preloaded = DashboardSnapshot {
            stats: DashboardStats::new(4, 4, 4),
            ..Default::default()
        };
        let view = DashboardView::mount(
            DashboardService::new(store.clone()),
            feed,
            ChartPalette::default(),
            Some(preloaded.clone()),
        );
        let mut rx = view.subscribe();

        assert_eq!(next_snapshot(&mut rx).await, Some(preloaded));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_push_events_reach_mounted_view() {
        let store = Arc::new(FakeStore::default());
        let (feed, tx) = FakeFeed::new();
        let view = DashboardView::mount(
            DashboardService::new(store),
            feed,
            ChartPalette::default(),
            Some(DashboardSnapshot::default()),
        );
        let mut rx = view.subscribe();
        next_snapshot(&mut rx).await;

        tx.send(Ok("product_created".to_string())).await.expect("send");

        let snapshot = next_snapshot(&mut rx).await.expect("mounted");
        assert_eq!(snapshot.stats.products, 1);
    }

    #[tokio::test]
    async fn test_no_mutation_after_unmount() {
        let store = Arc::new(FakeStore::with_customers(99));
        let gate = store.hold();
        let (feed, tx) = FakeFeed::new();
        let view = DashboardView::mount(
            DashboardService::new(store.clone()),
            feed,
            ChartPalette::default(),
            None,
        );
        let mut rx = view.subscribe();

        // Initial load is in flight when the view goes away.
        while store.calls.load(Ordering::SeqCst) < 6 {
            tokio::task::yield_now().await;
        }
        view.unmount();
        assert_eq!(next_snapshot(&mut rx).await, None);

        gate.notify_waiters();
        let _ = tx.send(Ok("customer_created".to_string())).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(rx.borrow().is_none());
        assert!(!rx.has_changed().unwrap_or(false));
    }

    #[tokio::test]
    async fn test_charts_use_mount_palette() {
        let store = Arc::new(FakeStore::default());
        let (feed, _tx) = FakeFeed::new();
        let view = DashboardView::mount(
            DashboardService::new(store),
            feed,
            ChartPalette {
                orders: "warning".to_string(),
                revenue: "dark".to_string(),
            },
            Some(DashboardSnapshot::default()),
        );
        let mut rx = view.subscribe();
        next_snapshot(&mut rx).await;

        let charts = view.charts().expect("mounted");
        assert_eq!(charts.orders.color_key, "warning");
        assert_eq!(charts.revenue.color_key, "dark");
    }

    #[tokio::test]
    async fn test_reload_after_failed_load_replaces_snapshot() {
        let store = Arc::new(FakeStore::with_customers(5));
        store.fail("total_orders");
        let (feed, _tx) = FakeFeed::new();
        let mut view = DashboardView::mount(
            DashboardService::new(store.clone()),
            feed,
            ChartPalette::default(),
            None,
        );

        // Let the failed initial load settle; the placeholder stays.
        while store.calls.load(Ordering::SeqCst) < 6 {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(view.snapshot(), Some(DashboardSnapshot::default()));

        store.failing.lock().unwrap().clear();
        let mut rx = view.subscribe();
        view.reload();

        let snapshot = next_snapshot(&mut rx).await.expect("mounted");
        assert_eq!(snapshot.stats, DashboardStats::new(5, 8, 21));
        assert_eq!(store.calls.load(Ordering::SeqCst), 12);
    }
}

// Live update listener - Applies server push events to a mounted dashboard
use crate::application::dashboard_model::DashboardModel;
use crate::application::dashboard_service::DashboardService;
use crate::application::store_api::EventFeed;
use crate::domain::push_event::PushEvent;
use crate::domain::snapshot::DashboardSnapshot;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinSet;

/// What a push event does to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateEffect {
    IncrementCustomers,
    IncrementProducts,
    Refresh,
    Ignore,
}

impl From<&PushEvent> for UpdateEffect {
    fn from(event: &PushEvent) -> Self {
        match event {
            PushEvent::CustomerCreated => Self::IncrementCustomers,
            PushEvent::ProductCreated => Self::IncrementProducts,
            // A new order can move totals, both monthly series and the ranking.
            PushEvent::OrderCreated => Self::Refresh,
            PushEvent::Unknown(_) => Self::Ignore,
        }
    }
}

pub struct LiveUpdateListener {
    feed: Arc<dyn EventFeed>,
    dashboard: DashboardService,
    model: Arc<DashboardModel>,
}

impl LiveUpdateListener {
    pub fn new(
        feed: Arc<dyn EventFeed>,
        dashboard: DashboardService,
        model: Arc<DashboardModel>,
    ) -> Self {
        Self {
            feed,
            dashboard,
            model,
        }
    }

    /// Consume the push stream until it ends or errors.
    ///
    /// Messages are handled one at a time in arrival order. Refreshes run on
    /// their own tasks owned by this call, so aborting the listener aborts
    /// any refresh still in flight.
    pub async fn run(self) {
        let mut stream = match self.feed.subscribe().await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Could not open event stream: {}", e);
                return;
            }
        };
        tracing::info!("Listening for dashboard events");

        let mut refreshes = JoinSet::new();
        while let Some(message) = stream.next().await {
            match message {
                Ok(token) => self.dispatch(&PushEvent::parse(&token), &mut refreshes),
                Err(e) => {
                    tracing::warn!("Event stream failed: {}", e);
                    break;
                }
            }
            while refreshes.try_join_next().is_some() {}
        }
        tracing::info!("Event stream closed");

        // Let refreshes that were already dispatched land.
        while refreshes.join_next().await.is_some() {}
    }

    fn dispatch(&self, event: &PushEvent, refreshes: &mut JoinSet<()>) {
        match UpdateEffect::from(event) {
            UpdateEffect::IncrementCustomers => {
                self.model.update_stats(|stats| stats.record_customer());
            }
            UpdateEffect::IncrementProducts => {
                self.model.update_stats(|stats| stats.record_product());
            }
            UpdateEffect::Refresh => {
                refreshes.spawn(load_into(self.dashboard.clone(), self.model.clone(), None));
            }
            UpdateEffect::Ignore => {
                tracing::debug!("Ignoring push event {:?}", event);
            }
        }
    }
}

/// Load a snapshot (adopting `preloaded` if given) and, if the view is still
/// mounted, replace its snapshot. Failures are logged and leave it untouched.
pub async fn load_into(
    dashboard: DashboardService,
    model: Arc<DashboardModel>,
    preloaded: Option<DashboardSnapshot>,
) {
    match dashboard.load_dashboard(preloaded).await {
        Ok(snapshot) => {
            if !model.replace(snapshot) {
                tracing::debug!("Discarding dashboard snapshot for unmounted view");
            }
        }
        Err(e) => tracing::warn!("Dashboard load failed: {}", e),
    }
}

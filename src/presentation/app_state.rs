// Application state shared by the CLI commands
use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::application::orders_service::OrdersService;
use crate::application::session_service::SessionHolder;
use crate::application::store_api::{AccountApi, EventFeed, StoreApi};
use crate::application::sync_service::SyncService;
use crate::application::webhook_service::WebhookService;
use crate::domain::chart::ChartPalette;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub feed: Arc<dyn EventFeed>,
    pub orders: OrdersService,
    pub auth: AuthService,
    pub sync: SyncService,
    pub webhooks: WebhookService,
    pub session: SessionHolder,
    pub palette: ChartPalette,
}

impl AppState {
    /// Wire every service to the same backend and session.
    pub fn new<B>(backend: Arc<B>, session: SessionHolder, palette: ChartPalette) -> Self
    where
        B: StoreApi + EventFeed + AccountApi + 'static,
    {
        let dashboard = DashboardService::new(backend.clone());
        Self {
            feed: backend.clone(),
            orders: OrdersService::new(backend.clone()),
            auth: AuthService::new(backend.clone(), session.clone()),
            sync: SyncService::new(backend.clone(), dashboard.clone(), session.clone()),
            webhooks: WebhookService::new(backend),
            dashboard,
            session,
            palette,
        }
    }
}

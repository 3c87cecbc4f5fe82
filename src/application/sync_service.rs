// Sync service - Post-auth import of shop data and dashboard preparation
use crate::application::dashboard_service::DashboardService;
use crate::application::session_service::SessionHolder;
use crate::application::store_api::{AccountApi, SyncResource};
use crate::domain::snapshot::DashboardSnapshot;
use crate::error::{ApiError, DashboardError, SessionError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAuthMode {
    /// Import customers, products and orders before loading the dashboard.
    Sync,
    /// Load the dashboard from what the backend already has.
    FetchOnly,
}

#[derive(Debug, Error)]
pub enum PostAuthError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("sync of {resource} failed: {source}")]
    Sync {
        resource: &'static str,
        #[source]
        source: ApiError,
    },
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

#[derive(Clone)]
pub struct SyncService {
    api: Arc<dyn AccountApi>,
    dashboard: DashboardService,
    session: SessionHolder,
}

impl SyncService {
    pub fn new(
        api: Arc<dyn AccountApi>,
        dashboard: DashboardService,
        session: SessionHolder,
    ) -> Self {
        Self {
            api,
            dashboard,
            session,
        }
    }

    /// Run customers, products and orders in turn; the first failure stops the sync.
    pub async fn sync_all(&self) -> Result<(), PostAuthError> {
        let session = self.session.require()?;
        for resource in SyncResource::ALL {
            tracing::info!("Syncing {} for {}", resource.path_segment(), session.shop);
            self.api
                .sync(resource, &session.shop)
                .await
                .map_err(|source| PostAuthError::Sync {
                    resource: resource.path_segment(),
                    source,
                })?;
        }
        tracing::info!("Sync complete for {}", session.shop);
        Ok(())
    }

    /// Produce the snapshot handed to the dashboard after sign-in.
    pub async fn prepare_dashboard(
        &self,
        mode: PostAuthMode,
    ) -> Result<DashboardSnapshot, PostAuthError> {
        match mode {
            PostAuthMode::Sync => self.sync_all().await?,
            PostAuthMode::FetchOnly => {
                self.session.require()?;
            }
        }
        Ok(self.dashboard.fetch_snapshot().await?)
    }
}

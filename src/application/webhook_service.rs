// Webhook service - Registration toggles for the push notifications
use crate::application::store_api::{AccountApi, WebhookResource, WebhookStatus};
use crate::error::ApiError;
use std::sync::Arc;

#[derive(Clone)]
pub struct WebhookService {
    api: Arc<dyn AccountApi>,
}

impl WebhookService {
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self { api }
    }

    pub async fn status(&self) -> Result<WebhookStatus, ApiError> {
        self.api.webhook_status().await
    }

    /// Flip a webhook's registration and return whether it is now registered.
    pub async fn toggle(
        &self,
        resource: WebhookResource,
        registered: bool,
    ) -> Result<bool, ApiError> {
        if registered {
            self.api.delete_webhook(resource).await?;
        } else {
            self.api.register_webhook(resource).await?;
        }
        Ok(!registered)
    }
}

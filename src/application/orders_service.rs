// Orders service - Date-filtered order listing
use crate::application::store_api::StoreApi;
use crate::domain::order::{Order, OrderDateFilter};
use crate::error::ApiError;
use std::sync::Arc;

#[derive(Clone)]
pub struct OrdersService {
    api: Arc<dyn StoreApi>,
}

impl OrdersService {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }

    /// Orders within `filter`, in the order the backend returns them.
    pub async fn list_orders(&self, filter: &OrderDateFilter) -> Result<Vec<Order>, ApiError> {
        let orders = self.api.orders(filter).await?;
        tracing::debug!("Fetched {} orders", orders.len());
        Ok(orders)
    }
}

// Orders view - Date-filtered order table
use crate::application::orders_service::OrdersService;
use crate::domain::order::{OrderDateFilter, OrderRow};
use crate::error::ApiError;

pub const EMPTY_MESSAGE: &str = "No orders found. Select a date range and click Filter.";

pub const COLUMNS: [&str; 5] = [
    "Order ID",
    "Customer ID",
    "Variant ID",
    "Quantity",
    "Created At",
];

pub struct OrdersView {
    service: OrdersService,
    filter: OrderDateFilter,
    rows: Vec<OrderRow>,
}

impl OrdersView {
    pub fn new(service: OrdersService) -> Self {
        Self {
            service,
            filter: OrderDateFilter::default(),
            rows: Vec::new(),
        }
    }

    /// Fetch orders for `filter`. On failure the previous rows and filter stay in place.
    pub async fn apply_filter(&mut self, filter: OrderDateFilter) -> Result<(), ApiError> {
        let orders = self.service.list_orders(&filter).await.inspect_err(|e| {
            tracing::error!("Error fetching orders: {}", e);
        })?;
        self.rows = orders.iter().map(OrderRow::from).collect();
        self.filter = filter;
        Ok(())
    }

    pub fn rows(&self) -> &[OrderRow] {
        &self.rows
    }

    pub fn filter(&self) -> &OrderDateFilter {
        &self.filter
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

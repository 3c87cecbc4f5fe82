// Dashboard service - Fan-out/fan-in aggregation of the dashboard metrics
use crate::application::store_api::StoreApi;
use crate::domain::month_series::MonthSeries;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::stats::DashboardStats;
use crate::error::{ApiError, DashboardError};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn StoreApi>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }

    /// Adopt `preloaded` if given, otherwise fetch a fresh snapshot.
    pub async fn load_dashboard(
        &self,
        preloaded: Option<DashboardSnapshot>,
    ) -> Result<DashboardSnapshot, DashboardError> {
        if let Some(snapshot) = preloaded {
            tracing::debug!("Adopting preloaded dashboard snapshot");
            return Ok(snapshot);
        }
        self.fetch_snapshot().await
    }

    /// Issue all six reads at once and wait for every one of them to settle.
    ///
    /// A failure does not cancel the remaining requests; the aggregation only
    /// fails after all six are done, listing each endpoint that failed.
    pub async fn fetch_snapshot(&self) -> Result<DashboardSnapshot, DashboardError> {
        let api = &self.api;
        let (customers, products, orders, top_customers, sales, monthly_orders) = tokio::join!(
            api.total_customers(),
            api.total_products(),
            api.total_orders(),
            api.top_customers(),
            api.sales_by_month(),
            api.orders_by_month(),
        );

        let mut failures = Vec::new();
        let customers = settle("total_customers", customers, &mut failures);
        let products = settle("total_products", products, &mut failures);
        let orders = settle("total_orders", orders, &mut failures);
        let top_customers = settle("top_customers", top_customers, &mut failures);
        let sales = settle("sales_by_month", sales, &mut failures);
        let monthly_orders = settle("orders_by_month", monthly_orders, &mut failures);

        match (customers, products, orders, top_customers, sales, monthly_orders) {
            (
                Some(customers),
                Some(products),
                Some(orders),
                Some(top_customers),
                Some(sales),
                Some(monthly_orders),
            ) => Ok(DashboardSnapshot::new(
                DashboardStats::new(customers, products, orders),
                MonthSeries::from_records(&sales),
                MonthSeries::from_records(&monthly_orders),
                top_customers,
            )),
            _ => {
                for (endpoint, err) in &failures {
                    tracing::warn!("Error fetching {}: {}", endpoint, err);
                }
                Err(DashboardError::Aggregation { failures })
            }
        }
    }
}

fn settle<T>(
    endpoint: &'static str,
    result: Result<T, ApiError>,
    failures: &mut Vec<(&'static str, ApiError)>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            failures.push((endpoint, e));
            None
        }
    }
}

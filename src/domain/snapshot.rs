// Dashboard snapshot - the complete view-model at one point in time
use super::customer::TopCustomer;
use super::month_series::MonthSeries;
use super::stats::DashboardStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub sales_by_month: MonthSeries,
    pub orders_by_month: MonthSeries,
    #[serde(default)]
    pub top_customers: Vec<TopCustomer>,
}

impl DashboardSnapshot {
    pub fn new(
        stats: DashboardStats,
        sales_by_month: MonthSeries,
        orders_by_month: MonthSeries,
        top_customers: Vec<TopCustomer>,
    ) -> Self {
        Self {
            stats,
            sales_by_month,
            orders_by_month,
            top_customers,
        }
    }
}

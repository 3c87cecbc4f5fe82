// Dashboard counters
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub customers: u64,
    pub products: u64,
    pub orders: u64,
}

impl DashboardStats {
    pub fn new(customers: u64, products: u64, orders: u64) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    pub fn record_customer(&mut self) {
        self.customers = self.customers.saturating_add(1);
    }

    pub fn record_product(&mut self) {
        self.products = self.products.saturating_add(1);
    }
}

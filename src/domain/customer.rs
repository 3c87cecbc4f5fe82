// Top customer domain model
use serde::{Deserialize, Serialize};

/// A row of the top-customers table, taken verbatim from the backend ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "total_price", alias = "total_spent", default)]
    pub total_spent: f64,
    #[serde(default)]
    pub total_quantity: u64,
}

impl TopCustomer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

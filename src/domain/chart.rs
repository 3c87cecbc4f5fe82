// Chart view-models for the monthly orders and revenue charts
use super::month_series::{MONTH_LABELS, MonthSeries};
use super::snapshot::DashboardSnapshot;

const CHART_DESCRIPTION: &str = "Last 12 Months";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub label: String,
    pub color_key: String,
    pub values: MonthSeries,
}

impl ChartDataset {
    pub fn new(label: String, color_key: String, values: MonthSeries) -> Self {
        Self {
            label,
            color_key,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub description: String,
    pub color_key: String,
    pub labels: [&'static str; 12],
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    fn single(title: &str, color_key: &str, values: MonthSeries) -> Self {
        Self {
            title: title.to_string(),
            description: CHART_DESCRIPTION.to_string(),
            color_key: color_key.to_string(),
            labels: MONTH_LABELS,
            datasets: vec![ChartDataset::new(
                title.to_string(),
                color_key.to_string(),
                values,
            )],
        }
    }
}

/// Color keys picked for each chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPalette {
    pub orders: String,
    pub revenue: String,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            orders: "info".to_string(),
            revenue: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    pub orders: ChartData,
    pub revenue: ChartData,
}

impl DashboardCharts {
    /// Rebuild both charts; call again whenever the snapshot or palette changes.
    pub fn build(snapshot: &DashboardSnapshot, palette: &ChartPalette) -> Self {
        Self {
            orders: ChartData::single("Orders", &palette.orders, snapshot.orders_by_month),
            revenue: ChartData::single("Revenue", &palette.revenue, snapshot.sales_by_month),
        }
    }
}

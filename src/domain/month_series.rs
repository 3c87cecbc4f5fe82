// Month bucketing for the monthly sales/orders charts
use serde::{Deserialize, Serialize};

/// Calendar month names, January first. Record months are matched against these.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Axis labels for the chart x-axis.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A single `{month, value}` entry as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRecord {
    pub month: String,
    pub value: f64,
}

impl MonthRecord {
    pub fn new(month: impl Into<String>, value: f64) -> Self {
        Self {
            month: month.into(),
            value,
        }
    }
}

/// Twelve values indexed by calendar month (January = 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthSeries([f64; 12]);

impl MonthSeries {
    /// Bucket a sparse list of records into a dense series.
    ///
    /// Records whose trimmed month name is not in [`MONTH_NAMES`] are skipped.
    /// When a month appears more than once the last record wins.
    pub fn from_records(records: &[MonthRecord]) -> Self {
        let mut values = [0.0; 12];
        for record in records {
            if let Some(index) = month_index(&record.month) {
                values[index] = record.value;
            }
        }
        Self(values)
    }

    pub fn values(&self) -> &[f64; 12] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl From<[f64; 12]> for MonthSeries {
    fn from(values: [f64; 12]) -> Self {
        Self(values)
    }
}

/// Position of a month name in [`MONTH_NAMES`], ignoring surrounding whitespace.
pub fn month_index(name: &str) -> Option<usize> {
    let name = name.trim();
    MONTH_NAMES.iter().position(|m| *m == name)
}

// Order domain model and the date-range filter used by the order browser
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderDateFilter {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl OrderDateFilter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(FilterError::InvertedRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Build a filter from optional `YYYY-MM-DD` strings; blank strings are treated as unset.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, FilterError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Query parameters for the bounds that are set, in `start_date`, `end_date` order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FilterError::InvalidDate(raw.to_string())),
    }
}

/// A formatted row of the order table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: String,
    pub customer_id: String,
    pub variant_id: String,
    pub quantity: String,
    pub created_at: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        let optional = |id: Option<i64>| id.map(|v| v.to_string()).unwrap_or_default();
        Self {
            id: order.id.to_string(),
            customer_id: optional(order.customer_id),
            variant_id: optional(order.variant_id),
            quantity: order.quantity.to_string(),
            created_at: order
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

/// Accepts RFC 3339 timestamps as well as naive ones, which are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

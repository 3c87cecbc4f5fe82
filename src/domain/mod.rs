// Domain layer - Dashboard view-models and merchant data
pub mod chart;
pub mod customer;
pub mod month_series;
pub mod order;
pub mod push_event;
pub mod session;
pub mod snapshot;
pub mod stats;

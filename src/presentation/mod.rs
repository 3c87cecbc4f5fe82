// Presentation layer - CLI commands and the views they drive
pub mod app_state;
pub mod commands;
pub mod dashboard_view;
pub mod orders_view;

// Application layer - Use cases
pub mod auth_service;
pub mod dashboard_model;
pub mod dashboard_service;
pub mod live_update;
pub mod orders_service;
pub mod session_service;
pub mod store_api;
pub mod sync_service;
pub mod webhook_service;

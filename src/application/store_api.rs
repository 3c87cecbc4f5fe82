// Backend access traits consumed by the application services
use crate::domain::customer::TopCustomer;
use crate::domain::month_series::MonthRecord;
use crate::domain::order::{Order, OrderDateFilter};
use crate::domain::session::ShopDomain;
use crate::error::ApiError;
use async_trait::async_trait;
use futures::stream::Stream;
use secrecy::SecretString;
use std::pin::Pin;

/// Raw event-name tokens from the push connection, in arrival order.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<String, ApiError>> + Send>>;

/// Read-only store metrics.
#[async_trait]
pub trait StoreApi: Send + Sync {
    async fn total_customers(&self) -> Result<u64, ApiError>;

    async fn total_products(&self) -> Result<u64, ApiError>;

    async fn total_orders(&self) -> Result<u64, ApiError>;

    /// Highest-spending customers; empty when the backend reports none.
    async fn top_customers(&self) -> Result<Vec<TopCustomer>, ApiError>;

    /// `{month, sales}` records; malformed entries are already dropped.
    async fn sales_by_month(&self) -> Result<Vec<MonthRecord>, ApiError>;

    /// `{month, orders}` records; malformed entries are already dropped.
    async fn orders_by_month(&self) -> Result<Vec<MonthRecord>, ApiError>;

    async fn orders(&self, filter: &OrderDateFilter) -> Result<Vec<Order>, ApiError>;
}

/// Long-lived server push connection.
#[async_trait]
pub trait EventFeed: Send + Sync {
    /// Open the connection. Dropping the returned stream closes it.
    async fn subscribe(&self) -> Result<EventStream, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackResult {
    pub success: bool,
    pub is_login: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResult {
    pub success: bool,
    pub shop: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncResource {
    Customers,
    Products,
    Orders,
}

impl SyncResource {
    /// Order in which a full sync runs.
    pub const ALL: [SyncResource; 3] = [Self::Customers, Self::Products, Self::Orders];

    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResource {
    Orders,
    Products,
    Customers,
}

impl WebhookResource {
    /// Singular name the webhook endpoints use.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Orders => "order",
            Self::Products => "product",
            Self::Customers => "customer",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebhookStatus {
    pub orders: bool,
    pub products: bool,
    pub customers: bool,
}

impl WebhookStatus {
    pub fn is_registered(&self, resource: WebhookResource) -> bool {
        match resource {
            WebhookResource::Orders => self.orders,
            WebhookResource::Products => self.products,
            WebhookResource::Customers => self.customers,
        }
    }
}

/// Session, sync and webhook management endpoints.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// URL the merchant is sent to for the Shopify install/OAuth handoff.
    fn install_url(&self, shop: &ShopDomain) -> String;

    /// Session credential the backend has issued to this client, if any.
    fn session_token(&self) -> Option<SecretString>;

    async fn complete_callback(
        &self,
        code: &str,
        shop: &ShopDomain,
        state: &str,
    ) -> Result<CallbackResult, ApiError>;

    async fn login(&self, email: &str, password: &SecretString) -> Result<AccountResult, ApiError>;

    async fn sign_up(
        &self,
        shop: &ShopDomain,
        email: &str,
        password: &SecretString,
    ) -> Result<AccountResult, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn sync(&self, resource: SyncResource, shop: &ShopDomain) -> Result<(), ApiError>;

    async fn webhook_status(&self) -> Result<WebhookStatus, ApiError>;

    async fn register_webhook(&self, resource: WebhookResource) -> Result<(), ApiError>;

    async fn delete_webhook(&self, resource: WebhookResource) -> Result<(), ApiError>;
}

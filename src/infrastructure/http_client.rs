// Backend HTTP client implementation
use crate::application::store_api::{
    AccountApi, AccountResult, CallbackResult, StoreApi, SyncResource, WebhookResource,
    WebhookStatus,
};
use crate::domain::customer::TopCustomer;
use crate::domain::month_series::MonthRecord;
use crate::domain::order::{Order, OrderDateFilter};
use crate::domain::session::ShopDomain;
use crate::error::ApiError;
use crate::infrastructure::config::{BackendSettings, endpoint_url};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const SESSION_COOKIE: &str = "token";

/// Talks to the backend with a cookie-carrying client, so every request is
/// credentialed with whatever session the backend has issued.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    origin: reqwest::Url,
    timeout: Duration,
    jar: Arc<Jar>,
    pub(crate) client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TopCustomersEnvelope {
    #[serde(default)]
    data: Option<Vec<TopCustomer>>,
}

#[derive(Debug, Deserialize)]
struct CallbackResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    is_login: bool,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    shop: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WebhookCheckResponse {
    #[serde(default)]
    orders: Option<serde_json::Value>,
    #[serde(default)]
    products: Option<serde_json::Value>,
    #[serde(default)]
    customers: Option<serde_json::Value>,
}

impl HttpBackend {
    pub fn new(
        settings: &BackendSettings,
        session_token: Option<&SecretString>,
    ) -> Result<Self, ApiError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let origin = reqwest::Url::parse(&base_url)
            .map_err(|_| ApiError::InvalidUrl(settings.base_url.clone()))?;

        let jar = Arc::new(Jar::default());
        if let Some(token) = session_token {
            jar.add_cookie_str(
                &format!("{SESSION_COOKIE}={}", token.expose_secret()),
                &origin,
            );
        }

        // No client-wide timeout: it would also cut the long-lived event stream.
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .connect_timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            origin,
            timeout: Duration::from_secs(settings.timeout_secs),
            jar,
            client,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(self.timeout)
            .header("Accept", "application/json")
            .send()
            .await?;
        decode(path, response).await
    }

    async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .timeout(self.timeout)
            .header("Accept", "application/json")
            .send()
            .await?;
        decode(path, response).await
    }

    async fn post_json<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        decode(path, response).await
    }

    async fn send_ok(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = request.timeout(self.timeout).send().await?;
        check_status(response).await.map(|_| ())
    }
}

pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let body = check_status(response).await?.text().await?;
    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        endpoint: path.to_string(),
        source,
    })
}

/// Pull `{month, <value_key>}` records out of a monthly series response.
///
/// Anything that is not an array yields no records; entries without a string
/// month or a numeric value are skipped.
pub fn parse_month_records(body: &serde_json::Value, value_key: &str) -> Vec<MonthRecord> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let month = item.get("month")?.as_str()?;
            let value = item.get(value_key)?.as_f64()?;
            Some(MonthRecord::new(month, value))
        })
        .collect()
}

/// Value of the `name` cookie in a `Cookie` header.
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

fn truthy(value: Option<serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[async_trait]
impl StoreApi for HttpBackend {
    async fn total_customers(&self) -> Result<u64, ApiError> {
        self.get_json("/fetch/total_customers").await
    }

    async fn total_products(&self) -> Result<u64, ApiError> {
        self.get_json("/fetch/total_products").await
    }

    async fn total_orders(&self) -> Result<u64, ApiError> {
        self.get_json("/fetch/total_orders").await
    }

    async fn top_customers(&self) -> Result<Vec<TopCustomer>, ApiError> {
        let envelope: TopCustomersEnvelope = self.get_json("/fetch/top_customers").await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn sales_by_month(&self) -> Result<Vec<MonthRecord>, ApiError> {
        let body: serde_json::Value = self.get_json("/fetch/sales_by_month").await?;
        Ok(parse_month_records(&body, "sales"))
    }

    async fn orders_by_month(&self) -> Result<Vec<MonthRecord>, ApiError> {
        let body: serde_json::Value = self.get_json("/fetch/orders_by_month").await?;
        Ok(parse_month_records(&body, "orders"))
    }

    async fn orders(&self, filter: &OrderDateFilter) -> Result<Vec<Order>, ApiError> {
        self.get_json_with_query("/fetch/orders", &filter.query_pairs())
            .await
    }
}

#[async_trait]
impl AccountApi for HttpBackend {
    fn install_url(&self, shop: &ShopDomain) -> String {
        format!(
            "{}?shop={}",
            self.url("/shops/install"),
            urlencoding::encode(shop.as_str())
        )
    }

    fn session_token(&self) -> Option<SecretString> {
        let header = self.jar.cookies(&self.origin)?;
        let token = cookie_value(header.to_str().ok()?, SESSION_COOKIE)?;
        Some(SecretString::from(token))
    }

    async fn complete_callback(
        &self,
        code: &str,
        shop: &ShopDomain,
        state: &str,
    ) -> Result<CallbackResult, ApiError> {
        let query = [
            ("code", code.to_string()),
            ("shop", shop.to_string()),
            ("state", state.to_string()),
        ];
        let response: CallbackResponse = self.get_json_with_query("/shops/callback", &query).await?;
        Ok(CallbackResult {
            success: response.success,
            is_login: response.is_login,
        })
    }

    async fn login(&self, email: &str, password: &SecretString) -> Result<AccountResult, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response: AccountResponse = self.post_json("/auth/login", &body).await?;
        Ok(AccountResult {
            success: response.success,
            shop: response.shop,
        })
    }

    async fn sign_up(
        &self,
        shop: &ShopDomain,
        email: &str,
        password: &SecretString,
    ) -> Result<AccountResult, ApiError> {
        let body = serde_json::json!({
            "shop": shop.as_str(),
            "email": email,
            "password": password.expose_secret(),
        });
        let response: AccountResponse = self.post_json("/auth/signup", &body).await?;
        Ok(AccountResult {
            success: response.success,
            shop: response.shop,
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send_ok(self.client.get(self.url("/auth/logout"))).await
    }

    async fn sync(&self, resource: SyncResource, shop: &ShopDomain) -> Result<(), ApiError> {
        let path = format!("/sync/{}", resource.path_segment());
        self.send_ok(
            self.client
                .get(self.url(&path))
                .query(&[("shop", shop.as_str())]),
        )
        .await
    }

    async fn webhook_status(&self) -> Result<WebhookStatus, ApiError> {
        let response: WebhookCheckResponse = self.get_json("/webhooks/check").await?;
        Ok(WebhookStatus {
            orders: truthy(response.orders),
            products: truthy(response.products),
            customers: truthy(response.customers),
        })
    }

    async fn register_webhook(&self, resource: WebhookResource) -> Result<(), ApiError> {
        let path = format!("/webhooks/register/{}/create", resource.endpoint());
        self.send_ok(self.client.get(self.url(&path))).await
    }

    async fn delete_webhook(&self, resource: WebhookResource) -> Result<(), ApiError> {
        let path = format!("/webhooks/{}", resource.endpoint());
        self.send_ok(self.client.delete(self.url(&path))).await
    }
}

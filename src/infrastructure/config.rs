use crate::domain::chart::ChartPalette;
use serde::Deserialize;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "SHOP_DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub charts: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// A session issued earlier, so commands can run without a fresh sign-in.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionSettings {
    pub shop: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_orders_color")]
    pub orders_color: String,
    #[serde(default = "default_revenue_color")]
    pub revenue_color: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            orders_color: default_orders_color(),
            revenue_color: default_revenue_color(),
        }
    }
}

impl ChartSettings {
    pub fn palette(&self) -> ChartPalette {
        ChartPalette {
            orders: self.orders_color.clone(),
            revenue: self.revenue_color.clone(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_orders_color() -> String {
    "info".to_string()
}

fn default_revenue_color() -> String {
    "success".to_string()
}

/// Defaults, then `config/dashboard.{toml,...}` if present, then
/// `SHOP_DASHBOARD__SECTION__KEY` environment variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("backend.base_url", "http://localhost:8000")?
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Join the backend base URL and an endpoint path with exactly one slash between them.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:8000/", "/fetch/total_orders"),
            "http://localhost:8000/fetch/total_orders"
        );
        assert_eq!(
            endpoint_url("https://api.example.com/v1", "events"),
            "https://api.example.com/v1/events"
        );
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let settings = config::Config::builder()
            .set_override("backend.base_url", "http://backend:9000")
            .expect("override")
            .build()
            .expect("build");
        let config: AppConfig = settings.try_deserialize().expect("deserialize");

        assert_eq!(config.backend.base_url, "http://backend:9000");
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.session.token.is_none());
        assert_eq!(config.charts.palette(), ChartPalette::default());
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [backend]
            base_url = "http://localhost:8000"
            timeout_secs = 5

            [session]
            shop = "reef.myshopify.com"
            token = "jwt"

            [charts]
            revenue_color = "primary"
        "#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .expect("build");
        let config: AppConfig = settings.try_deserialize().expect("deserialize");

        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.session.shop.as_deref(), Some("reef.myshopify.com"));
        assert_eq!(config.charts.palette().orders, "info");
        assert_eq!(config.charts.palette().revenue, "primary");
    }
}

// Main entry point - Dependency injection and command dispatch
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use crate::application::session_service::SessionHolder;
use crate::application::store_api::WebhookResource;
use crate::application::sync_service::PostAuthMode;
use crate::domain::session::{Session, ShopDomain};
use crate::infrastructure::config::{AppConfig, load_config};
use crate::infrastructure::http_client::HttpBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::commands;

#[derive(Parser)]
#[command(name = "shop-dashboard")]
#[command(author, version, about = "Shopify store analytics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the live dashboard
    Dashboard {
        /// Print one snapshot and exit
        #[arg(long)]
        once: bool,
    },
    /// Prepare the dashboard after sign-in
    #[command(group(ArgGroup::new("mode").required(true).args(["sync", "fetch"])))]
    PostAuth {
        /// Import customers, products and orders first
        #[arg(long)]
        sync: bool,
        /// Only fetch what the backend already has
        #[arg(long)]
        fetch: bool,
        /// Print one snapshot and exit
        #[arg(long)]
        once: bool,
    },
    /// List orders, optionally within a date range
    Orders {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
    /// Print the install URL for a shop
    SignIn {
        #[arg(long)]
        shop: String,
    },
    /// Complete the install with the parameters Shopify redirected back with
    Callback {
        #[arg(long)]
        code: String,
        #[arg(long)]
        shop: String,
        #[arg(long)]
        state: Option<String>,
    },
    /// Create an account for a shop
    SignUp {
        #[arg(long)]
        shop: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHOP_DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SHOP_DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Inspect or toggle webhook registrations
    Webhooks {
        #[command(subcommand)]
        action: WebhookAction,
    },
}

#[derive(Subcommand)]
enum WebhookAction {
    /// Show which webhooks are registered
    Status,
    /// Register the webhook if missing, delete it otherwise
    Toggle {
        #[arg(value_enum)]
        resource: WebhookTarget,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WebhookTarget {
    Orders,
    Products,
    Customers,
}

impl From<WebhookTarget> for WebhookResource {
    fn from(target: WebhookTarget) -> Self {
        match target {
            WebhookTarget::Orders => Self::Orders,
            WebhookTarget::Products => Self::Products,
            WebhookTarget::Customers => Self::Customers,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config()?;
    let state = build_state(&config)?;

    run(cli, &state).await
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let token = config.session.token.clone().map(SecretString::from);
    let backend = Arc::new(HttpBackend::new(&config.backend, token.as_ref())?);

    let session = SessionHolder::new();
    if let Some(shop) = &config.session.shop {
        let shop = ShopDomain::parse(shop)?;
        tracing::debug!("Resuming session for {}", shop);
        session.init(Session::new(shop));
    }

    Ok(AppState::new(backend, session, config.charts.palette()))
}

async fn run(cli: Cli, state: &AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Dashboard { once } => commands::dashboard(state, None, once).await?,
        Commands::PostAuth { sync, once, .. } => {
            let mode = if sync {
                PostAuthMode::Sync
            } else {
                PostAuthMode::FetchOnly
            };
            commands::post_auth(state, mode, once).await?;
        }
        Commands::Orders { start, end } => {
            commands::orders(state, start.as_deref(), end.as_deref()).await?;
        }
        Commands::SignIn { shop } => commands::sign_in(state, &shop)?,
        Commands::Callback {
            code,
            shop,
            state: oauth_state,
        } => commands::callback(state, code, shop, oauth_state).await?,
        Commands::SignUp {
            shop,
            email,
            password,
        } => {
            let password = SecretString::from(password);
            commands::sign_up(state, &shop, &email, &password).await?;
        }
        Commands::Login { email, password } => {
            let password = SecretString::from(password);
            commands::login(state, &email, &password).await?;
        }
        Commands::Logout => commands::logout(state).await?,
        Commands::Webhooks { action } => match action {
            WebhookAction::Status => commands::webhook_status(state).await?,
            WebhookAction::Toggle { resource } => {
                commands::toggle_webhook(state, resource.into()).await?;
            }
        },
    }
    Ok(())
}

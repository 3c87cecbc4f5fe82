// CLI command handlers
use crate::application::auth_service::OAuthCallback;
use crate::application::session_service::{SessionEvent, SessionSubscription};
use crate::application::store_api::{WebhookResource, WebhookStatus};
use crate::application::sync_service::PostAuthMode;
use crate::domain::chart::{ChartData, DashboardCharts};
use crate::domain::customer::TopCustomer;
use crate::domain::order::{OrderDateFilter, OrderRow};
use crate::domain::session::ShopDomain;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::stats::DashboardStats;
use crate::presentation::app_state::AppState;
use crate::presentation::dashboard_view::DashboardView;
use crate::presentation::orders_view::{COLUMNS, EMPTY_MESSAGE, OrdersView};
use async_stream::stream;
use futures::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Write;
use tokio::sync::watch;

/// Mount the dashboard and print it on every snapshot change until Ctrl-C or
/// sign-out. SIGHUP retriggers a full reload.
///
/// With `once`, print a single snapshot and return; a failed load is an error.
pub async fn dashboard(
    state: &AppState,
    preloaded: Option<DashboardSnapshot>,
    once: bool,
) -> anyhow::Result<()> {
    if once {
        let snapshot = state.dashboard.load_dashboard(preloaded).await?;
        let charts = DashboardCharts::build(&snapshot, &state.palette);
        println!("{}", render_dashboard(&snapshot, &charts));
        return Ok(());
    }

    if !state.session.is_signed_in() {
        tracing::warn!("No session configured, the backend may reject dashboard requests");
    }
    let reloads = reload_requests()?;
    let view = DashboardView::mount(
        state.dashboard.clone(),
        state.feed.clone(),
        state.palette.clone(),
        preloaded,
    );
    let updates = view.subscribe();
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    watch_dashboard(
        view,
        updates,
        state.session.subscribe(),
        reloads,
        shutdown,
        |out| println!("{out}"),
    )
    .await;
    Ok(())
}

#[cfg(unix)]
fn reload_requests() -> anyhow::Result<impl Stream<Item = ()> + Send> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangups = signal(SignalKind::hangup())?;
    Ok(stream! {
        while hangups.recv().await.is_some() {
            yield ();
        }
    })
}

#[cfg(not(unix))]
fn reload_requests() -> anyhow::Result<impl Stream<Item = ()> + Send> {
    Ok(futures::stream::pending())
}

/// Drive a mounted view: render each snapshot change, reload on request, and
/// unmount once `shutdown` resolves, the session ends or the view goes away.
async fn watch_dashboard<R, S>(
    mut view: DashboardView,
    mut updates: watch::Receiver<Option<DashboardSnapshot>>,
    mut sessions: SessionSubscription,
    reloads: R,
    shutdown: S,
    mut print: impl FnMut(String),
) where
    R: Stream<Item = ()>,
    S: Future<Output = ()>,
{
    tokio::pin!(reloads);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() || updates.borrow_and_update().is_none() {
                    break;
                }
                if let (Some(snapshot), Some(charts)) = (view.snapshot(), view.charts()) {
                    print(render_dashboard(&snapshot, &charts));
                }
            }
            Some(()) = reloads.next() => {
                tracing::info!("Reloading dashboard");
                view.reload();
            }
            event = sessions.next() => match event {
                Some(SessionEvent::SignedIn(_)) => {}
                Some(SessionEvent::SignedOut) | None => {
                    tracing::info!("Session ended, closing dashboard");
                    break;
                }
            },
            () = &mut shutdown => {
                tracing::info!("Closing dashboard");
                break;
            }
        }
    }

    view.unmount();
}

/// Sync (or just fetch) after sign-in, then open the dashboard on the result.
pub async fn post_auth(state: &AppState, mode: PostAuthMode, once: bool) -> anyhow::Result<()> {
    let snapshot = state.sync.prepare_dashboard(mode).await?;
    dashboard(state, Some(snapshot), once).await
}

pub async fn orders(
    state: &AppState,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<()> {
    let filter = OrderDateFilter::parse(start, end)?;
    let mut view = OrdersView::new(state.orders.clone());
    view.apply_filter(filter).await?;

    println!("{}", describe_filter(view.filter()));
    if view.is_empty() {
        println!("{EMPTY_MESSAGE}");
    } else {
        println!("{}", render_orders(view.rows()));
    }
    Ok(())
}

pub fn sign_in(state: &AppState, shop: &str) -> anyhow::Result<()> {
    let redirect = state.auth.begin_install(shop)?;
    println!("Open this URL to install the app on {}:", redirect.shop);
    println!("{}", redirect.url);
    Ok(())
}

pub async fn callback(
    state: &AppState,
    code: String,
    shop: String,
    oauth_state: Option<String>,
) -> anyhow::Result<()> {
    let callback = OAuthCallback {
        code: Some(code),
        shop: Some(shop),
        state: oauth_state,
    };
    let outcome = state.auth.complete_callback(&callback).await?;
    let session = state.session.require()?;

    println!("Authorized {} ({})", session.shop.display_name(), session.shop);
    print_session_exports(&session.shop, state.auth.session_token());
    let next = if outcome.is_login { "--fetch" } else { "--sync" };
    println!("Next: shop-dashboard post-auth {next}");
    Ok(())
}

pub async fn sign_up(
    state: &AppState,
    shop: &str,
    email: &str,
    password: &SecretString,
) -> anyhow::Result<()> {
    let shop = state.auth.sign_up(shop, email, password).await?;
    println!("Account created for {shop}");
    println!("Next: shop-dashboard sign-in --shop {shop}");
    Ok(())
}

pub async fn login(state: &AppState, email: &str, password: &SecretString) -> anyhow::Result<()> {
    let session = state.auth.login(email, password).await?;
    println!("Logged in to {} ({})", session.shop.display_name(), session.shop);
    print_session_exports(&session.shop, state.auth.session_token());
    Ok(())
}

pub async fn logout(state: &AppState) -> anyhow::Result<()> {
    state.auth.logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn webhook_status(state: &AppState) -> anyhow::Result<()> {
    let status = state.webhooks.status().await?;
    println!("{}", render_webhooks(&status));
    Ok(())
}

pub async fn toggle_webhook(state: &AppState, resource: WebhookResource) -> anyhow::Result<()> {
    let status = state.webhooks.status().await?;
    let registered = state
        .webhooks
        .toggle(resource, status.is_registered(resource))
        .await?;
    println!(
        "{} webhook {}",
        resource.endpoint(),
        if registered { "registered" } else { "deleted" }
    );
    Ok(())
}

/// Environment a later invocation needs to reuse the session just issued.
fn print_session_exports(shop: &ShopDomain, token: Option<SecretString>) {
    println!("export SHOP_DASHBOARD__SESSION__SHOP={shop}");
    if let Some(token) = token {
        println!("export SHOP_DASHBOARD__SESSION__TOKEN={}", token.expose_secret());
    }
}

pub fn describe_filter(filter: &OrderDateFilter) -> String {
    match (filter.start(), filter.end()) {
        (None, None) => "Orders: all dates".to_string(),
        (Some(start), None) => format!("Orders from {start}"),
        (None, Some(end)) => format!("Orders through {end}"),
        (Some(start), Some(end)) => format!("Orders from {start} through {end}"),
    }
}

pub fn render_dashboard(snapshot: &DashboardSnapshot, charts: &DashboardCharts) -> String {
    let mut out = render_stats(&snapshot.stats);
    out.push('\n');
    out.push_str(&render_chart(&charts.orders));
    out.push('\n');
    out.push_str(&render_chart(&charts.revenue));
    out.push('\n');
    out.push_str(&render_top_customers(&snapshot.top_customers));
    out
}

pub fn render_stats(stats: &DashboardStats) -> String {
    format!(
        "Total Customers: {}\nTotal Products: {}\nTotal Orders: {}\n",
        stats.customers, stats.products, stats.orders
    )
}

pub fn render_chart(chart: &ChartData) -> String {
    let mut out = format!("{} ({}) [{}]\n", chart.title, chart.description, chart.color_key);
    for dataset in &chart.datasets {
        let _ = writeln!(out, "  {:<4}{:>12.2}", "Sum", dataset.values.total());
        for (label, value) in chart.labels.iter().zip(dataset.values.values()) {
            let _ = writeln!(out, "  {label:<4}{value:>12.2}");
        }
    }
    out
}

pub fn render_top_customers(customers: &[TopCustomer]) -> String {
    let mut out = String::from("Top Customers\n");
    if customers.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<28}{:<32}{:>12}{:>16}",
        "Customer", "Email", "Total Spent", "Total Quantity"
    );
    for customer in customers {
        let _ = writeln!(
            out,
            "  {:<28}{:<32}{:>12.2}{:>16}",
            customer.display_name(),
            customer.email,
            customer.total_spent,
            customer.total_quantity
        );
    }
    out
}

pub fn render_orders(rows: &[OrderRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12}{:<14}{:<14}{:>10}  {}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12}{:<14}{:<14}{:>10}  {}",
            row.id, row.customer_id, row.variant_id, row.quantity, row.created_at
        );
    }
    out
}

pub fn render_webhooks(status: &WebhookStatus) -> String {
    [
        WebhookResource::Orders,
        WebhookResource::Products,
        WebhookResource::Customers,
    ]
    .iter()
    .map(|resource| {
        let state = if status.is_registered(*resource) {
            "registered"
        } else {
            "not registered"
        };
        format!("{:<10}{}\n", resource.endpoint(), state)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dashboard_service::tests::FakeStore;
    use crate::application::live_update::tests::FakeFeed;
    use crate::application::session_service::SessionHolder;
    use crate::domain::chart::ChartPalette;
    use crate::domain::month_series::{MonthRecord, MonthSeries};
    use crate::domain::session::Session;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tokio::sync::{mpsc, oneshot};
    use tokio_stream::wrappers::ReceiverStream;

    fn signed_in() -> SessionHolder {
        let session = SessionHolder::new();
        session.init(Session::new(ShopDomain::parse("reef").expect("valid")));
        session
    }

    fn customer(first: &str, spent: f64) -> TopCustomer {
        TopCustomer {
            first_name: first.to_string(),
            last_name: "Hopper".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            total_spent: spent,
            total_quantity: 3,
        }
    }

    #[test]
    fn test_render_stats() {
        let out = render_stats(&DashboardStats::new(3, 14, 159));
        assert_eq!(out, "Total Customers: 3\nTotal Products: 14\nTotal Orders: 159\n");
    }

    #[test]
    fn test_render_chart_lists_every_month() {
        let snapshot = DashboardSnapshot {
            sales_by_month: MonthSeries::from_records(&[MonthRecord::new("December", 42.5)]),
            ..Default::default()
        };
        let charts = DashboardCharts::build(&snapshot, &ChartPalette::default());

        let out = render_chart(&charts.revenue);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Revenue (Last 12 Months) [success]");
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[1], "  Sum        42.50");
        assert!(lines[2].trim_start().starts_with("Jan"));
        assert!(lines[13].ends_with("42.50"));
    }

    #[test]
    fn test_render_top_customers_keeps_backend_order() {
        let out = render_top_customers(&[customer("Grace", 10.0), customer("Alan", 99.0)]);
        let grace = out.find("Grace Hopper").expect("grace");
        let alan = out.find("Alan Hopper").expect("alan");
        assert!(grace < alan);
        assert!(out.contains("99.00"));

        assert_eq!(render_top_customers(&[]), "Top Customers\n  (none)\n");
    }

    #[test]
    fn test_render_webhooks() {
        let status = WebhookStatus {
            orders: true,
            products: false,
            customers: true,
        };
        let out = render_webhooks(&status);
        assert_eq!(
            out,
            "order     registered\nproduct   not registered\ncustomer  registered\n"
        );
    }

    #[test]
    fn test_render_orders_header_first() {
        let row = OrderRow {
            id: "7".to_string(),
            customer_id: String::new(),
            variant_id: "12".to_string(),
            quantity: "1".to_string(),
            created_at: "2024-02-01 08:30:00".to_string(),
        };
        let out = render_orders(&[row]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Order ID"));
        assert!(lines[1].starts_with("7 "));
        assert!(lines[1].ends_with("2024-02-01 08:30:00"));
    }

    #[test]
    fn test_describe_filter() {
        assert_eq!(describe_filter(&OrderDateFilter::default()), "Orders: all dates");
        let both = OrderDateFilter::parse(Some("2024-01-01"), Some("2024-01-31")).expect("valid");
        assert_eq!(describe_filter(&both), "Orders from 2024-01-01 through 2024-01-31");
        let end_only = OrderDateFilter::parse(None, Some("2024-02-29")).expect("valid");
        assert_eq!(describe_filter(&end_only), "Orders through 2024-02-29");
    }

    #[tokio::test]
    async fn test_sign_out_closes_live_dashboard() {
        let store = Arc::new(FakeStore::default());
        let (feed, _events) = FakeFeed::new();
        let session = signed_in();
        let view = DashboardView::mount(
            DashboardService::new(store),
            feed,
            ChartPalette::default(),
            Some(DashboardSnapshot::default()),
        );
        let updates = view.subscribe();
        let (_reload_tx, reload_rx) = mpsc::channel(1);
        let (printed_tx, mut printed) = mpsc::unbounded_channel();

        let watcher = tokio::spawn(watch_dashboard(
            view,
            updates,
            session.subscribe(),
            ReceiverStream::new(reload_rx),
            std::future::pending(),
            move |out| {
                let _ = printed_tx.send(out);
            },
        ));

        let first = printed.recv().await.expect("rendered");
        assert!(first.starts_with("Total Customers: 0"));

        session.teardown();
        watcher.await.expect("watcher stops on sign-out");
        assert_eq!(session.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_reload_request_recovers_failed_load() {
        let store = Arc::new(FakeStore::with_customers(5));
        store.fail("top_customers");
        let (feed, _events) = FakeFeed::new();
        let session = signed_in();
        let view = DashboardView::mount(
            DashboardService::new(store.clone()),
            feed,
            ChartPalette::default(),
            None,
        );
        let updates = view.subscribe();
        let (reload_tx, reload_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let (printed_tx, mut printed) = mpsc::unbounded_channel();

        let watcher = tokio::spawn(watch_dashboard(
            view,
            updates,
            session.subscribe(),
            ReceiverStream::new(reload_rx),
            async move {
                let _ = stop_rx.await;
            },
            move |out| {
                let _ = printed_tx.send(out);
            },
        ));

        // The initial load fails and nothing is rendered.
        while store.calls.load(Ordering::SeqCst) < 6 {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(printed.try_recv().is_err());

        store.failing.lock().unwrap().clear();
        reload_tx.send(()).await.expect("send");

        let rendered = printed.recv().await.expect("rendered after reload");
        assert!(rendered.starts_with("Total Customers: 5\nTotal Products: 8\nTotal Orders: 21"));
        assert!(rendered.contains("Ada Lovelace"));

        stop_tx.send(()).expect("watcher alive");
        watcher.await.expect("watcher stops on shutdown");
    }
}

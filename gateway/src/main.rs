use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use link_budget::LinkBudgetInput;

mod routes;

#[derive(Clone)]
pub struct AppState {
    pub defaults: Arc<LinkBudgetInput>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "link_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let defaults = default_constellation();
    match link_budget::compute(&defaults) {
        Ok(report) => {
            tracing::info!(
                "   Default constellation: {} satellites at {:.0} m, {:.2e} Hz",
                defaults.satellite_count,
                defaults.altitude_m,
                defaults.frequency_hz
            );
            tracing::info!("   Distance between satellites: {:.2} m", report.distance_m);
            tracing::info!("   Power loss (FSPL): {:.2} dB", report.path_loss_db);
        }
        Err(err) => tracing::warn!("   Default constellation invalid: {}", err),
    }

    let state = AppState {
        defaults: Arc::new(defaults),
    };

    // API routes for link budget operations
    let link_budget_routes = Router::new()
        .route("/link-budget/compute", post(routes::compute_link_budget))
        .route("/link-budget/default", get(routes::default_link_budget))
        .with_state(state);

    let app = Router::new()
        .route("/health", get(routes::health))
        .nest("/api/v1", link_budget_routes)
        .layer(CorsLayer::permissive());

    let port = std::env::var("LINK_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18620".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🛰️  Link budget gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Deployment defaults, overridable from the environment.
fn default_constellation() -> LinkBudgetInput {
    LinkBudgetInput {
        satellite_count: env_parse("LINK_BUDGET_SATELLITES", 14),
        altitude_m: env_parse("LINK_BUDGET_ALTITUDE_M", 450_000.0),
        frequency_hz: env_parse("LINK_BUDGET_FREQUENCY_HZ", 2.4e9),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(fallback)
}

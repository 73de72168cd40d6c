use std::time::Duration;

use axum::Router;
use axum::http::{Method, Request, header};
use axum::response::Response;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pickup_api::config::{Config, Environment};
use pickup_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        open_hour = config.booking.open_hour,
        close_hour = config.booking.close_hour,
        slot_minutes = config.booking.slot_minutes,
        "starting pickup-api"
    );

    let db = pickup_api::db::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("database ready, migrations applied");

    let state = AppState {
        db,
        config: config.clone(),
    };
    let app = build_app(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the router with tracing and CORS layers.
fn build_app(state: AppState, config: &Config) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                status = tracing::field::Empty,
            )
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status", response.status().as_u16());
            tracing::debug!(latency_ms = latency.as_millis(), "handled");
        });

    pickup_api::routes::router()
        .with_state(state)
        .layer(cors_layer(config))
        .layer(trace)
}

/// Production locks CORS to the configured frontend; every other environment
/// stays permissive for local clients.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.environment != Environment::Production {
        return CorsLayer::permissive();
    }

    let origin = config
        .frontend_url
        .parse::<axum::http::HeaderValue>()
        .unwrap_or_else(|_| axum::http::HeaderValue::from_static("http://localhost:3001"));

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(600))
}

/// Initialize the `tracing` subscriber with an environment-based filter.
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pickup_api={log_level},tower_http=info,sea_orm=warn").into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

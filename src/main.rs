//! Marquee booking backend entry point.
//!
//! Loads configuration, wires adapters to ports, and serves the booking API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use marquee::adapters::auth::JwtSessionValidator;
use marquee::adapters::email::ResendReceiptNotifier;
use marquee::adapters::http::booking::{booking_routes, BookingAppState};
use marquee::adapters::http::middleware::{auth_middleware, AuthState};
use marquee::adapters::postgres::{PostgresBookingLedger, PostgresShowInventory};
use marquee::adapters::stripe::{StripeGatewayConfig, StripePaymentGateway};
use marquee::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let state = BookingAppState {
        inventory: Arc::new(PostgresShowInventory::new(pool.clone())),
        ledger: Arc::new(PostgresBookingLedger::new(pool)),
        gateway: Arc::new(StripePaymentGateway::new(StripeGatewayConfig::from(
            &config.payment,
        ))),
        notifier: Arc::new(ResendReceiptNotifier::new(config.email.clone())),
    };

    let validator: AuthState = Arc::new(JwtSessionValidator::new(&config.auth));

    let cors = {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        if origins.is_empty() {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(origins))
        }
    };

    let app = Router::new()
        .nest("/api/bookings", booking_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn_with_state(
            validator,
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "Marquee booking backend listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

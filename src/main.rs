//! Contest Maker - Application Entry Point
//!
//! This is the main entry point for the Contest Maker server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, middleware};
use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contest_maker::{
    catalog,
    config::CONFIG,
    constants::{MAX_REQUEST_BODY_BYTES, REQUEST_TIMEOUT_SECS},
    db::{
        self,
        repositories::{ContestRepository, ProblemPoolSource},
    },
    handlers, metrics,
    middleware::{logging_middleware, metrics_middleware},
    selection::{ContestSelector, RandomSource},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        environment = %CONFIG.server.environment,
        "Starting Contest Maker server..."
    );

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Seed the problem catalog on first start
    let entries = catalog::load(&CONFIG.catalog)?;
    let seeded = catalog::seed_if_empty(&db_pool, &entries).await?;
    if seeded > 0 {
        tracing::info!(problems = seeded, "Seeded problem catalog");
    } else {
        tracing::info!("Problem catalog already present");
    }

    // Metrics, with the running-contest gauge picked up from the database
    metrics::init_metrics()?;
    metrics::ACTIVE_CONTESTS.set(ContestRepository::count_active(&db_pool).await?);

    // Initialize Redis connection
    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    let selector = ContestSelector::new(
        Arc::new(ProblemPoolSource::new(db_pool.clone())),
        RandomSource::from_seed(CONFIG.selection.rng_seed),
        CONFIG.selection.fetch_timeout,
    );
    if CONFIG.selection.rng_seed.is_some() {
        tracing::warn!("Selection RNG is seeded; contests are reproducible");
    }

    // Create application state
    let state = AppState::new(db_pool, redis_conn, selector, CONFIG.clone());

    // Build the router
    let app = Router::new()
        .merge(handlers::health::routes())
        .merge(handlers::metrics::routes())
        .nest("/api", handlers::routes(state.clone()))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into());

    let registry = tracing_subscriber::registry().with(filter);

    if CONFIG.server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

//! Live Presenter server binary.

use std::error::Error;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use live_presenter::adapters::events::TracingEventPublisher;
use live_presenter::adapters::http::{router, AppState};
use live_presenter::adapters::memory::{InMemoryPollCatalog, InMemoryPresentationRepository};
use live_presenter::adapters::postgres::PostgresPresentationRepository;
use live_presenter::config::{AppConfig, DatabaseConfig, ServerConfig};
use live_presenter::ports::PresentationRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let repository: Arc<dyn PresentationRepository> = match &config.database {
        Some(database) => Arc::new(connect(database).await?),
        None => {
            info!("no database configured, keeping presentations in memory");
            Arc::new(InMemoryPresentationRepository::new())
        }
    };

    let polls = match &config.engine.poll_catalog_path {
        Some(path) => {
            let catalog = InMemoryPollCatalog::from_file(path).await?;
            info!(path = %path.display(), polls = catalog.len().await, "poll catalog loaded");
            catalog
        }
        None => InMemoryPollCatalog::new(),
    };

    let state = AppState::new(
        repository,
        Arc::new(polls),
        Arc::new(TracingEventPublisher::new()),
        config.engine.max_commit_attempts,
    );

    let request_id = HeaderName::from_static("x-request-id");
    let app = router(state, Arc::new(config.tenancy.clone()))
        .layer(cors(&config.server))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "live presenter listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn connect(database: &DatabaseConfig) -> Result<PostgresPresentationRepository, Box<dyn Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("database migrations applied");
    }

    Ok(PostgresPresentationRepository::new(pool))
}

fn cors(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

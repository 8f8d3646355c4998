//! Domain Workbench server binary.
//!
//! Loads configuration, wires the adapters behind the ports and serves the
//! HTTP API. Without a database URL the in-memory adapters are used.

use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_workbench::adapters::http::{api_router, DomainModelHandlers, ValidationHandlers};
use domain_workbench::adapters::memory::{
    InMemoryAccessGuard, InMemoryDomainModelStore, InMemoryFindingLedger,
};
use domain_workbench::adapters::postgres::{
    PostgresAccessGuard, PostgresDomainModelStore, PostgresFindingLedger,
};
use domain_workbench::config::{AppConfig, DatabaseConfig, ServerConfig};
use domain_workbench::domain::foundation::{ActorId, ProjectId};
use domain_workbench::ports::{AccessGuard, AuditLog, DomainModelStore, FindingLedger, ProjectRole};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The adapters every handler is built from.
struct Ports {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
    audit: Arc<dyn AuditLog>,
    ledger: Arc<dyn FindingLedger>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let ports = if let Some(url) = config.database.postgres_url() {
        postgres_ports(url, &config.database).await?
    } else {
        warn!("No database configured; using in-memory storage");
        memory_ports(&config.server)
    };

    let domain_model = DomainModelHandlers::new(
        ports.access.clone(),
        ports.store.clone(),
        ports.audit,
    );
    let validation = ValidationHandlers::new(
        ports.access,
        ports.store,
        ports.ledger,
        (&config.validation).into(),
    );

    let app = api_router(domain_model, validation)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Domain workbench listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Domain workbench stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn postgres_ports(
    url: &str,
    database: &DatabaseConfig,
) -> Result<Ports, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(url)
        .await?;

    if database.run_migrations {
        info!(migrations = MIGRATOR.iter().count(), "Applying database migrations");
        MIGRATOR.run(&pool).await?;
    }

    let store = Arc::new(PostgresDomainModelStore::new(pool.clone()));
    Ok(Ports {
        access: Arc::new(PostgresAccessGuard::new(pool.clone())),
        store: store.clone(),
        audit: store,
        ledger: Arc::new(PostgresFindingLedger::new(pool)),
    })
}

fn memory_ports(server: &ServerConfig) -> Ports {
    let mut guard = InMemoryAccessGuard::new();
    if let Some((project_id, actor_id)) = server.dev_membership() {
        info!(%project_id, %actor_id, "Seeding development editor membership");
        guard = guard.with_member(
            ProjectId::from_uuid(project_id),
            ActorId::from_uuid(actor_id),
            ProjectRole::Editor,
        );
    }

    let store = Arc::new(InMemoryDomainModelStore::new());
    Ports {
        access: Arc::new(guard),
        store: store.clone(),
        audit: store,
        ledger: Arc::new(InMemoryFindingLedger::new()),
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

use std::sync::Arc;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::domain::auth::ports::AuthServicePort;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::ports::UserServicePort;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::clock::SystemClock;
use identity_service::repositories::memory::InMemoryUserRepository;
use identity_service::repositories::postgres::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    init_logging(&config);

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Service starting"
    );

    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        token_ttl_hours = config.jwt.token_ttl_hours,
        lookup_timeout_ms = config.auth.lookup_timeout_ms,
        "Configuration loaded"
    );

    let (user_service, auth_service) = if config.uses_memory_store() {
        tracing::warn!(store = "memory", "Using in-memory user store; data is lost on exit");
        build_services(Arc::new(InMemoryUserRepository::new()), &config)
    } else {
        let pg_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        build_services(Arc::new(PostgresUserRepository::new(pg_pool)), &config)
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, auth_service, config.request_timeout());

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

fn build_services<UR>(
    repository: Arc<UR>,
    config: &Config,
) -> (Arc<dyn UserServicePort>, Arc<dyn AuthServicePort>)
where
    UR: UserRepository,
{
    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));

    let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(
        Arc::clone(&repository),
        config.lookup_timeout(),
    ));
    let auth_service: Arc<dyn AuthServicePort> = Arc::new(
        AuthService::new(repository, authenticator, Arc::new(SystemClock))
            .with_token_ttl(config.token_ttl())
            .with_lookup_timeout(config.lookup_timeout()),
    );

    (user_service, auth_service)
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_production() {
        "info"
    } else {
        "identity_service=debug,tower_http=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if config.is_production() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

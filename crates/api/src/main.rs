use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use forum_core::lifecycle::ForumService;
use forum_db::{DbPool, PgForumStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forum_api::config::ServerConfig;
use forum_api::router::build_app_router;
use forum_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "forum_api=debug,forum_core=info,forum_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        cors_origins = config.cors_origins.len(),
        "Loaded server configuration"
    );

    let pool = open_database(&config).await;

    let state = AppState {
        forum: ForumService::new(Arc::new(PgForumStore::new(pool.clone()))),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST and PORT must form a socket address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Forum API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// Human-readable logs by default; `LOG_FORMAT=json` switches to one JSON
/// object per line. `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, probe and migrate. Any failure here is fatal: the process must
/// not start serving without a working store.
async fn open_database(config: &ServerConfig) -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let connect_timeout = Duration::from_secs(config.db_connect_timeout_secs);

    let pool = forum_db::create_pool(&database_url, config.db_max_connections, connect_timeout)
        .await
        .expect("Failed to connect to database");

    match tokio::time::timeout(connect_timeout, forum_db::health_check(&pool)).await {
        Ok(Ok(())) => tracing::info!("Database reachable"),
        Ok(Err(e)) => panic!("Database health check failed: {e}"),
        Err(_) => panic!(
            "Database health check timed out after {}s",
            config.db_connect_timeout_secs
        ),
    }

    forum_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    pool
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        () = ctrl_c => tracing::info!("SIGINT received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}

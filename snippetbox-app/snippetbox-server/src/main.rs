use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use snippetbox_infrastructure::{
    create_pool, MySqlSessionStore, MySqlSnippetRepository, MySqlUserRepository,
};
use snippetbox_shared::config::Settings;
use snippetbox_shared::telemetry::init_telemetry;
use snippetbox_shared::utils::redact_database_url;
use snippetbox_shared::AppError;
use snippetbox_web::templates::TemplateCache;
use snippetbox_web::{build_router, AppState, SessionConfig, SessionManager};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize telemetry; the guard flushes the file writer on exit
    let _log_guard = init_telemetry(&settings.log)?;

    info!("{} starting...", settings.app.name);

    // Connect to Database
    info!(
        "Connecting to database at {}...",
        redact_database_url(&settings.database.url)
    );
    let pool = create_pool(&settings.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        AppError::DatabaseError(e.to_string())
    })?;
    info!("Database connection established.");

    // Session store, with a background sweep of expired rows
    let session_store = Arc::new(MySqlSessionStore::new(pool.clone()));
    let _cleanup = session_store.clone().spawn_cleanup(SESSION_CLEANUP_INTERVAL);
    let sessions = SessionManager::new(session_store, SessionConfig::from(&settings.session));

    // Create App State
    let state = AppState {
        snippets: Arc::new(MySqlSnippetRepository::new(pool.clone())),
        users: Arc::new(MySqlUserRepository::new(pool)),
        templates: Arc::new(TemplateCache::new()?),
        sessions: Arc::new(sessions),
    };

    // Build router
    let app = build_router(
        state,
        &settings.app.static_dir,
        settings.server.request_timeout(),
    );

    // Bind address
    let host: std::net::IpAddr = settings.server.host.parse()?;
    let addr = SocketAddr::from((host, settings.server.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

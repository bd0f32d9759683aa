use anyhow::{Context, Result};
use domain::services::{Capturer, SuggestionService};
use patrika_api::{
    app::{create_app, AppState},
    config::Config,
    jobs::{JobScheduler, PoolMetricsJob},
    middleware::{init_metrics, logging::init_logging},
    services::{
        bootstrap_admin, BootstrapOutcome, DisabledCapturer, DisabledSuggestionService,
        HttpCapturer, HttpSuggestionService,
    },
};
use persistence::{db, InvitationRepository, UserRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn suggestion_service(config: &Config) -> Result<Arc<dyn SuggestionService>> {
    if !config.suggestions.enabled {
        info!("AI suggestions disabled");
        return Ok(Arc::new(DisabledSuggestionService));
    }
    let service = HttpSuggestionService::new(&config.suggestions)
        .context("Failed to build suggestion client")?;
    Ok(Arc::new(service))
}

fn capturer(config: &Config) -> Result<Arc<dyn Capturer>> {
    if !config.export.enabled {
        info!("Card export disabled");
        return Ok(Arc::new(DisabledCapturer));
    }
    let capturer = HttpCapturer::new(&config.export).context("Failed to build rasterizer client")?;
    Ok(Arc::new(capturer))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(&config.logging);
    init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Patrika API v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::create_pool(&config.database.pool_settings())
        .await
        .context("Failed to connect to database")?;

    info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");

    let users = Arc::new(UserRepository::new(pool.clone()));
    let invitations = Arc::new(InvitationRepository::new(pool.clone()));

    match bootstrap_admin(users.as_ref(), &config.admin).await? {
        BootstrapOutcome::Created => info!("Administrator account bootstrapped"),
        BootstrapOutcome::AlreadyExists | BootstrapOutcome::NotConfigured => {}
    }

    let addr: SocketAddr = config.socket_addr()?;
    let state = AppState::new(
        config.clone(),
        Some(pool.clone()),
        invitations,
        users,
        suggestion_service(&config)?,
        capturer(&config)?,
    )?;
    let app = create_app(state);

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.start();

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown(Duration::from_secs(5)).await;
    Ok(())
}

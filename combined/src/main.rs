//! withaeng server binary
//!
//! Runs the HTTP gateway together with the verification mail scheduler,
//! applies migrations, or runs a single dispatch pass.
//!
//! Usage:
//!   withaeng serve              # Gateway and mail scheduler
//!   withaeng migrate up         # Run database migrations
//!   withaeng dispatch           # Send pending verification mails once

mod app;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service_lib::AuthServiceConfig;
use common::DatabaseConfig;
use gateway_lib::{AppState, GatewayConfig};
use mail_service_lib::{DispatchConfig, DispatchScheduler};
use user_service_lib::{run_migrations, Database, MigrateAction as DbMigrateAction};

use crate::app::{build_dispatcher, connect_cache, Services};

#[derive(Parser)]
#[command(name = "withaeng")]
#[command(about = "Travel companion backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway and the mail scheduler
    Serve {
        /// Host to bind to
        #[arg(long, env = "GATEWAY_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "GATEWAY_PORT")]
        port: Option<u16>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Send every pending verification mail once and exit
    Dispatch,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Run all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables and re-run migrations
    Fresh,
}

impl From<MigrateAction> for DbMigrateAction {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => DbMigrateAction::Up,
            MigrateAction::Down => DbMigrateAction::Down,
            MigrateAction::Status => DbMigrateAction::Status,
            MigrateAction::Fresh => DbMigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Migrate { action } => run_migrations(action.into()).await,
        Commands::Dispatch => dispatch().await,
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let database = Database::connect(&DatabaseConfig::from_env()).await?;
    let cache = connect_cache().await?;
    let services = Services::new(&database, &AuthServiceConfig::from_env()?);

    let dispatch_config = DispatchConfig::from_env();
    let dispatcher = build_dispatcher(
        services.verifications.clone(),
        cache.clone(),
        &dispatch_config,
    )?;
    let scheduler = DispatchScheduler::start(dispatcher, &dispatch_config.cron).await?;

    let host = config.host.clone();
    let port = config.port;
    let mut state = AppState::new(
        services.auth,
        services.users,
        services.accompanies,
        services.replies,
        config,
    )
    .with_database(database);
    if let Some(cache) = cache {
        state = state.with_cache(cache);
    }

    info!(host = %host, port, "Starting withaeng");
    let served = gateway_lib::serve(state, &host, port, shutdown_signal()).await;

    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Mail scheduler did not stop cleanly");
    }
    info!("Shutdown complete");
    Ok(served?)
}

async fn dispatch() -> Result<(), Box<dyn std::error::Error>> {
    let database = Database::connect(&DatabaseConfig::from_env()).await?;
    let cache = connect_cache().await?;
    let services = Services::new(&database, &AuthServiceConfig::from_env()?);

    let dispatcher = build_dispatcher(services.verifications, cache, &DispatchConfig::from_env())?;
    let report = dispatcher.run_once().await?;

    info!(
        snapshot = report.snapshot,
        sent = report.sent,
        failed = report.failed,
        marked = report.marked,
        skipped = report.skipped,
        lease_lost = report.lease_lost,
        "Dispatch finished"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

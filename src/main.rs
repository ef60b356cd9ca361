use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use job_board_api::{app, config::AppConfig, AppState};

#[derive(Parser)]
#[command(name = "job-board-api")]
#[command(about = "Job board backend: email subscriptions and job posts")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides JOB_BOARD_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Apply database migrations and exit")]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SEED, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "job_board_api=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config: AppConfig = job_board_api::config::config().clone();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.migrate_only {
        config.database.run_migrations = true;
    }
    tracing::info!("Starting Job Board API in {:?} mode", config.environment);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let (state, database) = AppState::from_config(config).await?;

    if cli.migrate_only {
        if database.is_none() {
            tracing::warn!("--migrate-only has no effect with the in-memory backend");
        }
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Job Board API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

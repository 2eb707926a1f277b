use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use trivia_api::db::{self, dump};
use trivia_api::server::app::run_server;
use trivia_api::settings::get_settings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve the HTTP API (default)
    Serve,
    /// Only run database migrations
    Migrate,
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = get_settings().context("Failed to load settings")?;

    let pool = db::establish_connection(
        settings.database.url.expose_secret(),
        settings.database.max_connections,
    )
    .await
    .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(pool, settings.application).await?,
        Commands::Migrate => {}
        Commands::Import { path } => dump::import_data(&pool, &path)
            .await
            .context("Cannot import")?,
        Commands::Export { path } => dump::export_data(&pool, &path)
            .await
            .context("Cannot export")?,
    };
    Ok(())
}

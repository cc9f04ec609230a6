use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use inventory_ledger::{cli, config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally

    let args = cli::Cli::parse();

    // 2. Load the application configuration
    let app_config = match config::load_app_configuration(args.config.as_deref()) {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("Critical error loading application configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // 3. Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&app_config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("Configuration loaded");

    // 4. Connect and ensure the schema exists
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(|| app_config.database_url.clone());
    let db = match config::database::connect(&database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 5. Run the command
    match cli::run(args.command, db, &app_config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

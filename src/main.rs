use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_catalog::config::Config;
use library_catalog::import::import_accession_csv;
use library_catalog::infrastructure::AppState;
use library_catalog::{db, server};

/// Value following `flag` on the command line
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

/// One-shot import of a register export; prints the summary
async fn run_import(state: &AppState, path: PathBuf) -> Result<(), String> {
    let content = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let importer = state.row_importer();
    let run = import_accession_csv(
        &content,
        &importer,
        state.book_repo.as_ref(),
        &state.import_settings,
    )
    .await
    .map_err(|e| format!("Import failed: {}", e))?;

    println!("{}", run.summary_message());
    for error in &run.errors {
        tracing::warn!("{}", error);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::from_env();

    // --profile overrides PROFILE for this process
    if let Some(profile) = arg_value(&args, "--profile") {
        config = Config::from_lookup(|key| {
            if key == "PROFILE" {
                Some(profile.clone())
            } else {
                std::env::var(key).ok()
            }
        });
    }

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    let state = AppState::with_import_settings(db, config.import_settings());

    if let Some(path) = arg_value(&args, "--import") {
        tracing::info!("Importing accession register from {}", path);
        if let Err(e) = run_import(&state, PathBuf::from(path)).await {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = server::run_server(state, config.port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

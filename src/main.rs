use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rov_draft::api::state::AppState;
use rov_draft::config::AppConfig;
use rov_draft::ingest;
use rov_draft::models::DraftGame;
use rov_draft::storage::{StorageConfig, Store};

#[derive(Parser)]
#[command(name = "rov-draft")]
#[command(about = "Arena of Valor draft recorder and analytics service")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print row counts of every table
    Counts,

    /// Seed heroes from a JSON array, skipping names already stored
    ImportHeroes {
        /// Path to the JSON file
        #[arg(long)]
        file: PathBuf,
    },
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn open_store(config: &AppConfig) -> Result<Store> {
    Store::open(StorageConfig::new(config.data_dir.clone()))
        .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.json_logs |= cli.json_logs;

    init_tracing(&config);
    tracing::info!("Starting rov-draft v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            if config.admin.password.is_none() {
                tracing::warn!("No admin password configured; write routes are open");
            }

            let store = open_store(&config)?;
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState {
                store: Arc::new(store),
                config: Arc::new(config),
            };
            let app = rov_draft::api::build_router(state);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Counts => {
            let store = open_store(&config)?;
            for (table, count) in store.table_counts()? {
                println!("{:<16} {}", table, count);
            }
            let games: Vec<DraftGame> = store.list()?;
            let decided = games.iter().filter(|g| g.winner.is_some()).count();
            println!("{:<16} {}", "decided games", decided);
        }
        Commands::ImportHeroes { file } => {
            let store = open_store(&config)?;
            let result = ingest::import_heroes_file(&store, &file)?;
            println!(
                "Imported {} hero(es), skipped {}",
                result.imported, result.skipped
            );
        }
    }

    Ok(())
}

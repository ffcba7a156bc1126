use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upgrade_tracker::api::state::AppState;
use upgrade_tracker::config::AppConfig;
use upgrade_tracker::fetch::SummaryClient;
use upgrade_tracker::models::CounterTable;
use upgrade_tracker::present;
use upgrade_tracker::storage::{StorageConfig, SummaryStore};
use upgrade_tracker::view::DashboardView;

#[derive(Parser)]
#[command(name = "upgrade-tracker")]
#[command(about = "Local item-upgrade statistics dashboard")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error; overrides config file)
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
        /// Bind address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write the built-in sample table into the store
    Seed {
        /// Overwrite an existing store file
        #[arg(long)]
        force: bool,
    },

    /// Fetch the summary from a running server and print the comparison
    Report {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if Path::new(&cli.config).exists() {
        AppConfig::from_file(&PathBuf::from(&cli.config))?
    } else {
        AppConfig::default()
    };

    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting upgrade-tracker v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                storage: Arc::new(StorageConfig::new(data_dir)),
                catalog: Arc::new(config.catalog.clone()),
            };
            let app = upgrade_tracker::api::build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Summary API: http://{}/api/summary", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Seed { force } => {
            let store = SummaryStore::new(&StorageConfig::new(data_dir));
            if store.exists() && !force {
                eprintln!("Store file already exists. Use --force to overwrite.");
                return Ok(());
            }

            let rows = SummaryStore::rows_from_table(&CounterTable::sample());
            let written = store.write_rows(&rows)?;
            println!("Seeded {} rows", written);
        }
        Commands::Report { url } => {
            let base_url = url::Url::parse(&url)?;
            let client = SummaryClient::new(base_url)?;

            let mut view = DashboardView::new(config.catalog.clone(), CounterTable::sample());
            view.install_summary(client.load_summary().await);

            if let Some(err) = view.fetch_error() {
                eprintln!("Summary fetch failed ({}); showing placeholder data.\n", err);
            }

            println!("=== Observed vs. listed rates ===");
            for item in &config.catalog.item_types {
                println!("\n{}", item);
                for (idx, label) in config.catalog.stage_labels.iter().enumerate() {
                    let series = view.donut_series(item, idx);
                    println!(
                        "  {}: {} success / {} fail — {}",
                        label,
                        series.observed[0],
                        series.observed[1],
                        view.rate_caption(item, idx)
                    );
                }
            }

            println!("\n=== Count report ===\n");
            println!("{}", present::render_report(view.server_counts(), &config.catalog));
        }
    }

    Ok(())
}

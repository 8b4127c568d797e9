use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budget_insights::cli::{render_report, run_report, ReportCommands};
use budget_insights::config::{Settings, STORE_URI_ENV};
use budget_insights::forecasting::TrendSeasonalModel;
use budget_insights::server::{self, AppState};
use budget_insights::storage::StoreHandle;

#[derive(Parser)]
#[command(
    name = "budget-insights",
    version,
    about = "Budget analysis and expense forecasting service",
    long_about = "budget-insights reads transactions from a document store, suggests a \
                  per-category budget, flags unusual spending and forecasts daily \
                  expenses. Without a subcommand it starts the HTTP server."
)]
struct Cli {
    /// Transaction store connection string (file://<path>, memory:// or a path)
    #[arg(long, global = true, env = STORE_URI_ENV)]
    store_uri: Option<String>,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    #[command(flatten)]
    Report(ReportCommands),

    /// Show effective settings and store status
    Config,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budget_insights=info,tower_http=info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so it can supply BUDGET_STORE_URI
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    let store = StoreHandle::from_uri(cli.store_uri.clone());

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            server::run(AppState::new(store, settings)).await?;
        }
        Commands::Report(cmd) => {
            let model = TrendSeasonalModel::new(settings.interval_width);
            let result = tokio::task::spawn_blocking(move || {
                render_report(run_report(&cmd, &store, &settings, &model))
            })
            .await??;

            let (output, ok) = result;
            println!("{}", output);
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Config => {
            let status = tokio::task::spawn_blocking(move || store.is_connected()).await?;
            let report = json!({
                "settings": settings,
                "store_uri": cli.store_uri,
                "store": if status { "connected" } else { "disconnected" },
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

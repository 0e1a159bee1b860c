use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tonalogy_gateway::config::{AppConfig, CliConfig, FileConfig};
use tonalogy_gateway::server::{run_server, RequestsLoggingLevel};
use tonalogy_gateway::store::Settings;
use tonalogy_gateway::{AnalysisBackend, BackendClient, JsonHistoryStore, JsonSettingsStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory where gateway state (history, settings) is stored.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// Path to a TOML config file. Its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3100)]
    pub port: u16,

    /// URL of the analysis backend service. Falls back to the
    /// TONALOGY_API_URL environment variable.
    #[clap(long)]
    pub backend_url: Option<String>,

    /// Timeout in seconds for backend requests.
    #[clap(long, default_value_t = 30)]
    pub backend_timeout_sec: u64,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        data_dir: cli_args.data_dir,
        port: cli_args.port,
        backend_url: cli_args.backend_url,
        backend_timeout_sec: cli_args.backend_timeout_sec,
        logging_level: cli_args.logging_level,
        frontend_dir_path: cli_args.frontend_dir_path,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening gateway stores in {:?}...", config.data_dir);
    let history = Arc::new(
        JsonHistoryStore::open(&config.history_store_path())
            .context("Failed to open history store")?,
    );
    let settings = Arc::new(
        JsonSettingsStore::open(
            &config.settings_store_path(),
            Settings::defaults(&config.backend_url),
        )
        .context("Failed to open settings store")?,
    );

    info!("Analysis backend configured at {}", config.backend_url);
    let backend: Arc<dyn AnalysisBackend> = Arc::new(BackendClient::new(
        config.backend_url.clone(),
        config.backend_timeout_sec,
    ));

    info!("Ready to serve at port {}!", config.port);
    run_server(
        backend,
        history,
        settings,
        config.logging_level,
        config.port,
        config.frontend_dir_path,
    )
    .await
}

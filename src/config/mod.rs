mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Environment variable that can supply the analysis backend base URL.
pub const BACKEND_URL_ENV: &str = "TONALOGY_API_URL";

/// Hardcoded fallback when neither config nor environment name a backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Storage keys for the persisted stores.
pub const HISTORY_STORAGE_KEY: &str = "tonalogy-history.json";
pub const SETTINGS_STORAGE_KEY: &str = "tonalogy-settings.json";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    pub backend_url: Option<String>,
    pub backend_timeout_sec: u64,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub backend_url: String,
    pub backend_timeout_sec: u64,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; the backend
    /// URL additionally falls back to `TONALOGY_API_URL` and then the
    /// hardcoded default.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        Self::resolve_with_env(cli, file_config, std::env::var(BACKEND_URL_ENV).ok())
    }

    fn resolve_with_env(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        env_backend_url: Option<String>,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_dir must be specified via --data-dir or in config file")
            })?;

        if !data_dir.exists() {
            bail!("Data directory does not exist: {:?}", data_dir);
        }
        if !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let backend_url = file
            .backend_url
            .or_else(|| cli.backend_url.clone())
            .or(env_backend_url)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let backend_timeout_sec = file.backend_timeout_sec.unwrap_or(cli.backend_timeout_sec);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        Ok(Self {
            data_dir,
            port,
            backend_url,
            backend_timeout_sec,
            logging_level,
            frontend_dir_path,
        })
    }

    pub fn history_store_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_STORAGE_KEY)
    }

    pub fn settings_store_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_STORAGE_KEY)
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    use clap::ValueEnum;
    RequestsLoggingLevel::from_str(s, true).ok()
}

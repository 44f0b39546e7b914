use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/sdg_finance.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// `tracing` level or full filter directive.
    pub log_level: String,
    pub log_file: String,
    pub session_file: String,
    pub request_timeout_secs: u64,
    /// Only read from the config file or `SDG_FINANCE_TOKEN`.
    pub token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            log_level: "info".to_string(),
            log_file: "sdg_finance.log".to_string(),
            session_file: crate::session::default_session_path().to_string(),
            request_timeout_secs: 15,
            token: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sdg_finance", version, about = "Terminal client for SDG Finance")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override log level (e.g. debug, or sdg_finance_tui=trace).
    #[arg(long)]
    log_level: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override session file path (the token is never read from CLI).
    #[arg(long)]
    session_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings = from_sources(config_path)?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(session_file) = args.session_file {
        settings.session_file = session_file;
    }

    Ok(settings)
}

/// Layers the optional TOML file under `SDG_FINANCE_*` environment variables.
pub fn from_sources(config_path: &str) -> Result<AppConfig> {
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SDG_FINANCE"));
    Ok(builder.build()?.try_deserialize()?)
}

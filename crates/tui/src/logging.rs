use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Installs the global subscriber. Output goes to the configured log file
/// because the terminal is owned by the UI.
pub fn init(config: &AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.log_file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(&config.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

/// A bare level applies to the workspace crates; anything else is used as a
/// full filter directive.
fn filter_for(level: &str) -> EnvFilter {
    let level = level.trim();
    let directive = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("sdg_finance_tui={level},engine={level},api_types={level}")
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_scopes_workspace_crates() {
        let filter = filter_for("debug").to_string();
        assert!(filter.contains("sdg_finance_tui=debug"));
        assert!(filter.contains("engine=debug"));
    }

    #[test]
    fn directives_pass_through() {
        let filter = filter_for("reqwest=trace").to_string();
        assert_eq!(filter, "reqwest=trace");
    }
}

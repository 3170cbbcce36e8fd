//! Process settings and automation-config loading.

use std::path::{Path, PathBuf};

use crate::automation::{AutomationConfig, validate};
use crate::error::Result;

/// Service settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port.
    pub port: u16,
    /// Path to the automation config JSON document, if configured.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        let port = std::env::var("FLOWWAVE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);
        let config_path = std::env::var("FLOWWAVE_CONFIG_PATH")
            .ok()
            .map(PathBuf::from);
        Self { port, config_path }
    }
}

/// Load and validate the automation configuration.
///
/// With no path configured, the built-in sample config is used. Validation is
/// fail-fast: a config with violations never reaches the matcher.
pub fn load_automation_config(path: Option<&Path>) -> Result<AutomationConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(crate::error::ConfigError::Io)?;
            serde_json::from_str::<AutomationConfig>(&raw)
                .map_err(crate::error::ConfigError::ParseError)?
        }
        None => AutomationConfig::sample(),
    };
    validate(&config)?;
    Ok(config)
}

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "kol-analytics.toml";
pub const ENV_PREFIX: &str = "KOL_";

/// Service configuration: defaults <- `kol-analytics.toml` <- `KOL_*` env vars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub host: String,
    pub port: u16,
    /// Structured JSON roster. Required: the service will not start without it.
    pub data_file: PathBuf,
    /// Spreadsheet (or CSV) used instead of `data_file` when `use_excel` is set.
    pub excel_file: Option<PathBuf>,
    pub use_excel: bool,
    /// Allowed browser origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "KOL Analytics API".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            data_file: PathBuf::from("data").join("kols.json"),
            excel_file: None,
            use_excel: false,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the working directory's config file (if any) and the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))
    }

    pub fn figment(config_file: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if config_file.exists() {
            figment = figment.merge(Toml::file(config_file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(AppError::ConfigError("data_file must not be empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(AppError::ConfigError("host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Alternate source to try, if one is configured.
    pub fn alternate_source(&self) -> Option<&Path> {
        self.excel_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

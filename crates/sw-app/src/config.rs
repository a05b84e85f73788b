//! Widget configuration, stored as YAML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sw_chart::ChartConfig;

use crate::error::{AppError, AppResult};

pub const CONFIG_ENV: &str = "SPENDWHEEL_CONFIG";
pub const STORE_DIR_ENV: &str = "SPENDWHEEL_STORE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub collection: String,
    pub store_dir: PathBuf,
    /// How often the desktop app re-reads the store for external edits.
    pub refresh_interval_ms: u64,
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collection: "expenses".to_string(),
            store_dir: PathBuf::from(".spendwheel"),
            refresh_interval_ms: 1000,
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        self.validate()?;
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| AppError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `SPENDWHEEL_CONFIG` if set, else defaults; then apply
    /// `SPENDWHEEL_STORE_DIR`.
    pub fn from_env_or_default() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> AppResult<Self> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        if let Some(dir) = lookup(STORE_DIR_ENV) {
            config.store_dir = dir;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn validate(&self) -> AppResult<()> {
        sw_store::validate_collection_name(&self.collection)
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.refresh_interval_ms == 0 {
            return Err(AppError::Config(
                "refresh_interval_ms must be positive".to_string(),
            ));
        }
        if self.store_dir.as_os_str().is_empty() {
            return Err(AppError::Config("store_dir is empty".to_string()));
        }
        self.chart
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

//! # Backend Configuration
//!
//! Settings live in `config.yaml` at the root of the data directory:
//!
//! ```yaml
//! week_boundary: calendar
//! currency_symbol: "$"
//! max_text_length: 256
//! chart_palette_size: 8
//! ```
//!
//! Every key is optional. A missing file means all defaults.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::chart_data::DEFAULT_PALETTE_SIZE;
use crate::domain::{SaleEntryConfig, WeekBoundary};

/// Name of the sale box inside the data directory
pub const SALES_BOX_NAME: &str = "sales";

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable that overrides the default data directory
pub const DATA_DIR_ENV: &str = "SALES_TRACKER_DATA_DIR";

const APP_DIRECTORY_NAME: &str = "Sales Tracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Where the box and config file live; never written to the file itself
    #[serde(skip)]
    pub data_directory: PathBuf,
    pub week_boundary: WeekBoundary,
    pub currency_symbol: String,
    pub max_text_length: usize,
    pub chart_palette_size: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let entry = SaleEntryConfig::default();
        Self {
            data_directory: default_data_directory(),
            week_boundary: WeekBoundary::default(),
            currency_symbol: entry.currency_symbol,
            max_text_length: entry.max_text_length,
            chart_palette_size: DEFAULT_PALETTE_SIZE,
        }
    }
}

impl BackendConfig {
    /// Load `config.yaml` from `data_directory`, falling back to defaults
    pub fn load<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let data_directory = data_directory.as_ref().to_path_buf();
        let config_path = data_directory.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: BackendConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Malformed config in {}", config_path.display()))?;
            debug!("Loaded backend config from {:?}", config_path);
            config
        } else {
            debug!("No config at {:?}, using defaults", config_path);
            BackendConfig::default()
        };

        config.data_directory = data_directory;
        Ok(config)
    }

    /// Load from the default data directory
    pub fn load_default() -> Result<Self> {
        Self::load(default_data_directory())
    }

    /// Write `config.yaml` into the data directory using a temp file and rename
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_directory).with_context(|| {
            format!(
                "Failed to create data directory {}",
                self.data_directory.display()
            )
        })?;

        let config_path = self.config_path();
        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = config_path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &config_path)
            .with_context(|| format!("Failed to replace {}", config_path.display()))?;

        info!("Saved backend config to {:?}", config_path);
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_directory.join(CONFIG_FILE_NAME)
    }

    pub fn entry_config(&self) -> SaleEntryConfig {
        SaleEntryConfig {
            currency_symbol: self.currency_symbol.clone(),
            max_text_length: self.max_text_length,
            ..SaleEntryConfig::default()
        }
    }
}

/// `$SALES_TRACKER_DATA_DIR`, else the platform data dir plus "Sales Tracker"
pub fn default_data_directory() -> PathBuf {
    let override_dir = std::env::var_os(DATA_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    resolve_data_directory(override_dir)
}

fn resolve_data_directory(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIRECTORY_NAME)
}

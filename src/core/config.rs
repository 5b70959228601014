use crate::core::transaction::Category;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

fn default_categories() -> Vec<Category> {
    vec![Category::Deposit, Category::Withdraw, Category::Refund]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Currency used when a summary is requested without one
    pub currency: String,
    pub ledger_path: String,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    #[serde(skip)]
    config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "finsum", "finsum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.config_dir = path.as_ref().parent().map(Path::to_path_buf);
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Ledger location, with relative paths taken from the config file's directory.
    pub fn ledger_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.ledger_path);
        match &self.config_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }
}

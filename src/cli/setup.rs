use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");
const EXAMPLE_LEDGER: &str = include_str!("../../docs/example_ledger.yaml");

/// Creates a default configuration file with example content at the default location
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Writes the example config to `path` and, unless one is already there, the
/// example ledger it points at.
///
/// An existing config is never overwritten.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;
    info!("Created default configuration at {}", path.display());

    let ledger_path = AppConfig::load_from_path(path)?.ledger_path();
    if ledger_path.exists() {
        info!("Keeping existing ledger at {}", ledger_path.display());
    } else {
        fs::write(&ledger_path, EXAMPLE_LEDGER).with_context(|| {
            format!("Failed to write ledger file to {}", ledger_path.display())
        })?;
        info!("Created example ledger at {}", ledger_path.display());
    }

    Ok(())
}

pub mod cli;
pub mod core;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{SummaryBuilder, User, Window};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Summary {
        user_id: u64,
        currency: Option<String>,
        window: Window,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finsum starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Summary {
            user_id,
            currency,
            window,
        } => {
            let ledger_path = config.ledger_path();
            let ledger = store::load_ledger(&ledger_path)?;
            if ledger.is_empty().await {
                warn!("Ledger {} has no transactions", ledger_path.display());
            } else {
                debug!("Summarizing over {} transactions", ledger.len().await);
            }
            let builder = SummaryBuilder::with_system_clock(Arc::new(ledger));
            let currency = currency.unwrap_or_else(|| config.currency.clone());

            cli::summary::run(
                &builder,
                &User::new(user_id),
                &currency,
                window,
                &config.categories,
            )
            .await
        }
    }
}

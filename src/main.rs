use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finsum::core::Window;
use finsum::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display deposit, withdraw and refund totals for a user
    Summary {
        /// User identifier
        #[arg(short, long)]
        user: u64,

        /// Currency code, defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,

        /// Lookback window: 1d, 7d, <N>d or lifetime
        #[arg(short, long, default_value = "lifetime")]
        window: Window,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => finsum::cli::setup::setup(),
        Some(Commands::Summary {
            user,
            currency,
            window,
        }) => {
            let command = finsum::AppCommand::Summary {
                user_id: user,
                currency,
                window,
            };
            finsum::run_command(command, cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

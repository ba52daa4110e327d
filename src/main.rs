use clap::Parser;
use pion_claim::cli::{Cli, Commands};
use pion_claim::config::AppConfig;
use pion_claim::error::{ClaimError, Result};
use pion_claim::logging::{init_logging, init_logging_simple};
use tracing::{info, warn};

mod main_modes;

fn load_config(dir: &str) -> Result<AppConfig> {
    let config = match AppConfig::load_from(dir) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config from {}: {}, using defaults", dir, e);
            AppConfig::default_config()
        }
    };

    if let Err(errors) = config.validate() {
        return Err(ClaimError::Validation(format!(
            "invalid configuration: {}",
            errors.join("; ")
        )));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Rewards { addresses } => {
            init_logging_simple();
            let config = load_config(&cli.config)?;
            main_modes::run_rewards(&config, addresses).await?;
        }
        Commands::Past { address } => {
            init_logging_simple();
            let config = load_config(&cli.config)?;
            main_modes::run_past(&config, address).await?;
        }
        Commands::Claim {
            keys,
            staking,
            dry_run,
        } => {
            let config = load_config(&cli.config)?;
            let _guard = init_logging(&config.logging);
            info!(
                "Starting claim for {} wallet(s) on chain {} (dry_run={})",
                keys.len(),
                config.chain.chain_id,
                dry_run
            );
            main_modes::run_claim(&config, keys, staking.as_deref(), *dry_run).await?;
        }
        Commands::VerifyPresale { staker, key } => {
            init_logging_simple();
            let config = load_config(&cli.config)?;
            main_modes::run_verify_presale(&config, staker, key).await?;
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pion-claim")]
#[command(version)]
#[command(about = "Aggregate rewards across wallets and claim them to one staking address", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory (default.toml plus $PION_ENV overrides)
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show aggregated rewards for a set of wallets
    Rewards {
        /// Wallet addresses (0x-prefixed)
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Show the past registration of a wallet, if any
    Past {
        /// Wallet address (0x-prefixed)
        address: String,
    },
    /// Verify every wallet and claim the consolidated reward
    Claim {
        /// Environment variable holding a wallet private key (repeatable)
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,
        /// Staking address receiving the reward (defaults to the first wallet)
        #[arg(short, long)]
        staking: Option<String>,
        /// Encode the claim call without sending a transaction
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify presale participation for a staker
    VerifyPresale {
        /// Staker address the presale address is linked to
        #[arg(long)]
        staker: String,
        /// Environment variable holding the presale address private key
        #[arg(short, long)]
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_claim_with_multiple_keys() {
        let cli = Cli::try_parse_from([
            "pion-claim",
            "claim",
            "--key",
            "WALLET_A_KEY",
            "--key",
            "WALLET_B_KEY",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Claim {
                keys,
                staking,
                dry_run,
            } => {
                assert_eq!(keys, vec!["WALLET_A_KEY", "WALLET_B_KEY"]);
                assert!(staking.is_none());
                assert!(dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.config, "config");
    }

    #[test]
    fn test_rewards_requires_an_address() {
        assert!(Cli::try_parse_from(["pion-claim", "rewards"]).is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pion-claim",
            "past",
            "0x0000000000000000000000000000000000000001",
            "--config",
            "/etc/pion",
        ])
        .unwrap();
        assert_eq!(cli.config, "/etc/pion");
    }
}

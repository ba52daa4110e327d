use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::WalletAddress;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub chain: ChainConfig,
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the reward service (e.g., "https://api.example.org/v1")
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Chain the reward contract is deployed on
    pub chain_id: u64,
    /// JSON-RPC endpoint used to send the claim transaction
    pub rpc_url: String,
    /// Reward contract address on `chain_id`
    pub reward_contract: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorConfig {
    /// Delay between obtaining a claim signature and clearing the working
    /// wallet set / staking address
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_settle_delay_ms() -> u64 {
    1_000
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl CoordinatorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rotating log files (stdout only when unset)
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("api.timeout_ms", 10_000)?
            .set_default("coordinator.settle_delay_ms", 1_000)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Environment-specific overrides (e.g., config/mainnet.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("PION_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // PION_API__BASE_URL, PION_CHAIN__RPC_URL, ...
            .add_source(
                Environment::with_prefix("PION")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Create a default configuration for CLI usage
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://alice-v2.muon.net/api".to_string(),
                timeout_ms: default_timeout_ms(),
            },
            chain: ChainConfig {
                chain_id: 97,
                rpc_url: "https://bsc-testnet-rpc.publicnode.com".to_string(),
                reward_contract: "0x0000000000000000000000000000000000000000".to_string(),
            },
            coordinator: CoordinatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = url::Url::parse(&self.api.base_url) {
            errors.push(format!("api.base_url is not a valid URL: {e}"));
        }

        if self.api.timeout_ms == 0 {
            errors.push("api.timeout_ms must be positive".to_string());
        }

        if let Err(e) = url::Url::parse(&self.chain.rpc_url) {
            errors.push(format!("chain.rpc_url is not a valid URL: {e}"));
        }

        if self.chain.chain_id == 0 {
            errors.push("chain.chain_id must be non-zero".to_string());
        }

        if WalletAddress::parse(&self.chain.reward_contract).is_err() {
            errors.push(format!(
                "chain.reward_contract is not an address: {}",
                self.chain.reward_contract
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

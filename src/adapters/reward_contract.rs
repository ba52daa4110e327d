//! Reward contract client
//!
//! Sends `claimReward(rewardAmount, signature)` from the connected wallet.
//! Signers are loaded locally from private keys and looked up by address.

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{info, warn};
use url::Url;
use zeroize::Zeroize;

use crate::config::ChainConfig;
use crate::domain::{to_base_units, WalletAddress};
use crate::error::{ClaimError, Result};
use crate::gateway::{ClaimRewardArgs, ClaimTransactor};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IReward {
        /// Pay out `rewardAmount` (18 decimals) authorised by the service signature
        function claimReward(uint256 rewardAmount, bytes signature) external;
    }
}

pub struct RewardContractClient {
    rpc_url: Url,
    contract: Address,
    chain_id: u64,
    signers: HashMap<WalletAddress, PrivateKeySigner>,
    dry_run: bool,
}

impl RewardContractClient {
    pub fn new(config: &ChainConfig, dry_run: bool) -> Result<Self> {
        let rpc_url = Url::parse(&config.rpc_url)
            .map_err(|e| ClaimError::AddressParsing(format!("Invalid RPC URL: {}", e)))?;
        let contract: Address = config.reward_contract.parse().map_err(|e| {
            ClaimError::AddressParsing(format!("Invalid reward contract address: {}", e))
        })?;

        Ok(Self {
            rpc_url,
            contract,
            chain_id: config.chain_id,
            signers: HashMap::new(),
            dry_run,
        })
    }

    /// Register a local key able to send claims. Returns its address.
    pub fn add_private_key(&mut self, private_key: &str) -> Result<WalletAddress> {
        let mut key = private_key.trim().to_string();
        let parsed = key.parse::<PrivateKeySigner>();
        key.zeroize();

        let signer =
            parsed.map_err(|e| ClaimError::Wallet(format!("Invalid private key: {}", e)))?;
        let address = WalletAddress::parse(&signer.address().to_string())?;
        self.signers.insert(address.clone(), signer);
        Ok(address)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn encode_call(args: &ClaimRewardArgs) -> Result<(U256, Bytes)> {
        let amount = U256::from(to_base_units(args.reward_amount)?);
        let signature = hex::decode(args.signature.trim_start_matches("0x"))
            .map_err(|e| ClaimError::Signature(format!("Invalid claim signature: {}", e)))?;
        Ok((amount, Bytes::from(signature)))
    }
}

#[async_trait]
impl ClaimTransactor for RewardContractClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn claim_reward(&self, args: &ClaimRewardArgs) -> Result<String> {
        let (amount, signature) = Self::encode_call(args)?;

        if self.dry_run {
            let calldata = IReward::claimRewardCall {
                rewardAmount: amount,
                signature,
            }
            .abi_encode();
            info!(
                "[dry-run] claimReward({}) from {} on {}",
                amount, args.connected_wallet, self.contract
            );
            return Ok(format!("0x{}", hex::encode(calldata)));
        }

        let signer = self.signers.get(&args.connected_wallet).cloned().ok_or_else(|| {
            ClaimError::Wallet(format!("No key loaded for {}", args.connected_wallet))
        })?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.rpc_url.clone());
        let contract = IReward::new(self.contract, provider);

        info!(
            "Calling claimReward({}) on {} from {}",
            amount, self.contract, args.connected_wallet
        );
        let pending = contract
            .claimReward(amount, signature)
            .send()
            .await
            .map_err(|e| ClaimError::Contract(format!("Claim tx failed: {}", e)))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ClaimError::Contract(format!("Tx confirmation failed: {}", e)))?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            warn!("Claim transaction {} reverted", tx_hash);
            return Err(ClaimError::Contract(format!("Claim tx {} reverted", tx_hash)));
        }
        Ok(tx_hash)
    }
}

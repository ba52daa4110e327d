use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::WalletAddress;
use crate::error::{ClaimError, Result};

/// Decimals of the reward token on chain
pub const REWARD_TOKEN_DECIMALS: u32 = 18;

/// Reward eligibility categories reported by the reward service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCategory {
    MuonPresale,
    DeusPresale,
    AliceOperator,
    EarlyAliceOperator,
}

impl RewardCategory {
    /// Iteration order used when building wallet lists
    pub const ALL: [RewardCategory; 4] = [
        RewardCategory::MuonPresale,
        RewardCategory::DeusPresale,
        RewardCategory::AliceOperator,
        RewardCategory::EarlyAliceOperator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MuonPresale => "muon_presale",
            Self::DeusPresale => "deus_presale",
            Self::AliceOperator => "alice_operator",
            Self::EarlyAliceOperator => "early_alice_operator",
        }
    }
}

impl fmt::Display for RewardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contributors and aggregate reward for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardSection {
    #[serde(default)]
    pub contributors: Vec<String>,
    #[serde(default)]
    pub reward: Decimal,
}

/// A wallet address paired with its (optional) verification signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletWithSignature {
    #[serde(rename = "walletAddress", alias = "wallet_address")]
    pub wallet_address: String,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Raw reward snapshot as returned by the reward service.
///
/// Fresh snapshots only carry the four sections. Past registrations also
/// carry the staking address, claim signature and the signed wallet list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRewards {
    #[serde(default)]
    pub muon_presale: RewardSection,
    #[serde(default)]
    pub deus_presale: RewardSection,
    #[serde(default)]
    pub alice_operator: RewardSection,
    #[serde(default)]
    pub early_alice_operator: RewardSection,
    /// Wallets that already went through a claim registration
    #[serde(default)]
    pub processed_wallets: Vec<String>,
    #[serde(default)]
    pub staking_address: Option<String>,
    #[serde(default, alias = "signature")]
    pub claim_signature: Option<String>,
    #[serde(default)]
    pub wallets: Vec<WalletWithSignature>,
}

impl RawRewards {
    pub fn section(&self, category: RewardCategory) -> &RewardSection {
        match category {
            RewardCategory::MuonPresale => &self.muon_presale,
            RewardCategory::DeusPresale => &self.deus_presale,
            RewardCategory::AliceOperator => &self.alice_operator,
            RewardCategory::EarlyAliceOperator => &self.early_alice_operator,
        }
    }

    pub fn is_processed(&self, address: &WalletAddress) -> bool {
        self.processed_wallets.iter().any(|w| address.matches(w))
    }
}

/// A wallet contributing to at least one reward category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardWallet {
    pub wallet_address: WalletAddress,
    pub signature: Option<String>,
    pub was_in_muon_presale: bool,
    pub was_in_deus_presale: bool,
    pub was_alice_operator: bool,
    pub was_early_alice_operator: bool,
    pub has_been_processed: bool,
}

impl RewardWallet {
    pub fn new(wallet_address: WalletAddress) -> Self {
        Self {
            wallet_address,
            signature: None,
            was_in_muon_presale: false,
            was_in_deus_presale: false,
            was_alice_operator: false,
            was_early_alice_operator: false,
            has_been_processed: false,
        }
    }

    pub fn flag(&self, category: RewardCategory) -> bool {
        match category {
            RewardCategory::MuonPresale => self.was_in_muon_presale,
            RewardCategory::DeusPresale => self.was_in_deus_presale,
            RewardCategory::AliceOperator => self.was_alice_operator,
            RewardCategory::EarlyAliceOperator => self.was_early_alice_operator,
        }
    }

    pub fn set_flag(&mut self, category: RewardCategory) {
        match category {
            RewardCategory::MuonPresale => self.was_in_muon_presale = true,
            RewardCategory::DeusPresale => self.was_in_deus_presale = true,
            RewardCategory::AliceOperator => self.was_alice_operator = true,
            RewardCategory::EarlyAliceOperator => self.was_early_alice_operator = true,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

/// Whether the connected wallet already has a claim registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlreadyRegisteredWallet {
    pub address: WalletAddress,
    pub is_already_registered: bool,
}

/// A registration from a previous session, claimable without re-verification
#[derive(Debug, Clone, PartialEq)]
pub struct PastClaim {
    pub staking_address: WalletAddress,
    pub claim_signature: String,
    pub wallets_with_signature: Vec<WalletWithSignature>,
    pub reward_wallets: Vec<RewardWallet>,
    pub total_reward: Decimal,
}

/// Scale a decimal token amount to integer base units.
pub fn to_base_units(amount: Decimal) -> Result<u128> {
    if amount.is_sign_negative() {
        return Err(ClaimError::Validation(format!(
            "reward amount is negative: {amount}"
        )));
    }
    let scaled = amount
        .checked_mul(Decimal::from(10u64.pow(REWARD_TOKEN_DECIMALS)))
        .ok_or_else(|| ClaimError::Validation(format!("reward amount overflows: {amount}")))?;

    if scaled.fract() != Decimal::ZERO {
        return Err(ClaimError::Validation(format!(
            "reward amount has more than {REWARD_TOKEN_DECIMALS} decimals: {amount}"
        )));
    }
    scaled
        .to_u128()
        .ok_or_else(|| ClaimError::Validation(format!("reward amount out of range: {amount}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_rewards_deserialize_partial_payload() {
        let json = r#"{
            "muon_presale": {"contributors": ["0xAbC0000000000000000000000000000000000001"], "reward": 100},
            "alice_operator": {"contributors": [], "reward": 0}
        }"#;
        let raw: RawRewards = serde_json::from_str(json).unwrap();
        assert_eq!(raw.muon_presale.reward, dec!(100));
        assert!(raw.deus_presale.contributors.is_empty());
        assert!(raw.staking_address.is_none());
        assert!(raw.wallets.is_empty());
    }

    #[test]
    fn test_is_processed_is_case_insensitive() {
        let raw = RawRewards {
            processed_wallets: vec!["0xABC0000000000000000000000000000000000001".into()],
            ..Default::default()
        };
        let addr = WalletAddress::parse("0xabc0000000000000000000000000000000000001").unwrap();
        assert!(raw.is_processed(&addr));
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(dec!(1)).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(to_base_units(dec!(0.5)).unwrap(), 500_000_000_000_000_000);
        assert_eq!(to_base_units(Decimal::ZERO).unwrap(), 0);
        assert!(to_base_units(dec!(-1)).is_err());
    }

    #[test]
    fn test_reward_wallet_flags() {
        let addr = WalletAddress::parse("0xabc0000000000000000000000000000000000001").unwrap();
        let mut wallet = RewardWallet::new(addr);
        wallet.set_flag(RewardCategory::DeusPresale);
        assert!(wallet.flag(RewardCategory::DeusPresale));
        assert!(!wallet.flag(RewardCategory::MuonPresale));
        assert!(!wallet.is_signed());
    }
}

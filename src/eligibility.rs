//! Eligibility aggregation
//!
//! Pure functions turning a raw reward snapshot and the signature registry
//! into the wallet list, total reward and registration status shown to the
//! user. Nothing here is cached; callers recompute on every input change.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{
    AlreadyRegisteredWallet, PastClaim, RawRewards, RewardCategory, RewardWallet, WalletAddress,
};
use crate::registry::SignatureRegistry;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Eligibility {
    pub eligible_addresses: Vec<RewardWallet>,
    pub total_rewards: Decimal,
    pub already_registered_wallet: Option<AlreadyRegisteredWallet>,
}

impl Eligibility {
    pub fn all_signed(&self) -> bool {
        self.eligible_addresses.iter().all(RewardWallet::is_signed)
    }

    pub fn unsigned(&self) -> impl Iterator<Item = &RewardWallet> {
        self.eligible_addresses.iter().filter(|w| !w.is_signed())
    }
}

/// Union of contributors across categories in first-seen order.
fn collect_wallets(raw: &RawRewards, include_processed: bool) -> Vec<RewardWallet> {
    let mut wallets: Vec<RewardWallet> = Vec::new();

    for category in RewardCategory::ALL {
        for contributor in &raw.section(category).contributors {
            let address = match WalletAddress::parse(contributor) {
                Ok(a) => a,
                Err(e) => {
                    warn!("Skipping {} contributor: {}", category, e);
                    continue;
                }
            };
            let processed = raw.is_processed(&address);
            if processed && !include_processed {
                continue;
            }

            let idx = match wallets.iter().position(|w| w.wallet_address == address) {
                Some(idx) => idx,
                None => {
                    let mut wallet = RewardWallet::new(address);
                    wallet.has_been_processed = processed;
                    wallets.push(wallet);
                    wallets.len() - 1
                }
            };
            wallets[idx].set_flag(category);
        }
    }

    wallets
}

/// Sum the rewards of every category at least one listed wallet contributes to.
fn sum_rewards(raw: &RawRewards, wallets: &[RewardWallet]) -> Decimal {
    RewardCategory::ALL
        .iter()
        .filter(|c| wallets.iter().any(|w| w.flag(**c)))
        .map(|c| raw.section(*c).reward)
        .sum()
}

/// Aggregate the current (in-progress) claim view.
pub fn aggregate(
    raw: Option<&RawRewards>,
    registry: &SignatureRegistry,
    connected: Option<&WalletAddress>,
) -> Eligibility {
    let Some(raw) = raw else {
        return Eligibility::default();
    };

    let mut eligible_addresses = collect_wallets(raw, false);
    for wallet in &mut eligible_addresses {
        wallet.signature = registry
            .signature_of(&wallet.wallet_address)
            .map(ToString::to_string);
    }

    let total_rewards = sum_rewards(raw, &eligible_addresses);

    let already_registered_wallet = connected.map(|address| AlreadyRegisteredWallet {
        address: address.clone(),
        is_already_registered: raw.is_processed(address),
    });

    Eligibility {
        eligible_addresses,
        total_rewards,
        already_registered_wallet,
    }
}

/// Derive the claimable record of a previous registration.
///
/// Returns `None` unless the snapshot carries both a parseable staking
/// address and a claim signature.
pub fn past_claim(raw: Option<&RawRewards>) -> Option<PastClaim> {
    let raw = raw?;
    let claim_signature = raw.claim_signature.clone().filter(|s| !s.is_empty())?;
    let staking_address = match raw.staking_address.as_deref().map(WalletAddress::parse) {
        Some(Ok(address)) => address,
        Some(Err(e)) => {
            warn!("Past registration has an invalid staking address: {}", e);
            return None;
        }
        None => return None,
    };

    let mut reward_wallets = collect_wallets(raw, true);
    for wallet in &mut reward_wallets {
        wallet.signature = raw
            .wallets
            .iter()
            .find(|w| wallet.wallet_address.matches(&w.wallet_address))
            .and_then(|w| w.signature.clone());
    }
    let total_reward = sum_rewards(raw, &reward_wallets);

    Some(PastClaim {
        staking_address,
        claim_signature,
        wallets_with_signature: raw.wallets.clone(),
        reward_wallets,
        total_reward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RewardSection, WalletWithSignature};
    use rust_decimal_macros::dec;

    fn addr(n: u8) -> WalletAddress {
        WalletAddress::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn section(contributors: &[WalletAddress], reward: Decimal) -> RewardSection {
        RewardSection {
            contributors: contributors.iter().map(|a| a.to_string().to_uppercase().replace("0X", "0x")).collect(),
            reward,
        }
    }

    #[test]
    fn test_no_snapshot_yields_empty_view() {
        let view = aggregate(None, &SignatureRegistry::new(), Some(&addr(1)));
        assert!(view.eligible_addresses.is_empty());
        assert_eq!(view.total_rewards, Decimal::ZERO);
        assert!(view.already_registered_wallet.is_none());
    }

    #[test]
    fn test_union_of_categories_with_flags() {
        let raw = RawRewards {
            muon_presale: section(&[addr(1), addr(2)], dec!(150)),
            alice_operator: section(&[addr(2), addr(3)], dec!(40)),
            ..Default::default()
        };

        let view = aggregate(Some(&raw), &SignatureRegistry::new(), None);
        let addresses: Vec<_> = view
            .eligible_addresses
            .iter()
            .map(|w| w.wallet_address.clone())
            .collect();
        assert_eq!(addresses, vec![addr(1), addr(2), addr(3)]);

        let second = &view.eligible_addresses[1];
        assert!(second.was_in_muon_presale);
        assert!(second.was_alice_operator);
        assert!(!second.was_in_deus_presale);
        assert_eq!(view.total_rewards, dec!(190));
    }

    #[test]
    fn test_signatures_merged_case_insensitively() {
        let raw = RawRewards {
            deus_presale: section(&[addr(10), addr(11)], dec!(5)),
            ..Default::default()
        };
        let mut registry = SignatureRegistry::new();
        registry.add(&addr(10), true);
        registry.set_signature(&addr(10), "0xsig10".into()).unwrap();

        let view = aggregate(Some(&raw), &registry, None);
        assert_eq!(view.eligible_addresses[0].signature.as_deref(), Some("0xsig10"));
        assert_eq!(view.eligible_addresses[1].signature, None);
        assert!(!view.all_signed());
        assert_eq!(view.unsigned().count(), 1);
    }

    #[test]
    fn test_processed_wallets_are_excluded() {
        let raw = RawRewards {
            muon_presale: section(&[addr(1)], dec!(100)),
            early_alice_operator: section(&[addr(2)], dec!(30)),
            processed_wallets: vec![addr(2).to_string()],
            ..Default::default()
        };

        let view = aggregate(Some(&raw), &SignatureRegistry::new(), Some(&addr(2)));
        assert_eq!(view.eligible_addresses.len(), 1);
        assert_eq!(view.total_rewards, dec!(100));
        assert_eq!(
            view.already_registered_wallet,
            Some(AlreadyRegisteredWallet {
                address: addr(2),
                is_already_registered: true,
            })
        );
    }

    #[test]
    fn test_invalid_contributor_is_skipped() {
        let raw = RawRewards {
            muon_presale: RewardSection {
                contributors: vec!["garbage".into(), addr(1).to_string()],
                reward: dec!(7),
            },
            ..Default::default()
        };
        let view = aggregate(Some(&raw), &SignatureRegistry::new(), None);
        assert_eq!(view.eligible_addresses.len(), 1);
    }

    #[test]
    fn test_past_claim_requires_signature_and_staking_address() {
        let mut raw = RawRewards {
            muon_presale: section(&[addr(1)], dec!(100)),
            staking_address: Some(addr(1).to_string()),
            ..Default::default()
        };
        assert!(past_claim(Some(&raw)).is_none());

        raw.claim_signature = Some("0xclaim".into());
        raw.processed_wallets = vec![addr(1).to_string()];
        raw.wallets = vec![WalletWithSignature {
            wallet_address: addr(1).to_string(),
            signature: Some("0xsig1".into()),
        }];

        let past = past_claim(Some(&raw)).unwrap();
        assert_eq!(past.staking_address, addr(1));
        assert_eq!(past.claim_signature, "0xclaim");
        assert_eq!(past.total_reward, dec!(100));
        assert!(past.reward_wallets[0].has_been_processed);
        assert_eq!(past.reward_wallets[0].signature.as_deref(), Some("0xsig1"));
    }
}

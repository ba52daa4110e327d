use pion_claim::adapters::{RewardApiClient, RewardContractClient};
use pion_claim::config::AppConfig;
use pion_claim::coordinator::{ClaimClick, ClaimCoordinator, ClaimModal, NoticeLevel};
use pion_claim::domain::{RewardCategory, RewardWallet, WalletAddress};
use pion_claim::eligibility;
use pion_claim::error::{ClaimError, Result};
use pion_claim::gateway::{RewardService, WalletSigner};
use pion_claim::presale::{PresaleStep, PresaleVerification};
use pion_claim::registry::SignatureRegistry;
use pion_claim::signing::LocalWalletSigner;
use std::sync::Arc;
use tracing::{info, warn};
use zeroize::Zeroize;

fn parse_addresses(raw: &[String]) -> Result<Vec<WalletAddress>> {
    raw.iter().map(|a| WalletAddress::parse(a)).collect()
}

fn print_wallets(wallets: &[RewardWallet]) {
    for wallet in wallets {
        let categories: Vec<&str> = RewardCategory::ALL
            .iter()
            .filter(|c| wallet.flag(**c))
            .map(|c| c.as_str())
            .collect();
        let status = match (&wallet.signature, wallet.has_been_processed) {
            (_, true) => "processed",
            (Some(_), false) => "verified",
            (None, false) => "unverified",
        };
        println!(
            "  {}  [{}]  {}",
            wallet.wallet_address,
            categories.join(", "),
            status
        );
    }
}

pub async fn run_rewards(config: &AppConfig, addresses: &[String]) -> Result<()> {
    let wallets = parse_addresses(addresses)?;
    let api = RewardApiClient::new(&config.api)?;

    let raw = api.get_rewards(&wallets).await?.into_result()?;
    let view = eligibility::aggregate(Some(&raw), &SignatureRegistry::new(), None);

    if view.eligible_addresses.is_empty() {
        println!("No eligible wallets among {} address(es)", wallets.len());
        return Ok(());
    }
    println!("Eligible wallets:");
    print_wallets(&view.eligible_addresses);
    println!("Total reward: {} ALICE", view.total_rewards);
    Ok(())
}

pub async fn run_past(config: &AppConfig, address: &str) -> Result<()> {
    let wallet = WalletAddress::parse(address)?;
    let api = RewardApiClient::new(&config.api)?;

    let response = api.get_claim_signature_from_past(&wallet).await?;
    if !response.success {
        println!(
            "No past registration for {}: {}",
            wallet,
            response.message.as_deref().unwrap_or("not found")
        );
        return Ok(());
    }

    match eligibility::past_claim(response.result.as_ref()) {
        Some(past) => {
            println!("Past registration for {}", wallet);
            println!("  Staking address: {}", past.staking_address);
            println!("  Reward: {} ALICE", past.total_reward);
            print_wallets(&past.reward_wallets);
        }
        None => println!("Past registration for {} is not claimable", wallet),
    }
    Ok(())
}

/// Read each key once and build both the message signer and the
/// transaction signer from it.
fn load_wallets(
    keys: &[String],
    contract: &mut RewardContractClient,
) -> Result<Vec<Arc<LocalWalletSigner>>> {
    let mut wallets = Vec::with_capacity(keys.len());
    for var in keys {
        let mut private_key = std::env::var(var)
            .map_err(|_| ClaimError::Wallet(format!("{} environment variable not set", var)))?;

        let signer = LocalWalletSigner::from_private_key(&private_key);
        let contract_address = contract.add_private_key(&private_key);
        private_key.zeroize();

        let signer = signer?;
        contract_address?;
        wallets.push(Arc::new(signer));
    }
    Ok(wallets)
}

pub async fn run_claim(
    config: &AppConfig,
    keys: &[String],
    staking: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let api = Arc::new(RewardApiClient::new(&config.api)?);
    let mut contract = RewardContractClient::new(&config.chain, dry_run)?;
    let wallets = load_wallets(keys, &mut contract)?;
    let staking = staking.map(WalletAddress::parse).transpose()?;

    let coordinator = ClaimCoordinator::new(api, Arc::new(contract), config.coordinator.clone());

    let mut notices = coordinator.subscribe();
    let notice_task = tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            match notice.level {
                NoticeLevel::Pending => println!("… {}", notice.message),
                NoticeLevel::Success => println!(
                    "✓ {} {}",
                    notice.message,
                    notice.tx_hash.unwrap_or_default()
                ),
                NoticeLevel::Error => println!("✗ {}", notice.message),
            }
        }
    });

    let result = drive_claim(&coordinator, &wallets, staking).await;
    notice_task.abort();

    let tx_hash = result?;
    if dry_run {
        println!("Dry run, claimReward calldata: {}", tx_hash);
    } else {
        println!("Claim transaction: {}", tx_hash);
    }
    Ok(())
}

async fn drive_claim(
    coordinator: &ClaimCoordinator,
    wallets: &[Arc<LocalWalletSigner>],
    staking: Option<WalletAddress>,
) -> Result<String> {
    let Some(first) = wallets.first() else {
        return Err(ClaimError::Validation("no wallet keys given".to_string()));
    };

    coordinator.wallet_connected(first.clone()).await;
    if coordinator.view().await.past_claim.is_some() {
        info!("{} has a past registration, claiming it directly", first.address());
        return match coordinator.claim_button_clicked().await? {
            ClaimClick::Submitted { tx_hash } => Ok(tx_hash),
            other => Err(ClaimError::Validation(format!(
                "past registration cannot be claimed from this wallet: {:?}",
                other
            ))),
        };
    }

    if let Some(staking) = staking {
        coordinator.select_staking_address(staking).await?;
    }

    for (i, wallet) in wallets.iter().enumerate() {
        if i > 0 {
            coordinator.wallet_switched(wallet.clone()).await;
        }
        let view = coordinator.view().await;
        let eligible = view
            .eligibility
            .eligible_addresses
            .iter()
            .any(|w| w.wallet_address == wallet.address());
        if !eligible {
            warn!("{} has no eligible rewards, skipping verification", wallet.address());
            continue;
        }
        coordinator.verify_wallet().await?;
        println!("Verified {}", wallet.address().short());
    }

    let view = coordinator.view().await;
    let staking = view
        .staking_address
        .ok_or_else(|| ClaimError::Validation("no staking address selected".to_string()))?;
    let staking_wallet = wallets
        .iter()
        .find(|w| w.address() == staking)
        .ok_or_else(|| {
            ClaimError::Wallet(format!("no key loaded for staking address {}", staking))
        })?;

    println!(
        "Claiming {} ALICE for {} wallet(s) to {}",
        view.eligibility.total_rewards,
        view.eligibility.eligible_addresses.len(),
        staking
    );

    coordinator.wallet_switched(staking_wallet.clone()).await;
    match coordinator.claim_rewards_clicked().await {
        ClaimModal::Confirm => coordinator.confirm_claim_clicked().await,
        other => Err(ClaimError::Validation(format!(
            "claim could not be confirmed ({:?})",
            other
        ))),
    }
}

pub async fn run_verify_presale(config: &AppConfig, staker: &str, key: &str) -> Result<()> {
    let staker = WalletAddress::parse(staker)?;
    let signer = LocalWalletSigner::from_env(key)?;
    let api = RewardApiClient::new(&config.api)?;

    let mut flow = PresaleVerification::new(staker);
    let step = flow.verify(&signer, &api).await?.clone();
    match step {
        PresaleStep::Verified => println!(
            "Congratulations! {} passed presale participants verification for {}",
            signer.address(),
            flow.staker()
        ),
        PresaleStep::Rejected { message } => println!("Verification failed: {}", message),
        PresaleStep::SelectAddress => println!("Verification did not complete"),
    }
    Ok(())
}

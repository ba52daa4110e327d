use async_trait::async_trait;
use pion_claim::config::CoordinatorConfig;
use pion_claim::coordinator::{verification_message, ClaimModal, ClaimPhase};
use pion_claim::gateway::{ApiResponse, ClaimRewardArgs, ClaimSignatureResult};
use pion_claim::{
    ClaimCoordinator, ClaimError, ClaimTransactor, LocalWalletSigner, RawRewards, Result,
    RewardService, WalletAddress, WalletSigner,
};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// Development keys, never funded on a real network
const KEY_A: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const KEY_B: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Reward service answering from a JSON snapshot in the wire format
struct JsonRewardService {
    snapshot: String,
    claim_requests: Mutex<Vec<(Vec<String>, Vec<WalletAddress>, WalletAddress)>>,
}

#[async_trait]
impl RewardService for JsonRewardService {
    async fn get_rewards(&self, _wallets: &[WalletAddress]) -> Result<ApiResponse<RawRewards>> {
        Ok(serde_json::from_str(&self.snapshot)?)
    }

    async fn get_claim_signature_from_past(
        &self,
        _wallet: &WalletAddress,
    ) -> Result<ApiResponse<RawRewards>> {
        Ok(serde_json::from_str(
            r#"{"success": false, "message": "not registered"}"#,
        )?)
    }

    async fn get_claim_signature(
        &self,
        signatures: &[String],
        addresses: &[WalletAddress],
        staking_address: &WalletAddress,
    ) -> Result<ApiResponse<ClaimSignatureResult>> {
        self.claim_requests.lock().unwrap().push((
            signatures.to_vec(),
            addresses.to_vec(),
            staking_address.clone(),
        ));
        Ok(ApiResponse::ok(ClaimSignatureResult {
            signature: "0xc1a1m".to_string(),
        }))
    }
}

#[derive(Default)]
struct RecordingTransactor {
    calls: Mutex<Vec<ClaimRewardArgs>>,
}

#[async_trait]
impl ClaimTransactor for RecordingTransactor {
    fn chain_id(&self) -> u64 {
        97
    }

    async fn claim_reward(&self, args: &ClaimRewardArgs) -> Result<String> {
        self.calls.lock().unwrap().push(args.clone());
        Ok("0xfeed".to_string())
    }
}

fn snapshot_for(a: &WalletAddress, b: &WalletAddress) -> String {
    format!(
        r#"{{
            "success": true,
            "result": {{
                "muon_presale": {{"contributors": ["{a}"], "reward": 100}},
                "deus_presale": {{"contributors": [], "reward": 0}},
                "alice_operator": {{"contributors": ["{b}"], "reward": "50"}},
                "early_alice_operator": {{"contributors": [], "reward": 0}}
            }}
        }}"#
    )
}

#[tokio::test]
async fn two_wallets_claim_to_first_wallet() {
    let wallet_a = Arc::new(LocalWalletSigner::from_private_key(KEY_A).unwrap());
    let wallet_b = Arc::new(LocalWalletSigner::from_private_key(KEY_B).unwrap());
    let (a, b) = (wallet_a.address(), wallet_b.address());

    let rewards = Arc::new(JsonRewardService {
        snapshot: snapshot_for(&a, &b),
        claim_requests: Mutex::new(Vec::new()),
    });
    let transactor = Arc::new(RecordingTransactor::default());
    let coordinator = ClaimCoordinator::new(
        rewards.clone(),
        transactor.clone(),
        CoordinatorConfig { settle_delay_ms: 0 },
    );

    coordinator.wallet_connected(wallet_a.clone()).await;
    coordinator.verify_wallet().await.unwrap();
    coordinator.wallet_switched(wallet_b.clone()).await;

    // B not verified yet
    let err = coordinator.request_consolidated_signature().await.unwrap_err();
    assert!(matches!(err, ClaimError::Validation(_)));

    coordinator.verify_wallet().await.unwrap();
    assert_eq!(coordinator.phase().await, ClaimPhase::ReadyForClaimSignature);

    // Staking wallet is A, so the confirm prompt cannot open from B
    assert_eq!(coordinator.claim_rewards_clicked().await, ClaimModal::SwitchWallet);
    coordinator.wallet_switched(wallet_a.clone()).await;
    assert_eq!(coordinator.modal().await, ClaimModal::Confirm);

    let tx_hash = coordinator.confirm_claim_clicked().await.unwrap();
    assert_eq!(tx_hash, "0xfeed");

    let requests = rewards.claim_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (signatures, addresses, staking) = &requests[0];
    assert_eq!(addresses, &vec![a.clone(), b.clone()]);
    assert_eq!(staking, &a);

    // Each signature is a real personal-sign over the staking message
    let message = verification_message(&a);
    let expected_a = wallet_a.sign_message(&message).await.unwrap();
    let expected_b = wallet_b.sign_message(&message).await.unwrap();
    assert_eq!(signatures, &vec![expected_a, expected_b]);

    let calls = transactor.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![ClaimRewardArgs {
            reward_amount: dec!(150),
            signature: "0xc1a1m".to_string(),
            connected_wallet: a.clone(),
            staking_address: a,
        }]
    );
    assert_eq!(coordinator.phase().await, ClaimPhase::Succeeded);
}

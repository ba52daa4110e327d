//! Claim coordinator
//!
//! Owns every piece of mutable claim state. Host events (wallet connected,
//! button clicked, timer fired) are explicit async methods; the state lock is
//! never held across a remote call, and each result is re-validated against
//! the state it lands in.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::state::{
    reconcile, ClaimModal, ClaimNotice, ClaimPhase, NoticeLevel, PendingClaim, StateTransition,
};
use crate::config::CoordinatorConfig;
use crate::domain::{PastClaim, RawRewards, WalletAddress};
use crate::eligibility::{self, Eligibility};
use crate::error::{ClaimError, Result};
use crate::gateway::{ClaimRewardArgs, ClaimTransactor, RewardService, WalletSigner};
use crate::registry::SignatureRegistry;

const NOTICE_CAPACITY: usize = 64;

/// Message each wallet signs to approve the staking address as destination
pub fn verification_message(staking_address: &WalletAddress) -> String {
    format!(
        "Please sign this message to confirm that you would like to use \"{}\" as your reward claim destination.",
        staking_address
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitOutcome {
    Succeeded,
    Failed,
}

/// Result of the main claim button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimClick {
    Submitted { tx_hash: String },
    SwitchWalletRequired,
    NothingToClaim,
}

/// Read-only copy of the coordinator state for the host UI
#[derive(Debug, Clone)]
pub struct ClaimView {
    pub connected_wallet: Option<WalletAddress>,
    pub staking_address: Option<WalletAddress>,
    pub claim_signature: Option<String>,
    pub pending_claim: Option<PendingClaim>,
    pub eligibility: Eligibility,
    pub past_claim: Option<PastClaim>,
    pub raw_rewards: Option<RawRewards>,
    pub tracked_wallets: Vec<WalletAddress>,
    pub modal: ClaimModal,
    pub phase: ClaimPhase,
    pub is_verifying: bool,
    pub is_requesting_signature: bool,
    pub is_submitting: bool,
    pub claim_enabled: bool,
    pub settle_deadline: Option<Instant>,
}

#[derive(Default)]
struct ClaimState {
    connected: Option<WalletAddress>,
    wallet: Option<Arc<dyn WalletSigner>>,
    registry: SignatureRegistry,
    staking_address: Option<WalletAddress>,
    raw_rewards: Option<RawRewards>,
    raw_rewards_from_past: Option<RawRewards>,
    claim_signature: Option<String>,
    pending_claim: Option<PendingClaim>,
    settle_deadline: Option<Instant>,
    modal: ClaimModal,
    is_verifying: bool,
    is_requesting_signature: bool,
    is_submitting: bool,
    outcome: Option<SubmitOutcome>,
    phase: ClaimPhase,
    last_transition: Option<StateTransition>,
}

impl ClaimState {
    fn eligibility(&self) -> Eligibility {
        eligibility::aggregate(
            self.raw_rewards.as_ref(),
            &self.registry,
            self.connected.as_ref(),
        )
    }

    fn past_claim(&self) -> Option<PastClaim> {
        eligibility::past_claim(self.raw_rewards_from_past.as_ref())
    }

    fn derive_phase(&self) -> ClaimPhase {
        if self.is_submitting {
            return ClaimPhase::Submitting;
        }
        match self.outcome {
            Some(SubmitOutcome::Succeeded) => return ClaimPhase::Succeeded,
            Some(SubmitOutcome::Failed) => return ClaimPhase::Failed,
            None => {}
        }
        if self.pending_claim.is_some() {
            return ClaimPhase::ClaimSignatureObtained;
        }

        let view = self.eligibility();
        if view.eligible_addresses.is_empty() {
            ClaimPhase::Idle
        } else if view.all_signed() && self.staking_address.is_some() {
            ClaimPhase::ReadyForClaimSignature
        } else {
            ClaimPhase::WalletsPendingSignature
        }
    }

    fn record_phase(&mut self, reason: &str) {
        let from = self.phase;
        let to = self.derive_phase();
        if from == to {
            return;
        }
        if !from.can_transition_to(to) {
            warn!("Unexpected claim phase transition {} -> {} ({})", from, to, reason);
        }
        let transition = StateTransition::new(from, to, reason);
        info!("Claim phase {} -> {}: {}", transition.from, transition.to, transition.reason);
        self.phase = to;
        self.last_transition = Some(transition);
    }

    /// The connected wallet becomes the staking address when the snapshot
    /// says it has no registration yet and nothing else is selected.
    fn auto_assign_staking(&mut self) {
        if self.staking_address.is_some() || self.claim_signature.is_some() {
            return;
        }
        let Some(registered) = self.eligibility().already_registered_wallet else {
            return;
        };
        if !registered.is_already_registered {
            info!("Using connected wallet {} as staking address", registered.address);
            self.staking_address = Some(registered.address);
        }
    }

    /// Where the claim goes: the selected staking address, or after settling
    /// the one captured with the claim signature.
    fn claim_destination(&self) -> Option<&WalletAddress> {
        self.staking_address
            .as_ref()
            .or(self.pending_claim.as_ref().map(|p| &p.staking_address))
    }

    fn reconcile_modal(&mut self) {
        let current = self.modal;
        let next = reconcile(self.connected.as_ref(), self.claim_destination(), current);
        if next != current {
            debug!("Prompt {:?} -> {:?}", current, next);
            self.modal = next;
        }
    }

    /// Re-derive everything that depends on connected wallet, staking
    /// address, registry or snapshot.
    fn after_change(&mut self, reason: &str) {
        if !self.is_submitting {
            self.outcome = None;
        }
        self.auto_assign_staking();
        self.reconcile_modal();
        self.record_phase(reason);
    }

    fn reset_session(&mut self) {
        self.registry.clear();
        self.staking_address = None;
        self.raw_rewards = None;
        self.raw_rewards_from_past = None;
        self.claim_signature = None;
        self.pending_claim = None;
        self.settle_deadline = None;
        self.modal = ClaimModal::None;
    }

    fn clear_after_success(&mut self) {
        self.staking_address = None;
        self.registry.clear();
        self.claim_signature = None;
        self.pending_claim = None;
        self.raw_rewards = None;
        self.settle_deadline = None;
    }

    fn claim_enabled(&self, past: bool, view: &Eligibility) -> bool {
        past || (!view.eligible_addresses.is_empty() && view.all_signed())
    }
}

/// Coordinates verification signatures, the consolidated claim signature and
/// the claim transaction for one user session.
pub struct ClaimCoordinator {
    rewards: Arc<dyn RewardService>,
    transactor: Arc<dyn ClaimTransactor>,
    config: CoordinatorConfig,
    state: RwLock<ClaimState>,
    notices: broadcast::Sender<ClaimNotice>,
}

impl ClaimCoordinator {
    pub fn new(
        rewards: Arc<dyn RewardService>,
        transactor: Arc<dyn ClaimTransactor>,
        config: CoordinatorConfig,
    ) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            rewards,
            transactor,
            config,
            state: RwLock::new(ClaimState::default()),
            notices,
        }
    }

    /// Receive success/error notifications (toasts)
    pub fn subscribe(&self) -> broadcast::Receiver<ClaimNotice> {
        self.notices.subscribe()
    }

    fn notify(&self, notice: ClaimNotice) {
        // No subscribers is fine
        let _ = self.notices.send(notice);
    }

    pub async fn view(&self) -> ClaimView {
        let state = self.state.read().await;
        let eligibility = state.eligibility();
        let past_claim = state.past_claim();
        let claim_enabled = state.claim_enabled(past_claim.is_some(), &eligibility);
        ClaimView {
            connected_wallet: state.connected.clone(),
            staking_address: state.staking_address.clone(),
            claim_signature: state.claim_signature.clone(),
            pending_claim: state.pending_claim.clone(),
            eligibility,
            past_claim,
            raw_rewards: state.raw_rewards.clone(),
            tracked_wallets: state.registry.addresses(),
            modal: state.modal,
            phase: state.phase,
            is_verifying: state.is_verifying,
            is_requesting_signature: state.is_requesting_signature,
            is_submitting: state.is_submitting,
            claim_enabled,
            settle_deadline: state.settle_deadline,
        }
    }

    pub async fn phase(&self) -> ClaimPhase {
        self.state.read().await.phase
    }

    pub async fn modal(&self) -> ClaimModal {
        self.state.read().await.modal
    }

    pub async fn last_transition(&self) -> Option<StateTransition> {
        self.state.read().await.last_transition.clone()
    }

    // ==================== Wallet connection ====================

    /// A wallet was connected or the provider switched accounts.
    pub async fn wallet_connected(&self, wallet: Arc<dyn WalletSigner>) {
        let address = wallet.address();
        {
            let mut state = self.state.write().await;
            state.connected = Some(address.clone());
            state.wallet = Some(wallet);
            state.after_change("wallet connected");
        }
        info!("Wallet connected: {}", address);

        match self.load_past_registration(&address).await {
            Ok(true) => debug!("Wallet {} has a past registration", address),
            Ok(false) => {
                let is_staking = {
                    let state = self.state.read().await;
                    state.staking_address.as_ref() == Some(&address)
                };
                if !is_staking {
                    self.register_wallet(&address).await;
                }
            }
            Err(e) => warn!("Past registration lookup failed for {}: {}", address, e),
        }

        if let Err(e) = self.refresh_rewards().await {
            warn!("Reward refresh failed: {}", e);
        }

        let mut state = self.state.write().await;
        state.after_change("rewards loaded");
    }

    /// Same as a fresh connection; wallet providers report both the same way.
    pub async fn wallet_switched(&self, wallet: Arc<dyn WalletSigner>) {
        self.wallet_connected(wallet).await;
    }

    /// Drops the whole session.
    pub async fn wallet_disconnected(&self) {
        let mut state = self.state.write().await;
        if let Some(address) = state.connected.take() {
            info!("Wallet disconnected: {}", address);
        }
        state.wallet = None;
        state.reset_session();
        state.after_change("wallet disconnected");
    }

    /// Look up a registration from a previous session.
    ///
    /// Returns whether the connected wallet has one.
    async fn load_past_registration(&self, address: &WalletAddress) -> Result<bool> {
        let response = self.rewards.get_claim_signature_from_past(address).await?;

        let mut state = self.state.write().await;
        if state.connected.as_ref() != Some(address) {
            debug!("Dropping past registration for {}: wallet changed", address);
            return Ok(false);
        }
        if response.success {
            state.raw_rewards_from_past = response.result;
        } else {
            state.raw_rewards_from_past = None;
        }
        Ok(response.success)
    }

    /// Fetch a fresh snapshot for the tracked wallets.
    ///
    /// Skipped while a claim signature is held, since the snapshot it was
    /// derived from must stay put. Returns whether a snapshot was applied.
    pub async fn refresh_rewards(&self) -> Result<bool> {
        let wallets = {
            let state = self.state.read().await;
            if state.connected.is_none() || state.claim_signature.is_some() {
                return Ok(false);
            }
            state.registry.addresses()
        };
        if wallets.is_empty() {
            let mut state = self.state.write().await;
            state.raw_rewards = None;
            state.after_change("no tracked wallets");
            return Ok(false);
        }

        let response = self.rewards.get_rewards(&wallets).await?;

        let mut state = self.state.write().await;
        if state.claim_signature.is_some() || state.registry.addresses() != wallets {
            debug!("Dropping stale reward snapshot for {} wallet(s)", wallets.len());
            return Ok(false);
        }
        if !response.success {
            warn!(
                "Reward service returned no snapshot: {}",
                response.message.as_deref().unwrap_or("no message")
            );
            return Ok(false);
        }
        state.raw_rewards = response.result;
        state.after_change("reward snapshot received");
        Ok(true)
    }

    // ==================== Wallet registry ====================

    /// Track a wallet for verification; returns whether it was added.
    pub async fn register_wallet(&self, address: &WalletAddress) -> bool {
        let added = {
            let mut state = self.state.write().await;
            let connected = state.connected.is_some();
            let added = state.registry.add(address, connected);
            if added {
                state.after_change("wallet registered");
            }
            added
        };
        if added {
            if let Err(e) = self.refresh_rewards().await {
                warn!("Reward refresh failed after registering {}: {}", address, e);
            }
        }
        added
    }

    /// Stop tracking a wallet. Its verification signature is discarded.
    pub async fn remove_wallet(&self, address: &WalletAddress) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let removed = state.registry.remove(address);
            if removed {
                info!("Removed wallet {}", address);
                state.after_change("wallet removed");
            }
            removed
        };
        if removed {
            if let Err(e) = self.refresh_rewards().await {
                warn!("Reward refresh failed after removing {}: {}", address, e);
            }
        }
        removed
    }

    /// Ask the connected wallet to sign the staking-address message.
    ///
    /// At most one request is outstanding. The signature is stored for the
    /// wallet that signed, if it is still tracked when the signature arrives.
    pub async fn verify_wallet(&self) -> Result<()> {
        let (wallet, staking) = {
            let mut state = self.state.write().await;
            if state.is_verifying {
                return Err(ClaimError::Validation(
                    "verification already in progress".to_string(),
                ));
            }
            let wallet = state
                .wallet
                .clone()
                .ok_or_else(|| ClaimError::Validation("no wallet connected".to_string()))?;
            let staking = state.staking_address.clone().ok_or_else(|| {
                ClaimError::Validation("no staking address selected".to_string())
            })?;
            state.is_verifying = true;
            (wallet, staking)
        };

        let address = wallet.address();
        let result = wallet.sign_message(&verification_message(&staking)).await;

        let mut state = self.state.write().await;
        state.is_verifying = false;
        match result {
            Ok(signature) => {
                if state.staking_address.as_ref() != Some(&staking) {
                    warn!("Discarding signature from {}: staking address changed", address);
                    return Ok(());
                }
                match state.registry.set_signature(&address, signature) {
                    Ok(()) => info!("Wallet {} verified", address),
                    Err(e) => warn!("Discarding signature: {}", e),
                }
                state.after_change("wallet verified");
                Ok(())
            }
            Err(e) => {
                warn!("Verification signature for {} failed: {}", address, e);
                Err(e)
            }
        }
    }

    // ==================== Staking address ====================

    /// Choose the claim destination.
    ///
    /// A different address invalidates the claim signature and every
    /// verification signature, since those attest to the old destination.
    pub async fn select_staking_address(&self, address: WalletAddress) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.is_submitting {
            return Err(ClaimError::Validation(
                "cannot change staking address while a claim is being submitted".to_string(),
            ));
        }
        if state.staking_address.as_ref() == Some(&address) {
            return Ok(false);
        }

        if state.claim_signature.take().is_some() {
            info!("Claim signature cleared: staking address changed");
        }
        state.pending_claim = None;
        state.settle_deadline = None;
        state.registry.clear_signatures();
        info!("Staking address set to {}", address);
        state.staking_address = Some(address);
        state.after_change("staking address selected");
        Ok(true)
    }

    // ==================== Claim signature ====================

    /// Exchange the verification signatures for a consolidated claim
    /// signature. Preconditions are checked before any remote call, and at
    /// most one request is outstanding.
    pub async fn request_consolidated_signature(&self) -> Result<String> {
        let (signatures, addresses, staking, total) = {
            let mut state = self.state.write().await;
            if state.is_submitting {
                return Err(ClaimError::Validation(
                    "claim submission in progress".to_string(),
                ));
            }
            if state.is_requesting_signature {
                return Err(ClaimError::Validation(
                    "claim signature already being requested".to_string(),
                ));
            }
            if state.connected.is_none() {
                return Err(ClaimError::Validation("no wallet connected".to_string()));
            }
            let staking = state.staking_address.clone().ok_or_else(|| {
                ClaimError::Validation("no staking address selected".to_string())
            })?;
            let view = state.eligibility();
            if view.eligible_addresses.is_empty() {
                return Err(ClaimError::Validation("no eligible wallets".to_string()));
            }
            if let Some(unsigned) = view.unsigned().next() {
                return Err(ClaimError::Validation(format!(
                    "wallet {} has not been verified",
                    unsigned.wallet_address
                )));
            }

            let mut signatures = Vec::with_capacity(view.eligible_addresses.len());
            let mut addresses = Vec::with_capacity(view.eligible_addresses.len());
            for wallet in view.eligible_addresses {
                signatures.push(wallet.signature.unwrap_or_default());
                addresses.push(wallet.wallet_address);
            }
            state.is_requesting_signature = true;
            (signatures, addresses, staking, view.total_rewards)
        };

        info!(
            "Requesting claim signature for {} wallet(s) -> {}",
            addresses.len(),
            staking
        );
        let result = self
            .fetch_claim_signature(&signatures, &addresses, &staking)
            .await;

        let mut state = self.state.write().await;
        state.is_requesting_signature = false;
        let claim_signature = result?;
        if state.staking_address.as_ref() != Some(&staking) {
            warn!("Discarding claim signature: staking address changed during request");
            return Err(ClaimError::Validation(
                "staking address changed while requesting claim signature".to_string(),
            ));
        }
        state.claim_signature = Some(claim_signature.clone());
        state.pending_claim = Some(PendingClaim {
            reward_amount: total,
            claim_signature: claim_signature.clone(),
            staking_address: staking,
        });
        state.settle_deadline = Some(Instant::now() + self.config.settle_delay());
        state.after_change("claim signature obtained");
        Ok(claim_signature)
    }

    async fn fetch_claim_signature(
        &self,
        signatures: &[String],
        addresses: &[WalletAddress],
        staking: &WalletAddress,
    ) -> Result<String> {
        let response = match self
            .rewards
            .get_claim_signature(signatures, addresses, staking)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Claim signature request failed: {}", e);
                self.notify(ClaimNotice::new(
                    NoticeLevel::Error,
                    "Could not reach the reward service",
                ));
                return Err(e);
            }
        };

        match response.into_result() {
            Ok(result) => Ok(result.signature),
            Err(e) => {
                warn!("Claim signature rejected: {}", e);
                if let ClaimError::RemoteRejection(message) = &e {
                    self.notify(ClaimNotice::new(NoticeLevel::Error, message.clone()));
                }
                Err(e)
            }
        }
    }

    /// When the working wallet set should be cleared, if a claim signature
    /// was obtained recently.
    pub async fn settle_deadline(&self) -> Option<Instant> {
        self.state.read().await.settle_deadline
    }

    /// Clear the tracked wallets and staking address after a claim signature
    /// was obtained. The pending claim keeps its own copy of the arguments.
    pub async fn settle(&self) {
        let mut state = self.state.write().await;
        if state.settle_deadline.take().is_none() {
            return;
        }
        debug!("Settling working state after claim signature");
        state.registry.clear();
        state.staking_address = None;
        state.modal = ClaimModal::None;
        state.after_change("settled");
    }

    /// Wait for the settle deadline and settle, unless it was cleared or
    /// replaced meanwhile.
    pub async fn settle_after_delay(&self) {
        let Some(deadline) = self.settle_deadline().await else {
            return;
        };
        tokio::time::sleep_until(deadline).await;
        if self.settle_deadline().await == Some(deadline) {
            self.settle().await;
        }
    }

    // ==================== Prompts & buttons ====================

    /// "Claim rewards" on the current flow: confirm if the staking wallet is
    /// connected, otherwise ask the user to switch back to it.
    pub async fn claim_rewards_clicked(&self) -> ClaimModal {
        let mut state = self.state.write().await;
        if state.past_claim().is_some() {
            return state.modal;
        }
        let Some(staking) = state.claim_destination().cloned() else {
            return state.modal;
        };
        let next = if state.connected.as_ref() == Some(&staking) {
            ClaimModal::Confirm
        } else {
            ClaimModal::SwitchWallet
        };
        state.modal = next;
        next
    }

    /// Confirm prompt accepted: obtain the claim signature, then send the
    /// claim right away.
    ///
    /// From any wallet but the staking wallet this only opens the
    /// switch-wallet prompt; the reward service is not called.
    pub async fn confirm_claim_clicked(&self) -> Result<String> {
        {
            let mut state = self.state.write().await;
            if let Some(staking) = state.staking_address.clone() {
                if state.connected.as_ref() != Some(&staking) {
                    state.modal = ClaimModal::SwitchWallet;
                    return Err(ClaimError::Validation(format!(
                        "switch back to staking wallet {}",
                        staking
                    )));
                }
            }
        }
        self.request_consolidated_signature().await?;
        self.submit_claim().await
    }

    /// Main claim button: a past registration takes precedence over the
    /// current flow.
    pub async fn claim_button_clicked(&self) -> Result<ClaimClick> {
        enum Route {
            Past,
            Current,
            Switch,
            Nothing,
        }

        let route = {
            let state = self.state.read().await;
            let connected = state.connected.as_ref();
            if let Some(past) = state.past_claim() {
                if connected == Some(&past.staking_address) {
                    Route::Past
                } else {
                    Route::Switch
                }
            } else {
                match state.claim_destination() {
                    Some(staking) if connected == Some(staking) => Route::Current,
                    Some(_) => Route::Switch,
                    None => Route::Nothing,
                }
            }
        };

        match route {
            Route::Past => Ok(ClaimClick::Submitted {
                tx_hash: self.submit_past_claim().await?,
            }),
            Route::Current => Ok(ClaimClick::Submitted {
                tx_hash: self.submit_claim().await?,
            }),
            Route::Switch => {
                self.open_switch_wallet_prompt().await;
                Ok(ClaimClick::SwitchWalletRequired)
            }
            Route::Nothing => Ok(ClaimClick::NothingToClaim),
        }
    }

    /// Claim a past registration without re-verification.
    pub async fn claim_past_rewards_clicked(&self) -> Result<String> {
        self.submit_past_claim().await
    }

    pub async fn open_switch_wallet_prompt(&self) {
        let mut state = self.state.write().await;
        state.modal = ClaimModal::SwitchWallet;
        state.reconcile_modal();
    }

    pub async fn close_switch_wallet_prompt(&self) {
        let mut state = self.state.write().await;
        if state.modal.is_switch_wallet_open() {
            state.modal = ClaimModal::None;
        }
    }

    pub async fn set_confirm_open(&self, open: bool) {
        let mut state = self.state.write().await;
        if open {
            state.modal = ClaimModal::Confirm;
            state.reconcile_modal();
        } else if state.modal.is_confirm_open() {
            state.modal = ClaimModal::None;
        }
    }

    // ==================== Submission ====================

    /// Send the claim captured with the last claim signature.
    ///
    /// The connected wallet must be the staking wallet; otherwise the
    /// switch-wallet prompt is opened and nothing is sent.
    pub async fn submit_claim(&self) -> Result<String> {
        let args = {
            let mut state = self.state.write().await;
            let pending = state.pending_claim.clone().ok_or_else(|| {
                ClaimError::Validation("no claim signature obtained".to_string())
            })?;
            let connected = state
                .connected
                .clone()
                .ok_or_else(|| ClaimError::Validation("no wallet connected".to_string()))?;
            if connected != pending.staking_address {
                state.modal = ClaimModal::SwitchWallet;
                return Err(ClaimError::Validation(format!(
                    "switch back to staking wallet {}",
                    pending.staking_address
                )));
            }
            ClaimRewardArgs {
                reward_amount: pending.reward_amount,
                signature: pending.claim_signature,
                connected_wallet: connected,
                staking_address: pending.staking_address,
            }
        };
        self.submit(args, false).await
    }

    /// Send the claim of a past registration.
    pub async fn submit_past_claim(&self) -> Result<String> {
        let args = {
            let state = self.state.read().await;
            let past = state.past_claim().ok_or_else(|| {
                ClaimError::Validation("no past registration to claim".to_string())
            })?;
            let connected = state
                .connected
                .clone()
                .ok_or_else(|| ClaimError::Validation("no wallet connected".to_string()))?;
            ClaimRewardArgs {
                reward_amount: past.total_reward,
                signature: past.claim_signature,
                connected_wallet: connected,
                staking_address: past.staking_address,
            }
        };
        self.submit(args, true).await
    }

    async fn submit(&self, args: ClaimRewardArgs, from_past: bool) -> Result<String> {
        {
            let mut state = self.state.write().await;
            if state.is_submitting {
                return Err(ClaimError::Validation(
                    "claim already being submitted".to_string(),
                ));
            }
            if state.modal.is_confirm_open() {
                state.modal = ClaimModal::None;
            }
            state.is_submitting = true;
            state.outcome = None;
            state.record_phase("claim submitted");
        }

        info!(
            "Claiming {} to {} from {} (chain {})",
            args.reward_amount,
            args.staking_address,
            args.connected_wallet,
            self.transactor.chain_id()
        );
        self.notify(ClaimNotice::new(
            NoticeLevel::Pending,
            "Waiting for confirmation",
        ));

        let result = self.transactor.claim_reward(&args).await;

        let mut state = self.state.write().await;
        state.is_submitting = false;
        match result {
            Ok(tx_hash) => {
                info!("Claim confirmed: {}", tx_hash);
                state.outcome = Some(SubmitOutcome::Succeeded);
                state.clear_after_success();
                if from_past {
                    state.raw_rewards_from_past = None;
                }
                state.record_phase("claim confirmed");
                self.notify(
                    ClaimNotice::new(NoticeLevel::Success, "You have claimed your Bonded ALICE.")
                        .with_tx_hash(tx_hash.clone()),
                );
                Ok(tx_hash)
            }
            Err(e) => {
                error!("Claim transaction failed: {}", e);
                state.outcome = Some(SubmitOutcome::Failed);
                state.record_phase("claim failed");
                self.notify(ClaimNotice::new(
                    NoticeLevel::Error,
                    format!("Claim failed: {}", e),
                ));
                Err(e)
            }
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::WalletAddress;

/// Claim flow phases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimPhase {
    /// Nothing to claim yet (no wallet, no snapshot, or no eligible wallet)
    #[default]
    Idle,
    /// Eligible wallets exist, at least one still unsigned
    WalletsPendingSignature,
    /// Every eligible wallet is signed and a staking address is selected
    ReadyForClaimSignature,
    /// Consolidated claim signature obtained, claim not yet sent
    ClaimSignatureObtained,
    /// Claim transaction outstanding
    Submitting,
    /// Last claim transaction confirmed
    Succeeded,
    /// Last claim transaction failed; arguments kept for retry
    Failed,
}

impl ClaimPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimPhase::Idle => "IDLE",
            ClaimPhase::WalletsPendingSignature => "WALLETS_PENDING_SIGNATURE",
            ClaimPhase::ReadyForClaimSignature => "READY_FOR_CLAIM_SIGNATURE",
            ClaimPhase::ClaimSignatureObtained => "CLAIM_SIGNATURE_OBTAINED",
            ClaimPhase::Submitting => "SUBMITTING",
            ClaimPhase::Succeeded => "SUCCEEDED",
            ClaimPhase::Failed => "FAILED",
        }
    }

    /// Check if this phase can transition to another phase
    pub fn can_transition_to(&self, target: ClaimPhase) -> bool {
        use ClaimPhase::*;

        if *self == target {
            return true;
        }

        match (self, target) {
            // Outcomes only come out of a submission
            (Submitting, Succeeded) | (Submitting, Failed) => true,
            (Submitting, _) => false,
            (_, Succeeded) | (_, Failed) => false,

            // Past registrations can be submitted from any resting phase
            (_, Submitting) => true,

            // Claim signature requires every wallet to be signed first
            (ReadyForClaimSignature, ClaimSignatureObtained) => true,
            (Failed, ClaimSignatureObtained) => true,
            (_, ClaimSignatureObtained) => false,

            // Wallet set / signature / snapshot changes move freely between
            // the data-driven phases
            (_, Idle) | (_, WalletsPendingSignature) | (_, ReadyForClaimSignature) => true,
        }
    }

    /// Is a claim transaction in flight?
    pub fn is_busy(&self) -> bool {
        matches!(self, ClaimPhase::Submitting)
    }

    /// Has this phase a claim signature waiting to be used?
    pub fn holds_claim_signature(&self) -> bool {
        matches!(
            self,
            ClaimPhase::ClaimSignatureObtained | ClaimPhase::Submitting | ClaimPhase::Failed
        )
    }
}

impl fmt::Display for ClaimPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ClaimPhase {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_uppercase().as_str() {
            "IDLE" => Ok(ClaimPhase::Idle),
            "WALLETS_PENDING_SIGNATURE" => Ok(ClaimPhase::WalletsPendingSignature),
            "READY_FOR_CLAIM_SIGNATURE" => Ok(ClaimPhase::ReadyForClaimSignature),
            "CLAIM_SIGNATURE_OBTAINED" => Ok(ClaimPhase::ClaimSignatureObtained),
            "SUBMITTING" => Ok(ClaimPhase::Submitting),
            "SUCCEEDED" => Ok(ClaimPhase::Succeeded),
            "FAILED" => Ok(ClaimPhase::Failed),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}

/// Phase transition event (for logging/debugging)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: ClaimPhase,
    pub to: ClaimPhase,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(from: ClaimPhase, to: ClaimPhase, reason: impl Into<String>) -> Self {
        Self {
            from,
            to,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Which prompt the host should display. A single value, so the confirm and
/// switch-wallet prompts can never be open together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimModal {
    #[default]
    None,
    Confirm,
    SwitchWallet,
}

impl ClaimModal {
    pub fn is_confirm_open(&self) -> bool {
        matches!(self, ClaimModal::Confirm)
    }

    pub fn is_switch_wallet_open(&self) -> bool {
        matches!(self, ClaimModal::SwitchWallet)
    }
}

/// Next prompt given the connected wallet and the staking address.
///
/// Confirm flips to switch-wallet as soon as the addresses diverge, and
/// switch-wallet flips back to confirm once they match again. Any other
/// prompt is left as is.
pub fn reconcile(
    connected: Option<&WalletAddress>,
    staking: Option<&WalletAddress>,
    current: ClaimModal,
) -> ClaimModal {
    let same = matches!((connected, staking), (Some(c), Some(s)) if c == s);

    match current {
        ClaimModal::SwitchWallet if same => ClaimModal::Confirm,
        ClaimModal::Confirm if !same => ClaimModal::SwitchWallet,
        other => other,
    }
}

/// The argument tuple captured when a claim signature is obtained
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClaim {
    pub reward_amount: Decimal,
    pub claim_signature: String,
    pub staking_address: WalletAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Pending,
    Success,
    Error,
}

/// User-facing notification (toast)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimNotice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
    pub tx_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ClaimNotice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            tx_hash: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }
}

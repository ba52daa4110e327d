use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{RawRewards, WalletAddress};
use crate::error::{ClaimError, Result};

/// Envelope used by every reward-service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "errorCode", alias = "error_code")]
    pub error_code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            message: None,
            error_code: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            message: Some(message.into()),
            error_code: None,
        }
    }

    /// Collapse the envelope, mapping `success: false` to `RemoteRejection`.
    pub fn into_result(self) -> Result<T> {
        match (self.success, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(ClaimError::RemoteRejection(
                "response marked success but carried no result".to_string(),
            )),
            (false, _) => Err(ClaimError::RemoteRejection(
                self.message
                    .or(self.error_code)
                    .unwrap_or_else(|| "request rejected".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSignatureResult {
    pub signature: String,
}

/// Arguments of one `claimReward` contract call
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRewardArgs {
    pub reward_amount: Decimal,
    pub signature: String,
    pub connected_wallet: WalletAddress,
    pub staking_address: WalletAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresaleVerificationResult {
    #[serde(default)]
    pub staker: Option<String>,
}

/// Reward service endpoints
#[async_trait]
pub trait RewardService: Send + Sync {
    async fn get_rewards(&self, wallets: &[WalletAddress]) -> Result<ApiResponse<RawRewards>>;

    async fn get_claim_signature_from_past(
        &self,
        wallet: &WalletAddress,
    ) -> Result<ApiResponse<RawRewards>>;

    async fn get_claim_signature(
        &self,
        signatures: &[String],
        addresses: &[WalletAddress],
        staking_address: &WalletAddress,
    ) -> Result<ApiResponse<ClaimSignatureResult>>;
}

/// The currently connected wallet's message-signing capability
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn address(&self) -> WalletAddress;

    /// Personal-sign `message`, returning a 0x-prefixed hex signature.
    async fn sign_message(&self, message: &str) -> Result<String>;
}

/// Sends the on-chain claim transaction
#[async_trait]
pub trait ClaimTransactor: Send + Sync {
    fn chain_id(&self) -> u64;

    /// Returns the transaction hash once the transaction is included.
    async fn claim_reward(&self, args: &ClaimRewardArgs) -> Result<String>;
}

/// Presale participation check
#[async_trait]
pub trait PresaleVerifier: Send + Sync {
    async fn verify_presale(
        &self,
        staker: &WalletAddress,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<ApiResponse<PresaleVerificationResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_carries_service_message() {
        let resp: ApiResponse<ClaimSignatureResult> =
            serde_json::from_str(r#"{"success": false, "message": "signature mismatch"}"#).unwrap();
        match resp.into_result() {
            Err(ClaimError::RemoteRejection(msg)) => assert_eq!(msg, "signature mismatch"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rejection_falls_back_to_error_code() {
        let resp: ApiResponse<PresaleVerificationResult> =
            serde_json::from_str(r#"{"success": false, "errorCode": "NOT_IN_PRESALE"}"#).unwrap();
        assert_eq!(resp.error_code.as_deref(), Some("NOT_IN_PRESALE"));
        assert!(matches!(
            resp.into_result(),
            Err(ClaimError::RemoteRejection(msg)) if msg == "NOT_IN_PRESALE"
        ));
    }

    #[test]
    fn test_envelope_without_result_decodes() {
        let resp: ApiResponse<PresaleVerificationResult> =
            serde_json::from_str(r#"{"success": false, "message": "no"}"#).unwrap();
        assert!(resp.result.is_none());
        assert!(resp.error_code.is_none());
    }

    #[test]
    fn test_success_without_result_is_rejected() {
        let resp: ApiResponse<ClaimSignatureResult> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.into_result().is_err());
    }
}

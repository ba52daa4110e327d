//! Reward service REST client
//!
//! Every endpoint answers with the `{success, result, message}` envelope.
//! Non-2xx responses that still carry an envelope are surfaced as that
//! envelope; anything else becomes a `RemoteRejection`.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::domain::{RawRewards, WalletAddress};
use crate::error::{ClaimError, Result};
use crate::gateway::{
    ApiResponse, ClaimSignatureResult, PresaleVerificationResult, PresaleVerifier, RewardService,
};

#[derive(Serialize)]
struct RewardsRequest<'a> {
    wallets: &'a [WalletAddress],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimSignatureRequest<'a> {
    signatures: &'a [String],
    addresses: &'a [WalletAddress],
    staking_address: &'a WalletAddress,
}

#[derive(Serialize)]
struct PresaleRequest<'a> {
    staker: &'a WalletAddress,
    address: &'a WalletAddress,
    signature: &'a str,
}

#[derive(Clone)]
pub struct RewardApiClient {
    http: Client,
    base_url: String,
}

impl RewardApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("pion-claim/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!("{} {} -> {}", method, path, status);

        decode_response(status, &text)
    }
}

/// Decode an envelope, tolerating error statuses that still carry one.
fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<ApiResponse<T>> {
    if status.is_success() {
        return Ok(serde_json::from_str(text)?);
    }

    match serde_json::from_str::<ApiResponse<T>>(text) {
        Ok(envelope) => {
            warn!("Reward service returned {} with envelope", status);
            Ok(envelope)
        }
        Err(_) => Err(ClaimError::RemoteRejection(format!(
            "HTTP {}: {}",
            status,
            text.trim()
        ))),
    }
}

#[async_trait]
impl RewardService for RewardApiClient {
    async fn get_rewards(&self, wallets: &[WalletAddress]) -> Result<ApiResponse<RawRewards>> {
        self.request(Method::POST, "/rewards", Some(&RewardsRequest { wallets }))
            .await
    }

    async fn get_claim_signature_from_past(
        &self,
        wallet: &WalletAddress,
    ) -> Result<ApiResponse<RawRewards>> {
        self.request::<(), _>(Method::GET, &format!("/rewards/past/{}", wallet), None)
            .await
    }

    async fn get_claim_signature(
        &self,
        signatures: &[String],
        addresses: &[WalletAddress],
        staking_address: &WalletAddress,
    ) -> Result<ApiResponse<ClaimSignatureResult>> {
        let body = ClaimSignatureRequest {
            signatures,
            addresses,
            staking_address,
        };
        self.request(Method::POST, "/rewards/claim-signature", Some(&body))
            .await
    }
}

#[async_trait]
impl PresaleVerifier for RewardApiClient {
    async fn verify_presale(
        &self,
        staker: &WalletAddress,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<ApiResponse<PresaleVerificationResult>> {
        let body = PresaleRequest {
            staker,
            address,
            signature,
        };
        self.request(Method::POST, "/verification/presale", Some(&body))
            .await
    }
}

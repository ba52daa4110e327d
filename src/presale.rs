//! Presale participation verification
//!
//! A presale address proves ownership by signing a fixed message; the
//! reward service then links it to the staker. The flow is a three-step
//! machine: select and sign, then either verified or rejected with a reason.

use std::fmt;
use tracing::{info, warn};

use crate::domain::WalletAddress;
use crate::error::{ClaimError, Result};
use crate::gateway::{PresaleVerifier, WalletSigner};

pub const PRESALE_MESSAGE: &str =
    "Please sign this message to verify ownership of your Ethereum address to verify its uniqueness for Muon.";

/// Error codes returned by the verification endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresaleErrorCode {
    InvalidSignature,
    NotInPresale,
    AddressAlreadyUsed,
    StakerAlreadyVerified,
    InvalidStaker,
    Unknown(String),
}

impl PresaleErrorCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalidSignature" | "INVALID_SIGNATURE" => Self::InvalidSignature,
            "notInPresale" | "NOT_IN_PRESALE" => Self::NotInPresale,
            "addressAlreadyUsed" | "ADDRESS_ALREADY_USED" => Self::AddressAlreadyUsed,
            "stakerAlreadyVerified" | "STAKER_ALREADY_VERIFIED" => Self::StakerAlreadyVerified,
            "invalidStaker" | "INVALID_STAKER" => Self::InvalidStaker,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Human-readable reason for the verification `kind` (e.g. "presale").
    pub fn message(&self, kind: &str) -> String {
        match self {
            Self::InvalidSignature => {
                format!("The signature could not be verified. Please try the {} verification again.", kind)
            }
            Self::NotInPresale => format!(
                "This address did not take part in the {}. Select the address you used for the {}.",
                kind, kind
            ),
            Self::AddressAlreadyUsed => format!(
                "This address has already been used for {} verification by another staker.",
                kind
            ),
            Self::StakerAlreadyVerified => {
                format!("This staker has already passed {} verification.", kind)
            }
            Self::InvalidStaker => "The staker address is not valid.".to_string(),
            Self::Unknown(_) => format!("{} verification failed. Please try again later.", capitalize(kind)),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresaleStep {
    /// Step 1: pick the presale address and sign
    SelectAddress,
    /// Step 2: verification passed
    Verified,
    /// Step 3: verification refused
    Rejected { message: String },
}

impl fmt::Display for PresaleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresaleStep::SelectAddress => write!(f, "SELECT_ADDRESS"),
            PresaleStep::Verified => write!(f, "VERIFIED"),
            PresaleStep::Rejected { .. } => write!(f, "REJECTED"),
        }
    }
}

#[derive(Debug)]
pub struct PresaleVerification {
    staker: WalletAddress,
    step: PresaleStep,
    is_loading: bool,
}

impl PresaleVerification {
    pub fn new(staker: WalletAddress) -> Self {
        Self {
            staker,
            step: PresaleStep::SelectAddress,
            is_loading: false,
        }
    }

    pub fn staker(&self) -> &WalletAddress {
        &self.staker
    }

    pub fn step(&self) -> &PresaleStep {
        &self.step
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// "Try another address": back to step 1.
    pub fn retry(&mut self) {
        self.step = PresaleStep::SelectAddress;
    }

    /// Sign the presale message with `signer` and submit it.
    ///
    /// A signing failure leaves the flow on step 1 and is returned as an
    /// error. Every answer from the service, and a failed request, moves the
    /// flow to step 2 or 3.
    pub async fn verify(
        &mut self,
        signer: &dyn WalletSigner,
        verifier: &dyn PresaleVerifier,
    ) -> Result<&PresaleStep> {
        if self.is_loading {
            return Err(ClaimError::Validation(
                "presale verification already in progress".to_string(),
            ));
        }
        if self.step != PresaleStep::SelectAddress {
            return Err(ClaimError::Validation(format!(
                "presale verification is {}; select an address first",
                self.step
            )));
        }

        self.is_loading = true;
        let address = signer.address();
        let signature = match signer.sign_message(PRESALE_MESSAGE).await {
            Ok(signature) => signature,
            Err(e) => {
                self.is_loading = false;
                warn!("Presale signature for {} failed: {}", address, e);
                return Err(e);
            }
        };

        let outcome = verifier
            .verify_presale(&self.staker, &address, &signature)
            .await;
        self.is_loading = false;

        self.step = match outcome {
            Ok(resp) if resp.success => {
                info!("Presale address {} verified for {}", address, self.staker);
                PresaleStep::Verified
            }
            Ok(resp) => {
                let code = resp.error_code.unwrap_or_default();
                warn!("Presale verification of {} rejected: {}", address, code);
                PresaleStep::Rejected {
                    message: PresaleErrorCode::from_code(&code).message("presale"),
                }
            }
            Err(e) => {
                warn!("Presale verification request failed: {}", e);
                PresaleStep::Rejected {
                    message: PresaleErrorCode::Unknown(String::new()).message("presale"),
                }
            }
        };
        Ok(&self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ApiResponse, PresaleVerificationResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn addr(n: u8) -> WalletAddress {
        WalletAddress::parse(&format!("0x{:040x}", n)).unwrap()
    }

    struct StaticSigner {
        address: WalletAddress,
        messages: Mutex<Vec<String>>,
        fail: bool,
    }

    impl StaticSigner {
        fn new(n: u8, fail: bool) -> Self {
            Self {
                address: addr(n),
                messages: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl WalletSigner for StaticSigner {
        fn address(&self) -> WalletAddress {
            self.address.clone()
        }

        async fn sign_message(&self, message: &str) -> Result<String> {
            self.messages.lock().unwrap().push(message.to_string());
            if self.fail {
                return Err(ClaimError::Signature("user rejected".to_string()));
            }
            Ok("0xsigned".to_string())
        }
    }

    enum Answer {
        Accept,
        Reject(&'static str),
        Unreachable,
    }

    struct ScriptedVerifier {
        answer: Answer,
        calls: Mutex<Vec<(WalletAddress, WalletAddress, String)>>,
    }

    impl ScriptedVerifier {
        fn new(answer: Answer) -> Self {
            Self {
                answer,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PresaleVerifier for ScriptedVerifier {
        async fn verify_presale(
            &self,
            staker: &WalletAddress,
            address: &WalletAddress,
            signature: &str,
        ) -> Result<ApiResponse<PresaleVerificationResult>> {
            self.calls.lock().unwrap().push((
                staker.clone(),
                address.clone(),
                signature.to_string(),
            ));
            match self.answer {
                Answer::Accept => Ok(ApiResponse::ok(PresaleVerificationResult {
                    staker: Some(staker.to_string()),
                })),
                Answer::Reject(code) => {
                    let mut resp = ApiResponse::rejected("rejected");
                    resp.error_code = Some(code.to_string());
                    Ok(resp)
                }
                Answer::Unreachable => Err(ClaimError::RemoteRejection("HTTP 503".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_verified_on_success() {
        let signer = StaticSigner::new(2, false);
        let verifier = ScriptedVerifier::new(Answer::Accept);
        let mut flow = PresaleVerification::new(addr(1));

        let step = flow.verify(&signer, &verifier).await.unwrap();
        assert_eq!(step, &PresaleStep::Verified);
        assert!(!flow.is_loading());
        assert_eq!(signer.messages.lock().unwrap()[0], PRESALE_MESSAGE);
        assert_eq!(
            verifier.calls.lock().unwrap()[0],
            (addr(1), addr(2), "0xsigned".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejection_maps_error_code_and_retry_resets() {
        let signer = StaticSigner::new(2, false);
        let verifier = ScriptedVerifier::new(Answer::Reject("notInPresale"));
        let mut flow = PresaleVerification::new(addr(1));

        flow.verify(&signer, &verifier).await.unwrap();
        match flow.step() {
            PresaleStep::Rejected { message } => assert!(message.contains("did not take part")),
            other => panic!("unexpected step {:?}", other),
        }

        // A second attempt needs "try another address" first
        assert!(flow.verify(&signer, &verifier).await.is_err());
        flow.retry();
        assert_eq!(flow.step(), &PresaleStep::SelectAddress);
    }

    #[tokio::test]
    async fn test_transport_failure_is_rejected() {
        let signer = StaticSigner::new(2, false);
        let verifier = ScriptedVerifier::new(Answer::Unreachable);
        let mut flow = PresaleVerification::new(addr(1));

        let step = flow.verify(&signer, &verifier).await.unwrap();
        assert!(matches!(step, PresaleStep::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_signing_failure_stays_on_first_step() {
        let signer = StaticSigner::new(2, true);
        let verifier = ScriptedVerifier::new(Answer::Accept);
        let mut flow = PresaleVerification::new(addr(1));

        assert!(flow.verify(&signer, &verifier).await.is_err());
        assert_eq!(flow.step(), &PresaleStep::SelectAddress);
        assert!(!flow.is_loading());
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_code_gets_generic_message() {
        let code = PresaleErrorCode::from_code("somethingNew");
        assert_eq!(code, PresaleErrorCode::Unknown("somethingNew".to_string()));
        assert_eq!(
            code.message("presale"),
            "Presale verification failed. Please try again later."
        );
    }
}

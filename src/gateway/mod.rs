//! Capabilities the claim flow consumes: reward service, wallet signing,
//! contract writes and presale verification.

pub mod traits;

pub use traits::{
    ApiResponse, ClaimRewardArgs, ClaimSignatureResult, ClaimTransactor,
    PresaleVerificationResult, PresaleVerifier, RewardService, WalletSigner,
};

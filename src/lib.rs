pub mod adapters;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod eligibility;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod presale;
pub mod registry;
pub mod signing;

pub use config::AppConfig;
pub use coordinator::{ClaimCoordinator, ClaimModal, ClaimNotice, ClaimPhase, ClaimView};
pub use domain::{RawRewards, WalletAddress};
pub use error::{ClaimError, Result};
pub use gateway::{ClaimTransactor, PresaleVerifier, RewardService, WalletSigner};
pub use presale::{PresaleStep, PresaleVerification};
pub use signing::LocalWalletSigner;

//! Claim Coordinator
//!
//! Session state machine for the consolidated claim: tracked wallets and
//! their verification signatures, the staking address, the claim signature
//! and the on-chain claim submission.

pub mod coordinator;
pub mod state;

pub use coordinator::{verification_message, ClaimClick, ClaimCoordinator, ClaimView};
pub use state::{
    reconcile, ClaimModal, ClaimNotice, ClaimPhase, NoticeLevel, PendingClaim, StateTransition,
};

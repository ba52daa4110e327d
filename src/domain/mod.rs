pub mod address;
pub mod rewards;

pub use address::WalletAddress;
pub use rewards::{
    to_base_units, AlreadyRegisteredWallet, PastClaim, RawRewards, RewardCategory, RewardSection,
    RewardWallet, WalletWithSignature, REWARD_TOKEN_DECIMALS,
};

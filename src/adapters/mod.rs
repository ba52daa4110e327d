pub mod reward_api;
pub mod reward_contract;

pub use reward_api::RewardApiClient;
pub use reward_contract::RewardContractClient;

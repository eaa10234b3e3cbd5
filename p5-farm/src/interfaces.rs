use crate::*;

/// Distribution parameters of one reward token, index-aligned with
/// `ContractParams.reward_tokens`.
#[derive(Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
pub struct RewardParams {
    /// undistributed pool ledger balance
    pub rewards: U128,
    pub rewards_per_second: U128,
    pub end: Option<u64>,
    pub last_reward_timestamp: u64,
    /// custodied token deposit actually held by the farm
    pub deposit: U128,
    pub total_harvested: U128,
}

#[derive(Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
pub struct ContractParams {
    pub is_active: bool,
    pub owner_id: AccountId,
    pub treasury: AccountId,
    pub stake_token: AccountId,
    pub reward_tokens: Vec<AccountId>,
    pub reward_params: Vec<RewardParams>,
    pub total_staked: U128,
    /// Number of accounts currently registered.
    pub accounts_registered: u64,
}

#[derive(Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug))]
pub struct Status {
    pub staked: U128,
    /// accrued, not yet harvested rewards per reward token, including the
    /// share a settlement at `timestamp` would credit.
    pub farmed: Vec<U128>,
    /// timestamp (in seconds) the status was computed at.
    pub timestamp: u64,
}

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
#[allow(unused_imports)]
use near_sdk::serde::{Deserialize, Serialize};

use near_sdk::collections::LookupMap;
use near_sdk::json_types::U128;
use near_sdk::{
    assert_one_yocto, env, log, near_bindgen, AccountId, Balance, PanicOnDefault, Promise,
    PromiseOrValue, ONE_YOCTO,
};

use p5_lib::constants::*;
use p5_lib::errors::*;
use p5_lib::helpers::*;
use p5_lib::interfaces::*;

pub mod interfaces;
pub mod reward;
pub mod storage_management;
pub mod token_standards;
pub mod vault;

use crate::interfaces::*;
use crate::reward::*;
use crate::vault::*;

/// Multi-reward staking farm. Users stake a single NEP-141 token and earn a
/// proportional share of every registered reward token stream, following the
/// MasterChef rewards-per-share accounting: each pool keeps a fixed point
/// accumulator of rewards earned per staked unit and each vault keeps a debt
/// marking the accumulator value already credited to it.
#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    /// if the farm is opened. When false: no new accounts, no staking, no
    /// harvesting. Unstaking and reward deposits keep working.
    pub is_active: bool,
    pub owner_id: AccountId,
    /// Destination for reward withdrawals done by the owner.
    pub treasury: AccountId,
    /// NEP-141 token accepted for staking.
    pub stake_token: AccountId,
    /// user vaults
    pub vaults: LookupMap<AccountId, Vault>,
    /// reward tokens in registration order. The set is fixed at construction
    /// and defines the settlement iteration order.
    pub reward_tokens: Vec<AccountId>,
    /// distribution state per reward token, index-aligned with
    /// `reward_tokens`.
    pub reward_data: Vec<RewardData>,
    /// custodied reward deposits actually held by the farm, index-aligned.
    /// Tracks NEP-141 transfers in and out and can diverge from the pool
    /// ledger through `withdraw_reward`.
    pub reward_deposits: Vec<Balance>,
    /// total amount of currently staked tokens.
    pub total_staked: Balance,
    /// total number of harvested tokens transferred out, index-aligned.
    pub total_harvested: Vec<Balance>,
    /// fixed point scale of the accumulators:
    /// 10**(stake token decimals) * 10**9.
    precision: U256,
    /// total number of accounts currently registered.
    pub accounts_registered: u64,
}

#[near_bindgen]
impl Contract {
    /// Initializes the farm.
    /// Parameters:
    /// * `stake_token`: NEP-141 token users stake.
    /// * `stake_token_decimals`: decimals of the stake token, used to derive
    ///   the accumulator precision.
    /// * `reward_tokens`: the full set of reward tokens this farm will ever
    ///   distribute. Registration is closed once `new` returns.
    /// Every reward stream starts with a zero emission rate and no funds; use
    /// `set_rewards_per_second` and reward deposits to start distribution.
    #[init]
    pub fn new(
        owner_id: AccountId,
        treasury: AccountId,
        stake_token: AccountId,
        stake_token_decimals: u8,
        reward_tokens: Vec<AccountId>,
    ) -> Self {
        assert!(!reward_tokens.is_empty(), "{}", ERR01_MISSING_REWARDS);
        for (i, token) in reward_tokens.iter().enumerate() {
            assert!(
                reward_tokens.iter().position(|x| x == token) == Some(i),
                "{}",
                ERR04_DUPLICATE_TOKEN
            );
        }
        let now = now_seconds();
        let n = reward_tokens.len();
        Self {
            is_active: true,
            owner_id,
            treasury,
            stake_token,
            vaults: LookupMap::new(b"v".to_vec()),
            reward_tokens,
            reward_data: (0..n).map(|_| RewardData::new(now)).collect(),
            reward_deposits: vec![0; n],
            total_staked: 0,
            total_harvested: vec![0; n],
            precision: precision(stake_token_decimals),
            accounts_registered: 0,
        }
    }

    // ************ //
    // view methods //
    // ************ //

    pub fn get_contract_params(&self) -> ContractParams {
        let reward_params = self
            .reward_data
            .iter()
            .enumerate()
            .map(|(i, rd)| RewardParams {
                rewards: rd.rewards.into(),
                rewards_per_second: rd.rewards_per_second.into(),
                end: rd.end,
                last_reward_timestamp: rd.last_reward_timestamp,
                deposit: self.reward_deposits[i].into(),
                total_harvested: self.total_harvested[i].into(),
            })
            .collect();
        ContractParams {
            is_active: self.is_active,
            owner_id: self.owner_id.clone(),
            treasury: self.treasury.clone(),
            stake_token: self.stake_token.clone(),
            reward_tokens: self.reward_tokens.clone(),
            reward_params,
            total_staked: self.total_staked.into(),
            accounts_registered: self.accounts_registered,
        }
    }

    /// Returns the stake and pending rewards of the given account, computed
    /// against a simulated settlement at the current block time. Read only.
    pub fn status(&self, account_id: AccountId) -> Option<Status> {
        let mut v = self.vaults.get(&account_id)?;
        let now = now_seconds();
        let mut reward_data = self.reward_data.clone();
        for rd in reward_data.iter_mut() {
            rd.settle(now, self.total_staked, self.precision);
        }
        v.ping(&reward_data, self.precision);
        Some(Status {
            staked: v.staked.into(),
            farmed: to_U128s(&v.farmed),
            timestamp: now,
        })
    }

    // ******************* //
    // transaction methods //
    // ******************* //

    /// Unstakes the given amount and transfers it back to the caller.
    /// Returns the withdrawn amount.
    /// Works when the farm is paused: user funds are never lockable.
    /// Requires 1 yNEAR payment for wallet 2FA.
    #[payable]
    pub fn unstake(&mut self, amount: U128) -> U128 {
        assert_one_yocto();
        let user = env::predecessor_account_id();
        self._unstake(&user, amount.0);
        amount
    }

    /// Transfers the accrued rewards of one reward token to the caller.
    /// The payout is capped at the custodied balance the farm actually holds
    /// for that token; the accrued entry is zeroed either way.
    /// Panics if nothing is accrued for the token.
    /// Requires 1 yNEAR payment for wallet 2FA.
    #[payable]
    pub fn harvest(&mut self, token: AccountId) -> U128 {
        self.assert_is_active();
        assert_one_yocto();
        let user = env::predecessor_account_id();
        let token_i = find_acc_idx(&token, &self.reward_tokens);
        let mut v = self.get_vault(&user);

        self.ping_all(&mut v);
        v.update_debts(&self.reward_data, self.precision);

        let accrued = v.farmed[token_i];
        assert!(accrued > 0, "{}", ERR12_ZERO_REWARDS);
        v.farmed[token_i] = 0;
        self.vaults.insert(&user, &v);

        let payout = std::cmp::min(accrued, self.reward_deposits[token_i]);
        if payout < accrued {
            log!(
                "pool {} holds only {} of {} accrued, the difference is forfeited",
                token,
                payout,
                accrued
            );
        }
        if payout > 0 {
            self.transfer_farmed_tokens(&user, token_i, payout);
        }
        log!("Harvested {} {} for @{}", payout, token, user);
        U128(payout)
    }

    /// Closes the caller's account: returns the remaining staked balance and
    /// the storage deposit, and removes the vault. Panics if any reward
    /// entry is not harvested yet. Works when the farm is paused.
    /// Requires 1 yNEAR payment for wallet 2FA.
    #[payable]
    pub fn close(&mut self) {
        assert_one_yocto();
        let user = env::predecessor_account_id();
        let mut v = self.get_vault(&user);
        self.ping_all(&mut v);
        assert!(all_zeros(&v.farmed), "{}", ERR11_NON_ZERO_REWARDS);
        log!("Closing @{} account, staked: {}", user, v.staked);
        if v.staked > 0 {
            self.total_staked -= v.staked;
            self.transfer_staked_tokens(&user, v.staked);
        }
        self.vaults.remove(&user);
        self.accounts_registered -= 1;
        Promise::new(user).transfer(STORAGE_COST);
    }

    // ******************* //
    //     management      //
    // ******************* //

    /// Opens or closes the farm. When the farm is not active it rejects new
    /// accounts, staking and harvesting, until it is open back again.
    pub fn set_active(&mut self, is_open: bool) {
        self.assert_owner();
        self.is_active = is_open;
        log!("Farm is_active: {}", is_open);
    }

    /// Changes the emission rate of one reward token. The pool is settled
    /// with the old rate first, so already elapsed time keeps its price.
    pub fn set_rewards_per_second(&mut self, token: AccountId, rate: U128) {
        self.assert_owner();
        let token_i = find_acc_idx(&token, &self.reward_tokens);
        self.settle_pool(token_i);
        let rd = &mut self.reward_data[token_i];
        log!(
            "Emission rate for {} changed: {} -> {}",
            token,
            rd.rewards_per_second,
            rate.0
        );
        rd.rewards_per_second = rate.0;
    }

    /// Sets the distribution deadline of one reward token.
    /// `end` is a unix timestamp in seconds and must be in the future.
    pub fn set_end(&mut self, token: AccountId, end: u64) {
        self.assert_owner();
        let token_i = find_acc_idx(&token, &self.reward_tokens);
        assert!(end > now_seconds(), "{}", ERR02_INVALID_END);
        self.settle_pool(token_i);
        self.reward_data[token_i].end = Some(end);
        log!("Distribution end for {} set to {}", token, end);
    }

    /// Moves custodied reward tokens to the treasury. The pool ledger is NOT
    /// reduced: draining below the accrued obligations makes later harvests
    /// pay out less (they are capped at the custodied balance).
    pub fn withdraw_reward(&mut self, token: AccountId, amount: U128) -> Promise {
        self.assert_owner();
        let token_i = find_acc_idx(&token, &self.reward_tokens);
        let amount = amount.0;
        assert!(amount > 0, "{}", ERR31_ZERO_AMOUNT);
        assert!(
            amount <= self.reward_deposits[token_i],
            "{}",
            ERR22_NOT_ENOUGH_DEPOSIT
        );
        self.reward_deposits[token_i] -= amount;
        log!(
            "Withdrawing {} {} to treasury, custody: {} -> {}",
            amount,
            token,
            self.reward_deposits[token_i] + amount,
            self.reward_deposits[token_i]
        );
        ext_ft::ext(token)
            .with_attached_deposit(ONE_YOCTO)
            .with_static_gas(GAS_FOR_FT_TRANSFER)
            .ft_transfer(
                self.treasury.clone(),
                amount.into(),
                Some("reward withdraw".to_string()),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_CALLBACK)
                    .withdraw_reward_callback(token_i, U128(amount)),
            )
    }

    /*****************
     * internal methods */

    /// FT Receiver `reward deposit` scenario: tops up the pool of a
    /// registered reward token. The pool is settled first so the new funds
    /// are not distributed over already elapsed time.
    pub(crate) fn _add_reward(&mut self, token: &AccountId, amount: Balance) {
        let token_i = find_acc_idx(token, &self.reward_tokens);
        self.settle_pool(token_i);
        let rd = &mut self.reward_data[token_i];
        rd.rewards += amount;
        self.reward_deposits[token_i] += amount;
        log!(
            "Reward deposit {} {}, pool ledger: {}, custody: {}",
            amount,
            token,
            rd.rewards,
            self.reward_deposits[token_i]
        );
    }

    /// transfers unstaked tokens back to the user. `self.total_staked` and
    /// the vault must be adjusted in the caller; the callback restores them
    /// if the transfer fails.
    fn transfer_staked_tokens(&mut self, user: &AccountId, amount: Balance) -> Promise {
        ext_ft::ext(self.stake_token.clone())
            .with_attached_deposit(ONE_YOCTO)
            .with_static_gas(GAS_FOR_FT_TRANSFER)
            .ft_transfer(user.clone(), amount.into(), Some("unstaking".to_string()))
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_CALLBACK)
                    .transfer_staked_callback(user.clone(), U128(amount)),
            )
    }

    /// transfers harvested tokens (token identified by an index in
    /// self.reward_tokens) to the user.
    fn transfer_farmed_tokens(&mut self, user: &AccountId, token_i: usize, amount: Balance) -> Promise {
        let token = &self.reward_tokens[token_i];
        self.total_harvested[token_i] += amount;
        self.reward_deposits[token_i] -= amount;
        ext_ft::ext(token.clone())
            .with_attached_deposit(ONE_YOCTO)
            .with_static_gas(GAS_FOR_FT_TRANSFER)
            .ft_transfer(user.clone(), amount.into(), Some("harvest".to_string()))
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_CALLBACK)
                    .transfer_farmed_callback(user.clone(), token_i, U128(amount)),
            )
    }

    #[private]
    pub fn transfer_staked_callback(&mut self, user: AccountId, amount: U128) {
        if promise_result_as_failed() {
            log!(
                "transferring {} {} failed. Recovering account state",
                amount.0,
                self.stake_token
            );
            let mut v = self.recovered_vault(&user);
            // settle the out-of-farm window before the stake re-enters
            self.ping_all(&mut v);
            v.staked += amount.0;
            self.total_staked += amount.0;
            v.update_debts(&self.reward_data, self.precision);
            self.vaults.insert(&user, &v);
        }
    }

    #[private]
    pub fn transfer_farmed_callback(&mut self, user: AccountId, token_i: usize, amount: U128) {
        if promise_result_as_failed() {
            log!(
                "harvesting {} {} failed. Recovering account state",
                amount.0,
                self.reward_tokens[token_i]
            );
            self.total_harvested[token_i] -= amount.0;
            self.reward_deposits[token_i] += amount.0;
            let mut v = self.recovered_vault(&user);
            v.farmed[token_i] += amount.0;
            self.vaults.insert(&user, &v);
        }
    }

    #[private]
    pub fn withdraw_reward_callback(&mut self, token_i: usize, amount: U128) {
        if promise_result_as_failed() {
            log!(
                "treasury transfer of {} {} failed, recovering",
                amount.0,
                self.reward_tokens[token_i]
            );
            self.reward_deposits[token_i] += amount.0;
        }
    }

    fn recovered_vault(&mut self, user: &AccountId) -> Vault {
        match self.vaults.get(user) {
            Some(v) => v,
            None => {
                // the vault was closed before the callback ran
                self.accounts_registered += 1;
                Vault::new(self.reward_tokens.len())
            }
        }
    }

    pub(crate) fn assert_is_active(&self) {
        assert!(self.is_active, "{}", ERR03_NOT_ACTIVE);
    }

    fn assert_owner(&self) {
        assert!(
            env::predecessor_account_id() == self.owner_id,
            "can only be called by the owner"
        );
    }
}

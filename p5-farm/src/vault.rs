//! Vault is the per user record of staked balance and accrued rewards.
use crate::*;

#[derive(BorshSerialize, BorshDeserialize)]
pub struct Vault {
    /// amount of stake token locked in this vault
    pub staked: Balance,
    /// accumulator value already accounted for against the current balance,
    /// one entry per reward token: `staked * accrued_rewards_per_share /
    /// precision` as of the last balance or accumulator change.
    pub reward_debts: Vec<U256>,
    /// accrued, not yet harvested rewards, one entry per reward token.
    pub farmed: Vec<Balance>,
}

impl Vault {
    pub fn new(rewards_len: usize) -> Self {
        Self {
            staked: 0,
            reward_debts: vec![U256::zero(); rewards_len],
            farmed: vec![0; rewards_len],
        }
    }

    /// Folds the newly accrued share of every (already settled) reward pool
    /// into `farmed`. Debts are NOT touched here: the caller must call
    /// `update_debts` once the balance mutation is done.
    pub fn ping(&mut self, reward_data: &[RewardData], precision: U256) {
        if self.staked == 0 {
            return;
        }
        for (i, rd) in reward_data.iter().enumerate() {
            let pending = mul_div_down(
                U256::from(self.staked),
                rd.accrued_rewards_per_share,
                precision,
            ) - self.reward_debts[i];
            if !pending.is_zero() {
                self.farmed[i] += pending.as_u128();
            }
        }
    }

    /// Re-baselines every reward debt to the current balance and accumulator.
    pub fn update_debts(&mut self, reward_data: &[RewardData], precision: U256) {
        for (i, rd) in reward_data.iter().enumerate() {
            self.reward_debts[i] = mul_div_down(
                U256::from(self.staked),
                rd.accrued_rewards_per_share,
                precision,
            );
        }
    }
}

impl Contract {
    /// Returns the registered vault.
    /// Panics if the account is not registered.
    #[inline]
    pub(crate) fn get_vault(&self, account_id: &AccountId) -> Vault {
        self.vaults.get(account_id).expect(ERR10_NO_ACCOUNT)
    }

    /// Settles every reward pool in registration order, then folds the
    /// vault's pending share into its `farmed` entries.
    pub(crate) fn ping_all(&mut self, v: &mut Vault) {
        let now = now_seconds();
        let total_staked = self.total_staked;
        let precision = self.precision;
        for rd in self.reward_data.iter_mut() {
            rd.settle(now, total_staked, precision);
        }
        v.ping(&self.reward_data, precision);
    }

    /// Settles a single reward pool, for asset-targeted admin operations.
    pub(crate) fn settle_pool(&mut self, token_i: usize) {
        let now = now_seconds();
        let total_staked = self.total_staked;
        let precision = self.precision;
        self.reward_data[token_i].settle(now, total_staked, precision);
    }

    pub(crate) fn _stake(&mut self, user: &AccountId, amount: Balance) {
        self.assert_is_active();
        assert!(amount > 0, "{}", ERR31_ZERO_AMOUNT);
        let mut v = self.get_vault(user);

        // firstly update the past rewards
        self.ping_all(&mut v);

        let staked_before = v.staked;
        v.staked += amount;
        self.total_staked += amount;
        v.update_debts(&self.reward_data, self.precision);
        self.vaults.insert(user, &v);
        log!(
            "Staked {} {} by @{}, stake: {} -> {}, total staked: {}",
            amount,
            self.stake_token,
            user,
            staked_before,
            v.staked,
            self.total_staked
        );
    }

    /// Removes `amount` from the user's stake and transfers it back.
    /// Works when the farm is paused: unstaking must never be blockable.
    pub(crate) fn _unstake(&mut self, user: &AccountId, amount: Balance) {
        assert!(amount > 0, "{}", ERR31_ZERO_AMOUNT);
        let mut v = self.get_vault(user);
        assert!(amount <= v.staked, "{}", ERR30_NOT_ENOUGH_STAKE);

        self.ping_all(&mut v);

        let staked_before = v.staked;
        v.staked -= amount;
        self.total_staked -= amount;
        v.update_debts(&self.reward_data, self.precision);
        self.vaults.insert(user, &v);
        log!(
            "Unstaked {} {} by @{}, stake: {} -> {}, total staked: {}",
            amount,
            self.stake_token,
            user,
            staked_before,
            v.staked,
            self.total_staked
        );
        self.transfer_staked_tokens(user, amount);
    }

    /// creates new empty account with zeroed debt and reward entries for
    /// every registered reward token.
    pub(crate) fn create_account(&mut self, user: &AccountId) {
        self.vaults
            .insert(user, &Vault::new(self.reward_tokens.len()));
        self.accounts_registered += 1;
    }
}

//! Per reward token distribution state and its settlement transition.
use crate::*;

/// Distribution state of a single reward token. The farm keeps one entry per
/// registered token, index-aligned with `Contract.reward_tokens`.
#[derive(BorshSerialize, BorshDeserialize, Clone)]
pub struct RewardData {
    /// undistributed reward balance still in the pool ledger. Decreases only
    /// by the amount moved into the accumulator; increases only on a reward
    /// deposit.
    pub rewards: Balance,
    /// emission rate in tokens per second.
    pub rewards_per_second: Balance,
    /// optional distribution deadline (unix seconds). No accrual past it.
    pub end: Option<u64>,
    /// timestamp (unix seconds) through which accrual was settled.
    /// Monotone, capped at `end`.
    pub last_reward_timestamp: u64,
    /// cumulative rewards per staked unit, scaled by `Contract.precision`.
    /// Monotone.
    pub accrued_rewards_per_share: U256,
}

impl RewardData {
    pub fn new(now: u64) -> Self {
        Self {
            rewards: 0,
            rewards_per_second: 0,
            end: None,
            last_reward_timestamp: now,
            accrued_rewards_per_share: U256::zero(),
        }
    }

    /// Advances the pool bookkeeping up to `now` and returns the amount moved
    /// from `rewards` into the accumulator. When nothing can accrue (no
    /// stake, no rate, no funds, or no elapsed time) only
    /// `last_reward_timestamp` advances.
    pub fn settle(&mut self, now: u64, total_staked: Balance, precision: U256) -> Balance {
        let effective = match self.end {
            Some(end) => std::cmp::min(end, now),
            None => now,
        };
        if effective <= self.last_reward_timestamp {
            return 0;
        }
        if total_staked == 0 || self.rewards_per_second == 0 || self.rewards == 0 {
            self.last_reward_timestamp = effective;
            return 0;
        }
        let elapsed = effective - self.last_reward_timestamp;
        let candidate = U256::from(self.rewards_per_second) * U256::from(elapsed);
        // cap at the funded ledger, never promise more than the pool holds
        let distributed = if candidate > U256::from(self.rewards) {
            self.rewards
        } else {
            candidate.as_u128()
        };
        self.accrued_rewards_per_share = self.accrued_rewards_per_share
            + mul_div_down(U256::from(distributed), precision, U256::from(total_staked));
        self.rewards -= distributed;
        if self.rewards == 0 {
            // a stale rate must not imply accrual with no funds backing it
            self.rewards_per_second = 0;
        }
        self.last_reward_timestamp = effective;
        distributed
    }
}

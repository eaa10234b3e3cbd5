pub mod constants {
    use near_sdk::{Balance, Gas};

    /// Gas constants
    /// Amount of gas for fungible token transfers.
    pub const TGAS: Gas = Gas::ONE_TERA;
    pub const GAS_FOR_FT_TRANSFER: Gas = Gas(10 * TGAS.0);
    pub const GAS_FOR_CALLBACK: Gas = Gas(5 * TGAS.0);

    /// one second in nanoseconds
    pub const SECOND: u64 = 1_000_000_000;

    const MILLI_NEAR: Balance = 1000_000000_000000_000000; // 1e21
    pub const STORAGE_COST: Balance = MILLI_NEAR * 60; // 0.06 NEAR
    /// E24 is 1 in yocto
    pub const E24: Balance = MILLI_NEAR * 1_000;

    /// extra decimals of accumulator headroom on top of the stake token
    /// decimals, to keep low-rate / long-duration accrual from truncating.
    pub const ACC_EXTRA_DECIMALS: u32 = 9;
}

pub mod errors {
    // Farm setup

    pub const ERR01_MISSING_REWARDS: &str = "E01: at least one reward token is required";
    pub const ERR02_INVALID_END: &str = "E02: end must be in the future";
    pub const ERR03_NOT_ACTIVE: &str = "E03: farm is paused";
    pub const ERR04_DUPLICATE_TOKEN: &str = "E04: duplicated reward token";

    // Account registration

    pub const ERR10_NO_ACCOUNT: &str = "E10: account not found. Register the account.";
    pub const ERR11_NON_ZERO_REWARDS: &str = "E11: account has unharvested rewards";
    pub const ERR12_ZERO_REWARDS: &str = "E12: nothing harvested for this token";

    // Token deposits

    pub const ERR20_WRONG_STAKE_TOKEN: &str = "E20: token not accepted for staking";
    pub const ERR21_TOKEN_NOT_REGISTERED: &str = "E21: token not registered";
    pub const ERR22_NOT_ENOUGH_DEPOSIT: &str = "E22: not enough tokens in deposit";

    // Staked tokens

    pub const ERR30_NOT_ENOUGH_STAKE: &str = "E30: not enough staked tokens";
    pub const ERR31_ZERO_AMOUNT: &str = "E31: amount must be positive";
}

pub mod helpers {
    use crate::constants::*;
    use crate::errors::*;
    use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
    use near_sdk::json_types::U128;
    use near_sdk::{env, AccountId, Balance, PromiseResult};
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer.
        pub struct U256(4);
    }

    // accumulators and reward debts are part of the contract state, so the
    // 256-bit words must round-trip through borsh.
    impl BorshSerialize for U256 {
        fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
            BorshSerialize::serialize(&self.0, writer)
        }
    }

    impl BorshDeserialize for U256 {
        fn deserialize(buf: &mut &[u8]) -> std::io::Result<Self> {
            Ok(Self(BorshDeserialize::deserialize(buf)?))
        }
    }

    /// Fixed point scale factor for a stake token with the given decimals:
    /// `10**decimals * 10**ACC_EXTRA_DECIMALS`.
    pub fn precision(stake_token_decimals: u8) -> U256 {
        U256::from(10).pow(U256::from(stake_token_decimals as u32 + ACC_EXTRA_DECIMALS))
    }

    /// `a * b / c` with a 256-bit product, rounding towards zero.
    pub fn mul_div_down(a: U256, b: U256, c: U256) -> U256 {
        a * b / c
    }

    /// `a * b / c` with a 256-bit product, rounding away from zero.
    pub fn mul_div_up(a: U256, b: U256, c: U256) -> U256 {
        let d = a * b;
        if d.is_zero() {
            return U256::zero();
        }
        (d - 1) / c + 1
    }

    /// current block time in whole seconds.
    pub fn now_seconds() -> u64 {
        env::block_timestamp() / SECOND
    }

    #[allow(non_snake_case)]
    pub fn to_U128s(v: &Vec<Balance>) -> Vec<U128> {
        v.iter().map(|x| U128::from(*x)).collect()
    }

    pub fn find_acc_idx(acc: &AccountId, acc_v: &Vec<AccountId>) -> usize {
        acc_v
            .iter()
            .position(|x| x == acc)
            .expect(ERR21_TOKEN_NOT_REGISTERED)
    }

    pub fn all_zeros(v: &Vec<Balance>) -> bool {
        for x in v {
            if *x != 0 {
                return false;
            }
        }
        return true;
    }

    /// Returns true if the promise was failed. Otherwise returns false.
    /// Fails if called outside a callback that received 1 promise result.
    pub fn promise_result_as_failed() -> bool {
        near_sdk::require!(
            env::promise_results_count() == 1,
            "Contract expected a result on the callback"
        );
        match env::promise_result(0) {
            PromiseResult::Failed => true,
            _ => false,
        }
    }
}

pub mod interfaces {
    use near_sdk::json_types::U128;
    use near_sdk::{ext_contract, AccountId};

    #[ext_contract(ext_ft)]
    pub trait FungibleToken {
        fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::constants::*;
    use super::helpers::*;
    use near_sdk::borsh::{BorshDeserialize, BorshSerialize};

    #[test]
    fn test_precision() {
        assert_eq!(precision(0), U256::from(10u128.pow(9)));
        assert_eq!(precision(24), U256::from(10).pow(U256::from(33)));
        assert_eq!(
            precision(24),
            U256::from(E24) * U256::from(10u128.pow(ACC_EXTRA_DECIMALS))
        );
    }

    #[test]
    fn test_mul_div_down() {
        let (a, b, c) = (U256::from(10), U256::from(10), U256::from(3));
        assert_eq!(mul_div_down(a, b, c), U256::from(33));
        assert_eq!(mul_div_down(U256::from(0), b, c), U256::zero());
        assert_eq!(
            mul_div_down(U256::from(6), U256::from(4), U256::from(3)),
            U256::from(8)
        );
        // product wider than 128 bits must not overflow
        let big = U256::from(u128::MAX);
        assert_eq!(mul_div_down(big, big, big), big);
    }

    #[test]
    fn test_mul_div_up() {
        let (a, b, c) = (U256::from(10), U256::from(10), U256::from(3));
        assert_eq!(mul_div_up(a, b, c), U256::from(34));
        assert_eq!(mul_div_up(U256::from(0), b, c), U256::zero());
        // exact division must not round up
        assert_eq!(
            mul_div_up(U256::from(6), U256::from(4), U256::from(3)),
            U256::from(8)
        );
    }

    #[test]
    fn test_u256_borsh_roundtrip() {
        let x = U256::from(u128::MAX) * U256::from(42u64);
        let bytes = x.try_to_vec().unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(U256::try_from_slice(&bytes).unwrap(), x);
    }

    #[test]
    fn test_all_zeros() {
        assert!(all_zeros(&vec![0, 0, 0]));
        assert!(!all_zeros(&vec![0, 1, 0]));
        assert!(all_zeros(&vec![]));
    }
}

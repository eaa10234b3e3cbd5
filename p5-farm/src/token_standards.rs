use crate::*;

use near_contract_standards::fungible_token::receiver::FungibleTokenReceiver;

/// FT Receiver message switcher.
enum TransferInstruction {
    Stake,
    RewardDeposit,
    Unknown,
}

impl From<&str> for TransferInstruction {
    fn from(msg: &str) -> Self {
        match msg {
            "" | "to farm" => TransferInstruction::Stake,
            "reward deposit" => TransferInstruction::RewardDeposit,
            _ => TransferInstruction::Unknown,
        }
    }
}

/// FT Receiver
/// Stake and reward deposits are done through NEP-141 `ft_transfer_call`.
#[near_bindgen]
impl FungibleTokenReceiver for Contract {
    /// Callback on receiving tokens by this contract.
    /// Transfers of the stake token with an empty or "to farm" message are
    /// staked for `sender_id`. Transfers of a registered reward token with a
    /// "reward deposit" message top up that token's reward pool (allowed
    /// while the farm is paused, by anyone). Everything else is refunded.
    /// Returns the unused amount.
    fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        let token = env::predecessor_account_id();
        assert!(amount.0 > 0, "{}", ERR31_ZERO_AMOUNT);
        match TransferInstruction::from(msg.as_str()) {
            TransferInstruction::Stake => {
                assert_eq!(token, self.stake_token, "{}", ERR20_WRONG_STAKE_TOKEN);
                self._stake(&sender_id, amount.0);
                PromiseOrValue::Value(U128(0))
            }
            TransferInstruction::RewardDeposit => {
                self._add_reward(&token, amount.0);
                PromiseOrValue::Value(U128(0))
            }
            TransferInstruction::Unknown => {
                log!(
                    "unsupported transfer message '{}', refunding {} {} to @{}",
                    msg,
                    amount.0,
                    token,
                    sender_id
                );
                PromiseOrValue::Value(amount)
            }
        }
    }
}

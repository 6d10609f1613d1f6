multiversx_sc::imports!();

use crate::errors::{ERR_INSUFFICIENT_STAKE, ERR_INVALID_STAKE_TOKEN, ERR_ZERO_AMOUNT};
use crate::voting_power;

/// Stake ledger for the governance token. Voting power is the staked
/// balance scaled by how long the position has been held.
#[multiversx_sc::module]
pub trait StakingModule {
    // ========================================================
    // ENDPOINT: stake
    // The accrual clock starts on the first stake after a zero balance.
    // ========================================================

    #[payable("*")]
    #[endpoint(stake)]
    fn stake(&self) {
        let payment = self.call_value().single_esdt();
        require!(
            payment.token_identifier == self.governance_token().get(),
            ERR_INVALID_STAKE_TOKEN
        );
        require!(payment.amount > 0u64, ERR_ZERO_AMOUNT);

        let caller = self.blockchain().get_caller();
        if self.staked_amount(&caller).get() == 0u64 {
            let now = self.blockchain().get_block_timestamp();
            self.stake_since(&caller).set(now);
        }

        self.staked_amount(&caller)
            .update(|staked| *staked += &payment.amount);
        self.total_staked()
            .update(|total| *total += &payment.amount);

        self.stake_event(&caller, &payment.amount);
    }

    // ========================================================
    // ENDPOINT: unstake
    // Partial unstake keeps the accrual clock; a full exit clears it.
    // ========================================================

    #[endpoint(unstake)]
    fn unstake(&self, amount: BigUint) {
        require!(amount > 0u64, ERR_ZERO_AMOUNT);

        let caller = self.blockchain().get_caller();
        let staked = self.staked_amount(&caller).get();
        require!(amount <= staked, ERR_INSUFFICIENT_STAKE);

        let remaining = &staked - &amount;
        if remaining == 0u64 {
            self.staked_amount(&caller).clear();
            self.stake_since(&caller).clear();
        } else {
            self.staked_amount(&caller).set(&remaining);
        }
        self.total_staked().update(|total| *total -= &amount);

        let token = self.governance_token().get();
        self.send().direct_esdt(&caller, &token, 0, &amount);

        self.unstake_event(&caller, &amount);
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getVotingPower)]
    fn get_voting_power(&self, account: ManagedAddress) -> BigUint {
        self.voting_power_of(&account)
    }

    #[view(getMultiplier)]
    fn get_multiplier(&self, account: ManagedAddress) -> u64 {
        if self.staked_amount(&account).get() == 0u64 {
            return 0;
        }
        voting_power::multiplier_bps(self.held_for(&account))
    }

    fn voting_power_of(&self, account: &ManagedAddress) -> BigUint {
        let staked = self.staked_amount(account).get();
        if staked == 0u64 {
            return BigUint::zero();
        }
        voting_power::voting_power(&staked, self.held_for(account))
    }

    fn held_for(&self, account: &ManagedAddress) -> u64 {
        let now = self.blockchain().get_block_timestamp();
        now.saturating_sub(self.stake_since(account).get())
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("stake")]
    fn stake_event(&self, #[indexed] staker: &ManagedAddress, amount: &BigUint);

    #[event("unstake")]
    fn unstake_event(&self, #[indexed] staker: &ManagedAddress, amount: &BigUint);

    // ========================================================
    // STORAGE
    // ========================================================

    #[view(getGovernanceToken)]
    #[storage_mapper("governanceToken")]
    fn governance_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[view(getStakedAmount)]
    #[storage_mapper("stakedAmount")]
    fn staked_amount(&self, account: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[view(getStakeSince)]
    #[storage_mapper("stakeSince")]
    fn stake_since(&self, account: &ManagedAddress) -> SingleValueMapper<u64>;

    #[view(getTotalStaked)]
    #[storage_mapper("totalStaked")]
    fn total_staked(&self) -> SingleValueMapper<BigUint>;
}

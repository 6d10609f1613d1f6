#![no_std]

multiversx_sc::imports!();

pub mod treasury_proxy;

const ERR_ONLY_DAO: &str = "Only DAO";
const ERR_ZERO_AMOUNT: &str = "Zero amount";
const ERR_ZERO_RECIPIENT: &str = "Zero recipient";
const ERR_ZERO_ADDRESS: &str = "Zero address";
const ERR_INSUFFICIENT_BALANCE: &str = "Insufficient balance";

/// Passive custody for a DAO's assets. Funds leave only on a call from
/// the governing DAO, which in turn only calls as a proposal effect.
#[multiversx_sc::contract]
pub trait Treasury {
    #[init]
    fn init(&self, dao_address: ManagedAddress) {
        require!(!dao_address.is_zero(), ERR_ZERO_ADDRESS);
        self.dao_address().set(&dao_address);
    }

    /// Only the governing DAO may install new code.
    #[upgrade]
    fn upgrade(&self) {
        require!(
            self.blockchain().get_caller() == self.dao_address().get(),
            ERR_ONLY_DAO
        );
    }

    #[payable("*")]
    #[endpoint(deposit)]
    fn deposit(&self) {
        let (asset, amount) = self.call_value().egld_or_single_fungible_esdt();
        let caller = self.blockchain().get_caller();
        self.deposit_event(&caller, &asset, &amount);
    }

    #[endpoint(releaseAsset)]
    fn release_asset(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        recipient: ManagedAddress,
        amount: BigUint,
    ) {
        let caller = self.blockchain().get_caller();
        require!(caller == self.dao_address().get(), ERR_ONLY_DAO);
        require!(amount > 0u64, ERR_ZERO_AMOUNT);
        require!(!recipient.is_zero(), ERR_ZERO_RECIPIENT);
        require!(
            self.blockchain().get_sc_balance(&asset, 0) >= amount,
            ERR_INSUFFICIENT_BALANCE
        );

        self.send().direct(&recipient, &asset, 0, &amount);
        self.asset_released_event(&recipient, &asset, &amount);
    }

    #[view(getBalance)]
    fn get_balance(&self, asset: EgldOrEsdtTokenIdentifier) -> BigUint {
        self.blockchain().get_sc_balance(&asset, 0)
    }

    #[event("deposit")]
    fn deposit_event(
        &self,
        #[indexed] from: &ManagedAddress,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
    );

    #[event("assetReleased")]
    fn asset_released_event(
        &self,
        #[indexed] recipient: &ManagedAddress,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
    );

    #[view(getDao)]
    #[storage_mapper("daoAddress")]
    fn dao_address(&self) -> SingleValueMapper<ManagedAddress>;
}

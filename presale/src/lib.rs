#![no_std]

multiversx_sc::imports!();

pub mod curve;
pub mod errors;
pub mod presale_proxy;
pub mod treasury_proxy;

use curve::BondingCurve;
use errors::*;

// ============================================================
// Constants
// ============================================================

/// Number of price tiers the supply is split into
pub const TIER_COUNT: u32 = 10;

/// Each tier costs 125% of the one below it
pub const TIER_MULTIPLIER_PERCENT: u64 = 125;

// ============================================================
// Contract
// ============================================================

/// Tiered bonding-curve sale of the DAO's governance token against EGLD.
/// The deployer is the owning DAO; only it may pause the sale or sweep
/// the raised EGLD to the treasury fixed at creation.
#[multiversx_sc::contract]
pub trait Presale {
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(
        &self,
        token: TokenIdentifier,
        treasury_address: ManagedAddress,
        total_amount: BigUint,
        initial_price: BigUint,
    ) {
        require!(token.is_valid_esdt_identifier(), ERR_INVALID_TOKEN);
        require!(!treasury_address.is_zero(), ERR_ZERO_TREASURY);
        require!(total_amount > 0u64, ERR_ZERO_AMOUNT);

        let curve = match BondingCurve::new(
            &total_amount,
            initial_price,
            TIER_COUNT,
            TIER_MULTIPLIER_PERCENT,
        ) {
            Ok(curve) => curve,
            Err(err) => sc_panic!(err),
        };

        self.dao_address().set(self.blockchain().get_caller());
        self.token().set(&token);
        self.treasury_address().set(&treasury_address);
        self.curve().set(&curve);
        self.total_raised().set(BigUint::zero());
        self.paused().set(false);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: buy
    // ========================================================

    /// EGLD that the remaining tiers cannot absorb stays in the contract.
    #[payable("EGLD")]
    #[endpoint(buy)]
    fn buy(&self, min_tokens: BigUint, deadline: u64) -> BigUint {
        require!(
            self.blockchain().get_block_timestamp() <= deadline,
            ERR_TRANSACTION_EXPIRED
        );
        let funds = self.call_value().egld_value().clone_value();
        require!(funds > 0u64, ERR_ZERO_ETH_SENT);
        require!(!self.paused().get(), ERR_PRESALE_PAUSED);

        let mut curve = self.curve().get();
        let fill = match curve.buy(&funds) {
            Ok(fill) => fill,
            Err(err) => sc_panic!(err),
        };
        require!(fill.tokens >= min_tokens, ERR_SLIPPAGE_TOO_HIGH);

        let token = self.token().get();
        require!(
            self.blockchain()
                .get_sc_balance(&EgldOrEsdtTokenIdentifier::esdt(token.clone()), 0)
                >= fill.tokens,
            ERR_NOT_ENOUGH_TOKENS
        );

        self.curve().set(&curve);
        self.total_raised().update(|raised| *raised += &funds);

        let caller = self.blockchain().get_caller();
        self.send().direct_esdt(&caller, &token, 0, &fill.tokens);

        self.tokens_purchased_event(&caller, &funds, &fill.tokens);
        if curve.is_sold_out() {
            self.presale_ended_event(&self.total_raised().get());
        }

        fill.tokens
    }

    // ========================================================
    // ENDPOINT: sell
    // Tokens arrive as the ESDT payment; EGLD is paid back at the
    // prices of the tiers they are returned into.
    // ========================================================

    #[payable("*")]
    #[endpoint(sell)]
    fn sell(&self, min_eth: BigUint, deadline: u64) -> BigUint {
        require!(
            self.blockchain().get_block_timestamp() <= deadline,
            ERR_TRANSACTION_EXPIRED
        );
        let payment = self.call_value().single_esdt();
        require!(
            payment.token_identifier == self.token().get(),
            ERR_INVALID_TOKEN
        );
        require!(payment.amount > 0u64, ERR_ZERO_TOKENS);

        let mut curve = self.curve().get();
        let fill = match curve.sell(&payment.amount) {
            Ok(fill) => fill,
            Err(err) => sc_panic!(err),
        };
        require!(
            self.blockchain()
                .get_sc_balance(&EgldOrEsdtTokenIdentifier::egld(), 0)
                >= fill.funds,
            ERR_INSUFFICIENT_ETH_BALANCE
        );
        require!(fill.funds >= min_eth, ERR_SLIPPAGE_TOO_HIGH);

        self.curve().set(&curve);
        self.total_raised().update(|raised| {
            if *raised > fill.funds {
                *raised -= &fill.funds;
            } else {
                *raised = BigUint::zero();
            }
        });

        let caller = self.blockchain().get_caller();
        if fill.funds > 0u64 {
            self.send().direct_egld(&caller, &fill.funds);
        }

        self.tokens_sold_event(&caller, &payment.amount, &fill.funds);

        fill.funds
    }

    /// Plain EGLD top-up. Credited to the balance, no tokens issued.
    #[payable("EGLD")]
    #[endpoint(deposit)]
    fn deposit(&self) {
        let amount = self.call_value().egld_value().clone_value();
        let caller = self.blockchain().get_caller();
        self.deposit_event(&caller, &amount);
    }

    // ========================================================
    // ADMIN: callable only by the owning DAO
    // ========================================================

    #[endpoint(setPaused)]
    fn set_paused(&self, paused: bool) {
        self.require_dao();
        self.paused().set(paused);
        self.presale_paused_event(paused);
    }

    #[endpoint(withdrawToTreasury)]
    fn withdraw_to_treasury(&self) {
        self.require_dao();

        let balance = self
            .blockchain()
            .get_sc_balance(&EgldOrEsdtTokenIdentifier::egld(), 0);
        if balance == 0u64 {
            return;
        }

        let treasury = self.treasury_address().get();
        self.tx()
            .to(&treasury)
            .typed(treasury_proxy::TreasuryProxy)
            .deposit()
            .egld(&balance)
            .sync_call();

        self.withdrawn_to_treasury_event(&treasury, &balance);
    }

    fn require_dao(&self) {
        require!(
            self.blockchain().get_caller() == self.dao_address().get(),
            ERR_ONLY_DAO
        );
    }

    // ========================================================
    // VIEWS: quotes mirror buy/sell without touching state
    // ========================================================

    #[view(calculatePurchaseAcrossTiers)]
    fn calculate_purchase_across_tiers(&self, funds: BigUint) -> BigUint {
        let mut curve = self.curve().get();
        match curve.buy(&funds) {
            Ok(fill) => fill.tokens,
            Err(err) => sc_panic!(err),
        }
    }

    #[view(calculateSellReturn)]
    fn calculate_sell_return(&self, token_amount: BigUint) -> BigUint {
        let mut curve = self.curve().get();
        match curve.sell(&token_amount) {
            Ok(fill) => fill.funds,
            Err(err) => sc_panic!(err),
        }
    }

    /// (tokens received, price per tier, tokens bought per tier)
    #[view(quoteTokensForExactETH)]
    fn quote_tokens_for_exact_eth(
        &self,
        funds: BigUint,
    ) -> MultiValue3<BigUint, ManagedVec<BigUint>, ManagedVec<BigUint>> {
        let curve = self.curve().get();
        let mut walk = curve.clone();
        let fill = match walk.buy(&funds) {
            Ok(fill) => fill,
            Err(err) => sc_panic!(err),
        };
        let (prices, amounts) = curve.breakdown(&fill);
        (fill.tokens, prices, amounts).into()
    }

    /// (EGLD returned, price per tier, tokens returned per tier)
    #[view(quoteETHForExactTokens)]
    fn quote_eth_for_exact_tokens(
        &self,
        token_amount: BigUint,
    ) -> MultiValue3<BigUint, ManagedVec<BigUint>, ManagedVec<BigUint>> {
        let curve = self.curve().get();
        let mut walk = curve.clone();
        let fill = match walk.sell(&token_amount) {
            Ok(fill) => fill,
            Err(err) => sc_panic!(err),
        };
        let (prices, amounts) = curve.breakdown(&fill);
        (fill.funds, prices, amounts).into()
    }

    /// (current tier, current price, remaining in tier, total remaining, total raised)
    #[view(getPresaleState)]
    fn get_presale_state(&self) -> MultiValue5<u32, BigUint, BigUint, BigUint, BigUint> {
        let curve = self.curve().get();
        (
            curve.current_tier,
            curve.current_price(),
            curve.remaining_in_current_tier(),
            curve.total_remaining(),
            self.total_raised().get(),
        )
            .into()
    }

    #[view(getCurrentTier)]
    fn get_current_tier(&self) -> u32 {
        self.curve().get().current_tier
    }

    #[view(getCurrentPrice)]
    fn get_current_price(&self) -> BigUint {
        self.curve().get().current_price()
    }

    #[view(getRemainingInCurrentTier)]
    fn get_remaining_in_current_tier(&self) -> BigUint {
        self.curve().get().remaining_in_current_tier()
    }

    #[view(getTokensSold)]
    fn get_tokens_sold(&self) -> BigUint {
        self.curve().get().tokens_sold()
    }

    #[view(getTotalRemaining)]
    fn get_total_remaining(&self) -> BigUint {
        self.curve().get().total_remaining()
    }

    #[view(getTokensPerTier)]
    fn get_tokens_per_tier(&self) -> BigUint {
        self.curve().get().tokens_per_tier
    }

    #[view(getInitialPrice)]
    fn get_initial_price(&self) -> BigUint {
        self.curve().get().initial_price
    }

    #[view(getTierCount)]
    fn get_tier_count(&self) -> u32 {
        self.curve().get().tier_count
    }

    /// (price, capacity, sold)
    #[view(getTierInfo)]
    fn get_tier_info(&self, tier: u32) -> MultiValue3<BigUint, BigUint, BigUint> {
        let curve = self.curve().get();
        require!(tier < curve.tier_count, ERR_UNKNOWN_TIER);
        (curve.price(tier), curve.capacity(tier), curve.sold_in(tier)).into()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("tokensPurchased")]
    fn tokens_purchased_event(
        &self,
        #[indexed] buyer: &ManagedAddress,
        #[indexed] eth_in: &BigUint,
        tokens: &BigUint,
    );

    #[event("tokensSold")]
    fn tokens_sold_event(
        &self,
        #[indexed] seller: &ManagedAddress,
        #[indexed] tokens: &BigUint,
        eth_out: &BigUint,
    );

    #[event("presaleEnded")]
    fn presale_ended_event(&self, total_raised: &BigUint);

    #[event("presalePaused")]
    fn presale_paused_event(&self, paused: bool);

    #[event("withdrawnToTreasury")]
    fn withdrawn_to_treasury_event(&self, #[indexed] treasury: &ManagedAddress, amount: &BigUint);

    #[event("deposit")]
    fn deposit_event(&self, #[indexed] from: &ManagedAddress, amount: &BigUint);

    // ========================================================
    // STORAGE
    // ========================================================

    #[view(getDao)]
    #[storage_mapper("daoAddress")]
    fn dao_address(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getToken)]
    #[storage_mapper("token")]
    fn token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[view(getTreasury)]
    #[storage_mapper("treasuryAddress")]
    fn treasury_address(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("curve")]
    fn curve(&self) -> SingleValueMapper<BondingCurve<Self::Api>>;

    #[view(getTotalRaised)]
    #[storage_mapper("totalRaised")]
    fn total_raised(&self) -> SingleValueMapper<BigUint>;

    #[view(isPaused)]
    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;
}

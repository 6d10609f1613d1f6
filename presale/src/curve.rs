multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::errors::{
    ERR_INSUFFICIENT_ETH_BALANCE, ERR_NOT_ENOUGH_TOKENS, ERR_NO_TIERS,
    ERR_SUPPLY_BELOW_TIER_COUNT, ERR_ZERO_INITIAL_PRICE, ERR_ZERO_TOKENS,
};

/// 10^18: EGLD and the sale token both use 18 decimals
pub const ONE: u64 = 1_000_000_000_000_000_000;

/// Tier multipliers are expressed in percent (125 == 1.25x)
pub const PERCENT: u64 = 100;

// ============================================================
// BondingCurve: tiered price schedule plus sale progress
// ============================================================

/// Tiers fill strictly in order, so the whole per-tier state is
/// captured by the current tier and what has been sold inside it:
/// every tier below `current_tier` is full, every tier above is empty.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct BondingCurve<M: ManagedTypeApi> {
    pub initial_price: BigUint<M>,
    pub tier_multiplier_percent: u64,
    pub tier_count: u32,
    pub tokens_per_tier: BigUint<M>,
    /// `tokens_per_tier` plus whatever the floor division left over
    pub last_tier_capacity: BigUint<M>,
    /// Lowest tier with spare capacity, or `tier_count` once sold out
    pub current_tier: u32,
    pub sold_in_tier: BigUint<M>,
}

/// Tokens moved within one tier by a single buy or sell.
#[derive(ManagedVecItem, Clone, PartialEq, Debug)]
pub struct TierFill<M: ManagedTypeApi> {
    pub tier: u32,
    pub tokens: BigUint<M>,
}

/// Outcome of a walk over the curve. `funds` is EGLD spent on a buy
/// and EGLD owed to the seller on a sell.
pub struct Fill<M: ManagedTypeApi> {
    pub tokens: BigUint<M>,
    pub funds: BigUint<M>,
    pub tiers: ManagedVec<M, TierFill<M>>,
}

impl<M: ManagedTypeApi> Fill<M> {
    fn empty() -> Self {
        Fill {
            tokens: BigUint::zero(),
            funds: BigUint::zero(),
            tiers: ManagedVec::new(),
        }
    }

    fn record(&mut self, tier: u32, tokens: &BigUint<M>, funds: &BigUint<M>) {
        self.tokens += tokens;
        self.funds += funds;
        self.tiers.push(TierFill {
            tier,
            tokens: tokens.clone(),
        });
    }

    pub fn tokens_in_tier(&self, tier: u32) -> BigUint<M> {
        for fill in self.tiers.iter() {
            if fill.tier == tier {
                return fill.tokens.clone();
            }
        }
        BigUint::zero()
    }
}

impl<M: ManagedTypeApi> BondingCurve<M> {
    /// Splits `total_amount` into `tier_count` equal tiers. The remainder of
    /// the division is folded into the last tier so the full amount is sellable.
    pub fn new(
        total_amount: &BigUint<M>,
        initial_price: BigUint<M>,
        tier_count: u32,
        tier_multiplier_percent: u64,
    ) -> Result<Self, &'static str> {
        if initial_price == 0u64 {
            return Err(ERR_ZERO_INITIAL_PRICE);
        }
        if tier_count == 0 {
            return Err(ERR_NO_TIERS);
        }

        let tokens_per_tier = total_amount.clone() / tier_count as u64;
        if tokens_per_tier == 0u64 {
            return Err(ERR_SUPPLY_BELOW_TIER_COUNT);
        }
        let lower_tiers = &tokens_per_tier * (tier_count as u64 - 1);
        let last_tier_capacity = total_amount - &lower_tiers;

        Ok(BondingCurve {
            initial_price,
            tier_multiplier_percent,
            tier_count,
            tokens_per_tier,
            last_tier_capacity,
            current_tier: 0,
            sold_in_tier: BigUint::zero(),
        })
    }

    // ========================================================
    // Schedule
    // ========================================================

    /// `price[0] = initial_price`, `price[n] = price[n-1] * multiplier / 100`,
    /// floored at every step.
    pub fn price(&self, tier: u32) -> BigUint<M> {
        let mut price = self.initial_price.clone();
        for _ in 0..tier {
            price = self.next_price(&price);
        }
        price
    }

    fn next_price(&self, price: &BigUint<M>) -> BigUint<M> {
        (price * self.tier_multiplier_percent) / PERCENT
    }

    pub fn capacity(&self, tier: u32) -> BigUint<M> {
        if tier + 1 == self.tier_count {
            self.last_tier_capacity.clone()
        } else {
            self.tokens_per_tier.clone()
        }
    }

    pub fn sold_in(&self, tier: u32) -> BigUint<M> {
        if tier < self.current_tier {
            self.capacity(tier)
        } else if tier == self.current_tier {
            self.sold_in_tier.clone()
        } else {
            BigUint::zero()
        }
    }

    pub fn total_supply(&self) -> BigUint<M> {
        &(&self.tokens_per_tier * (self.tier_count as u64 - 1)) + &self.last_tier_capacity
    }

    // ========================================================
    // Progress
    // ========================================================

    pub fn is_sold_out(&self) -> bool {
        self.current_tier >= self.tier_count
    }

    /// Price of the current tier; the last tier's price once sold out.
    pub fn current_price(&self) -> BigUint<M> {
        if self.is_sold_out() {
            self.price(self.tier_count - 1)
        } else {
            self.price(self.current_tier)
        }
    }

    pub fn remaining_in_current_tier(&self) -> BigUint<M> {
        if self.is_sold_out() {
            return BigUint::zero();
        }
        &self.capacity(self.current_tier) - &self.sold_in_tier
    }

    pub fn tokens_sold(&self) -> BigUint<M> {
        if self.is_sold_out() {
            return self.total_supply();
        }
        &(&self.tokens_per_tier * self.current_tier as u64) + &self.sold_in_tier
    }

    pub fn total_remaining(&self) -> BigUint<M> {
        &self.total_supply() - &self.tokens_sold()
    }

    // ========================================================
    // Walks
    // ========================================================

    /// Spends `funds` from the current tier upwards. Each tier takes
    /// `min(spare capacity, funds * 1e18 / price)` tokens at its own price.
    /// Funds that cannot buy a whole base unit stay unspent.
    pub fn buy(&mut self, funds: &BigUint<M>) -> Result<Fill<M>, &'static str> {
        if self.is_sold_out() {
            return Err(ERR_NOT_ENOUGH_TOKENS);
        }

        let mut fill = Fill::empty();
        let mut remaining_funds = funds.clone();
        let mut price = self.price(self.current_tier);

        while !self.is_sold_out() && remaining_funds > 0u64 {
            let tier = self.current_tier;
            let available = self.remaining_in_current_tier();
            let affordable = (&remaining_funds * ONE) / &price;

            let tier_filled = affordable >= available;
            let tokens = if tier_filled { available } else { affordable };
            if tokens == 0u64 {
                break;
            }

            let cost = (&tokens * &price) / ONE;
            remaining_funds -= &cost;
            self.sold_in_tier += &tokens;
            fill.record(tier, &tokens, &cost);

            if !tier_filled {
                break;
            }
            self.current_tier += 1;
            self.sold_in_tier = BigUint::zero();
            price = self.next_price(&price);
        }

        if fill.tokens == 0u64 {
            return Err(ERR_ZERO_TOKENS);
        }
        Ok(fill)
    }

    /// Returns `tokens` to the curve, refilling the most recently sold
    /// tier first. Each tier pays back at its own price, so this is the
    /// exact inverse of the buys that filled it.
    pub fn sell(&mut self, tokens: &BigUint<M>) -> Result<Fill<M>, &'static str> {
        if *tokens == 0u64 {
            return Err(ERR_ZERO_TOKENS);
        }
        if *tokens > self.tokens_sold() {
            return Err(ERR_INSUFFICIENT_ETH_BALANCE);
        }

        let mut fill = Fill::empty();
        let mut remaining = tokens.clone();

        while remaining > 0u64 {
            if self.sold_in_tier == 0u64 {
                self.current_tier -= 1;
                self.sold_in_tier = self.capacity(self.current_tier);
            }

            let tier = self.current_tier;
            let returned = if remaining < self.sold_in_tier {
                remaining.clone()
            } else {
                self.sold_in_tier.clone()
            };
            let proceeds = (&returned * &self.price(tier)) / ONE;

            self.sold_in_tier -= &returned;
            remaining -= &returned;
            fill.record(tier, &returned, &proceeds);
        }

        Ok(fill)
    }

    /// Parallel per-tier arrays over the whole schedule: tier prices and
    /// the tokens `fill` moved in each tier.
    pub fn breakdown(&self, fill: &Fill<M>) -> (ManagedVec<M, BigUint<M>>, ManagedVec<M, BigUint<M>>) {
        let mut prices = ManagedVec::new();
        let mut amounts = ManagedVec::new();
        let mut price = self.initial_price.clone();
        for tier in 0..self.tier_count {
            amounts.push(fill.tokens_in_tier(tier));
            let next = self.next_price(&price);
            prices.push(price);
            price = next;
        }
        (prices, amounts)
    }
}

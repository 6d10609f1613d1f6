multiversx_sc::imports!();

/// Basis points denominator: 10_000 bps == 1.00x
pub const BPS_DENOMINATOR: u64 = 10_000;

pub const DAY: u64 = 86_400;
pub const WEEK: u64 = 7 * DAY;
pub const MONTH: u64 = 30 * DAY;
pub const THREE_MONTHS: u64 = 90 * DAY;

/// Held for less than a week
pub const BASE_MULTIPLIER_BPS: u64 = 10_000;
/// Held for at least a week
pub const WEEK_MULTIPLIER_BPS: u64 = 12_500;
/// Held for at least a month
pub const MONTH_MULTIPLIER_BPS: u64 = 15_000;
/// Held for at least three months
pub const THREE_MONTHS_MULTIPLIER_BPS: u64 = 20_000;

/// Multiplier earned by a stake that has been held for `held_for` seconds.
pub fn multiplier_bps(held_for: u64) -> u64 {
    if held_for >= THREE_MONTHS {
        THREE_MONTHS_MULTIPLIER_BPS
    } else if held_for >= MONTH {
        MONTH_MULTIPLIER_BPS
    } else if held_for >= WEEK {
        WEEK_MULTIPLIER_BPS
    } else {
        BASE_MULTIPLIER_BPS
    }
}

/// `floor(staked * multiplier / 10_000)`
pub fn voting_power<M: ManagedTypeApi>(staked: &BigUint<M>, held_for: u64) -> BigUint<M> {
    (staked * multiplier_bps(held_for)) / BPS_DENOMINATOR
}

/// Minimum turnout (for + against) a tally needs against the current total stake.
pub fn quorum_threshold<M: ManagedTypeApi>(total_staked: &BigUint<M>, quorum_bps: u64) -> BigUint<M> {
    (total_staked * quorum_bps) / BPS_DENOMINATOR
}

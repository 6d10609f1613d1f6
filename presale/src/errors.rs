pub const ERR_TRANSACTION_EXPIRED: &str = "Transaction expired";
pub const ERR_ZERO_ETH_SENT: &str = "Zero ETH sent";
pub const ERR_ZERO_TOKENS: &str = "Zero tokens";
pub const ERR_PRESALE_PAUSED: &str = "Presale is paused";
pub const ERR_SLIPPAGE_TOO_HIGH: &str = "Slippage too high";
pub const ERR_NOT_ENOUGH_TOKENS: &str = "Not enough tokens";
pub const ERR_INSUFFICIENT_ETH_BALANCE: &str = "Insufficient ETH balance";
pub const ERR_ONLY_DAO: &str = "Only DAO";

pub const ERR_ZERO_INITIAL_PRICE: &str = "Zero initial price";
pub const ERR_ZERO_AMOUNT: &str = "Zero amount";
pub const ERR_ZERO_TREASURY: &str = "Zero treasury";
pub const ERR_INVALID_TOKEN: &str = "Invalid token";
pub const ERR_NO_TIERS: &str = "No tiers";
pub const ERR_SUPPLY_BELOW_TIER_COUNT: &str = "Supply below tier count";
pub const ERR_UNKNOWN_TIER: &str = "Unknown tier";

pub const ERR_EMPTY_VERSION: &str = "Empty version";
pub const ERR_VERSION_EXISTS: &str = "Version exists";
pub const ERR_ZERO_DAO_IMPLEMENTATION: &str = "Zero DAO implementation";
pub const ERR_NO_VERSIONS: &str = "No versions registered";
pub const ERR_INVALID_VERSION: &str = "Invalid version";
pub const ERR_ONLY_LATEST_VERSION: &str = "Only latest version is active";
pub const ERR_INVALID_TOKEN: &str = "Invalid governance token";
pub const ERR_UNKNOWN_DAO: &str = "Unknown DAO";
pub const ERR_TICKER_TOO_LONG: &str = "Symbol must be less than 7 chars";
pub const ERR_SUPPLY_ABOVE_MAXIMUM: &str = "Token amount exceeds maximum";
pub const ERR_SUPPLY_BELOW_CREATOR_SHARE: &str = "Supply below creator share";

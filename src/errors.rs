pub const ERR_ZERO_AMOUNT: &str = "Zero amount";
pub const ERR_ZERO_RECIPIENT: &str = "Zero recipient";
pub const ERR_ZERO_ADDRESS: &str = "Zero address";
pub const ERR_INVALID_TOKEN: &str = "Invalid governance token";
pub const ERR_INVALID_STAKE_TOKEN: &str = "Invalid stake token";
pub const ERR_INSUFFICIENT_STAKE: &str = "Insufficient stake";

pub const ERR_PROPOSAL_NOT_FOUND: &str = "Proposal not found";
pub const ERR_VOTING_ENDED: &str = "Voting ended";
pub const ERR_ALREADY_VOTED: &str = "Already voted";
pub const ERR_NO_VOTING_POWER: &str = "No voting power";
pub const ERR_VOTING_ONGOING: &str = "Voting ongoing";
pub const ERR_ALREADY_EXECUTED: &str = "Already executed";
pub const ERR_QUORUM_NOT_REACHED: &str = "Quorum not reached";
pub const ERR_PROPOSAL_REJECTED: &str = "Proposal rejected";

pub const ERR_DAO_PAUSED: &str = "DAO: paused";
pub const ERR_ALREADY_PAUSED: &str = "Already paused";
pub const ERR_NOT_PAUSED: &str = "Not paused";

pub const ERR_INVALID_VERSION: &str = "Invalid version";
pub const ERR_NO_IMPLEMENTATION: &str = "No implementation for component";
pub const ERR_UNAUTHORIZED_UPGRADE: &str = "Unauthorized upgrade";
pub const ERR_ZERO_INITIAL_PRICE: &str = "Zero initial price";
pub const ERR_UNKNOWN_PRESALE: &str = "Unknown presale";
pub const ERR_INSUFFICIENT_BALANCE: &str = "Insufficient balance";
pub const ERR_TREASURY_ALREADY_BOUND: &str = "Treasury already bound";
pub const ERR_TREASURY_NOT_BOUND: &str = "Treasury not bound";

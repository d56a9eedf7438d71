// Chain Constants
// ===============
//
// Values shared by every network's parameter set.

/// Number of base units in one coin
pub const COIN: u64 = 100_000_000;

/// Subsidy paid by the main and test genesis coinbase, in coins
pub const MAIN_GENESIS_REWARD: u64 = 10;

/// Subsidy paid by the dev and regtest genesis coinbase, in coins
pub const TEST_GENESIS_REWARD: u64 = 50;

/// Name of a devnet started without an explicit name
pub const DEFAULT_DEVNET_NAME: &str = "devnet";

/// Time at which the minimum stake age switches to its second value
pub const STAKE_MIN_AGE_SWITCH_TIME: i64 = 1561734000;

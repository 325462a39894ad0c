pub const DEFAULT_GAS_LIMIT: u64 = 2500;
pub const DEFAULT_GAS_PRICE: f64 = 0.00000001;
/// Eight hours, in seconds.
pub const DEFAULT_TTL: u64 = 28_800;
pub(crate) const DEFAULT_CHAIN_ID: &str = "0";

pub(crate) const MAINNET_ID: &str = "mainnet01";
pub(crate) const TESTNET_ID: &str = "testnet04";
pub(crate) const DEVNET_ID: &str = "development";

pub(crate) const NONCE_PREFIX: &str = "kjs:nonce:";

pub(crate) const ENV_NETWORK: &str = "KADENA_NETWORK";
pub(crate) const ENV_CHAIN_ID: &str = "KADENA_CHAIN_ID";
pub(crate) const ENV_GAS_LIMIT: &str = "KADENA_GAS_LIMIT";
pub(crate) const ENV_GAS_PRICE: &str = "KADENA_GAS_PRICE";
pub(crate) const ENV_TTL: &str = "KADENA_TTL";
pub(crate) const ENV_SECRET_KEY: &str = "KADENA_SECRET_KEY";

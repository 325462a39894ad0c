use std::env;
use std::str::FromStr;

use ed25519_dalek::SigningKey;

use crate::consts::{
    DEFAULT_CHAIN_ID, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, DEFAULT_TTL, DEVNET_ID, ENV_CHAIN_ID,
    ENV_GAS_LIMIT, ENV_GAS_PRICE, ENV_NETWORK, ENV_SECRET_KEY, ENV_TTL, MAINNET_ID, TESTNET_ID,
};
use crate::prelude::Result;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Custom(String),
}

impl Network {
    pub fn id(&self) -> &str {
        match self {
            Network::Mainnet => MAINNET_ID,
            Network::Testnet => TESTNET_ID,
            Network::Devnet => DEVNET_ID,
            Network::Custom(id) => id,
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    /// Accepts both the short names (`mainnet`) and the network ids
    /// (`mainnet01`). Anything else is taken as a custom network id.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Config("network id cannot be empty".to_string()));
        }
        Ok(match s.to_lowercase().as_str() {
            "mainnet" | MAINNET_ID => Network::Mainnet,
            "testnet" | TESTNET_ID => Network::Testnet,
            "devnet" | DEVNET_ID => Network::Devnet,
            _ => Network::Custom(s.to_string()),
        })
    }
}

/// Defaults applied when a transaction is built from an incomplete command.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    pub network: Network,
    pub chain_id: String,
    pub gas_limit: u64,
    pub gas_price: f64,
    pub ttl: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            network: Network::default(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
            ttl: DEFAULT_TTL,
        }
    }
}

impl BuilderConfig {
    /// Reads overrides from the environment, loading a `.env` file first if
    /// one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = BuilderConfig::default();
        if let Some(network) = lookup(ENV_NETWORK) {
            config.network = network.parse()?;
        }
        if let Some(chain_id) = lookup(ENV_CHAIN_ID) {
            config.chain_id = chain_id;
        }
        if let Some(gas_limit) = lookup(ENV_GAS_LIMIT) {
            config.gas_limit = parse_var(ENV_GAS_LIMIT, &gas_limit)?;
        }
        if let Some(gas_price) = lookup(ENV_GAS_PRICE) {
            config.gas_price = parse_var(ENV_GAS_PRICE, &gas_price)?;
        }
        if let Some(ttl) = lookup(ENV_TTL) {
            config.ttl = parse_var(ENV_TTL, &ttl)?;
        }
        Ok(config)
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| Error::Config(format!("{key}={value:?}: {e}")))
}

/// Loads the ed25519 secret key from `KADENA_SECRET_KEY`, if set.
pub fn signer_key_from_env() -> Result<Option<SigningKey>> {
    dotenv::dotenv().ok();
    match env::var(ENV_SECRET_KEY) {
        Ok(hex_key) => parse_secret_key(&hex_key).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config(format!("{ENV_SECRET_KEY}: {e}"))),
    }
}

pub(crate) fn parse_secret_key(hex_key: &str) -> Result<SigningKey> {
    let bytes = hex::decode(hex_key.trim()).map_err(|e| Error::PrivateKeyParse(e.to_string()))?;
    let secret: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
        Error::PrivateKeyParse(format!("expected 32 bytes, got {}", bytes.len()))
    })?;
    Ok(SigningKey::from_bytes(&secret))
}

//! Network mode selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The environment a session targets.
///
/// Loaded once per session from the config store and never mutated afterwards;
/// changing it means persisting a new mode and starting a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Production networks
    Mainnet,
    /// Public test networks
    Testnet,
    /// A locally running node
    Local,
    /// Development clusters (Solana devnet and similar)
    Devnet,
    /// Staging networks (Monero stagenet and similar)
    Stagenet,
}

impl NetworkMode {
    pub const ALL: [NetworkMode; 5] = [
        NetworkMode::Mainnet,
        NetworkMode::Testnet,
        NetworkMode::Local,
        NetworkMode::Devnet,
        NetworkMode::Stagenet,
    ];

    /// Lowercase name, as written to the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Local => "local",
            Self::Devnet => "devnet",
            Self::Stagenet => "stagenet",
        }
    }

    /// Whether the mode moves real value
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }

    /// Whether `init` attempts network provisioning in this mode
    pub fn provisions_on_init(&self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl Default for NetworkMode {
    fn default() -> Self {
        Self::Testnet
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "local" | "localnet" | "regtest" => Ok(Self::Local),
            "devnet" => Ok(Self::Devnet),
            "stagenet" => Ok(Self::Stagenet),
            other => Err(Error::InvalidInput(format!("Unknown network mode: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("testnet".parse::<NetworkMode>().unwrap(), NetworkMode::Testnet);
        assert_eq!("MAINNET".parse::<NetworkMode>().unwrap(), NetworkMode::Mainnet);
        assert_eq!(" stagenet ".parse::<NetworkMode>().unwrap(), NetworkMode::Stagenet);
        assert!("moon".parse::<NetworkMode>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_serde() {
        for mode in NetworkMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode));
        }
    }

    #[test]
    fn test_only_testnet_provisions_on_init() {
        let provisioning: Vec<_> = NetworkMode::ALL
            .into_iter()
            .filter(NetworkMode::provisions_on_init)
            .collect();
        assert_eq!(provisioning, vec![NetworkMode::Testnet]);
    }
}

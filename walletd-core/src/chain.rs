//! Supported chains and their conventions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::KeyScheme;
use crate::error::{Error, Result};
use crate::mode::NetworkMode;

/// A blockchain network the wallet can hold keys for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Solana,
    Monero,
    Hedera,
    /// Internet Computer ledger
    Icp,
}

impl Chain {
    pub const ALL: [Chain; 6] = [
        Chain::Bitcoin,
        Chain::Ethereum,
        Chain::Solana,
        Chain::Monero,
        Chain::Hedera,
        Chain::Icp,
    ];

    /// Lowercase name used in config sections and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
            Self::Solana => "solana",
            Self::Monero => "monero",
            Self::Hedera => "hedera",
            Self::Icp => "icp",
        }
    }

    /// Signature scheme the chain's keys use
    pub fn key_scheme(&self) -> KeyScheme {
        match self {
            Self::Bitcoin | Self::Ethereum | Self::Icp => KeyScheme::Secp256k1,
            Self::Solana | Self::Hedera => KeyScheme::Ed25519,
            Self::Monero => KeyScheme::MoneroEd25519,
        }
    }

    /// Ticker of the native currency
    pub fn native_unit(&self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::Ethereum => "ETH",
            Self::Solana => "SOL",
            Self::Monero => "XMR",
            Self::Hedera => "HBAR",
            Self::Icp => "ICP",
        }
    }

    /// Number of decimals between the smallest unit and one whole coin
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Bitcoin => 8,
            Self::Ethereum => 18,
            Self::Solana => 9,
            Self::Monero => 12,
            Self::Hedera => 8,
            Self::Icp => 8,
        }
    }

    /// Format a simulated account number using the chain's account convention.
    ///
    /// Hedera accounts are `shard.realm.num`; chains whose account is the
    /// address get the number attached to the address instead.
    pub fn simulated_account_id(&self, number: u64, address: &str) -> String {
        match self {
            Self::Hedera => format!("0.0.{}", number),
            _ => format!("sim-{}@{}", number, address),
        }
    }

    /// Where a user can obtain a real account or test funds
    pub fn account_portal_url(&self, mode: NetworkMode) -> &'static str {
        match (self, mode.is_mainnet()) {
            (Self::Hedera, _) => "https://portal.hedera.com/",
            (Self::Bitcoin, false) => "https://coinfaucet.eu/en/btc-testnet/",
            (Self::Ethereum, false) => "https://sepoliafaucet.com/",
            (Self::Solana, false) => "https://faucet.solana.com/",
            (Self::Monero, false) => "https://community.rino.io/faucet/stagenet/",
            (Self::Icp, false) => "https://faucet.dfinity.org/",
            (Self::Bitcoin, true) => "https://bitcoin.org/en/buy",
            (Self::Ethereum, true) => "https://ethereum.org/en/get-eth/",
            (Self::Solana, true) => "https://solana.com/ecosystem/explore",
            (Self::Monero, true) => "https://www.getmonero.org/get-started/accepting/",
            (Self::Icp, true) => "https://internetcomputer.org/docs/current/developer-docs/getting-started/",
        }
    }

    /// Block explorer page for an account, if the chain has a public one for the mode
    pub fn explorer_url(&self, mode: NetworkMode, account: &str) -> Option<String> {
        match (self, mode) {
            (Self::Hedera, NetworkMode::Mainnet) => Some(format!("https://hashscan.io/mainnet/account/{}", account)),
            (Self::Hedera, NetworkMode::Testnet) => Some(format!("https://hashscan.io/testnet/account/{}", account)),
            (Self::Bitcoin, NetworkMode::Mainnet) => Some(format!("https://blockstream.info/address/{}", account)),
            (Self::Bitcoin, NetworkMode::Testnet) => Some(format!("https://blockstream.info/testnet/address/{}", account)),
            (Self::Ethereum, NetworkMode::Mainnet) => Some(format!("https://etherscan.io/address/{}", account)),
            (Self::Ethereum, NetworkMode::Testnet) => Some(format!("https://sepolia.etherscan.io/address/{}", account)),
            (Self::Solana, NetworkMode::Mainnet) => Some(format!("https://explorer.solana.com/address/{}", account)),
            (Self::Solana, NetworkMode::Testnet | NetworkMode::Devnet) => {
                Some(format!("https://explorer.solana.com/address/{}?cluster=devnet", account))
            }
            (Self::Icp, NetworkMode::Mainnet) => Some(format!("https://dashboard.internetcomputer.org/account/{}", account)),
            _ => None,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Self::Bitcoin),
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "solana" | "sol" => Ok(Self::Solana),
            "monero" | "xmr" => Ok(Self::Monero),
            "hedera" | "hbar" => Ok(Self::Hedera),
            "icp" | "internet-computer" => Ok(Self::Icp),
            other => Err(Error::InvalidInput(format!("Unsupported chain: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_names_and_tickers() {
        assert_eq!("hbar".parse::<Chain>().unwrap(), Chain::Hedera);
        assert_eq!("Hedera".parse::<Chain>().unwrap(), Chain::Hedera);
        assert_eq!("XMR".parse::<Chain>().unwrap(), Chain::Monero);
        assert!("dogecoin".parse::<Chain>().is_err());
    }

    #[test]
    fn test_simulated_account_formatting() {
        assert_eq!(Chain::Hedera.simulated_account_id(1234567, "ignored"), "0.0.1234567");
        assert_eq!(
            Chain::Ethereum.simulated_account_id(7654321, "0xabc"),
            "sim-7654321@0xabc"
        );
    }

    #[test]
    fn test_explorer_only_for_public_networks() {
        assert!(Chain::Hedera.explorer_url(NetworkMode::Testnet, "0.0.5").is_some());
        assert!(Chain::Hedera.explorer_url(NetworkMode::Local, "0.0.5").is_none());
    }
}

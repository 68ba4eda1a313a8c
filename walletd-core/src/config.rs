//! Wallet configuration and its persistence

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::mode::NetworkMode;

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "walletd_config.json";

/// Default bound on a single provisioning request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Persisted wallet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub mode: NetworkMode,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    pub bitcoin: BitcoinConfig,
    pub ethereum: EthereumConfig,
    pub solana: SolanaConfig,
    pub monero: MoneroConfig,
    pub hedera: HederaConfig,
    pub icp: IcpConfig,
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitcoinConfig {
    /// "mainnet", "testnet", "regtest"
    pub network: String,
    /// Esplora REST endpoint
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthereumConfig {
    pub network: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolanaConfig {
    /// "mainnet-beta", "testnet", "devnet", "localnet"
    pub cluster: String,
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneroConfig {
    pub network: String,
    /// Daemon JSON-RPC endpoint
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HederaConfig {
    /// Consensus network: "mainnet", "testnet" or "previewnet"
    pub network: String,
    /// Mirror node REST endpoint, read for balances
    pub mirror_node_url: String,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub operator_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpConfig {
    /// "ic" or "local"
    pub network: String,
    pub rpc_url: String,
    #[serde(default)]
    pub identity_path: Option<String>,
}

/// Endpoint a chain's network client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
    /// Chain-specific network name (cluster, chain id, ...)
    pub network: String,
    pub timeout: Duration,
}

impl WalletConfig {
    /// Default endpoints for a mode
    pub fn for_mode(mode: NetworkMode) -> Self {
        let main = mode.is_mainnet();
        let local = matches!(mode, NetworkMode::Local);

        let bitcoin = match mode {
            NetworkMode::Mainnet => BitcoinConfig {
                network: "mainnet".to_string(),
                rpc_url: "https://blockstream.info/api".to_string(),
            },
            NetworkMode::Local => BitcoinConfig {
                network: "regtest".to_string(),
                rpc_url: "http://localhost:3002".to_string(),
            },
            _ => BitcoinConfig {
                network: "testnet".to_string(),
                rpc_url: "https://blockstream.info/testnet/api".to_string(),
            },
        };

        let ethereum = match mode {
            NetworkMode::Mainnet => EthereumConfig {
                network: "mainnet".to_string(),
                chain_id: 1,
                rpc_url: "https://eth.llamarpc.com".to_string(),
            },
            NetworkMode::Local => EthereumConfig {
                network: "local".to_string(),
                chain_id: 31337,
                rpc_url: "http://localhost:8545".to_string(),
            },
            _ => EthereumConfig {
                network: "sepolia".to_string(),
                chain_id: 11_155_111,
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            },
        };

        let solana = match mode {
            NetworkMode::Mainnet => SolanaConfig {
                cluster: "mainnet-beta".to_string(),
                rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            },
            NetworkMode::Local => SolanaConfig {
                cluster: "localnet".to_string(),
                rpc_url: "http://localhost:8899".to_string(),
            },
            _ => SolanaConfig {
                cluster: "devnet".to_string(),
                rpc_url: "https://api.devnet.solana.com".to_string(),
            },
        };

        let monero = MoneroConfig {
            network: crate::crypto::keys::monero::network_name(mode).to_string(),
            rpc_url: match mode {
                NetworkMode::Mainnet => "http://node.moneroworld.com:18089",
                NetworkMode::Local | NetworkMode::Devnet => "http://localhost:28081",
                _ => "http://stagenet.xmr-tw.org:38081",
            }
            .to_string(),
        };

        let hedera = HederaConfig {
            network: if main { "mainnet" } else if local { "local" } else { "testnet" }.to_string(),
            mirror_node_url: if main {
                "https://mainnet-public.mirrornode.hedera.com"
            } else if local {
                "http://localhost:5551"
            } else {
                "https://testnet.mirrornode.hedera.com"
            }
            .to_string(),
            operator_id: None,
            operator_key: None,
        };

        let icp = IcpConfig {
            network: if main { "ic" } else { "local" }.to_string(),
            rpc_url: if main { "https://icp-api.io" } else { "http://localhost:4943" }.to_string(),
            identity_path: None,
        };

        Self {
            mode,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            bitcoin,
            ethereum,
            solana,
            monero,
            hedera,
            icp,
        }
    }

    /// Switch to another mode.
    ///
    /// Sections whose endpoints still hold the current mode's defaults move to
    /// the new mode's defaults; edited sections are kept as they are.
    /// Credentials and the timeout always carry over.
    pub fn with_mode(&self, mode: NetworkMode) -> Self {
        let current = Self::for_mode(self.mode);
        let mut next = Self::for_mode(mode);
        next.request_timeout_secs = self.request_timeout_secs;

        if self.bitcoin != current.bitcoin {
            next.bitcoin = self.bitcoin.clone();
        }
        if self.ethereum != current.ethereum {
            next.ethereum = self.ethereum.clone();
        }
        if self.solana != current.solana {
            next.solana = self.solana.clone();
        }
        if self.monero != current.monero {
            next.monero = self.monero.clone();
        }
        if self.hedera.network != current.hedera.network
            || self.hedera.mirror_node_url != current.hedera.mirror_node_url
        {
            next.hedera.network = self.hedera.network.clone();
            next.hedera.mirror_node_url = self.hedera.mirror_node_url.clone();
        }
        if self.icp.network != current.icp.network || self.icp.rpc_url != current.icp.rpc_url {
            next.icp.network = self.icp.network.clone();
            next.icp.rpc_url = self.icp.rpc_url.clone();
        }

        next.hedera.operator_id = self.hedera.operator_id.clone();
        next.hedera.operator_key = self.hedera.operator_key.clone();
        next.icp.identity_path = self.icp.identity_path.clone();
        next
    }

    /// Endpoint for a chain's network client
    pub fn endpoint(&self, chain: Chain) -> EndpointConfig {
        let (url, network) = match chain {
            Chain::Bitcoin => (&self.bitcoin.rpc_url, self.bitcoin.network.clone()),
            Chain::Ethereum => (&self.ethereum.rpc_url, self.ethereum.chain_id.to_string()),
            Chain::Solana => (&self.solana.rpc_url, self.solana.cluster.clone()),
            Chain::Monero => (&self.monero.rpc_url, self.monero.network.clone()),
            Chain::Hedera => (&self.hedera.mirror_node_url, self.hedera.network.clone()),
            Chain::Icp => (&self.icp.rpc_url, self.icp.network.clone()),
        };

        EndpointConfig {
            url: url.trim_end_matches('/').to_string(),
            network,
            timeout: self.request_timeout(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Check the values the subsystem depends on before anything runs
    pub fn validate(&self) -> Result<()> {
        for chain in Chain::ALL {
            let endpoint = self.endpoint(chain);
            if endpoint.url.is_empty() {
                return Err(Error::Config(format!("{} endpoint is not set", chain)));
            }
            if !(endpoint.url.starts_with("http://") || endpoint.url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "{} endpoint must be an http(s) URL: {}",
                    chain, endpoint.url
                )));
            }
        }
        Ok(())
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self::for_mode(NetworkMode::default())
    }
}

/// Source and sink of the wallet configuration
pub trait ConfigStore: Send + Sync {
    /// Load the configuration
    fn load(&self) -> Result<WalletConfig>;

    /// Persist the configuration
    fn save(&self, config: &WalletConfig) -> Result<()>;
}

/// Configuration kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore for JsonConfigStore {
    /// Read the file, writing the defaults back when it does not exist yet
    fn load(&self) -> Result<WalletConfig> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = WalletConfig::default();
                if let Err(e) = self.save(&config) {
                    warn!(path = %self.path.display(), error = %e, "could not write default config");
                } else {
                    info!(path = %self.path.display(), "wrote default config");
                }
                Ok(config)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn save(&self, config: &WalletConfig) -> Result<()> {
        let contents = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walletd_config.json");
        let store = JsonConfigStore::new(&path);

        let config = store.load().unwrap();
        assert_eq!(config.mode, NetworkMode::Testnet);
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("config.json"));

        let mut config = WalletConfig::for_mode(NetworkMode::Mainnet);
        config.hedera.operator_id = Some("0.0.1001".to_string());
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_null_credentials_parse() {
        let mut value = serde_json::to_value(WalletConfig::default()).unwrap();
        value["hedera"]["operator_id"] = serde_json::Value::Null;
        value["hedera"]["operator_key"] = serde_json::Value::Null;
        value["icp"]["identity_path"] = serde_json::Value::Null;
        let config: WalletConfig = serde_json::from_value(value).unwrap();
        assert!(config.hedera.operator_id.is_none());
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonConfigStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_with_mode_keeps_credentials() {
        let mut config = WalletConfig::for_mode(NetworkMode::Testnet);
        config.hedera.operator_id = Some("0.0.42".to_string());
        config.request_timeout_secs = 5;

        let mainnet = config.with_mode(NetworkMode::Mainnet);
        assert_eq!(mainnet.mode, NetworkMode::Mainnet);
        assert_eq!(mainnet.hedera.operator_id.as_deref(), Some("0.0.42"));
        assert_eq!(mainnet.request_timeout_secs, 5);
        assert_eq!(mainnet.solana.cluster, "mainnet-beta");
    }

    #[test]
    fn test_with_mode_keeps_edited_endpoints() {
        let mut config = WalletConfig::for_mode(NetworkMode::Testnet);
        config.solana.rpc_url = "https://rpc.example.org".to_string();
        config.hedera.mirror_node_url = "https://mirror.example.org".to_string();

        let local = config.with_mode(NetworkMode::Local);
        let defaults = WalletConfig::for_mode(NetworkMode::Local);

        assert_eq!(local.solana, config.solana);
        assert_eq!(local.hedera.mirror_node_url, "https://mirror.example.org");
        assert_eq!(local.hedera.network, "testnet");
        assert_eq!(local.ethereum, defaults.ethereum);
        assert_eq!(local.bitcoin, defaults.bitcoin);
        assert_eq!(local.icp, defaults.icp);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let mut config = WalletConfig::default();
        config.hedera.mirror_node_url = "https://mirror.example.org/".to_string();
        assert_eq!(config.endpoint(Chain::Hedera).url, "https://mirror.example.org");
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let mut config = WalletConfig::default();
        assert!(config.validate().is_ok());
        config.monero.rpc_url = "ssl://electrum.example:50002".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}

//! walletd core - multi-chain wallet initialization and account provisioning
//!
//! This library generates key pairs and addresses for Bitcoin, Ethereum,
//! Solana, Monero, Hedera and the Internet Computer, binds them to network
//! accounts according to the configured network mode, and falls back to
//! clearly flagged simulated accounts when testnet provisioning fails.

pub mod error;
pub mod mode;
pub mod chain;
pub mod crypto;
pub mod config;
pub mod credentials;
pub mod wallet;
pub mod provision;
pub mod service;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use mode::NetworkMode;
pub use chain::Chain;
pub use config::{ConfigStore, JsonConfigStore, WalletConfig};
pub use credentials::{CredentialSource, EnvCredentialSource, OperatorCredentials};
pub use provision::{AccountProvisioner, ProvisioningOutcome, SimulationReason};
pub use service::{InitReport, InitStatus, WalletService};
pub use wallet::{AccountId, Balance, WalletHandle, WalletRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Wallet initialization service
//!
//! Ties the factory, the provisioner and the registry together. A service is
//! an ordinary value; callers that need several independent wallet sets simply
//! build several services.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument};

use crate::chain::Chain;
use crate::config::WalletConfig;
use crate::credentials::CredentialSource;
use crate::error::{Error, Result};
use crate::mode::NetworkMode;
use crate::provision::{AccountProvisioner, ProvisioningOutcome, SimulationReason};
use crate::wallet::{AccountId, Balance, ChainWalletFactory, WalletHandle, WalletRegistry};

/// How an initialization ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    /// Bound to a real account
    Provisioned,
    /// Bound to a simulated account
    Simulated(SimulationReason),
    /// Mainnet: keys only, the account has to be created explicitly
    ManualProvisioningRequired,
    /// Keys only, no provisioning in this mode
    LocalOnly(NetworkMode),
}

impl InitStatus {
    fn from_outcome(outcome: &ProvisioningOutcome, mode: NetworkMode) -> Self {
        match outcome {
            ProvisioningOutcome::RealAccount { .. } => Self::Provisioned,
            ProvisioningOutcome::SimulatedAccount { reason, .. } => Self::Simulated(reason.clone()),
            ProvisioningOutcome::Failed { .. } if mode.is_mainnet() => Self::ManualProvisioningRequired,
            ProvisioningOutcome::Failed { .. } => Self::LocalOnly(mode),
        }
    }
}

impl fmt::Display for InitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provisioned => f.write_str("provisioned"),
            Self::Simulated(reason) => write!(f, "simulated ({})", reason),
            Self::ManualProvisioningRequired => f.write_str("manual provisioning required"),
            Self::LocalOnly(mode) => write!(f, "local only ({})", mode),
        }
    }
}

/// Summary of one chain initialization, free of private key material
#[derive(Debug, Clone)]
pub struct InitReport {
    pub chain: Chain,
    pub mode: NetworkMode,
    pub address: String,
    pub public_key: String,
    pub account: Option<AccountId>,
    pub balance: Option<Balance>,
    pub status: InitStatus,
    /// Whether an earlier wallet for the chain was replaced
    pub replaced: bool,
}

impl InitReport {
    fn from_handle(handle: &WalletHandle, status: InitStatus) -> Result<Self> {
        Ok(Self {
            chain: handle.chain(),
            mode: handle.mode(),
            address: handle.address().to_string(),
            public_key: handle.public_key_display()?,
            account: handle.account_id().cloned(),
            balance: handle.balance().cloned(),
            status,
            replaced: false,
        })
    }

    /// Lines telling the user what to do next
    pub fn guidance(&self) -> Vec<String> {
        match &self.status {
            InitStatus::Provisioned => self
                .account
                .as_ref()
                .and_then(|account| self.chain.explorer_url(self.mode, account.as_str()))
                .map(|url| vec![format!("View account: {}", url)])
                .unwrap_or_default(),
            InitStatus::Simulated(reason) => reason.guidance(self.chain, self.mode),
            InitStatus::ManualProvisioningRequired => vec![
                format!("{} mainnet accounts are not created automatically", self.chain),
                format!("Create one at {}", self.chain.account_portal_url(self.mode)),
                format!("or run `walletd init {} --provision` with operator credentials", self.chain),
            ],
            InitStatus::LocalOnly(mode) => vec![format!(
                "{} mode does not provision accounts; the key pair is local only",
                mode
            )],
        }
    }
}

/// Initializes and holds the wallets for one configuration
pub struct WalletService {
    config: WalletConfig,
    factory: ChainWalletFactory,
    provisioner: AccountProvisioner,
    registry: WalletRegistry,
}

impl WalletService {
    /// Build a service, rejecting an unusable configuration up front
    pub fn new(config: WalletConfig, provisioner: AccountProvisioner) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            factory: ChainWalletFactory::new(),
            provisioner,
            registry: WalletRegistry::new(),
        })
    }

    /// Build a service that talks to the configured endpoints over HTTP
    pub fn with_default_creators(config: WalletConfig, credentials: Arc<dyn CredentialSource>) -> Result<Self> {
        Self::new(config, AccountProvisioner::with_default_creators(credentials))
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn mode(&self) -> NetworkMode {
        self.config.mode
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    /// Current wallet for a chain
    pub fn wallet(&self, chain: Chain) -> Option<Arc<WalletHandle>> {
        self.registry.get(chain)
    }

    /// Generate a wallet for `chain`, provision it according to the mode and
    /// install it, replacing any earlier wallet for the chain.
    ///
    /// Only key generation can fail; provisioning problems end up in the
    /// report's status.
    #[instrument(skip(self), fields(mode = %self.config.mode))]
    pub async fn init(&self, chain: Chain) -> Result<InitReport> {
        let mode = self.config.mode;
        let handle = self.factory.create(chain, mode)?;
        let endpoint = self.config.endpoint(chain);

        let outcome = self.provisioner.provision(&handle, mode, &endpoint).await;
        let status = InitStatus::from_outcome(&outcome, mode);
        let handle = outcome.apply(handle);

        let mut report = InitReport::from_handle(&handle, status)?;
        report.replaced = self.registry.install(handle);

        info!(%chain, status = %report.status, replaced = report.replaced, "wallet initialized");
        Ok(report)
    }

    /// Initialize several chains concurrently; each result is independent
    pub async fn init_all(&self, chains: &[Chain]) -> Vec<(Chain, Result<InitReport>)> {
        join_all(chains.iter().map(|&chain| async move { (chain, self.init(chain).await) })).await
    }

    /// Create a real account for an initialized wallet, in any mode.
    ///
    /// Nothing is simulated here: failures are returned and the installed
    /// wallet stays as it was.
    #[instrument(skip(self), fields(mode = %self.config.mode))]
    pub async fn provision(&self, chain: Chain) -> Result<InitReport> {
        let current = self
            .registry
            .get(chain)
            .ok_or_else(|| Error::NotInitialized(chain.to_string()))?;

        let endpoint = self.config.endpoint(chain);
        let created = self
            .provisioner
            .provision_strict(&current, &endpoint)
            .await
            .map_err(|e| Error::Provisioning(format!("{}: {}", SimulationReason::classify(&e), e)))?;

        let handle = current.rebound(AccountId::Real(created.account_id), created.balance)?;
        let mut report = InitReport::from_handle(&handle, InitStatus::Provisioned)?;

        if !self.registry.replace(&current, handle) {
            return Err(Error::Provisioning(format!(
                "{} wallet was re-initialized while provisioning",
                chain
            )));
        }
        report.replaced = true;

        info!(%chain, account = ?report.account, "wallet provisioned on request");
        Ok(report)
    }
}

impl fmt::Debug for WalletService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletService")
            .field("mode", &self.config.mode)
            .field("provisioner", &self.provisioner)
            .field("wallets", &self.registry.chains())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;

    fn service(mode: NetworkMode) -> WalletService {
        let provisioner = AccountProvisioner::new(Arc::new(StaticCredentials::none()));
        WalletService::new(WalletConfig::for_mode(mode), provisioner).unwrap()
    }

    #[tokio::test]
    async fn test_local_mode_is_keys_only() {
        let service = service(NetworkMode::Local);
        let report = service.init(Chain::Ethereum).await.unwrap();

        assert_eq!(report.status, InitStatus::LocalOnly(NetworkMode::Local));
        assert!(report.account.is_none());
        assert!(service.wallet(Chain::Ethereum).is_some());
    }

    #[tokio::test]
    async fn test_provision_requires_initialized_wallet() {
        let err = service(NetworkMode::Mainnet).provision(Chain::Hedera).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = WalletConfig::default();
        config.hedera.mirror_node_url = String::new();
        let provisioner = AccountProvisioner::new(Arc::new(StaticCredentials::none()));
        assert!(matches!(WalletService::new(config, provisioner), Err(Error::Config(_))));
    }

    #[test]
    fn test_mainnet_guidance_mentions_explicit_provisioning() {
        let report = InitReport {
            chain: Chain::Hedera,
            mode: NetworkMode::Mainnet,
            address: String::new(),
            public_key: String::new(),
            account: None,
            balance: None,
            status: InitStatus::ManualProvisioningRequired,
            replaced: false,
        };
        let guidance = report.guidance();
        assert!(guidance.iter().any(|l| l.contains("https://portal.hedera.com/")));
        assert!(guidance.iter().any(|l| l.contains("--provision")));
    }
}

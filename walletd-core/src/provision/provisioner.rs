//! Account provisioner

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::chain::Chain;
use crate::config::EndpointConfig;
use crate::credentials::CredentialSource;
use crate::mode::NetworkMode;
use crate::wallet::{Balance, WalletHandle};
use super::client::{AccountCreator, AccountRequest, CreateAccountError, CreatedAccount};
use super::http::default_creators;
use super::outcome::{FailureCause, ProvisioningOutcome, SimulationReason};

/// Smallest number drawn for a simulated account id
pub const SIMULATED_ID_MIN: u64 = 1_000_000;

/// Largest number drawn for a simulated account id
pub const SIMULATED_ID_MAX: u64 = 9_999_999;

/// Obtains accounts for freshly generated wallets
pub struct AccountProvisioner {
    creators: HashMap<Chain, Arc<dyn AccountCreator>>,
    credentials: Arc<dyn CredentialSource>,
    rng: Mutex<StdRng>,
}

impl AccountProvisioner {
    /// A provisioner with no network clients registered
    pub fn new(credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            creators: HashMap::new(),
            credentials,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// A provisioner with the HTTP client for every chain
    pub fn with_default_creators(credentials: Arc<dyn CredentialSource>) -> Self {
        let mut provisioner = Self::new(credentials);
        provisioner.creators = default_creators();
        provisioner
    }

    /// Register or replace the network client for a chain
    pub fn with_creator(mut self, chain: Chain, creator: Arc<dyn AccountCreator>) -> Self {
        self.creators.insert(chain, creator);
        self
    }

    /// Use a specific generator for simulated ids
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Provision an account for `handle` as part of initialization.
    ///
    /// Only testnet provisions. There the result is always an account: a real
    /// one when the network client succeeds, a simulated one otherwise. Any
    /// other mode returns `Failed` without contacting the network.
    pub async fn provision(
        &self,
        handle: &WalletHandle,
        mode: NetworkMode,
        endpoint: &EndpointConfig,
    ) -> ProvisioningOutcome {
        let chain = handle.chain();

        if !mode.provisions_on_init() {
            info!(%chain, %mode, "skipping automatic provisioning");
            return ProvisioningOutcome::Failed {
                cause: FailureCause::NotApplicable(mode),
            };
        }

        match self.create(handle, endpoint).await {
            Ok(created) => {
                info!(%chain, account = %created.account_id, "provisioned account");
                ProvisioningOutcome::RealAccount {
                    id: created.account_id,
                    balance: created.balance,
                }
            }
            Err(err) => {
                let reason = SimulationReason::classify(&err);
                warn!(%chain, error = %err, %reason, "provisioning failed, using simulated account");
                self.simulate(chain, handle.address(), reason)
            }
        }
    }

    /// Provision without any fallback.
    ///
    /// Used for explicit requests, including on mainnet; errors are returned
    /// to the caller and nothing is simulated.
    pub async fn provision_strict(
        &self,
        handle: &WalletHandle,
        endpoint: &EndpointConfig,
    ) -> Result<CreatedAccount, CreateAccountError> {
        let created = self.create(handle, endpoint).await?;
        info!(chain = %handle.chain(), account = %created.account_id, "provisioned account on request");
        Ok(created)
    }

    /// Fabricate a simulated account for `chain`
    pub fn simulate(&self, chain: Chain, address: &str, reason: SimulationReason) -> ProvisioningOutcome {
        let number = self.next_simulated_number();
        ProvisioningOutcome::SimulatedAccount {
            id: chain.simulated_account_id(number, address),
            reason,
            balance: Balance::simulated_placeholder(chain),
        }
    }

    fn next_simulated_number(&self) -> u64 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(SIMULATED_ID_MIN..=SIMULATED_ID_MAX)
    }

    async fn create(
        &self,
        handle: &WalletHandle,
        endpoint: &EndpointConfig,
    ) -> Result<CreatedAccount, CreateAccountError> {
        let chain = handle.chain();
        let creator = self
            .creators
            .get(&chain)
            .ok_or_else(|| CreateAccountError::Other(format!("no network client for {}", chain)))?;

        let credentials = self.credentials.operator_credentials(chain);
        let request = AccountRequest::for_handle(handle, endpoint, credentials);

        match tokio::time::timeout(endpoint.timeout, creator.create_account(&request)).await {
            Ok(result) => result,
            Err(_) => Err(CreateAccountError::Other(format!(
                "request timed out after {:?}",
                endpoint.timeout
            ))),
        }
    }
}

impl fmt::Debug for AccountProvisioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chains: Vec<&Chain> = self.creators.keys().collect();
        chains.sort();
        f.debug_struct("AccountProvisioner").field("creators", &chains).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::credentials::StaticCredentials;
    use crate::wallet::ChainWalletFactory;

    struct FixedCreator {
        result: Result<CreatedAccount, CreateAccountError>,
        calls: AtomicUsize,
    }

    impl FixedCreator {
        fn new(result: Result<CreatedAccount, CreateAccountError>) -> Arc<Self> {
            Arc::new(Self { result, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl AccountCreator for FixedCreator {
        async fn create_account(&self, _request: &AccountRequest) -> Result<CreatedAccount, CreateAccountError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct SlowCreator;

    #[async_trait]
    impl AccountCreator for SlowCreator {
        async fn create_account(&self, _request: &AccountRequest) -> Result<CreatedAccount, CreateAccountError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(CreateAccountError::Other("unreachable".to_string()))
        }
    }

    fn endpoint() -> EndpointConfig {
        EndpointConfig {
            url: "http://localhost:1".to_string(),
            network: "testnet".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn provisioner_with(creator: Arc<dyn AccountCreator>) -> AccountProvisioner {
        AccountProvisioner::new(Arc::new(StaticCredentials::none()))
            .with_creator(Chain::Hedera, creator)
            .with_rng(StdRng::seed_from_u64(7))
    }

    fn hedera_handle(mode: NetworkMode) -> WalletHandle {
        ChainWalletFactory::new().create(Chain::Hedera, mode).unwrap()
    }

    #[tokio::test]
    async fn test_real_account() {
        let creator = FixedCreator::new(Ok(CreatedAccount {
            account_id: "0.0.555123".to_string(),
            balance: None,
        }));
        let provisioner = provisioner_with(creator.clone());

        let outcome = provisioner
            .provision(&hedera_handle(NetworkMode::Testnet), NetworkMode::Testnet, &endpoint())
            .await;

        assert_eq!(
            outcome,
            ProvisioningOutcome::RealAccount { id: "0.0.555123".to_string(), balance: None }
        );
        assert_eq!(creator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_signature_is_simulated() {
        let creator = FixedCreator::new(Err(CreateAccountError::InvalidSignature("rejected".into())));
        let outcome = provisioner_with(creator)
            .provision(&hedera_handle(NetworkMode::Testnet), NetworkMode::Testnet, &endpoint())
            .await;

        match outcome {
            ProvisioningOutcome::SimulatedAccount { id, reason, balance } => {
                assert_eq!(reason, SimulationReason::InvalidCredentials);
                assert!(id.starts_with("0.0."));
                assert_eq!(balance.whole_units(), 10_000);
                assert!(balance.simulated);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_testnet_modes_never_call_the_network() {
        let creator = FixedCreator::new(Err(CreateAccountError::Other("should not run".into())));
        let provisioner = provisioner_with(creator.clone());

        for mode in [NetworkMode::Mainnet, NetworkMode::Local, NetworkMode::Devnet, NetworkMode::Stagenet] {
            let outcome = provisioner.provision(&hedera_handle(mode), mode, &endpoint()).await;
            assert_eq!(outcome, ProvisioningOutcome::Failed { cause: FailureCause::NotApplicable(mode) });
        }
        assert_eq!(creator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_client_is_simulated() {
        let provisioner = AccountProvisioner::new(Arc::new(StaticCredentials::none()));
        let outcome = provisioner
            .provision(&hedera_handle(NetworkMode::Testnet), NetworkMode::Testnet, &endpoint())
            .await;
        assert!(matches!(
            outcome,
            ProvisioningOutcome::SimulatedAccount { reason: SimulationReason::OtherFailure(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_other_failure() {
        let endpoint = EndpointConfig { timeout: Duration::from_millis(50), ..endpoint() };
        let outcome = provisioner_with(Arc::new(SlowCreator))
            .provision(&hedera_handle(NetworkMode::Testnet), NetworkMode::Testnet, &endpoint)
            .await;

        match outcome {
            ProvisioningOutcome::SimulatedAccount { reason: SimulationReason::OtherFailure(detail), .. } => {
                assert!(detail.contains("timed out"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_strict_surfaces_errors_on_mainnet() {
        let creator = FixedCreator::new(Err(CreateAccountError::CredentialMissing("OPERATOR_ID".into())));
        let provisioner = provisioner_with(creator.clone());

        let err = provisioner
            .provision_strict(&hedera_handle(NetworkMode::Mainnet), &endpoint())
            .await
            .unwrap_err();

        assert!(matches!(err, CreateAccountError::CredentialMissing(_)));
        assert_eq!(creator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_simulated_ids_stay_in_range() {
        let provisioner = AccountProvisioner::new(Arc::new(StaticCredentials::none()));
        for _ in 0..1_000 {
            let n = provisioner.next_simulated_number();
            assert!((SIMULATED_ID_MIN..=SIMULATED_ID_MAX).contains(&n));
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = AccountProvisioner::new(Arc::new(StaticCredentials::none())).with_rng(StdRng::seed_from_u64(42));
        let b = AccountProvisioner::new(Arc::new(StaticCredentials::none())).with_rng(StdRng::seed_from_u64(42));

        let first = a.simulate(Chain::Hedera, "", SimulationReason::CredentialsNotConfigured);
        let second = b.simulate(Chain::Hedera, "", SimulationReason::CredentialsNotConfigured);
        assert_eq!(first, second);
    }

    #[test]
    fn test_simulated_id_for_address_chains_keeps_address() {
        let provisioner = AccountProvisioner::new(Arc::new(StaticCredentials::none()));
        let outcome = provisioner.simulate(Chain::Solana, "So1ana", SimulationReason::InvalidCredentials);
        let id = outcome.account_id().unwrap();
        assert!(id.is_simulated());
        assert!(id.as_str().starts_with("sim-"));
        assert!(id.as_str().ends_with("@So1ana"));
    }
}

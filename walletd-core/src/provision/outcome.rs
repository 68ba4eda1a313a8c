//! Provisioning results and user guidance

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::credentials::{DEFAULT_ENV_FILE, HEDERA_OPERATOR_ID_VAR, HEDERA_OPERATOR_KEY_VAR};
use crate::mode::NetworkMode;
use crate::wallet::{AccountId, Balance, WalletHandle};
use super::client::CreateAccountError;

/// Why an account was simulated instead of created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationReason {
    /// The network rejected the operator credentials
    InvalidCredentials,
    /// Operator credentials are not configured locally
    CredentialsNotConfigured,
    /// Any other failure, with its detail
    OtherFailure(String),
}

impl SimulationReason {
    /// Map a client error onto a reason; the match is total
    pub fn classify(error: &CreateAccountError) -> Self {
        match error {
            CreateAccountError::InvalidSignature(_) => Self::InvalidCredentials,
            CreateAccountError::CredentialMissing(_) => Self::CredentialsNotConfigured,
            CreateAccountError::Other(detail) => Self::OtherFailure(detail.clone()),
        }
    }

    /// Cause-specific instructions for getting a real account
    pub fn guidance(&self, chain: Chain, mode: NetworkMode) -> Vec<String> {
        let portal = chain.account_portal_url(mode);
        match self {
            Self::InvalidCredentials => vec![
                format!("Connected to the {} network but cannot create accounts", chain),
                "Reason: invalid operator credentials".to_string(),
                "To use a real account:".to_string(),
                format!("  1. Visit {}", portal),
                "  2. Create an account".to_string(),
                format!("  3. Update {} with the real credentials", DEFAULT_ENV_FILE),
            ],
            Self::CredentialsNotConfigured => vec![
                "No operator credentials configured".to_string(),
                format!(
                    "Set {} and {} in {} to create real accounts",
                    HEDERA_OPERATOR_ID_VAR, HEDERA_OPERATOR_KEY_VAR, DEFAULT_ENV_FILE
                ),
                format!("Get credentials at {}", portal),
            ],
            Self::OtherFailure(detail) => vec![
                format!("Failed to create account: {}", detail),
                format!("For a real account visit {}", portal),
            ],
        }
    }
}

impl fmt::Display for SimulationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => f.write_str("invalid operator credentials"),
            Self::CredentialsNotConfigured => f.write_str("operator credentials not configured"),
            Self::OtherFailure(detail) => write!(f, "provisioning failed: {}", detail),
        }
    }
}

/// Why no provisioning was attempted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// Automatic provisioning only runs on testnet
    NotApplicable(NetworkMode),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable(mode) => write!(f, "automatic provisioning is not available in {} mode", mode),
        }
    }
}

/// Result of one provisioning attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    RealAccount {
        id: String,
        balance: Option<Balance>,
    },
    SimulatedAccount {
        id: String,
        reason: SimulationReason,
        balance: Balance,
    },
    Failed {
        cause: FailureCause,
    },
}

impl ProvisioningOutcome {
    /// The account the outcome assigns, if any
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::RealAccount { id, .. } => Some(AccountId::Real(id.clone())),
            Self::SimulatedAccount { id, .. } => Some(AccountId::Simulated(id.clone())),
            Self::Failed { .. } => None,
        }
    }

    /// Attach the outcome to an unprovisioned handle
    pub fn apply(self, handle: WalletHandle) -> WalletHandle {
        match self {
            Self::RealAccount { id, balance } => handle.with_account(AccountId::Real(id), balance),
            Self::SimulatedAccount { id, balance, .. } => {
                handle.with_account(AccountId::Simulated(id), Some(balance))
            }
            Self::Failed { .. } => handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_total() {
        assert_eq!(
            SimulationReason::classify(&CreateAccountError::InvalidSignature("x".into())),
            SimulationReason::InvalidCredentials
        );
        assert_eq!(
            SimulationReason::classify(&CreateAccountError::CredentialMissing("x".into())),
            SimulationReason::CredentialsNotConfigured
        );
        assert_eq!(
            SimulationReason::classify(&CreateAccountError::Other("timeout".into())),
            SimulationReason::OtherFailure("timeout".into())
        );
    }

    #[test]
    fn test_guidance_points_to_portal() {
        for reason in [
            SimulationReason::InvalidCredentials,
            SimulationReason::CredentialsNotConfigured,
            SimulationReason::OtherFailure("boom".into()),
        ] {
            let lines = reason.guidance(Chain::Hedera, NetworkMode::Testnet);
            assert!(lines.iter().any(|l| l.contains("https://portal.hedera.com/")), "{:?}", reason);
        }
    }

    #[test]
    fn test_guidance_differs_per_cause() {
        let invalid = SimulationReason::InvalidCredentials.guidance(Chain::Hedera, NetworkMode::Testnet);
        let missing = SimulationReason::CredentialsNotConfigured.guidance(Chain::Hedera, NetworkMode::Testnet);
        assert_ne!(invalid, missing);
    }
}

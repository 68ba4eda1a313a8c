//! Network client contract for account creation

use async_trait::async_trait;
use thiserror::Error;

use crate::chain::Chain;
use crate::config::EndpointConfig;
use crate::credentials::OperatorCredentials;
use crate::mode::NetworkMode;
use crate::wallet::{Balance, WalletHandle};

/// Everything a network client needs to bind a key to an account
#[derive(Debug, Clone)]
pub struct AccountRequest {
    pub chain: Chain,
    pub mode: NetworkMode,
    /// Raw public key bytes
    pub public_key: Vec<u8>,
    pub address: String,
    pub endpoint: EndpointConfig,
    pub credentials: Option<OperatorCredentials>,
}

impl AccountRequest {
    pub fn for_handle(
        handle: &WalletHandle,
        endpoint: &EndpointConfig,
        credentials: Option<OperatorCredentials>,
    ) -> Self {
        Self {
            chain: handle.chain(),
            mode: handle.mode(),
            public_key: handle.key_pair().public_key().as_bytes().to_vec(),
            address: handle.address().to_string(),
            endpoint: endpoint.clone(),
            credentials,
        }
    }
}

/// An account the network recognizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    pub account_id: String,
    pub balance: Option<Balance>,
}

/// Why a network client could not create an account
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateAccountError {
    /// The remote side rejected the operator signature or API credentials
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A credential the request needs is not configured
    #[error("{0} not set")]
    CredentialMissing(String),

    /// Transport failures, timeouts, malformed responses and anything else
    #[error("{0}")]
    Other(String),
}

impl CreateAccountError {
    /// Classify a free-form error message from a client that does not report
    /// structured errors.
    ///
    /// Checks run in order and the first hit wins, so a signature rejection
    /// that also mentions a missing value is still a signature rejection.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();

        if lower.contains("invalidsignature")
            || lower.contains("invalid_signature")
            || lower.contains("invalid signature")
        {
            Self::InvalidSignature(message)
        } else if lower.contains("not set") {
            Self::CredentialMissing(message)
        } else {
            Self::Other(message)
        }
    }
}

/// Performs the single account-creation exchange for one chain
#[async_trait]
pub trait AccountCreator: Send + Sync {
    async fn create_account(&self, request: &AccountRequest) -> Result<CreatedAccount, CreateAccountError>;
}

//! Operator credentials used for account provisioning

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::config::WalletConfig;

/// Environment variable holding the Hedera operator account id
pub const HEDERA_OPERATOR_ID_VAR: &str = "HEDERA_OPERATOR_ID";

/// Environment variable holding the Hedera operator private key
pub const HEDERA_OPERATOR_KEY_VAR: &str = "OPERATOR_PRIVATE_KEY";

/// Default secrets file
pub const DEFAULT_ENV_FILE: &str = ".env.hedera";

/// An operator account that pays for account creation
#[derive(Clone)]
pub struct OperatorCredentials {
    pub operator_id: String,
    pub operator_key: Zeroizing<String>,
}

impl OperatorCredentials {
    pub fn new(operator_id: impl Into<String>, operator_key: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
            operator_key: Zeroizing::new(operator_key.into()),
        }
    }
}

impl fmt::Debug for OperatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorCredentials")
            .field("operator_id", &self.operator_id)
            .field("operator_key", &"<redacted>")
            .finish()
    }
}

/// Supplies operator credentials to the provisioner.
///
/// Absence is reported as `None`, never as an error.
pub trait CredentialSource: Send + Sync {
    fn operator_credentials(&self, chain: Chain) -> Option<OperatorCredentials>;
}

/// Reads credentials from the process environment, then a dotenv file, then
/// the wallet config.
///
/// The file is read once, when the source is built, and never written into
/// the process environment.
#[derive(Clone, Default)]
pub struct EnvCredentialSource {
    file_operator_id: Option<String>,
    file_operator_key: Option<Zeroizing<String>>,
    config_operator_id: Option<String>,
    config_operator_key: Option<Zeroizing<String>>,
}

impl EnvCredentialSource {
    pub fn new(env_file: Option<PathBuf>, config: &WalletConfig) -> Self {
        let mut source = Self {
            config_operator_id: config.hedera.operator_id.clone(),
            config_operator_key: config.hedera.operator_key.clone().map(Zeroizing::new),
            ..Self::default()
        };
        if let Some(path) = env_file {
            source.read_env_file(&path);
        }
        source
    }

    fn read_env_file(&mut self, path: &Path) {
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "credentials file not loaded");
                return;
            }
        };

        for entry in entries {
            match entry {
                Ok((key, value)) if key == HEDERA_OPERATOR_ID_VAR => self.file_operator_id = Some(value),
                Ok((key, value)) if key == HEDERA_OPERATOR_KEY_VAR => {
                    self.file_operator_key = Some(Zeroizing::new(value))
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "stopped reading malformed credentials file");
                    break;
                }
            }
        }
        debug!(path = %path.display(), "read credentials file");
    }
}

impl CredentialSource for EnvCredentialSource {
    fn operator_credentials(&self, chain: Chain) -> Option<OperatorCredentials> {
        if chain != Chain::Hedera {
            return None;
        }

        let operator_id = non_blank(std::env::var(HEDERA_OPERATOR_ID_VAR).ok())
            .or_else(|| non_blank(self.file_operator_id.clone()))
            .or_else(|| non_blank(self.config_operator_id.clone()))?;
        let operator_key = non_blank(std::env::var(HEDERA_OPERATOR_KEY_VAR).ok())
            .or_else(|| non_blank(self.file_operator_key.as_ref().map(|k| k.to_string())))
            .or_else(|| non_blank(self.config_operator_key.as_ref().map(|k| k.to_string())))?;

        Some(OperatorCredentials::new(operator_id, operator_key))
    }
}

/// Fixed credentials, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    hedera: Option<OperatorCredentials>,
}

impl StaticCredentials {
    /// No credentials for any chain
    pub fn none() -> Self {
        Self::default()
    }

    pub fn hedera(credentials: OperatorCredentials) -> Self {
        Self { hedera: Some(credentials) }
    }
}

impl CredentialSource for StaticCredentials {
    fn operator_credentials(&self, chain: Chain) -> Option<OperatorCredentials> {
        match chain {
            Chain::Hedera => self.hedera.clone(),
            _ => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//! Per-chain wallet handle

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::crypto::keys::{bitcoin, hedera, icp, monero, solana, KeyPair, PrivateKey};
use crate::error::Result;
use crate::mode::NetworkMode;

/// Whole units shown for simulated accounts
pub const SIMULATED_BALANCE_UNITS: u128 = 10_000;

/// An account identifier, always tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum AccountId {
    /// Recognized by the network
    Real(String),
    /// Fabricated locally because real provisioning failed
    Simulated(String),
}

impl AccountId {
    /// The bare identifier
    pub fn as_str(&self) -> &str {
        match self {
            Self::Real(id) | Self::Simulated(id) => id,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(id) => write!(f, "{}", id),
            Self::Simulated(id) => write!(f, "{} (simulated)", id),
        }
    }
}

/// A balance snapshot in the chain's smallest unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Amount in the smallest unit (satoshis, wei, lamports, piconero, tinybars, e8s)
    pub amount: u128,
    /// Chain the amount is denominated for
    pub chain: Chain,
    /// Cosmetic placeholder, never spendable
    pub simulated: bool,
}

impl Balance {
    /// A balance reported by the network
    pub fn new(chain: Chain, amount: u128) -> Self {
        Self { amount, chain, simulated: false }
    }

    /// The fixed placeholder attached to simulated accounts
    pub fn simulated_placeholder(chain: Chain) -> Self {
        Self {
            amount: SIMULATED_BALANCE_UNITS * 10u128.pow(chain.decimals()),
            chain,
            simulated: true,
        }
    }

    /// Whole units, truncating any fraction
    pub fn whole_units(&self) -> u128 {
        self.amount / 10u128.pow(self.chain.decimals())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10u128.pow(self.chain.decimals());
        let whole = group_thousands(self.amount / scale);
        let fraction = self.amount % scale;

        if fraction == 0 {
            write!(f, "{} {}", whole, self.chain.native_unit())?;
        } else {
            let digits = format!("{:0width$}", fraction, width = self.chain.decimals() as usize);
            write!(f, "{}.{} {}", whole, digits.trim_end_matches('0'), self.chain.native_unit())?;
        }

        if self.simulated {
            f.write_str(" (simulated)")?;
        }
        Ok(())
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A wallet for one chain.
///
/// Always carries key material. Handles are assembled completely before they
/// are installed in the registry and are never mutated afterwards; a
/// re-initialization produces a new handle.
#[derive(Debug)]
pub struct WalletHandle {
    chain: Chain,
    mode: NetworkMode,
    key_pair: KeyPair,
    address: String,
    account: Option<AccountId>,
    balance: Option<Balance>,
}

impl WalletHandle {
    pub(crate) fn new(chain: Chain, mode: NetworkMode, key_pair: KeyPair, address: String) -> Self {
        Self {
            chain,
            mode,
            key_pair,
            address,
            account: None,
            balance: None,
        }
    }

    /// Attach a provisioned account, consuming the unprovisioned handle
    pub fn with_account(mut self, account: AccountId, balance: Option<Balance>) -> Self {
        self.account = Some(account);
        self.balance = balance;
        self
    }

    /// A new handle holding a copy of the same keys, bound to `account`
    pub(crate) fn rebound(&self, account: AccountId, balance: Option<Balance>) -> Result<Self> {
        let private_key = PrivateKey::new(
            self.key_pair.private_key().as_bytes().to_vec(),
            self.key_pair.scheme(),
        );
        let key_pair = KeyPair::new(private_key, self.key_pair.public_key().clone())?;
        Ok(Self::new(self.chain, self.mode, key_pair, self.address.clone()).with_account(account, balance))
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// Address derived from the public key for the mode's network
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn account_id(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    pub fn balance(&self) -> Option<&Balance> {
        self.balance.as_ref()
    }

    pub fn is_provisioned(&self) -> bool {
        self.account.is_some()
    }

    /// Public key in the encoding the chain's tooling expects
    pub fn public_key_display(&self) -> Result<String> {
        let public_key = self.key_pair.public_key();
        match self.chain {
            Chain::Hedera => hedera::public_key_to_der_hex(public_key),
            Chain::Solana => solana::public_key_to_address(public_key),
            Chain::Icp => Ok(hex::encode(icp::public_key_to_der(public_key)?)),
            Chain::Bitcoin | Chain::Ethereum | Chain::Monero => Ok(public_key.to_hex()),
        }
    }

    /// Private key in the chain's import format.
    ///
    /// Only for display the user explicitly asked for; the returned string is
    /// wiped when dropped.
    pub fn export_private_key(&self) -> Result<Zeroizing<String>> {
        let private_key = self.key_pair.private_key();
        let exported = match self.chain {
            Chain::Bitcoin => bitcoin::private_key_to_wif(private_key, bitcoin::network_for_mode(self.mode))?,
            Chain::Ethereum => format!("0x{}", hex::encode(private_key.as_bytes())),
            Chain::Solana => solana::export_keypair_base58(&self.key_pair)?,
            Chain::Hedera => hedera::private_key_to_der_hex(private_key)?,
            Chain::Monero => monero::private_spend_key_hex(private_key)?,
            Chain::Icp => hex::encode(private_key.as_bytes()),
        };
        Ok(Zeroizing::new(exported))
    }
}

//! Chain wallet construction

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::chain::Chain;
use crate::crypto::keys::{self, bitcoin, ethereum, hedera, icp, monero, solana, KeyPair};
use crate::error::Result;
use crate::mode::NetworkMode;
use super::handle::WalletHandle;

/// Builds unprovisioned wallet handles.
///
/// Construction never touches the network, so key generation works offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainWalletFactory;

impl ChainWalletFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a wallet with fresh key material from the OS randomness source
    pub fn create(&self, chain: Chain, mode: NetworkMode) -> Result<WalletHandle> {
        self.create_with_rng(chain, mode, &mut rand::rngs::OsRng)
    }

    /// Create a wallet drawing key material from `rng`
    pub fn create_with_rng<R>(&self, chain: Chain, mode: NetworkMode, rng: &mut R) -> Result<WalletHandle>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let key_pair = keys::generate_key_pair(chain.key_scheme(), rng)?;
        let address = address_for(chain, mode, &key_pair)?;

        debug!(%chain, %mode, %address, "generated wallet key pair");

        Ok(WalletHandle::new(chain, mode, key_pair, address))
    }
}

/// Derive the chain's address for a key pair
pub fn address_for(chain: Chain, mode: NetworkMode, key_pair: &KeyPair) -> Result<String> {
    let public_key = key_pair.public_key();
    match chain {
        Chain::Bitcoin => bitcoin::public_key_to_address(public_key, bitcoin::network_for_mode(mode)),
        Chain::Ethereum => ethereum::public_key_to_address(public_key),
        Chain::Solana => solana::public_key_to_address(public_key),
        Chain::Monero => monero::public_key_to_address(public_key, mode),
        // Hedera accounts are assigned by the network; the key is the only local identity
        Chain::Hedera => hedera::public_key_to_der_hex(public_key),
        Chain::Icp => icp::public_key_to_principal_text(public_key),
    }
}

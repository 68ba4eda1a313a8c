//! Monero key generation and addressing
//!
//! A Monero wallet holds two ed25519 scalars: the spend key and the view key.
//! The view key is derived from the spend key the way the reference wallet
//! does it, so the spend key alone restores the wallet.

use base58_monero::base58;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::mode::NetworkMode;
use super::ethereum::keccak256;
use super::keypair::{random_seed, KeyPair, KeyScheme, PrivateKey, PublicKey};

/// Address prefix byte for standard addresses
pub fn network_byte(mode: NetworkMode) -> u8 {
    match mode {
        NetworkMode::Mainnet => 18,
        // The CLI has always pointed test wallets at stagenet
        NetworkMode::Testnet | NetworkMode::Stagenet => 24,
        NetworkMode::Local | NetworkMode::Devnet => 53,
    }
}

/// Network name the daemon reports for the mode
pub fn network_name(mode: NetworkMode) -> &'static str {
    match mode {
        NetworkMode::Mainnet => "mainnet",
        NetworkMode::Testnet | NetworkMode::Stagenet => "stagenet",
        NetworkMode::Local | NetworkMode::Devnet => "testnet",
    }
}

/// Generate a spend/view key pair.
///
/// The private key holds `spend ‖ view`, the public key `spend_pub ‖ view_pub`.
pub fn generate_monero_key_pair<R>(rng: &mut R) -> Result<KeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut seed = random_seed(rng)?;
    let key_pair = key_pair_from_spend_seed(&seed);
    seed.zeroize();
    key_pair
}

/// Rebuild the spend/view key pair from spend key material
pub fn key_pair_from_spend_seed(seed: &[u8; 32]) -> Result<KeyPair> {
    let spend = Scalar::from_bytes_mod_order(*seed);

    let mut view_seed = keccak256(spend.as_bytes());
    let view = Scalar::from_bytes_mod_order(view_seed);
    view_seed.zeroize();

    let spend_pub = EdwardsPoint::mul_base(&spend).compress();
    let view_pub = EdwardsPoint::mul_base(&view).compress();

    let mut private = Vec::with_capacity(64);
    private.extend_from_slice(spend.as_bytes());
    private.extend_from_slice(view.as_bytes());

    let mut public = Vec::with_capacity(64);
    public.extend_from_slice(spend_pub.as_bytes());
    public.extend_from_slice(view_pub.as_bytes());

    KeyPair::new(
        PrivateKey::new(private, KeyScheme::MoneroEd25519),
        PublicKey::new(public, KeyScheme::MoneroEd25519),
    )
}

/// Get the standard address for a spend/view public key pair
pub fn public_key_to_address(public_key: &PublicKey, mode: NetworkMode) -> Result<String> {
    if public_key.scheme() != KeyScheme::MoneroEd25519 || public_key.as_bytes().len() != 64 {
        return Err(Error::InvalidInput("Not a Monero public key pair".to_string()));
    }

    let mut data = Vec::with_capacity(65);
    data.push(network_byte(mode));
    data.extend_from_slice(public_key.as_bytes());

    base58::encode_check(&data)
        .map_err(|e| Error::KeyGeneration(format!("Failed to encode Monero address: {}", e)))
}

/// Hex of the private spend key, the value wallets restore from
pub fn private_spend_key_hex(private_key: &PrivateKey) -> Result<String> {
    if private_key.scheme() != KeyScheme::MoneroEd25519 || private_key.as_bytes().len() != 64 {
        return Err(Error::InvalidInput("Not a Monero private key pair".to_string()));
    }
    Ok(hex::encode(&private_key.as_bytes()[..32]))
}

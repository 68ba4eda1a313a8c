//! Bitcoin addressing

use bitcoin::secp256k1::{PublicKey as Secp256k1PublicKey, SecretKey};
use bitcoin::{Address, PrivateKey as BitcoinPrivateKey, PublicKey as BitcoinPublicKey};
pub use bitcoin::Network;

use crate::error::{Error, Result};
use crate::mode::NetworkMode;
use super::keypair::{KeyScheme, PrivateKey, PublicKey};

/// Bitcoin network a wallet targets in the given mode
pub fn network_for_mode(mode: NetworkMode) -> Network {
    match mode {
        NetworkMode::Mainnet => Network::Bitcoin,
        NetworkMode::Local => Network::Regtest,
        _ => Network::Testnet,
    }
}

/// Get the P2PKH address for a compressed public key
pub fn public_key_to_address(public_key: &PublicKey, network: Network) -> Result<String> {
    if public_key.scheme() != KeyScheme::Secp256k1 {
        return Err(Error::InvalidInput("Not a Bitcoin public key".to_string()));
    }

    // The public key should be in compressed format (33 bytes)
    if public_key.as_bytes().len() != 33 {
        return Err(Error::InvalidInput("Invalid Bitcoin public key length".to_string()));
    }

    let public_key = Secp256k1PublicKey::from_slice(public_key.as_bytes())
        .map_err(|e| Error::InvalidInput(format!("Invalid Bitcoin public key: {}", e)))?;

    Ok(Address::p2pkh(&BitcoinPublicKey::new(public_key), network).to_string())
}

/// Export a private key in wallet import format
pub fn private_key_to_wif(private_key: &PrivateKey, network: Network) -> Result<String> {
    if private_key.scheme() != KeyScheme::Secp256k1 {
        return Err(Error::InvalidInput("Not a Bitcoin private key".to_string()));
    }

    let secret_key = SecretKey::from_slice(private_key.as_bytes())
        .map_err(|e| Error::InvalidInput(format!("Invalid Bitcoin private key: {}", e)))?;

    Ok(BitcoinPrivateKey::new(secret_key, network).to_wif())
}

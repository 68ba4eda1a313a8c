//! Solana addressing

use crate::error::{Error, Result};
use super::keypair::{KeyPair, KeyScheme, PublicKey};

/// Get the Solana address from a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Result<String> {
    if public_key.scheme() != KeyScheme::Ed25519 {
        return Err(Error::InvalidInput("Not a Solana public key".to_string()));
    }

    let public_key = public_key.as_bytes();

    // The public key should be 32 bytes
    if public_key.len() != 32 {
        return Err(Error::InvalidInput("Invalid Solana public key length".to_string()));
    }

    // Encode the public key as base58
    Ok(bs58::encode(public_key).into_string())
}

/// Export the key pair in the 64 byte secret-then-public form wallets import
pub fn export_keypair_base58(key_pair: &KeyPair) -> Result<String> {
    if key_pair.scheme() != KeyScheme::Ed25519 {
        return Err(Error::InvalidInput("Not a Solana key pair".to_string()));
    }

    let mut bytes = zeroize::Zeroizing::new(Vec::with_capacity(64));
    bytes.extend_from_slice(key_pair.private_key().as_bytes());
    bytes.extend_from_slice(key_pair.public_key().as_bytes());

    Ok(bs58::encode(bytes.as_slice()).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::generate_key_pair;

    #[test]
    fn test_address_decodes_to_public_key() {
        let key_pair = generate_key_pair(KeyScheme::Ed25519, &mut rand::rngs::OsRng).unwrap();
        let address = public_key_to_address(key_pair.public_key()).unwrap();
        let decoded = bs58::decode(&address).into_vec().unwrap();
        assert_eq!(decoded, key_pair.public_key().as_bytes());
    }

    #[test]
    fn test_export_is_64_bytes() {
        let key_pair = generate_key_pair(KeyScheme::Ed25519, &mut rand::rngs::OsRng).unwrap();
        let exported = export_keypair_base58(&key_pair).unwrap();
        assert_eq!(bs58::decode(&exported).into_vec().unwrap().len(), 64);
    }
}

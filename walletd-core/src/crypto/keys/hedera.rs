//! Hedera key encoding

use crate::error::{Error, Result};
use super::keypair::{KeyScheme, PrivateKey, PublicKey};

/// DER prefix of an ed25519 SubjectPublicKeyInfo
const ED25519_PUBLIC_DER_PREFIX: &str = "302a300506032b6570032100";

/// DER prefix of an ed25519 PKCS#8 private key
const ED25519_PRIVATE_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// Hex DER encoding of a public key, as shown by the Hedera portal and SDKs
pub fn public_key_to_der_hex(public_key: &PublicKey) -> Result<String> {
    if public_key.scheme() != KeyScheme::Ed25519 || public_key.as_bytes().len() != 32 {
        return Err(Error::InvalidInput("Not a Hedera ed25519 public key".to_string()));
    }
    Ok(format!("{}{}", ED25519_PUBLIC_DER_PREFIX, public_key.to_hex()))
}

/// Hex DER encoding of a private key
pub fn private_key_to_der_hex(private_key: &PrivateKey) -> Result<String> {
    if private_key.scheme() != KeyScheme::Ed25519 || private_key.as_bytes().len() != 32 {
        return Err(Error::InvalidInput("Not a Hedera ed25519 private key".to_string()));
    }
    Ok(format!("{}{}", ED25519_PRIVATE_DER_PREFIX, hex::encode(private_key.as_bytes())))
}

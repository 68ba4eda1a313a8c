//! Common key pair types and generation

use std::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Signature schemes used by the supported chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyScheme {
    /// Bitcoin, Ethereum and the Internet Computer
    Secp256k1,
    /// Solana and Hedera
    Ed25519,
    /// Monero spend/view scalar pair on the ed25519 curve
    MoneroEd25519,
}

/// A private key for a specific scheme.
///
/// The bytes are wiped when the key is dropped and never printed by `Debug`.
pub struct PrivateKey {
    /// The raw private key bytes
    bytes: Vec<u8>,
    /// The scheme of the key
    scheme: KeyScheme,
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PrivateKey {
    /// Create a new private key from bytes
    pub fn new(bytes: Vec<u8>, scheme: KeyScheme) -> Self {
        Self { bytes, scheme }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the key scheme
    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("scheme", &self.scheme)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// A public key for a specific scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// The raw public key bytes
    bytes: Vec<u8>,
    /// The scheme of the key
    scheme: KeyScheme,
}

impl PublicKey {
    /// Create a new public key from bytes
    pub fn new(bytes: Vec<u8>, scheme: KeyScheme) -> Self {
        Self { bytes, scheme }
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the key scheme
    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    /// Lowercase hex of the raw bytes
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

/// A key pair for a specific scheme
#[derive(Debug)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a new key pair
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Result<Self> {
        if private_key.scheme() != public_key.scheme() {
            return Err(Error::KeyGeneration("Key scheme mismatch".to_string()));
        }
        if private_key.as_bytes().is_empty() {
            return Err(Error::KeyGeneration("Empty private key".to_string()));
        }
        Ok(Self { private_key, public_key })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the key scheme
    pub fn scheme(&self) -> KeyScheme {
        self.private_key.scheme()
    }
}

/// Generate a fresh key pair for a scheme from the given randomness source
pub fn generate_key_pair<R>(scheme: KeyScheme, rng: &mut R) -> Result<KeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    match scheme {
        KeyScheme::Secp256k1 => generate_secp256k1(rng),
        KeyScheme::Ed25519 => generate_ed25519(rng),
        KeyScheme::MoneroEd25519 => super::monero::generate_monero_key_pair(rng),
    }
}

/// Fill a 32 byte buffer from the randomness source
pub(crate) fn random_seed<R>(rng: &mut R) -> Result<[u8; 32]>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut seed = [0u8; 32];
    rng.try_fill_bytes(&mut seed)
        .map_err(|e| Error::KeyGeneration(format!("Randomness source failed: {}", e)))?;
    Ok(seed)
}

fn generate_secp256k1<R>(rng: &mut R) -> Result<KeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut seed = random_seed(rng)?;
    let secret_key = SecretKey::from_slice(&seed)
        .map_err(|e| Error::KeyGeneration(format!("Invalid secret key: {}", e)));
    seed.zeroize();
    let secret_key = secret_key?;

    let secp = Secp256k1::new();
    let public_key = Secp256k1PublicKey::from_secret_key(&secp, &secret_key);

    let private_key = PrivateKey::new(secret_key.secret_bytes().to_vec(), KeyScheme::Secp256k1);
    let public_key = PublicKey::new(public_key.serialize().to_vec(), KeyScheme::Secp256k1);

    KeyPair::new(private_key, public_key)
}

fn generate_ed25519<R>(rng: &mut R) -> Result<KeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut seed = random_seed(rng)?;
    let signing_key = SigningKey::from_bytes(&seed);
    seed.zeroize();
    let verifying_key = VerifyingKey::from(&signing_key);

    let private_key = PrivateKey::new(signing_key.to_bytes().to_vec(), KeyScheme::Ed25519);
    let public_key = PublicKey::new(verifying_key.to_bytes().to_vec(), KeyScheme::Ed25519);

    KeyPair::new(private_key, public_key)
}

/// Decompress a secp256k1 public key into its 65 byte form
pub(crate) fn secp256k1_uncompressed(public_key: &PublicKey) -> Result<[u8; 65]> {
    if public_key.scheme() != KeyScheme::Secp256k1 {
        return Err(Error::InvalidInput("Not a secp256k1 public key".to_string()));
    }
    let key = Secp256k1PublicKey::from_slice(public_key.as_bytes())
        .map_err(|e| Error::InvalidInput(format!("Invalid secp256k1 public key: {}", e)))?;
    Ok(key.serialize_uncompressed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_secp256k1_key_pair() {
        let key_pair = generate_key_pair(KeyScheme::Secp256k1, &mut rand::rngs::OsRng).unwrap();
        assert_eq!(key_pair.private_key().as_bytes().len(), 32);
        assert_eq!(key_pair.public_key().as_bytes().len(), 33);
    }

    #[test]
    fn test_ed25519_key_pair() {
        let key_pair = generate_key_pair(KeyScheme::Ed25519, &mut rand::rngs::OsRng).unwrap();
        assert_eq!(key_pair.private_key().as_bytes().len(), 32);
        assert_eq!(key_pair.public_key().as_bytes().len(), 32);
    }

    #[test]
    fn test_fresh_keys_every_call() {
        let first = generate_key_pair(KeyScheme::Ed25519, &mut rand::rngs::OsRng).unwrap();
        let second = generate_key_pair(KeyScheme::Ed25519, &mut rand::rngs::OsRng).unwrap();
        assert_ne!(first.public_key(), second.public_key());
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let a = generate_key_pair(KeyScheme::Secp256k1, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_key_pair(KeyScheme::Secp256k1, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let key_pair = generate_key_pair(KeyScheme::Ed25519, &mut rand::rngs::OsRng).unwrap();
        let hex_secret = hex::encode(key_pair.private_key().as_bytes());
        let debug = format!("{:?}", key_pair);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&hex_secret));
    }

    #[test]
    fn test_mismatched_schemes_rejected() {
        let private_key = PrivateKey::new(vec![1; 32], KeyScheme::Ed25519);
        let public_key = PublicKey::new(vec![2; 33], KeyScheme::Secp256k1);
        assert!(KeyPair::new(private_key, public_key).is_err());
    }
}

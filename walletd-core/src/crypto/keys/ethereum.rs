//! Ethereum addressing

use crate::error::Result;
use super::keypair::{secp256k1_uncompressed, PublicKey};

/// Get the EIP-55 checksummed Ethereum address from a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Result<String> {
    let public_key = secp256k1_uncompressed(public_key)?;

    // Skip the first byte (0x04) and hash the rest
    let key_hash = keccak256(&public_key[1..]);

    // Take the last 20 bytes of the hash
    Ok(to_checksum_address(&hex::encode(&key_hash[12..])))
}

/// Apply the EIP-55 mixed-case checksum to a lowercase hex address without prefix
fn to_checksum_address(lower_hex: &str) -> String {
    let hash = keccak256(lower_hex.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");

    for (i, c) in lower_hex.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Calculate the Keccak-256 hash of data
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::{Digest, Keccak256};
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{generate_key_pair, KeyScheme};

    #[test]
    fn test_address_shape() {
        let key_pair = generate_key_pair(KeyScheme::Secp256k1, &mut rand::rngs::OsRng).unwrap();
        let address = public_key_to_address(key_pair.public_key()).unwrap();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }

    #[test]
    fn test_eip55_reference_vector() {
        assert_eq!(
            to_checksum_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }
}

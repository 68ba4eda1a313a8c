//! Internet Computer principals

use candid::Principal;

use crate::error::Result;
use super::keypair::{secp256k1_uncompressed, PublicKey};

/// DER SubjectPublicKeyInfo prefix for an uncompressed secp256k1 key
const SECP256K1_SPKI_PREFIX: [u8; 23] = [
    0x30, 0x56, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x42, 0x00,
];

/// DER encoding of the public key, the form the replica authenticates
pub fn public_key_to_der(public_key: &PublicKey) -> Result<Vec<u8>> {
    let uncompressed = secp256k1_uncompressed(public_key)?;
    let mut der = Vec::with_capacity(SECP256K1_SPKI_PREFIX.len() + uncompressed.len());
    der.extend_from_slice(&SECP256K1_SPKI_PREFIX);
    der.extend_from_slice(&uncompressed);
    Ok(der)
}

/// Self-authenticating principal for a public key
pub fn public_key_to_principal(public_key: &PublicKey) -> Result<Principal> {
    let der = public_key_to_der(public_key)?;
    Ok(Principal::self_authenticating(der))
}

/// Textual principal, the wallet's address on the IC
pub fn public_key_to_principal_text(public_key: &PublicKey) -> Result<String> {
    Ok(public_key_to_principal(public_key)?.to_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{generate_key_pair, KeyScheme};

    /// Compressed secp256k1 generator point, the public key of secret 1
    const GENERATOR: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_generator_principal() {
        let public_key = PublicKey::new(hex::decode(GENERATOR).unwrap(), KeyScheme::Secp256k1);
        assert_eq!(
            public_key_to_principal_text(&public_key).unwrap(),
            "vh5jj-2v5av-uunuh-hbba5-pss3b-vrzng-7dqdp-xcku3-zj2tc-36shc-bqe"
        );
    }

    #[test]
    fn test_principal_is_self_authenticating() {
        let key_pair = generate_key_pair(KeyScheme::Secp256k1, &mut rand::rngs::OsRng).unwrap();
        let principal = public_key_to_principal(key_pair.public_key()).unwrap();
        // sha224 digest followed by the self-authenticating tag
        assert_eq!(principal.as_slice().len(), 29);
        assert_eq!(principal.as_slice()[28], 0x02);

        let text = principal.to_text();
        assert_eq!(Principal::from_text(&text).unwrap(), principal);
    }

    #[test]
    fn test_der_prefix() {
        let key_pair = generate_key_pair(KeyScheme::Secp256k1, &mut rand::rngs::OsRng).unwrap();
        let der = public_key_to_der(key_pair.public_key()).unwrap();
        assert_eq!(der.len(), 88);
        assert_eq!(der[..23], SECP256K1_SPKI_PREFIX);
        assert_eq!(der[23], 0x04);
    }
}

//! Tests for per-chain key generation and addresses

use rand::rngs::StdRng;
use rand::SeedableRng;

use walletd_core::crypto::keys::*;
use walletd_core::wallet::{address_for, ChainWalletFactory};
use walletd_core::{Chain, NetworkMode};

#[test]
fn test_every_chain_generates_offline() {
    let factory = ChainWalletFactory::new();
    for mode in NetworkMode::ALL {
        for chain in Chain::ALL {
            let wallet = factory.create(chain, mode).unwrap();
            assert_eq!(wallet.chain(), chain);
            assert_eq!(wallet.mode(), mode);
            assert!(!wallet.address().is_empty());
            assert!(!wallet.is_provisioned());
        }
    }
}

#[test]
fn test_seeded_generation_is_deterministic() {
    let factory = ChainWalletFactory::new();
    for chain in Chain::ALL {
        let a = factory
            .create_with_rng(chain, NetworkMode::Testnet, &mut StdRng::seed_from_u64(11))
            .unwrap();
        let b = factory
            .create_with_rng(chain, NetworkMode::Testnet, &mut StdRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(a.address(), b.address(), "{}", chain);
    }
}

#[test]
fn test_ethereum_address() {
    let wallet = ChainWalletFactory::new().create(Chain::Ethereum, NetworkMode::Testnet).unwrap();
    assert!(wallet.address().starts_with("0x"));
    assert_eq!(wallet.address().len(), 42);

    let exported = wallet.export_private_key().unwrap();
    assert_eq!(exported.len(), 66);
}

#[test]
fn test_hedera_public_key_is_der_encoded() {
    let wallet = ChainWalletFactory::new().create(Chain::Hedera, NetworkMode::Testnet).unwrap();
    let public_key = wallet.public_key_display().unwrap();
    assert_eq!(public_key.len(), 88);
    assert!(public_key.starts_with("302a300506032b6570032100"));
}

#[test]
fn test_bitcoin_address_follows_mode() {
    let factory = ChainWalletFactory::new();

    let mainnet = factory.create(Chain::Bitcoin, NetworkMode::Mainnet).unwrap();
    assert!(mainnet.address().starts_with('1'));

    let testnet = factory.create(Chain::Bitcoin, NetworkMode::Testnet).unwrap();
    assert!(testnet.address().starts_with('m') || testnet.address().starts_with('n'));
}

#[test]
fn test_monero_address_length() {
    let wallet = ChainWalletFactory::new().create(Chain::Monero, NetworkMode::Stagenet).unwrap();
    assert_eq!(wallet.address().len(), 95);
    assert_eq!(wallet.key_pair().scheme(), KeyScheme::MoneroEd25519);
}

#[test]
fn test_monero_reference_address() {
    let mut seed = [0u8; 32];
    seed[0] = 1;
    let key_pair = monero::key_pair_from_spend_seed(&seed).unwrap();
    let address = address_for(Chain::Monero, NetworkMode::Testnet, &key_pair).unwrap();
    assert_eq!(
        address,
        "55BScWfUCysJ8QgRfFWTzmJ8QgRfFWTzmJ8QgRfFWTzmJ9HskYAEKgjVy4kd3K4MaxERLtGa7FFrVNLF3jYWyjHCF7rc4ng"
    );
}

#[test]
fn test_icp_reference_principal() {
    // Public key of secp256k1 secret 1
    let generator = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
    let principal = icp::public_key_to_principal_text(&PublicKey::new(generator, KeyScheme::Secp256k1)).unwrap();
    assert_eq!(principal, "vh5jj-2v5av-uunuh-hbba5-pss3b-vrzng-7dqdp-xcku3-zj2tc-36shc-bqe");
}

#[test]
fn test_icp_principal_shape() {
    let wallet = ChainWalletFactory::new().create(Chain::Icp, NetworkMode::Local).unwrap();
    let principal = wallet.address();
    assert_eq!(principal.len(), 63);
    assert!(principal.split('-').all(|group| group.len() <= 5));
}

#[test]
fn test_solana_export_is_keypair_bytes() {
    let wallet = ChainWalletFactory::new().create(Chain::Solana, NetworkMode::Devnet).unwrap();
    let exported = wallet.export_private_key().unwrap();
    let bytes = bs58::decode(exported.as_str()).into_vec().unwrap();
    assert_eq!(bytes.len(), 64);
    assert_eq!(&bytes[32..], wallet.key_pair().public_key().as_bytes());
}

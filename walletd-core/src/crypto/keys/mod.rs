//! Key generation and management
//!
//! This module provides functionality for generating and encoding keys for
//! the different blockchains.

pub mod bitcoin;
pub mod ethereum;
pub mod hedera;
pub mod icp;
pub mod monero;
pub mod solana;
mod keypair;

pub use keypair::*;

//! Cryptographic primitives and operations
//!
//! This module provides key generation and the per-chain encodings of keys
//! and addresses required for wallet management.

pub mod keys;

pub use keys::*;

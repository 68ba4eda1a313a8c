//! Wallet handles and their lifecycle
//!
//! This module provides the per-chain wallet handle, the factory that creates
//! handles with fresh key material, and the registry that holds the
//! initialized handle of each chain.

mod factory;
mod handle;
mod registry;

pub use factory::*;
pub use handle::*;
pub use registry::*;

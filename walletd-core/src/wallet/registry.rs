//! Process-lifetime registry of initialized wallets

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::chain::Chain;
use super::handle::WalletHandle;

/// Holds at most one initialized wallet per chain.
///
/// Handles are swapped whole under the write lock, so readers observe either
/// the previous handle or the new one. A replaced handle's private key is
/// wiped once the last outstanding reference to it is dropped.
#[derive(Debug, Default)]
pub struct WalletRegistry {
    wallets: RwLock<HashMap<Chain, Arc<WalletHandle>>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fully initialized handle, replacing any previous one.
    ///
    /// Returns `true` when an earlier handle was replaced.
    pub fn install(&self, handle: WalletHandle) -> bool {
        let chain = handle.chain();
        let previous = self
            .wallets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chain, Arc::new(handle));

        debug!(%chain, replaced = previous.is_some(), "installed wallet");
        previous.is_some()
    }

    /// Install `handle` only while `expected` is still the chain's handle.
    ///
    /// Returns `false`, leaving the registry untouched, when another
    /// initialization got there first.
    pub fn replace(&self, expected: &Arc<WalletHandle>, handle: WalletHandle) -> bool {
        let chain = handle.chain();
        let mut wallets = self.wallets.write().unwrap_or_else(PoisonError::into_inner);

        match wallets.get(&chain) {
            Some(current) if Arc::ptr_eq(current, expected) => {
                wallets.insert(chain, Arc::new(handle));
                debug!(%chain, "replaced wallet");
                true
            }
            _ => false,
        }
    }

    /// Current handle for a chain
    pub fn get(&self, chain: Chain) -> Option<Arc<WalletHandle>> {
        self.wallets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chain)
            .cloned()
    }

    /// Drop the handle for a chain
    pub fn remove(&self, chain: Chain) -> bool {
        self.wallets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&chain)
            .is_some()
    }

    /// Chains with an installed wallet, in declaration order
    pub fn chains(&self) -> Vec<Chain> {
        let mut chains: Vec<Chain> = self
            .wallets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        chains.sort();
        chains
    }

    pub fn len(&self) -> usize {
        self.wallets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Outbound (Driven) ports for the Transaction Engine subsystem.
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 4 (Account State) | `AccountStore` | Account lookup and balance mutation |
//! | 2 (Block Storage) | `BlockchainContext` | Current chain height |

use shared_types::Height;
use std::sync::atomic::{AtomicU32, Ordering};

pub use pc_04_account_store::AccountStore;

/// Chain view used for fee schedule and key binding decisions.
pub trait BlockchainContext: Send + Sync {
    /// Height of the current chain head.
    fn height(&self) -> Height;
}

/// Chain height held in an atomic, advanced by block processing.
#[derive(Debug, Default)]
pub struct ChainHeight {
    height: AtomicU32,
}

impl ChainHeight {
    pub fn new(height: Height) -> Self {
        Self {
            height: AtomicU32::new(height),
        }
    }

    pub fn set(&self, height: Height) {
        self.height.store(height, Ordering::SeqCst);
    }

    /// Move to the next height and return it. Saturates at `Height::MAX`.
    pub fn advance(&self) -> Height {
        let previous = self
            .height
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |h| {
                Some(h.saturating_add(1))
            })
            .unwrap_or_else(|h| h);
        previous.saturating_add(1)
    }
}

impl BlockchainContext for ChainHeight {
    fn height(&self) -> Height {
        self.height.load(Ordering::SeqCst)
    }
}
